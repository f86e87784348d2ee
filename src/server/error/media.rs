use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::{error_response, InternalServerError};

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("Unsupported media type {0:?}, expected image/jpeg, image/png or image/webp")]
    UnsupportedType(String),
    #[error("File declared as {declared:?} but its content is {detected:?}")]
    TypeMismatch { declared: String, detected: String },
    #[error("File is {size} bytes, the maximum upload size is {max} bytes")]
    TooLarge { size: usize, max: usize },
    #[error("Uploaded file is empty")]
    Empty,
    #[error("Failed to decode image: {0}")]
    Decode(image::ImageError),
    #[error("Failed to encode image: {0}")]
    Encode(image::ImageError),
    #[error("Invalid storage key {0:?}")]
    InvalidKey(String),
    #[error("Object {0:?} not found in storage")]
    ObjectNotFound(String),
    #[error("Storage IO error: {0}")]
    Storage(#[from] std::io::Error),
    #[error("Image processing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for MediaError {
    fn into_response(self) -> Response {
        match self {
            Self::UnsupportedType(_)
            | Self::TypeMismatch { .. }
            | Self::TooLarge { .. }
            | Self::Empty
            | Self::Decode(_) => {
                tracing::debug!("Rejected upload: {}", self);

                error_response(StatusCode::BAD_REQUEST, self.to_string())
            }
            Self::ObjectNotFound(_) => {
                tracing::warn!("{}", self);

                error_response(StatusCode::NOT_FOUND, "File not found")
            }
            err => InternalServerError(err).into_response(),
        }
    }
}
