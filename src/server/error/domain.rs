use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::error_response;

/// Business rule violations raised by services, messages are shown to the client as-is
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Not found error for a resource, e.g. `DomainError::not_found("Property", 3)`
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{} {} not found", resource, id))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }
}

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(message) => error_response(StatusCode::BAD_REQUEST, message),
            Self::NotFound(message) => error_response(StatusCode::NOT_FOUND, message),
            Self::Conflict(message) => error_response(StatusCode::CONFLICT, message),
        }
    }
}
