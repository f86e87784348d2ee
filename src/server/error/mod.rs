//! Error types for the Roost server application.
//!
//! Domain specific errors (authentication, configuration, domain rules, media) are grouped in
//! their own enums and aggregated by [`Error`]. All errors implement `IntoResponse`, unexpected
//! ones are logged and returned to the client as a generic 500 response.

pub mod auth;
pub mod config;
pub mod domain;
pub mod media;
pub mod retry;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{
    model::api::ErrorDto,
    server::error::{
        auth::AuthError, config::ConfigError, domain::DomainError, media::MediaError,
    },
};

/// Main error type for the Roost server application.
///
/// Uses `thiserror`'s `#[from]` so domain and library errors convert with `?`.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing or invalid environment variables).
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// Authentication or authorization failure.
    #[error(transparent)]
    AuthError(#[from] AuthError),
    /// Business rule violation: validation, missing rows, conflicts.
    #[error(transparent)]
    DomainError(#[from] DomainError),
    /// Upload validation, compression or storage failure.
    #[error(transparent)]
    MediaError(#[from] MediaError),
    /// Parse error (failed to parse a stored value).
    #[error("Failed to parse value: {0:?}")]
    ParseError(String),
    /// Internal error indicating a bug in Roost's code.
    #[error("Internal error with Roost's code, this indicates a bug: {0:?}")]
    InternalError(String),
    /// A multi-step operation did not finish within its time limit.
    #[error("Operation timed out: {0}")]
    Timeout(String),
    /// Malformed multipart request body.
    #[error(transparent)]
    MultipartError(#[from] axum::extract::multipart::MultipartError),
    /// Database error (query failures, connection issues, constraint violations).
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),
    /// Session error (session retrieval, storage, serialization).
    #[error(transparent)]
    SessionError(#[from] tower_sessions::session::Error),
    /// Cron scheduler error (job registration, scheduler startup).
    #[error(transparent)]
    SchedulerError(#[from] tokio_cron_scheduler::JobSchedulerError),
    /// IO error outside of media storage (binding the listener, serving).
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

/// Converts application errors into HTTP responses.
///
/// # Returns
/// - 400 Bad Request - Validation failures, rejected uploads, malformed multipart bodies
/// - 401 Unauthorized / 403 Forbidden - Authentication and role checks
/// - 404 Not Found - Missing rows or objects
/// - 409 Conflict - Business rule conflicts
/// - 500 Internal Server Error - Everything else (with error logging)
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::ConfigError(err) => err.into_response(),
            Self::AuthError(err) => err.into_response(),
            Self::DomainError(err) => err.into_response(),
            Self::MediaError(err) => err.into_response(),
            Self::MultipartError(err) => {
                tracing::debug!("Rejected multipart request: {}", err);

                (
                    err.status(),
                    Json(ErrorDto {
                        error: err.body_text(),
                    }),
                )
                    .into_response()
            }
            err => InternalServerError(err).into_response(),
        }
    }
}

/// Wrapper type for converting any displayable error into a 500 Internal Server Error response.
///
/// Logs the error message and returns a generic message to the client to avoid leaking
/// implementation details.
pub struct InternalServerError<E>(pub E);

impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorDto {
                error: "Internal server error".to_string(),
            }),
        )
            .into_response()
    }
}

/// Builds a JSON error response with the provided status and message
pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorDto {
            error: message.into(),
        }),
    )
        .into_response()
}
