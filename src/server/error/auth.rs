use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{model::user::Role, server::error::error_response};

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("User ID is not present in session")]
    UserNotInSession,
    #[error("User ID {0:?} not found in database despite having an active session")]
    UserNotInDatabase(i32),
    #[error("User ID {0:?} is deactivated")]
    UserInactive(i32),
    #[error("User ID {user_id:?} lacks the {required} role")]
    InsufficientRole { user_id: i32, required: Role },
    #[error("No account exists for auth subject {0:?}")]
    UnknownSubject(String),
    #[error("Failed to verify access token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
    #[error("Access token email does not match the invitation")]
    EmailMismatch,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!("{}", self);

        match self {
            Self::UserNotInSession | Self::UserNotInDatabase(_) => {
                error_response(StatusCode::UNAUTHORIZED, "Not authenticated")
            }
            Self::InvalidToken(_) => error_response(StatusCode::UNAUTHORIZED, "Invalid access token"),
            Self::UserInactive(_) => {
                error_response(StatusCode::FORBIDDEN, "Your account has been deactivated")
            }
            Self::InsufficientRole { .. } => error_response(
                StatusCode::FORBIDDEN,
                "You do not have permission to perform this action",
            ),
            Self::UnknownSubject(_) => error_response(
                StatusCode::FORBIDDEN,
                "No account exists for this login, ask an administrator for an invitation",
            ),
            Self::EmailMismatch => error_response(
                StatusCode::FORBIDDEN,
                "This invitation was issued for a different email address",
            ),
        }
    }
}
