use sea_orm::DbErr;

use super::Error;

/// Strategy for handling errors in a retry context
pub enum ErrorRetryStrategy {
    /// Retry with exponential backoff (transient failures)
    Retry,
    /// Failed permanently
    Fail,
}

impl Error {
    /// Determine error retry strategy based upon application Error type
    pub fn to_retry_strategy(&self) -> ErrorRetryStrategy {
        match self {
            Self::DbErr(db_err) => match db_err {
                // Connection acquisition errors - transient, should retry
                DbErr::ConnectionAcquire(_) => ErrorRetryStrategy::Retry,
                // Connection errors - transient, should retry
                DbErr::Conn(_) => ErrorRetryStrategy::Retry,

                // Query errors, constraint violations, type conversion errors and missing
                // records won't resolve with a retry
                _ => ErrorRetryStrategy::Fail,
            },

            // Session store errors - transient
            Self::SessionError(_) => ErrorRetryStrategy::Retry,

            // Storage IO errors may be transient (e.g. a busy network filesystem)
            Self::MediaError(super::media::MediaError::Storage(_)) => ErrorRetryStrategy::Retry,

            Self::ConfigError(_)
            | Self::AuthError(_)
            | Self::DomainError(_)
            | Self::MediaError(_)
            | Self::ParseError(_)
            | Self::InternalError(_)
            | Self::Timeout(_)
            | Self::MultipartError(_)
            | Self::SchedulerError(_)
            | Self::IoError(_) => ErrorRetryStrategy::Fail,
        }
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DbErr, RuntimeErr};

    use crate::server::error::{domain::DomainError, retry::ErrorRetryStrategy, Error};

    /// Expect Retry for database connection errors
    #[test]
    fn retries_connection_errors() {
        let err = Error::DbErr(DbErr::Conn(RuntimeErr::Internal("refused".to_string())));

        assert!(matches!(err.to_retry_strategy(), ErrorRetryStrategy::Retry));
    }

    /// Expect Fail for query errors and domain errors
    #[test]
    fn fails_permanent_errors() {
        let query = Error::DbErr(DbErr::Custom("syntax".to_string()));
        let domain = Error::DomainError(DomainError::conflict("taken"));

        assert!(matches!(query.to_retry_strategy(), ErrorRetryStrategy::Fail));
        assert!(matches!(domain.to_retry_strategy(), ErrorRetryStrategy::Fail));
    }
}
