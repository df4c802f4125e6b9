use service_core::error::AppError;
use thiserror::Error;

/// Failure kinds surfaced by the credential and session lifecycle.
///
/// Storage and crypto faults are folded into `Internal` with their cause kept
/// for logging; everything else is attributable to the caller's input.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Wrong credentials")]
    WrongCredential,

    #[error("Username already exists")]
    UsernameExists,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Internal server error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

/// Discriminant of [`ServiceError`] for callers that branch on the kind only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    WrongCredential,
    UsernameExists,
    InvalidToken,
    TokenExpired,
    Internal,
}

impl ErrorKind {
    /// Wire code sent to clients.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "INVALID_INPUT",
            ErrorKind::WrongCredential => "WRONG_CREDENTIALS",
            ErrorKind::UsernameExists => "USERNAME_EXISTS",
            ErrorKind::InvalidToken => "INVALID_TOKEN",
            ErrorKind::TokenExpired => "TOKEN_EXPIRED",
            ErrorKind::Internal => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::InvalidInput(_) => ErrorKind::InvalidInput,
            ServiceError::WrongCredential => ErrorKind::WrongCredential,
            ServiceError::UsernameExists => ErrorKind::UsernameExists,
            ServiceError::InvalidToken => ErrorKind::InvalidToken,
            ServiceError::TokenExpired => ErrorKind::TokenExpired,
            ServiceError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn internal(context: &str, err: impl std::fmt::Display) -> Self {
        ServiceError::Internal(anyhow::anyhow!("{}: {}", context, err))
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        ServiceError::Internal(anyhow::Error::new(err).context("Database error"))
    }
}

impl From<redis::RedisError> for ServiceError {
    fn from(err: redis::RedisError) -> Self {
        ServiceError::Internal(anyhow::Error::new(err).context("Session store error"))
    }
}

impl From<tokio::time::error::Elapsed> for ServiceError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        ServiceError::Internal(anyhow::Error::new(err).context("Storage operation timed out"))
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        let code = err.kind().code();
        match err {
            ServiceError::InvalidInput(msg) => {
                tracing::debug!(reason = %msg, "Rejected invalid input");
                AppError::BadRequest(anyhow::anyhow!(code))
            }
            ServiceError::WrongCredential => AppError::AuthError(anyhow::anyhow!(code)),
            ServiceError::UsernameExists => AppError::Conflict(anyhow::anyhow!(code)),
            ServiceError::InvalidToken => AppError::Unauthorized(anyhow::anyhow!(code)),
            ServiceError::TokenExpired => AppError::Unauthorized(anyhow::anyhow!(code)),
            ServiceError::Internal(e) => AppError::InternalError(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_code() {
        assert_eq!(ServiceError::WrongCredential.kind(), ErrorKind::WrongCredential);
        assert_eq!(ServiceError::TokenExpired.kind().code(), "TOKEN_EXPIRED");
        let internal = ServiceError::internal("hashing", "entropy exhausted");
        assert_eq!(internal.kind(), ErrorKind::Internal);
        assert!(internal.to_string().contains("entropy exhausted"));
    }

    #[test]
    fn test_app_error_mapping() {
        assert!(matches!(
            AppError::from(ServiceError::UsernameExists),
            AppError::Conflict(_)
        ));
        assert!(matches!(
            AppError::from(ServiceError::WrongCredential),
            AppError::AuthError(_)
        ));
        assert!(matches!(
            AppError::from(ServiceError::Internal(anyhow::anyhow!("boom"))),
            AppError::InternalError(_)
        ));
    }

    #[tokio::test]
    async fn test_timeout_maps_to_internal() {
        let elapsed = tokio::time::timeout(
            std::time::Duration::from_millis(1),
            std::future::pending::<()>(),
        )
        .await
        .unwrap_err();
        assert_eq!(ServiceError::from(elapsed).kind(), ErrorKind::Internal);
    }
}
