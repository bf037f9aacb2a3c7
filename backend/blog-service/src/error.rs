/// Error types for blog-service
///
/// Errors are converted to appropriate HTTP responses for API clients.
/// Soft authorization failures (a non-author opening an edit form) are not
/// errors at all: handlers answer those with redirects before this type is
/// ever involved.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

/// Result type for blog-service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Storage operation failed
    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),

    /// Malformed form input; no mutation was applied
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing post/group/author/follow
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unauthenticated mutation attempt
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Uniqueness constraint violation
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_msg = self.to_string();

        HttpResponse::build(status).json(serde_json::json!({
            "error": error_msg,
            "status": status.as_u16(),
        }))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::Validation("text".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("post".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Unauthorized("login required".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Conflict("duplicate follow".into()).status_code(),
            StatusCode::CONFLICT
        );
    }
}
