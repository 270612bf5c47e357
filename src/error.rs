use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use tracing::error;

use crate::repository::RepoError;

/// Failure of a single user action. Every variant is terminal for that
/// action; nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed or missing field, reported before any persistence attempt.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// Duplicate detected by an explicit pre-check or by the store.
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Internal Server Error")]
    Internal,
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    pub fn invalid_credentials() -> Self {
        AppError::Unauthorized("Invalid credentials".to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.to_string()
        }))
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(what) => AppError::NotFound(format!("{what} not found")),
            RepoError::Duplicate(what) => AppError::Conflict(format!("{what} already exists")),
            RepoError::Database(e) => {
                error!(error = %e, "Database error");
                AppError::Internal
            }
        }
    }
}
