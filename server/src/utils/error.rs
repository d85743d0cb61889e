use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use crate::models::EventValidationError;
use crate::repository::RepositoryError;
use crate::utils::response::error as error_response;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Unique violation on create. Reported as 500, matching the write path.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("{operation} failed")]
    WriteFailed {
        operation: &'static str,
        #[source]
        source: RepositoryError,
    },

    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Encoding error")]
    EncodingError(#[from] serde_json::Error),
}

impl AppError {
    /// Wraps a repository failure from the write step of update or delete.
    /// The existence pre-check already ran, so any failure here is a 500.
    pub fn write_failed(operation: &'static str) -> impl FnOnce(RepositoryError) -> Self {
        move |source| AppError::WriteFailed { operation, source }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::WriteFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::EncodingError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::WriteFailed { .. } => "WRITE_FAILED",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::EncodingError(_) => "ENCODING_ERROR",
        }
    }

    fn log(&self) {
        match self {
            AppError::ValidationError(msg) | AppError::NotFound(msg) => {
                warn!(code = self.code(), message = %msg, "Request rejected");
            }
            AppError::Conflict(msg) => {
                error!(code = self.code(), message = %msg, "Conflict while writing event");
            }
            AppError::WriteFailed { operation, source } => {
                error!(operation = *operation, error = %source, "Write failed");
            }
            AppError::DatabaseError(e) => {
                error!(error = ?e, "Database error");
            }
            AppError::EncodingError(e) => {
                error!(error = %e, "Error encoding response");
            }
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) | RepositoryError::DeleteFailed(id) => {
                AppError::NotFound(format!("Event with id '{}' was not found", id))
            }
            RepositoryError::Conflict => AppError::Conflict("Event already exists".to_string()),
            RepositoryError::Storage(e) => AppError::DatabaseError(e),
        }
    }
}

impl From<EventValidationError> for AppError {
    fn from(err: EventValidationError) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        self.log();

        // Server-side failures only get a generic message
        let public_message = match &self {
            AppError::ValidationError(msg) | AppError::NotFound(msg) => msg.clone(),
            AppError::Conflict(_) => "Event could not be created".to_string(),
            AppError::WriteFailed { operation, .. } => format!("{} failed", operation),
            AppError::DatabaseError(_) => "A database error occurred".to_string(),
            AppError::EncodingError(_) => "Error encoding response".to_string(),
        };

        error_response(code, public_message, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_errors_map_to_statuses() {
        let not_found: AppError = RepositoryError::NotFound(3).into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let delete_failed: AppError = RepositoryError::DeleteFailed(3).into();
        assert_eq!(delete_failed.status_code(), StatusCode::NOT_FOUND);

        let conflict: AppError = RepositoryError::Conflict.into();
        assert_eq!(conflict.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(conflict.code(), "CONFLICT");

        let storage: AppError = RepositoryError::Storage(sqlx::Error::PoolTimedOut).into();
        assert_eq!(storage.code(), "DATABASE_ERROR");
    }

    #[test]
    fn test_write_failed_is_server_error_even_for_missing_row() {
        let err = AppError::write_failed("Delete")(RepositoryError::DeleteFailed(9));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Delete failed");
    }

    #[test]
    fn test_validation_error_is_bad_request() {
        let err: AppError = EventValidationError::MissingTitle.into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Validation error: event title is required");
    }
}
