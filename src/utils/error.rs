use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use crate::store::StoreError;
use crate::utils::response::error as error_response;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    /// A write was rolled back; `notice` is what the user sees.
    #[error("Transaction failed: {notice}")]
    TransactionError {
        notice: String,
        #[source]
        source: StoreError,
    },

    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal server error")]
    InternalServerError(String),
}

impl AppError {
    /// Wraps a failed write. Dangling show references stay validation errors.
    pub fn transaction(source: StoreError, notice: impl Into<String>) -> Self {
        match source {
            StoreError::MissingVenue(_) | StoreError::MissingArtist(_) => {
                AppError::ValidationError(source.to_string())
            }
            StoreError::Database(_) => AppError::TransactionError {
                notice: notice.into(),
                source,
            },
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::TransactionError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::TransactionError { .. } => "TRANSACTION_ERROR",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    fn log(&self) {
        match self {
            AppError::ValidationError(msg) | AppError::NotFound(msg) => {
                warn!(code = self.code(), message = %msg, "Request rejected");
            }
            AppError::TransactionError { notice, source } => {
                error!(error = ?source, notice = %notice, "Transaction rolled back");
            }
            AppError::DatabaseError(e) => {
                error!(error = ?e, "Database error");
            }
            AppError::InternalServerError(msg) => {
                error!(message = %msg, "Internal server error");
            }
        }
    }

    fn public_message(&self) -> String {
        match self {
            AppError::ValidationError(msg) | AppError::NotFound(msg) => msg.clone(),
            AppError::TransactionError { notice, .. } => notice.clone(),
            AppError::DatabaseError(_) => "A database error occurred".to_string(),
            AppError::InternalServerError(_) => "Internal server error".to_string(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::MissingVenue(_) | StoreError::MissingArtist(_) => {
                AppError::ValidationError(err.to_string())
            }
            StoreError::Database(e) => AppError::DatabaseError(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        error_response(self.code(), self.public_message(), None, self.status_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_references_stay_validation_errors() {
        let err = AppError::transaction(StoreError::MissingVenue(7), "Show could not be listed");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.public_message(), "Venue 7 does not exist");
    }

    #[test]
    fn test_database_failures_keep_the_notice_only() {
        let err = AppError::transaction(
            StoreError::Database(sqlx::Error::PoolTimedOut),
            "An error occurred. Venue X could not be listed.",
        );
        assert_eq!(err.code(), "TRANSACTION_ERROR");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.public_message(),
            "An error occurred. Venue X could not be listed."
        );
    }

    #[test]
    fn test_internal_details_are_not_exposed() {
        let err = AppError::InternalServerError("pool exhausted on shard 3".to_string());
        assert_eq!(err.public_message(), "Internal server error");
        let err: AppError = StoreError::Database(sqlx::Error::RowNotFound).into();
        assert_eq!(err.code(), "DATABASE_ERROR");
        assert_eq!(err.public_message(), "A database error occurred");
    }
}
