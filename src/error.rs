//! Structured error types for service operations.

use serde::Serialize;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Caller errors
    ValidationError,
    NotFound,
    Conflict,

    // Internal errors
    StorageError,
}

/// Generic message returned for any store failure. The cause is only logged.
pub const STORAGE_ERROR_MESSAGE: &str = "Database error";

/// Error returned by the task/column service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A required field is missing or a field has an unacceptable value.
    #[error("{message}")]
    Validation {
        field: Option<String>,
        message: String,
    },

    /// No row matches the requested identifier.
    #[error("{entity} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// The operation would violate a board invariant (e.g. deleting a
    /// column that still holds tasks).
    #[error("{0}")]
    Conflict(String),

    /// Any failure of the underlying store.
    #[error("storage error: {0}")]
    Storage(anyhow::Error),
}

impl ServiceError {
    // Convenience constructors

    pub fn missing_field(field: &str) -> Self {
        Self::Validation {
            field: Some(field.to_string()),
            message: format!("{} is required", field),
        }
    }

    pub fn invalid_value(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: Some(field.to_string()),
            message: reason.into(),
        }
    }

    pub fn invalid_body(reason: impl Into<String>) -> Self {
        Self::Validation {
            field: None,
            message: reason.into(),
        }
    }

    pub fn task_not_found(id: i64) -> Self {
        Self::NotFound { entity: "Task", id }
    }

    pub fn column_not_found(id: i64) -> Self {
        Self::NotFound {
            entity: "Task column",
            id,
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { .. } => ErrorCode::ValidationError,
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::Conflict(_) => ErrorCode::Conflict,
            Self::Storage(_) => ErrorCode::StorageError,
        }
    }

    /// Message safe to show to callers. Storage causes never leak.
    pub fn public_message(&self) -> String {
        match self {
            Self::Storage(_) => STORAGE_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }

    /// Serializable body for API responses.
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error: self.public_message(),
            code: self.code(),
            field: match self {
                Self::Validation { field, .. } => field.clone(),
                _ => None,
            },
        }
    }
}

/// JSON error payload.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: ErrorCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Result type for service operations.
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
