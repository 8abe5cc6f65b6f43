/**
 * Backend Error Types
 *
 * This module defines the error taxonomy of the HTTP API. Every handler
 * returns `Result<_, BackendError>`, and each variant maps to exactly one
 * status code.
 *
 * # Status Mapping
 *
 * | Variant          | Status |
 * |------------------|--------|
 * | `Validation`, `Invalid` | 400 |
 * | `Unauthorized`   | 401    |
 * | `Forbidden`      | 403    |
 * | `NotFound`       | 404    |
 * | `Conflict`       | 409    |
 * | `Storage`        | 500, or 409 for duplicate keys |
 * | `Hashing`, `Token` | 500 |
 *
 * Internal failures are reported to clients as "Internal server error";
 * the underlying error is only logged.
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::storage::StorageError;
use crate::shared::ValidationError;

/// Message returned to clients for any 500
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Backend-specific error types
#[derive(Debug, Error)]
pub enum BackendError {
    /// Malformed or invalid request input
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// No valid session, or bad credentials
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Valid session without the required rights
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Uniqueness violation detected before reaching the store
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// A shared record rejected its input
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// Storage backend failure
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// bcrypt failure
    #[error("Password hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    /// JWT signing failure
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

impl BackendError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Invalid(_) => StatusCode::BAD_REQUEST,
            Self::Storage(StorageError::Duplicate { .. }) => StatusCode::CONFLICT,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Hashing(_) | Self::Token(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to the client
    pub fn message(&self) -> String {
        match self {
            Self::Validation { message }
            | Self::Unauthorized { message }
            | Self::Forbidden { message }
            | Self::NotFound { message }
            | Self::Conflict { message } => message.clone(),
            Self::Invalid(err) => err.message().to_string(),
            Self::Storage(StorageError::Duplicate { field, .. }) if *field == "username" => {
                "Username already exists".to_string()
            }
            Self::Storage(StorageError::Duplicate { field, .. }) => format!("{} already exists", field),
            _ => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }

    pub fn is_internal(&self) -> bool {
        self.status_code().is_server_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_map_status() {
        assert_eq!(BackendError::validation("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(BackendError::unauthorized("x").status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(BackendError::forbidden("x").status_code(), StatusCode::FORBIDDEN);
        assert_eq!(BackendError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(BackendError::conflict("x").status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_from_validation_error() {
        let err: BackendError = ValidationError::new("title", "Title is required").into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Title is required");
    }

    #[test]
    fn test_storage_error_hides_details() {
        let err: BackendError = StorageError::unavailable("connection refused at 10.0.0.5").into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), INTERNAL_ERROR_MESSAGE);
        assert!(err.is_internal());
    }

    #[test]
    fn test_duplicate_is_conflict() {
        let err: BackendError = StorageError::Duplicate {
            field: "username",
            value: "alice".to_string(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.message(), "Username already exists");
    }

    #[test]
    fn test_error_message() {
        let error = BackendError::not_found("Blog not found");
        assert_eq!(error.message(), "Blog not found");
        assert!(!error.is_internal());
    }
}
