//! Validation errors for shared records.
//!
//! `Credentials` and `PostInput` are only constructed after their fields
//! pass these checks; a failure names the field and carries a message that
//! is safe to show to API clients.
//!
//! ```rust
//! use blogsite::shared::error::ValidationError;
//!
//! let error = ValidationError::new("title", "Title is required");
//! assert_eq!(error.field(), "title");
//! assert_eq!(error.to_string(), "Title is required");
//! ```

use thiserror::Error;

/// A field of a post or account failed its rules
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
