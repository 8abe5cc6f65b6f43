/**
 * User Records
 *
 * Public view of an account and the validated credentials used to create
 * or authenticate one. The password hash never appears on `User`; it lives
 * only on the store-side credential record.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::shared::error::ValidationError;

/// Longest accepted username, counted in characters after trimming
pub const USERNAME_MAX_LEN: usize = 50;

/// Shortest accepted password, counted in characters
pub const PASSWORD_MIN_LEN: usize = 6;

/// An account as returned to clients and used by handlers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,
    /// Unique, trimmed username
    pub username: String,
    /// Whether the account may write posts and manage users
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Trim and check a username
///
/// # Errors
///
/// Returns a validation error if the trimmed name is empty or longer than
/// [`USERNAME_MAX_LEN`] characters.
pub fn validate_username(raw: &str) -> Result<String, ValidationError> {
    let username = raw.trim();
    if username.is_empty() {
        return Err(ValidationError::new("username", "Username is required"));
    }
    if username.chars().count() > USERNAME_MAX_LEN {
        return Err(ValidationError::new(
            "username",
            format!("Username cannot be more than {} characters", USERNAME_MAX_LEN),
        ));
    }
    Ok(username.to_string())
}

/// Check a new password against the minimum length
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::new("password", "Password is required"));
    }
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(ValidationError::new(
            "password",
            format!("Password must be at least {} characters", PASSWORD_MIN_LEN),
        ));
    }
    Ok(())
}

/// A username and password that passed validation
///
/// This is the only input accepted when creating an account, so every
/// stored username is trimmed and within bounds.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Validate a username/password pair for a new account
    pub fn new(username: &str, password: &str) -> Result<Self, ValidationError> {
        let username = validate_username(username)?;
        validate_password(password)?;
        Ok(Self {
            username,
            password: password.to_string(),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
