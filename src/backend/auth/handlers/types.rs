/**
 * Authentication Handler Types
 *
 * This module defines the request and response types used by the
 * authentication and account-management handlers.
 *
 * Request fields are optional at the serde level so that a missing field
 * is answered with a readable 400 instead of a generic body rejection.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::backend::auth::resolver::Identity;
use crate::backend::error::BackendError;
use crate::shared::user::User;

/// Register and login request
#[derive(Deserialize, Serialize, Default)]
pub struct AuthRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl AuthRequest {
    /// Both fields, or a 400 if either is missing or blank
    pub fn require(&self) -> Result<(&str, &str), BackendError> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(username), Some(password)) if !username.trim().is_empty() && !password.is_empty() => {
                Ok((username, password))
            }
            _ => Err(BackendError::validation("Username and password are required")),
        }
    }
}

impl fmt::Debug for AuthRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthRequest")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Admin password reset request
#[derive(Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub username: Option<String>,
    pub new_password: Option<String>,
}

impl fmt::Debug for ResetPasswordRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResetPasswordRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Admin flag change request
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub is_admin: Option<bool>,
}

/// Auth response
///
/// Returned by register and login. The token itself travels only in the
/// `Set-Cookie` header.
#[derive(Serialize, Deserialize, Debug)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub user: User,
}

/// Current session, returned by `GET /api/auth/me`
#[derive(Serialize, Deserialize, Debug)]
pub struct SessionResponse {
    pub success: bool,
    pub user: SessionUser,
}

/// The resolved identity as seen by clients
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: uuid::Uuid,
    pub username: String,
    pub is_admin: bool,
}

impl From<Identity> for SessionUser {
    fn from(identity: Identity) -> Self {
        Self {
            id: identity.user_id,
            username: identity.username,
            is_admin: identity.is_admin,
        }
    }
}

/// Plain acknowledgement
#[derive(Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_both_fields() {
        let request: AuthRequest = serde_json::from_str(r#"{"username":"alice"}"#).unwrap();
        assert!(request.require().is_err());

        let request: AuthRequest = serde_json::from_str(r#"{"username":"  ","password":"x"}"#).unwrap();
        assert!(request.require().is_err());

        let request: AuthRequest =
            serde_json::from_str(r#"{"username":"alice","password":"secret1"}"#).unwrap();
        assert_eq!(request.require().unwrap(), ("alice", "secret1"));
    }

    #[test]
    fn test_debug_hides_password() {
        let request = AuthRequest {
            username: Some("alice".to_string()),
            password: Some("secret1".to_string()),
        };
        assert!(!format!("{:?}", request).contains("secret1"));
    }

    #[test]
    fn test_reset_request_field_names() {
        let request: ResetPasswordRequest =
            serde_json::from_str(r#"{"username":"alice","newPassword":"newpass1"}"#).unwrap();
        assert_eq!(request.new_password.as_deref(), Some("newpass1"));
    }
}
