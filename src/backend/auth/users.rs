/**
 * Credential Store
 *
 * This module defines the storage interface for user accounts. The
 * PostgreSQL and JSON-file backends in `backend::storage` both implement
 * `UserStore`; handlers only ever see the trait object.
 *
 * Password hashes are returned by `find_credentials` and nowhere else.
 */

use async_trait::async_trait;
use std::fmt;
use uuid::Uuid;

use crate::backend::storage::StorageError;
use crate::shared::user::{Credentials, User};

/// A validated account ready to be inserted
#[derive(Clone)]
pub struct NewUser {
    username: String,
    password_hash: String,
    is_admin: bool,
}

impl NewUser {
    /// Build an insert from validated credentials and the hash of their password
    pub fn new(credentials: &Credentials, password_hash: String, is_admin: bool) -> Self {
        Self {
            username: credentials.username().to_string(),
            password_hash,
            is_admin,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("is_admin", &self.is_admin)
            .finish_non_exhaustive()
    }
}

/// Partial update of an account; `None` fields are left unchanged
#[derive(Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub password_hash: Option<String>,
    pub is_admin: Option<bool>,
}

impl UserUpdate {
    pub fn password_hash(hash: String) -> Self {
        Self {
            password_hash: Some(hash),
            is_admin: None,
        }
    }

    pub fn admin(is_admin: bool) -> Self {
        Self {
            password_hash: None,
            is_admin: Some(is_admin),
        }
    }
}

impl fmt::Debug for UserUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserUpdate")
            .field("password_hash", &self.password_hash.as_ref().map(|_| "<redacted>"))
            .field("is_admin", &self.is_admin)
            .finish()
    }
}

/// A user together with their stored password hash
#[derive(Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

impl fmt::Debug for UserCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCredentials")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

/// Persistence for user accounts
#[async_trait]
pub trait UserStore: Send + Sync + fmt::Debug {
    /// All users, most recently created first
    async fn find_all(&self) -> Result<Vec<User>, StorageError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StorageError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StorageError>;

    /// Look up a user including the password hash, for authentication only
    async fn find_credentials(&self, username: &str) -> Result<Option<UserCredentials>, StorageError>;

    /// Insert a new user
    ///
    /// # Errors
    ///
    /// `StorageError::Duplicate` if the username is taken.
    async fn create(&self, user: NewUser) -> Result<User, StorageError>;

    /// Apply `update` and bump `updated_at`; `Ok(None)` if no such user
    async fn update(&self, id: Uuid, update: UserUpdate) -> Result<Option<User>, StorageError>;

    /// Remove a user; `Ok(false)` if no such user
    async fn delete(&self, id: Uuid) -> Result<bool, StorageError>;
}
