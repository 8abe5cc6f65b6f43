/**
 * Account Operations
 *
 * Registration, authentication and admin management on top of a
 * `UserStore`. HTTP handlers, startup bootstrap and the admin CLI all go
 * through these functions so the rules live in one place.
 *
 * # Security
 *
 * - Passwords are hashed with bcrypt before they reach a store
 * - Authentication failures return the same message whether the username
 *   or the password was wrong, and the logs do not say which either
 * - Passwords and hashes are never logged
 */

use std::sync::OnceLock;

use bcrypt::BcryptError;
use uuid::Uuid;

use crate::backend::auth::password::{hash_password, verify_password};
use crate::backend::auth::users::{NewUser, UserStore, UserUpdate};
use crate::backend::error::BackendError;
use crate::shared::user::{validate_password, Credentials, User};

/// Message for every failed login
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Hash checked for unknown usernames so both login failures cost one bcrypt verify
static UNKNOWN_USER_HASH: OnceLock<String> = OnceLock::new();

fn unknown_user_hash() -> Result<&'static str, BcryptError> {
    if let Some(hash) = UNKNOWN_USER_HASH.get() {
        return Ok(hash);
    }
    let hash = hash_password("unknown-user-placeholder")?;
    Ok(UNKNOWN_USER_HASH.get_or_init(|| hash))
}

/// Create a non-admin account
///
/// # Errors
///
/// * `409 Conflict` - If the username is already taken
/// * `500` - Hashing or storage failure
pub async fn register_user(users: &dyn UserStore, credentials: &Credentials) -> Result<User, BackendError> {
    if users.find_by_username(credentials.username()).await?.is_some() {
        tracing::warn!("Username already exists: {}", credentials.username());
        return Err(BackendError::conflict("Username already exists"));
    }

    let password_hash = hash_password(credentials.password())?;
    // A concurrent registration can still win the race; the store reports
    // that as a duplicate, which maps to 409 as well.
    let user = users.create(NewUser::new(credentials, password_hash, false)).await?;

    tracing::info!("User registered: {}", user.username);
    Ok(user)
}

/// Check a username/password pair
///
/// # Errors
///
/// * `401 Unauthorized` - Unknown user or wrong password, indistinguishably
pub async fn authenticate(users: &dyn UserStore, username: &str, password: &str) -> Result<User, BackendError> {
    let username = username.trim();

    let Some(credentials) = users.find_credentials(username).await? else {
        verify_password(password, unknown_user_hash()?)?;
        tracing::info!("Failed login attempt for {}", username);
        return Err(BackendError::unauthorized(INVALID_CREDENTIALS));
    };

    if !verify_password(password, &credentials.password_hash)? {
        tracing::info!("Failed login attempt for {}", username);
        return Err(BackendError::unauthorized(INVALID_CREDENTIALS));
    }

    Ok(credentials.user)
}

/// Replace a user's password
///
/// # Errors
///
/// * `400 Bad Request` - The new password is too short
/// * `404 Not Found` - No such user
pub async fn reset_password(users: &dyn UserStore, username: &str, new_password: &str) -> Result<User, BackendError> {
    validate_password(new_password)?;

    let user = users
        .find_by_username(username.trim())
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    let password_hash = hash_password(new_password)?;
    let user = users
        .update(user.id, UserUpdate::password_hash(password_hash))
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    tracing::info!("Password reset for {}", user.username);
    Ok(user)
}

/// Grant or revoke admin rights by user id
pub async fn set_admin(users: &dyn UserStore, id: Uuid, is_admin: bool) -> Result<User, BackendError> {
    let user = users
        .update(id, UserUpdate::admin(is_admin))
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    tracing::info!("Admin flag for {} set to {}", user.username, user.is_admin);
    Ok(user)
}

/// Grant or revoke admin rights by username
pub async fn set_admin_by_username(users: &dyn UserStore, username: &str, is_admin: bool) -> Result<User, BackendError> {
    let user = users
        .find_by_username(username.trim())
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;
    set_admin(users, user.id, is_admin).await
}

/// What `ensure_admin` had to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnsureAdmin {
    Created(User),
    Promoted(User),
    /// Already an admin; password replaced
    PasswordReset(User),
    Unchanged(User),
}

impl EnsureAdmin {
    pub fn user(&self) -> &User {
        match self {
            Self::Created(user) | Self::Promoted(user) | Self::PasswordReset(user) | Self::Unchanged(user) => user,
        }
    }
}

/// Make sure an admin account with these credentials exists
///
/// A missing account is created as admin. An existing account is promoted;
/// its password is replaced only when `reset_existing_password` is set.
pub async fn ensure_admin(
    users: &dyn UserStore,
    credentials: &Credentials,
    reset_existing_password: bool,
) -> Result<EnsureAdmin, BackendError> {
    let Some(existing) = users.find_by_username(credentials.username()).await? else {
        let password_hash = hash_password(credentials.password())?;
        let user = users.create(NewUser::new(credentials, password_hash, true)).await?;
        tracing::info!("Created admin account {}", user.username);
        return Ok(EnsureAdmin::Created(user));
    };

    let mut update = UserUpdate::default();
    if !existing.is_admin {
        update.is_admin = Some(true);
    }
    if reset_existing_password {
        update.password_hash = Some(hash_password(credentials.password())?);
    }

    if update == UserUpdate::default() {
        return Ok(EnsureAdmin::Unchanged(existing));
    }

    let user = users
        .update(existing.id, update)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    if existing.is_admin {
        tracing::info!("Reset password of admin account {}", user.username);
        Ok(EnsureAdmin::PasswordReset(user))
    } else {
        tracing::info!("Promoted {} to admin", user.username);
        Ok(EnsureAdmin::Promoted(user))
    }
}
