//! Account management handlers
//!
//! All routes here require an admin session:
//!
//! - `POST /api/auth/reset-password` - replace a user's password
//! - `GET /api/admin/users` - list users (no password hashes)
//! - `PATCH /api/admin/users/{id}` - grant or revoke admin rights

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Json,
};
use uuid::Uuid;

use crate::backend::auth::accounts;
use crate::backend::auth::handlers::types::{MessageResponse, ResetPasswordRequest, UpdateUserRequest};
use crate::backend::error::BackendError;
use crate::backend::middleware::AdminUser;
use crate::backend::storage::Storage;
use crate::shared::user::User;

/// Reset another user's password
///
/// # Errors
///
/// * `400 Bad Request` - Missing fields or a password under 6 characters
/// * `401` / `403` - Not an admin session
/// * `404 Not Found` - No such user
pub async fn reset_password(
    AdminUser(admin): AdminUser,
    State(storage): State<Storage>,
    payload: Result<Json<ResetPasswordRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, BackendError> {
    let Json(request) = payload?;
    let (Some(username), Some(new_password)) = (request.username.as_deref(), request.new_password.as_deref()) else {
        return Err(BackendError::validation("Username and new password are required"));
    };

    let user = accounts::reset_password(storage.users(), username, new_password).await?;
    tracing::info!("{} reset the password of {}", admin.username, user.username);

    Ok(Json(MessageResponse::ok("Password reset successfully")))
}

/// List all users, newest first
pub async fn list_users(
    AdminUser(_admin): AdminUser,
    State(storage): State<Storage>,
) -> Result<Json<Vec<User>>, BackendError> {
    Ok(Json(storage.users().find_all().await?))
}

/// Grant or revoke admin rights
///
/// Admins cannot revoke their own rights; use the CLI for that.
pub async fn update_user(
    AdminUser(admin): AdminUser,
    State(storage): State<Storage>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<User>, BackendError> {
    let id = Uuid::parse_str(&id).map_err(|_| BackendError::not_found("User not found"))?;
    let Json(request) = payload?;
    let is_admin = request
        .is_admin
        .ok_or_else(|| BackendError::validation("isAdmin is required"))?;

    if id == admin.user_id && !is_admin {
        return Err(BackendError::validation("Admins cannot revoke their own admin rights"));
    }

    let user = accounts::set_admin(storage.users(), id, is_admin).await?;
    Ok(Json(user))
}
