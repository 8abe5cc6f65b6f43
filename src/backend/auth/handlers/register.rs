/**
 * Register Handler
 *
 * This module implements the user registration handler for
 * POST /api/auth/register.
 *
 * # Registration Process
 *
 * 1. Validate username and password
 * 2. Check that the username is free
 * 3. Hash password using bcrypt
 * 4. Create the user with admin rights off
 * 5. Issue a session token and set it as the `token` cookie
 */

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::SET_COOKIE, StatusCode},
    response::{IntoResponse, Json, Response},
};

use crate::backend::auth::accounts::register_user;
use crate::backend::auth::cookies::session_cookie;
use crate::backend::auth::handlers::types::{AuthRequest, AuthResponse};
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::shared::user::Credentials;

/// Register handler
///
/// # Arguments
///
/// * `State(state)` - Application state
/// * `payload` - Register request containing username and password
///
/// # Returns
///
/// `201 Created` with the new user and a `Set-Cookie` header
///
/// # Errors
///
/// * `400 Bad Request` - Missing fields, invalid username, password under 6 characters
/// * `409 Conflict` - Username already exists
/// * `500 Internal Server Error` - Hashing, storage or token failure
///
/// # Example Request
///
/// ```http
/// POST /api/auth/register HTTP/1.1
/// Content-Type: application/json
///
/// {
///   "username": "alice",
///   "password": "secret1"
/// }
/// ```
///
/// # Example Response
///
/// ```json
/// {
///   "success": true,
///   "message": "User registered successfully",
///   "user": {
///     "id": "123e4567-e89b-12d3-a456-426614174000",
///     "username": "alice",
///     "isAdmin": false,
///     "createdAt": "2025-01-01T00:00:00Z",
///     "updatedAt": "2025-01-01T00:00:00Z"
///   }
/// }
/// ```
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<AuthRequest>, JsonRejection>,
) -> Result<Response, BackendError> {
    let Json(request) = payload?;
    let (username, password) = request.require()?;
    let credentials = Credentials::new(username, password)?;

    tracing::info!("Register request for username: {}", credentials.username());

    let user = register_user(state.storage.users(), &credentials).await?;
    let token = state.tokens.issue(&user)?;
    let cookie = session_cookie(&token, state.tokens.ttl(), &state.cookies);

    Ok((
        StatusCode::CREATED,
        [(SET_COOKIE, cookie)],
        Json(AuthResponse {
            success: true,
            message: "User registered successfully".to_string(),
            user,
        }),
    )
        .into_response())
}
