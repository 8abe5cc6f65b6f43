/**
 * Login Handler
 *
 * This module implements the user authentication handler for POST /api/auth/login.
 *
 * # Authentication Process
 *
 * 1. Look up the stored credentials by username
 * 2. Verify password using bcrypt
 * 3. Issue a session token and set it as the `token` cookie
 * 4. Return user info
 *
 * # Security
 *
 * - Unknown usernames and wrong passwords get the same 401 and message
 * - User passwords are never returned in responses or logged
 */

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header::SET_COOKIE,
    response::{IntoResponse, Json, Response},
};

use crate::backend::auth::accounts::authenticate;
use crate::backend::auth::cookies::session_cookie;
use crate::backend::auth::handlers::types::{AuthRequest, AuthResponse};
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Login handler
///
/// # Arguments
///
/// * `State(state)` - Application state
/// * `payload` - Login request containing username and password
///
/// # Returns
///
/// `200 OK` with user info and a `Set-Cookie` header
///
/// # Errors
///
/// * `400 Bad Request` - Missing username or password
/// * `401 Unauthorized` - "Invalid username or password"
/// * `500 Internal Server Error` - Storage or token failure
///
/// # Example Request
///
/// ```http
/// POST /api/auth/login HTTP/1.1
/// Content-Type: application/json
///
/// {
///   "username": "alice",
///   "password": "secret1"
/// }
/// ```
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<AuthRequest>, JsonRejection>,
) -> Result<Response, BackendError> {
    let Json(request) = payload?;
    let (username, password) = request.require()?;

    let user = authenticate(state.storage.users(), username, password).await?;
    let token = state.tokens.issue(&user)?;
    let cookie = session_cookie(&token, state.tokens.ttl(), &state.cookies);

    tracing::info!("User logged in successfully: {}", user.username);

    Ok((
        [(SET_COOKIE, cookie)],
        Json(AuthResponse {
            success: true,
            message: "Login successful".to_string(),
            user,
        }),
    )
        .into_response())
}
