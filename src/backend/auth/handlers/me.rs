/**
 * Get Current User Handler
 *
 * This module implements the handler for GET /api/auth/me, which returns
 * the identity behind the caller's session.
 *
 * # Authentication
 *
 * Requires a valid session token in the `token` cookie (or a Bearer header).
 * The identity comes from the session resolver, so the admin flag is the
 * one currently stored for the user.
 */

use axum::response::Json;

use crate::backend::auth::handlers::types::SessionResponse;
use crate::backend::middleware::AuthUser;

/// Get current user handler
///
/// # Errors
///
/// * `401 Unauthorized` - No session, or an invalid/expired token
///
/// # Example Response
///
/// ```json
/// {
///   "success": true,
///   "user": {
///     "id": "123e4567-e89b-12d3-a456-426614174000",
///     "username": "alice",
///     "isAdmin": false
///   }
/// }
/// ```
pub async fn get_me(AuthUser(identity): AuthUser) -> Json<SessionResponse> {
    Json(SessionResponse {
        success: true,
        user: identity.into(),
    })
}
