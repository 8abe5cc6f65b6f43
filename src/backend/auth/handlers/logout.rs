//! POST /api/auth/logout
//!
//! Overwrites the session cookie with an empty, already-expired one. The
//! token itself stays valid until it expires; clients simply stop sending it.

use axum::{
    extract::State,
    http::header::SET_COOKIE,
    response::{IntoResponse, Json, Response},
};

use crate::backend::auth::cookies::{expired_session_cookie, CookiePolicy};
use crate::backend::auth::handlers::types::MessageResponse;

/// Logout handler; always succeeds
pub async fn logout(State(cookies): State<CookiePolicy>) -> Response {
    (
        [(SET_COOKIE, expired_session_cookie(&cookies))],
        Json(MessageResponse::ok("Logged out successfully")),
    )
        .into_response()
}
