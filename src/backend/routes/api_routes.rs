/**
 * API Route Handlers
 *
 * This module registers the JSON API:
 *
 * ## Authentication
 * - `POST /api/auth/register` - User registration
 * - `POST /api/auth/login` - User login
 * - `POST /api/auth/logout` - Clear the session cookie
 * - `GET /api/auth/me` - Current session (requires authentication)
 * - `POST /api/auth/reset-password` - Reset a password (admin)
 *
 * ## Admin
 * - `GET /api/admin/users` - List users (admin)
 * - `PATCH /api/admin/users/{id}` - Set the admin flag (admin)
 *
 * ## Posts
 * - `GET /api/posts`, `GET /api/posts/{id}` - Public
 * - `POST /api/posts`, `PUT /api/posts/{id}`, `DELETE /api/posts/{id}` - Admin
 *
 * Guards are applied by the handlers' extractors, not by route layers.
 */

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::backend::auth::handlers::{get_me, list_users, login, logout, register, reset_password, update_user};
use crate::backend::posts::{create_post, delete_post, get_post, list_posts, update_post};
use crate::backend::server::state::AppState;

/// Configure API routes
///
/// # Arguments
///
/// * `router` - The router to add routes to
///
/// # Returns
///
/// Router with API routes configured
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        // Authentication endpoints
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(get_me))
        .route("/api/auth/reset-password", post(reset_password))
        // User management
        .route("/api/admin/users", get(list_users))
        .route("/api/admin/users/{id}", patch(update_user))
        // Posts
        .route("/api/posts", get(list_posts).post(create_post))
        .route(
            "/api/posts/{id}",
            get(get_post).put(update_post).delete(delete_post),
        )
}
