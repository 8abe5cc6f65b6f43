/**
 * Post Handlers
 *
 * CRUD endpoints for blog posts. Reads are public; writes take `AdminUser`,
 * so the access guard runs before the request body is even parsed.
 *
 * # Routes
 *
 * - `GET /api/posts` - all posts, newest first
 * - `GET /api/posts/{id}` - one post
 * - `POST /api/posts` - create (admin)
 * - `PUT /api/posts/{id}` - replace title and content (admin)
 * - `DELETE /api/posts/{id}` - delete (admin)
 *
 * Ids that are not UUIDs cannot name a post and are answered with 404.
 */

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::auth::handlers::types::MessageResponse;
use crate::backend::error::BackendError;
use crate::backend::middleware::AdminUser;
use crate::backend::storage::Storage;
use crate::shared::post::{Post, PostInput};

/// Create and update request body
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct PostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl PostRequest {
    /// Validate into a store input
    ///
    /// # Errors
    ///
    /// `400` if either field is missing, or fails `PostInput` validation.
    pub fn into_input(self) -> Result<PostInput, BackendError> {
        let (Some(title), Some(content)) = (self.title, self.content) else {
            return Err(BackendError::validation("Title and content are required"));
        };
        Ok(PostInput::new(&title, &content)?)
    }
}

fn post_not_found() -> BackendError {
    BackendError::not_found("Post not found")
}

fn parse_post_id(raw: &str) -> Result<Uuid, BackendError> {
    Uuid::parse_str(raw).map_err(|_| post_not_found())
}

/// List all posts, newest first
pub async fn list_posts(State(storage): State<Storage>) -> Result<Json<Vec<Post>>, BackendError> {
    Ok(Json(storage.posts().find_all().await?))
}

/// Fetch one post
///
/// # Errors
///
/// * `404 Not Found` - Unknown or malformed id
pub async fn get_post(
    State(storage): State<Storage>,
    Path(id): Path<String>,
) -> Result<Json<Post>, BackendError> {
    let id = parse_post_id(&id)?;
    storage
        .posts()
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(post_not_found)
}

/// Create a post
///
/// # Errors
///
/// * `400 Bad Request` - Missing or invalid title/content
/// * `401` / `403` - Not an admin session
pub async fn create_post(
    AdminUser(admin): AdminUser,
    State(storage): State<Storage>,
    payload: Result<Json<PostRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Post>), BackendError> {
    let Json(request) = payload?;
    let input = request.into_input()?;

    let post = storage.posts().create(input).await?;
    tracing::info!("{} created post {}", admin.username, post.id);

    Ok((StatusCode::CREATED, Json(post)))
}

/// Replace a post's title and content
///
/// # Errors
///
/// * `400 Bad Request` - Missing or invalid title/content
/// * `401` / `403` - Not an admin session
/// * `404 Not Found` - Unknown or malformed id
pub async fn update_post(
    AdminUser(admin): AdminUser,
    State(storage): State<Storage>,
    Path(id): Path<String>,
    payload: Result<Json<PostRequest>, JsonRejection>,
) -> Result<Json<Post>, BackendError> {
    let id = parse_post_id(&id)?;
    let Json(request) = payload?;
    let input = request.into_input()?;

    let post = storage
        .posts()
        .update(id, input)
        .await?
        .ok_or_else(post_not_found)?;
    tracing::info!("{} updated post {}", admin.username, post.id);

    Ok(Json(post))
}

/// Delete a post
///
/// # Errors
///
/// * `401` / `403` - Not an admin session
/// * `404 Not Found` - Unknown or malformed id, including an already deleted post
pub async fn delete_post(
    AdminUser(admin): AdminUser,
    State(storage): State<Storage>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, BackendError> {
    let id = parse_post_id(&id)?;

    if !storage.posts().delete(id).await? {
        return Err(post_not_found());
    }
    tracing::info!("{} deleted post {}", admin.username, id);

    Ok(Json(MessageResponse::ok("Post deleted successfully")))
}
