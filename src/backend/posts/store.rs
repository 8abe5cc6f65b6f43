//! Post Store
//!
//! Storage interface for blog posts, implemented by both backends in
//! `backend::storage`.

use async_trait::async_trait;
use std::fmt;
use uuid::Uuid;

use crate::backend::storage::StorageError;
use crate::shared::post::{Post, PostInput};

/// Persistence for blog posts
#[async_trait]
pub trait PostStore: Send + Sync + fmt::Debug {
    /// All posts, newest first
    async fn find_all(&self) -> Result<Vec<Post>, StorageError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, StorageError>;

    /// Insert a post with a generated id and fresh timestamps
    async fn create(&self, input: PostInput) -> Result<Post, StorageError>;

    /// Replace title and content and bump `updated_at`; `Ok(None)` if missing
    async fn update(&self, id: Uuid, input: PostInput) -> Result<Option<Post>, StorageError>;

    /// Remove a post; `Ok(false)` if missing
    async fn delete(&self, id: Uuid) -> Result<bool, StorageError>;
}
