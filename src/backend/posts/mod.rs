//! Posts Module
//!
//! Blog post storage interface and HTTP handlers.
//!
//! - **`store`** - `PostStore` trait
//! - **`handlers`** - public reads and admin-only writes

/// Post store interface
pub mod store;

/// HTTP handlers for post endpoints
pub mod handlers;

pub use handlers::{create_post, delete_post, get_post, list_posts, update_post};
pub use store::PostStore;
