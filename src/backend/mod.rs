//! Backend Module
//!
//! This module contains all server-side code of the blog: the Axum HTTP
//! server, authentication, storage backends and post handlers.
//!
//! # Architecture
//!
//! - **`server`** - Configuration, application state, initialization
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`auth`** - Accounts, session tokens, cookies, session resolution
//! - **`posts`** - Post store interface and CRUD handlers
//! - **`storage`** - Backend selection plus PostgreSQL and JSON-file stores
//! - **`middleware`** - Access guard extractors
//! - **`error`** - Backend error types and HTTP mapping
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Server binary
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── auth/           - Authentication
//! ├── posts/          - Blog posts
//! ├── storage/        - Storage backends
//! ├── middleware/     - Access guard
//! └── error/          - Error types
//! ```
//!
//! # State Management
//!
//! `AppState` is created once at startup. It holds the selected `Storage`
//! handle, so the choice between PostgreSQL and the file store is made in
//! exactly one place and handlers never branch on it.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Backend error types
pub mod error;

/// Authentication and user management
pub mod auth;

/// Blog posts
pub mod posts;

/// Storage backends
pub mod storage;

/// Request guards
pub mod middleware;

pub use error::BackendError;
pub use server::create_app;
