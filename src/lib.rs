//! Blogsite - Main Library
//!
//! A small personal blog backend: public endpoints for reading posts, admin
//! endpoints for writing them, and cookie-based JWT sessions. Data lives in
//! PostgreSQL, or in local JSON files during development when no database
//! is reachable.
//!
//! # Module Structure
//!
//! - **`shared`** - Records shared by the HTTP layer, the stores and the CLI
//!   - `User`, `Post`, validated `Credentials` and `PostInput`
//!   - Error types
//!
//! - **`backend`** - Server-side code
//!   - Axum HTTP server and routes
//!   - Token service, session resolver, access guard
//!   - Storage backends (PostgreSQL via sqlx, JSON files)
//!
//! # Binaries
//!
//! - `blogsite-server` - the HTTP server
//! - `blogsite-admin` - operator CLI (create admins, reset passwords, ...)
//!
//! # Error Handling
//!
//! - `shared::ValidationError` for rejected input
//! - `backend::storage::StorageError` for either storage backend
//! - `backend::BackendError` for HTTP handlers, mapped to status codes

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;
