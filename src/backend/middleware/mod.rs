//! Middleware Module
//!
//! This module contains the request guards of the backend server.
//!
//! # Architecture
//!
//! - **`auth`** - `AuthUser` and `AdminUser` extractors (the access guard)
//!
//! # Example
//!
//! ```rust,ignore
//! use blogsite::backend::middleware::AdminUser;
//!
//! async fn delete_everything(AdminUser(admin): AdminUser) {
//!     // only reached by admins
//! }
//! ```

pub mod auth;

pub use auth::{AdminUser, AuthUser};
