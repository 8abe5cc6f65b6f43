//! Shared Module
//!
//! This module contains the records exchanged between the HTTP layer, the
//! stores and the admin CLI. All types serialize to camelCase JSON, which is
//! both the wire format and the on-disk format of the file store.
//!
//! # Overview
//!
//! - **`user`** - Public user view and credential validation
//! - **`post`** - Blog post record and validated post input
//! - **`error`** - Validation errors

/// User records and credential validation
pub mod user;

/// Blog post records
pub mod post;

/// Shared error types
pub mod error;

/// Re-export commonly used types for convenience
pub use error::ValidationError;
pub use post::{Post, PostInput};
pub use user::{Credentials, User};
