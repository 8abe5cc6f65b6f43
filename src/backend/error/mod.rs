//! Backend Error Module
//!
//! This module defines error types specific to the backend server.
//! These errors are used in HTTP handlers and can be converted to HTTP responses.
//!
//! # Architecture
//!
//! - **`types`** - `BackendError` and its status/message mapping
//! - **`conversion`** - `IntoResponse` and extractor-rejection conversions
//!
//! # HTTP Response Conversion
//!
//! All backend errors implement `IntoResponse` from Axum, so handlers return
//! `Result<T, BackendError>` and propagate with `?`. Errors from the shared
//! module, the stores, bcrypt and jsonwebtoken convert via `From`.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::BackendError;
