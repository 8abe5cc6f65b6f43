//! Authentication Handlers Module
//!
//! This module contains all HTTP handlers for authentication endpoints.
//! Handlers are organized into focused submodules for maintainability.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs       - Module exports and documentation
//! ├── types.rs     - Request and response types
//! ├── register.rs  - User registration handler
//! ├── login.rs     - User authentication handler
//! ├── logout.rs    - Session cookie removal
//! ├── me.rs        - Get current user handler
//! └── admin.rs     - Admin-only account management
//! ```
//!
//! # Handlers
//!
//! - **`register`** - POST /api/auth/register
//! - **`login`** - POST /api/auth/login
//! - **`logout`** - POST /api/auth/logout
//! - **`get_me`** - GET /api/auth/me
//! - **`reset_password`** - POST /api/auth/reset-password (admin)
//! - **`list_users`** - GET /api/admin/users (admin)
//! - **`update_user`** - PATCH /api/admin/users/{id} (admin)

/// Request and response types
pub mod types;

/// Register handler
pub mod register;

/// Login handler
pub mod login;

/// Logout handler
pub mod logout;

/// Get current user handler
pub mod me;

/// Admin account management handlers
pub mod admin;

pub use types::{AuthRequest, AuthResponse, MessageResponse, SessionResponse, SessionUser};

pub use admin::{list_users, reset_password, update_user};
pub use login::login;
pub use logout::logout;
pub use me::get_me;
pub use register::register;
