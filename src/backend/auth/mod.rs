//! Authentication Module
//!
//! This module handles user accounts, session tokens and the resolution of
//! a request's identity.
//!
//! # Architecture
//!
//! - **`users`** - `UserStore` trait and account record types
//! - **`password`** - bcrypt hashing
//! - **`sessions`** - JWT issuance and verification (`TokenService`)
//! - **`cookies`** - Session cookie building and parsing
//! - **`resolver`** - Request → identity, with the stale-claims policy
//! - **`accounts`** - Register/authenticate/reset/promote operations
//! - **`handlers`** - HTTP handlers for authentication endpoints
//!
//! # Authentication Flow
//!
//! 1. **Register**: username + password → user created (not admin) → cookie set
//! 2. **Login**: credentials verified → token issued → cookie set
//! 3. **Request**: cookie → token verified → user re-read from the store
//! 4. **Logout**: cookie overwritten with an expired empty value
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt (cost 10) before storage
//! - Tokens are HS256 JWTs that expire after 7 days by default
//! - Invalid credentials return 401 (no information leakage)
//! - The admin flag is always taken from the store, never only from a token,
//!   unless the store is down and the trust-claims policy is active

/// User store interface
pub mod users;

/// Password hashing
pub mod password;

/// JWT token generation and validation
pub mod sessions;

/// Session cookie helpers
pub mod cookies;

/// Session resolution
pub mod resolver;

/// Account operations shared by handlers and the CLI
pub mod accounts;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use resolver::{Identity, SessionResolver, StaleClaimsPolicy};
pub use sessions::{SessionClaims, TokenService};
pub use users::{NewUser, UserCredentials, UserStore, UserUpdate};
