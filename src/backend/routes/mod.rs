//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! # Architecture
//!
//! - **`router`** - Main router creation, health check, fallback
//! - **`api_routes`** - Auth, admin and post endpoints
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router creation
//! └── api_routes.rs   - API endpoint registration
//! ```

/// Main router creation
pub mod router;

/// API endpoint registration
pub mod api_routes;

pub use router::create_router;
