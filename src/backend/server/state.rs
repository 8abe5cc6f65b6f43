/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * `AppState` is built once at startup and cloned into every request:
 * - `storage` - the selected user and post stores
 * - `tokens` - session token signing and verification
 * - `sessions` - resolver from request headers to identity
 * - `cookies` - session cookie attributes
 * - `settings` - the loaded configuration
 *
 * Every field is cheap to clone (`Arc`s and small keys).
 */

use axum::extract::FromRef;
use std::sync::Arc;

use crate::backend::auth::cookies::CookiePolicy;
use crate::backend::auth::resolver::SessionResolver;
use crate::backend::auth::sessions::TokenService;
use crate::backend::server::config::Settings;
use crate::backend::storage::Storage;

/// Shared state for all request handlers
#[derive(Clone, Debug)]
pub struct AppState {
    pub storage: Storage,
    pub tokens: TokenService,
    pub sessions: SessionResolver,
    pub cookies: CookiePolicy,
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Wire the token service, resolver and cookie policy to `storage`
    pub fn new(storage: Storage, settings: Settings) -> Self {
        let tokens = TokenService::new(settings.session.secret.as_bytes(), settings.session.ttl);
        let sessions = SessionResolver::new(tokens.clone(), storage.user_store(), settings.session.stale_claims);
        let cookies = CookiePolicy::from_settings(&settings);

        Self {
            storage,
            tokens,
            sessions,
            cookies,
            settings: Arc::new(settings),
        }
    }
}

impl FromRef<AppState> for Storage {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.storage.clone()
    }
}

impl FromRef<AppState> for CookiePolicy {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.cookies.clone()
    }
}
