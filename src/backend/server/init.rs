/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP server,
 * including storage selection, state creation, admin bootstrap and route
 * configuration.
 *
 * # Initialization Process
 *
 * 1. Select the storage backend (`Storage::connect`)
 * 2. Ensure the bootstrap admin, if one is configured
 * 3. Build `AppState` (token service, session resolver, cookie policy)
 * 4. Create and configure the router
 *
 * Every step is fatal on failure.
 */

use axum::Router;
use thiserror::Error;

use crate::backend::auth::accounts::{ensure_admin, EnsureAdmin};
use crate::backend::error::BackendError;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{ConfigError, Settings};
use crate::backend::server::state::AppState;
use crate::backend::storage::{Storage, StorageError};
use crate::shared::user::Credentials;

/// Errors that abort startup
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to ensure bootstrap admin: {0}")]
    Bootstrap(#[from] BackendError),
}

/// Select storage, run the admin bootstrap and assemble `AppState`
pub async fn build_state(settings: Settings) -> Result<AppState, StartupError> {
    tracing::info!("Initializing blog backend ({})", settings.environment);

    let storage = Storage::connect(&settings).await?;
    tracing::info!("Storage backend selected: {}", storage.kind());

    bootstrap_admin(&storage, &settings).await?;

    Ok(AppState::new(storage, settings))
}

/// Ensure the configured bootstrap admin exists
///
/// An existing account keeps its password; it is only promoted if needed.
async fn bootstrap_admin(storage: &Storage, settings: &Settings) -> Result<(), BackendError> {
    let Some(admin) = &settings.bootstrap_admin else {
        return Ok(());
    };

    let credentials = Credentials::new(&admin.username, &admin.password)?;
    match ensure_admin(storage.users(), &credentials, false).await? {
        EnsureAdmin::Created(user) => tracing::info!("Bootstrap admin {} created", user.username),
        EnsureAdmin::Promoted(user) => tracing::info!("Bootstrap admin {} promoted", user.username),
        EnsureAdmin::PasswordReset(user) | EnsureAdmin::Unchanged(user) => tracing::debug!("Bootstrap admin {} already present", user.username),
    }
    Ok(())
}

/// Create and configure the Axum application
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
///
/// # Errors
///
/// See [`StartupError`].
pub async fn create_app(settings: Settings) -> Result<Router<()>, StartupError> {
    let state = build_state(settings).await?;
    Ok(create_router(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::server::config::BootstrapAdmin;
    use crate::backend::storage::BackendKind;

    #[tokio::test]
    async fn test_build_state_with_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let state = build_state(Settings::development(dir.path())).await.unwrap();
        assert_eq!(state.storage.kind(), BackendKind::File);
    }

    #[tokio::test]
    async fn test_bootstrap_admin_created_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::development(dir.path());
        settings.bootstrap_admin = Some(BootstrapAdmin {
            username: "admin".to_string(),
            password: "adminpass".to_string(),
        });

        let state = build_state(settings.clone()).await.unwrap();
        let admin = state.storage.users().find_by_username("admin").await.unwrap().unwrap();
        assert!(admin.is_admin);

        // Second start reuses the account
        let state = build_state(settings).await.unwrap();
        assert_eq!(state.storage.users().find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_bootstrap_password_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::development(dir.path());
        settings.bootstrap_admin = Some(BootstrapAdmin {
            username: "admin".to_string(),
            password: "123".to_string(),
        });

        let err = build_state(settings).await.unwrap_err();
        assert!(matches!(err, StartupError::Bootstrap(_)));
    }
}
