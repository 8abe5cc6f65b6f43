//! Storage Module
//!
//! This module selects and owns the storage backend for the process. The
//! choice is made once, in [`Storage::connect`], and never revisited:
//!
//! 1. If `DATABASE_URL` is set and the pool connects and migrates within the
//!    connect timeout, PostgreSQL is used.
//! 2. Otherwise the JSON-file store under `DATA_DIR` is used, except in
//!    production, where a missing or unreachable database is fatal.
//!
//! # Module Structure
//!
//! ```text
//! storage/
//! ├── mod.rs       - StorageError, Storage handle, backend selection
//! ├── postgres.rs  - sqlx/PostgreSQL implementation
//! └── file.rs      - JSON-file implementation
//! ```
//!
//! Handlers reach the stores through `Storage::users()` and
//! `Storage::posts()`, which return trait objects; nothing outside this
//! module knows which backend is active.

/// PostgreSQL-backed stores
pub mod postgres;

/// JSON-file-backed stores
pub mod file;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::backend::auth::users::UserStore;
use crate::backend::posts::store::PostStore;
use crate::backend::server::config::Settings;

/// Errors raised by either storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    /// Query or connection failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failure
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// File store read or write failure
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File store contents could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A unique field already holds this value
    #[error("Duplicate {field}: {value}")]
    Duplicate { field: &'static str, value: String },

    /// No usable backend
    #[error("Storage unavailable: {message}")]
    Unavailable { message: String },
}

impl StorageError {
    pub(crate) fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// Which backend a `Storage` handle is using
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Postgres,
    File,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Postgres => f.write_str("postgres"),
            Self::File => f.write_str("file"),
        }
    }
}

/// Shared handle to the selected user and post stores
#[derive(Clone, Debug)]
pub struct Storage {
    users: Arc<dyn UserStore>,
    posts: Arc<dyn PostStore>,
    kind: BackendKind,
}

impl Storage {
    /// Assemble a handle from explicit stores
    pub fn new(users: Arc<dyn UserStore>, posts: Arc<dyn PostStore>, kind: BackendKind) -> Self {
        Self { users, posts, kind }
    }

    /// Select the backend for this process
    ///
    /// # Errors
    ///
    /// In production: `Unavailable` when no database is configured, or the
    /// connection/migration error when it cannot be reached. In development
    /// only file store errors are returned.
    pub async fn connect(settings: &Settings) -> Result<Self, StorageError> {
        match settings.database.url.as_deref() {
            Some(url) => {
                match Self::open_postgres(url, settings.database.connect_timeout).await {
                    Ok(storage) => return Ok(storage),
                    Err(e) if settings.is_production() => {
                        tracing::error!("Database unavailable in production: {}", e);
                        return Err(e);
                    }
                    Err(e) => {
                        tracing::warn!("Database unavailable ({}); falling back to file store", e);
                    }
                }
            }
            None if settings.is_production() => {
                return Err(StorageError::unavailable(
                    "DATABASE_URL is required in production; the file store is disabled",
                ));
            }
            None => {
                tracing::warn!("DATABASE_URL not set. Using the file store.");
            }
        }

        Self::open_file(&settings.data_dir).await
    }

    /// Connect to PostgreSQL and run migrations
    pub async fn open_postgres(url: &str, connect_timeout: Duration) -> Result<Self, StorageError> {
        let pool = postgres::connect(url, connect_timeout).await?;
        Ok(Self::new(
            Arc::new(postgres::PgUserStore::new(pool.clone())),
            Arc::new(postgres::PgPostStore::new(pool)),
            BackendKind::Postgres,
        ))
    }

    /// Open (creating if needed) the JSON-file stores in `dir`
    pub async fn open_file(dir: &Path) -> Result<Self, StorageError> {
        let users = file::FileUserStore::open(dir).await?;
        let posts = file::FilePostStore::open(dir).await?;
        tracing::info!("Using file store in {}", dir.display());
        Ok(Self::new(Arc::new(users), Arc::new(posts), BackendKind::File))
    }

    pub fn users(&self) -> &dyn UserStore {
        self.users.as_ref()
    }

    pub fn posts(&self) -> &dyn PostStore {
        self.posts.as_ref()
    }

    /// Shared pointer to the user store, for components that outlive a borrow
    pub fn user_store(&self) -> Arc<dyn UserStore> {
        Arc::clone(&self.users)
    }

    pub fn kind(&self) -> BackendKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::server::config::Environment;

    #[tokio::test]
    async fn test_no_database_selects_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::development(dir.path());
        let storage = Storage::connect(&settings).await.unwrap();
        assert_eq!(storage.kind(), BackendKind::File);
        assert!(dir.path().join("users.json").exists());
        assert!(dir.path().join("posts.json").exists());
    }

    #[tokio::test]
    async fn test_production_refuses_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::development(dir.path());
        settings.environment = Environment::Production;
        let err = Storage::connect(&settings).await.unwrap_err();
        assert!(matches!(err, StorageError::Unavailable { .. }));
        assert!(!dir.path().join("users.json").exists());
    }

    #[tokio::test]
    async fn test_unreachable_database_falls_back_in_development() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::development(dir.path());
        settings.database.url = Some("postgres://nobody@127.0.0.1:1/none".to_string());
        settings.database.connect_timeout = Duration::from_secs(1);
        let storage = Storage::connect(&settings).await.unwrap();
        assert_eq!(storage.kind(), BackendKind::File);
    }

    #[test]
    fn test_backend_kind_display() {
        assert_eq!(BackendKind::Postgres.to_string(), "postgres");
        assert_eq!(serde_json::to_value(BackendKind::File).unwrap(), "file");
    }
}
