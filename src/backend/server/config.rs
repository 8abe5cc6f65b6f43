/**
 * Server Configuration
 *
 * This module loads and validates the server settings from environment
 * variables. A `.env` file is read by the binaries before this runs.
 *
 * # Configuration Sources
 *
 * | Variable                               | Default       |
 * |----------------------------------------|---------------|
 * | `APP_ENV`                              | `development` |
 * | `SERVER_HOST` / `SERVER_PORT`          | `0.0.0.0` / `3000` |
 * | `DATABASE_URL`                         | unset         |
 * | `DATABASE_CONNECT_TIMEOUT_SECS`        | `10`          |
 * | `DATA_DIR`                             | `data`        |
 * | `JWT_SECRET`                           | random in development |
 * | `SESSION_TTL_DAYS`                     | `7`           |
 * | `SESSION_TRUST_CLAIMS_ON_STORE_ERROR`  | `true`        |
 * | `COOKIE_CROSS_SITE`                    | `false`       |
 * | `COOKIE_DOMAIN`                        | unset         |
 * | `BOOTSTRAP_ADMIN_USERNAME` / `BOOTSTRAP_ADMIN_PASSWORD` | unset |
 *
 * # Error Handling
 *
 * Bad values are fatal: a typo in `APP_ENV` or a short production secret
 * stops startup with a `ConfigError`.
 */

use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

use crate::backend::auth::resolver::StaleClaimsPolicy;

/// Minimum signing secret length accepted in production
pub const MIN_SECRET_LEN: usize = 32;

/// Longest session lifetime accepted from `SESSION_TTL_DAYS`
pub const MAX_SESSION_TTL_DAYS: u64 = 365;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Configuration errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is present but cannot be used
    #[error("Invalid value for {key}: {message}")]
    Invalid {
        key: &'static str,
        message: String,
    },

    /// A variable that production requires is absent
    #[error("{key} must be set when APP_ENV=production")]
    Missing { key: &'static str },
}

impl ConfigError {
    fn invalid(key: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            message: message.into(),
        }
    }
}

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => f.write_str("development"),
            Self::Production => f.write_str("production"),
        }
    }
}

/// Database connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    /// PostgreSQL URL; `None` selects the file store (development only)
    pub url: Option<String>,
    /// Upper bound on establishing the first connection
    pub connect_timeout: Duration,
}

/// Session token settings
#[derive(Clone, PartialEq, Eq)]
pub struct SessionSettings {
    /// HMAC signing secret
    pub secret: String,
    /// Token and cookie lifetime
    pub ttl: Duration,
    /// What the session resolver does when the credential store fails
    pub stale_claims: StaleClaimsPolicy,
}

impl fmt::Debug for SessionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionSettings")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .field("stale_claims", &self.stale_claims)
            .finish()
    }
}

/// Session cookie attributes that vary by deployment
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CookieSettings {
    /// Frontend served from another site; allows `SameSite=None` in production
    pub cross_site: bool,
    pub domain: Option<String>,
}

/// Admin account ensured at startup
#[derive(Clone, PartialEq, Eq)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Complete server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub environment: Environment,
    pub host: IpAddr,
    pub port: u16,
    pub database: DatabaseSettings,
    /// Directory holding `users.json` and `posts.json` for the file store
    pub data_dir: PathBuf,
    pub session: SessionSettings,
    pub cookies: CookieSettings,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl Settings {
    /// Load settings from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings from any key/value source
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for unparseable values, an unknown `APP_ENV`,
    /// or a missing/short `JWT_SECRET` in production.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let environment = match get("APP_ENV").as_deref() {
            None => Environment::Development,
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "development" | "dev" | "local" => Environment::Development,
                "production" | "prod" => Environment::Production,
                other => {
                    return Err(ConfigError::invalid(
                        "APP_ENV",
                        format!("expected 'development' or 'production', got '{}'", other),
                    ))
                }
            },
        };

        let host = match get("SERVER_HOST") {
            Some(value) => value
                .parse::<IpAddr>()
                .map_err(|e| ConfigError::invalid("SERVER_HOST", e.to_string()))?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let port = match get("SERVER_PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|e| ConfigError::invalid("SERVER_PORT", e.to_string()))?,
            None => 3000,
        };

        let connect_timeout = Duration::from_secs(parse_u64(
            get("DATABASE_CONNECT_TIMEOUT_SECS"),
            "DATABASE_CONNECT_TIMEOUT_SECS",
            10,
        )?);

        let ttl_days = parse_u64(get("SESSION_TTL_DAYS"), "SESSION_TTL_DAYS", 7)?;
        if ttl_days == 0 {
            return Err(ConfigError::invalid("SESSION_TTL_DAYS", "must be at least 1"));
        }
        if ttl_days > MAX_SESSION_TTL_DAYS {
            return Err(ConfigError::invalid(
                "SESSION_TTL_DAYS",
                format!("must be at most {}", MAX_SESSION_TTL_DAYS),
            ));
        }

        let secret = match get("JWT_SECRET") {
            Some(secret) => {
                if secret.len() < MIN_SECRET_LEN {
                    if environment.is_production() {
                        return Err(ConfigError::invalid(
                            "JWT_SECRET",
                            format!("must be at least {} characters", MIN_SECRET_LEN),
                        ));
                    }
                    tracing::warn!(
                        "JWT_SECRET is shorter than {} characters; acceptable for development only",
                        MIN_SECRET_LEN
                    );
                }
                secret
            }
            None if environment.is_production() => {
                return Err(ConfigError::Missing { key: "JWT_SECRET" })
            }
            None => {
                tracing::warn!("JWT_SECRET not set. Using a random secret; sessions will not survive a restart.");
                random_secret()
            }
        };

        let trust_claims = parse_bool(
            get("SESSION_TRUST_CLAIMS_ON_STORE_ERROR"),
            "SESSION_TRUST_CLAIMS_ON_STORE_ERROR",
            true,
        )?;

        // Passwords are taken verbatim, surrounding whitespace included.
        let bootstrap_password = lookup("BOOTSTRAP_ADMIN_PASSWORD").filter(|p| !p.is_empty());
        let bootstrap_admin = match (get("BOOTSTRAP_ADMIN_USERNAME"), bootstrap_password) {
            (Some(username), Some(password)) => Some(BootstrapAdmin { username, password }),
            (None, None) => None,
            _ => {
                return Err(ConfigError::invalid(
                    "BOOTSTRAP_ADMIN_USERNAME",
                    "BOOTSTRAP_ADMIN_USERNAME and BOOTSTRAP_ADMIN_PASSWORD must be set together",
                ))
            }
        };

        Ok(Self {
            environment,
            host,
            port,
            database: DatabaseSettings {
                url: get("DATABASE_URL"),
                connect_timeout,
            },
            data_dir: get("DATA_DIR").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("data")),
            session: SessionSettings {
                secret,
                ttl: Duration::from_secs(ttl_days * SECONDS_PER_DAY),
                stale_claims: if trust_claims {
                    StaleClaimsPolicy::TrustClaims
                } else {
                    StaleClaimsPolicy::Strict
                },
            },
            cookies: CookieSettings {
                cross_site: parse_bool(get("COOKIE_CROSS_SITE"), "COOKIE_CROSS_SITE", false)?,
                domain: get("COOKIE_DOMAIN"),
            },
            bootstrap_admin,
        })
    }

    /// Development settings backed by the file store in `data_dir`
    pub fn development(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            environment: Environment::Development,
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            database: DatabaseSettings {
                url: None,
                connect_timeout: Duration::from_secs(10),
            },
            data_dir: data_dir.into(),
            session: SessionSettings {
                secret: random_secret(),
                ttl: Duration::from_secs(7 * SECONDS_PER_DAY),
                stale_claims: StaleClaimsPolicy::TrustClaims,
            },
            cookies: CookieSettings::default(),
            bootstrap_admin: None,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment.is_production()
    }
}

fn random_secret() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

fn parse_u64(value: Option<String>, key: &'static str, default: u64) -> Result<u64, ConfigError> {
    match value {
        Some(value) => value
            .parse::<u64>()
            .map_err(|e| ConfigError::invalid(key, e.to_string())),
        None => Ok(default),
    }
}

fn parse_bool(value: Option<String>, key: &'static str, default: bool) -> Result<bool, ConfigError> {
    let Some(value) = value else {
        return Ok(default);
    };
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::invalid(key, format!("expected a boolean, got '{}'", other))),
    }
}
