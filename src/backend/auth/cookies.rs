//! Session cookie helpers.
//!
//! The session token travels in an HttpOnly cookie named `token`. Non-browser
//! clients may send the same token as `Authorization: Bearer <token>`.

use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::HeaderMap;
use std::fmt;
use std::time::Duration;

use crate::backend::server::config::Settings;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "token";

/// `SameSite` attribute values used by the session cookie
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Lax,
    None,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lax => f.write_str("Lax"),
            Self::None => f.write_str("None"),
        }
    }
}

/// Attributes applied to every session cookie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookiePolicy {
    pub secure: bool,
    pub same_site: SameSite,
    pub domain: Option<String>,
}

impl CookiePolicy {
    /// Secure in production; `SameSite=None` only for cross-site production
    /// deployments, since browsers drop `None` cookies that are not Secure.
    pub fn from_settings(settings: &Settings) -> Self {
        let production = settings.is_production();
        Self {
            secure: production,
            same_site: if production && settings.cookies.cross_site {
                SameSite::None
            } else {
                SameSite::Lax
            },
            domain: settings.cookies.domain.clone(),
        }
    }
}

/// Build a `Set-Cookie` value with the policy's attributes
pub fn set_cookie(
    name: &str,
    value: &str,
    max_age: Duration,
    expires_epoch: bool,
    policy: &CookiePolicy,
) -> String {
    let mut cookie = format!("{}={}; Path=/; Max-Age={}", name, value, max_age.as_secs());

    if expires_epoch {
        cookie.push_str("; Expires=Thu, 01 Jan 1970 00:00:00 GMT");
    }

    if let Some(domain) = &policy.domain {
        cookie.push_str(&format!("; Domain={}", domain));
    }

    cookie.push_str("; HttpOnly");

    if policy.secure {
        cookie.push_str("; Secure");
    }

    cookie.push_str(&format!("; SameSite={}", policy.same_site));
    cookie
}

/// Cookie carrying a freshly issued session token
pub fn session_cookie(token: &str, ttl: Duration, policy: &CookiePolicy) -> String {
    set_cookie(SESSION_COOKIE, token, ttl, false, policy)
}

/// Empty, already-expired session cookie used by logout
pub fn expired_session_cookie(policy: &CookiePolicy) -> String {
    set_cookie(SESSION_COOKIE, "", Duration::ZERO, true, policy)
}

/// Extract cookie value by name
pub fn get_cookie(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .find_map(|cookie| {
            let (name, value) = cookie.trim().split_once('=')?;
            (name.trim() == cookie_name).then(|| value.trim().to_string())
        })
}

/// Session token from the cookie, or from a Bearer header as a fallback
///
/// Empty values (such as a logged-out cookie) count as absent.
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    get_cookie(headers, SESSION_COOKIE)
        .filter(|token| !token.is_empty())
        .or_else(|| {
            headers
                .get(AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .and_then(|h| h.strip_prefix("Bearer "))
                .map(|token| token.trim().to_string())
                .filter(|token| !token.is_empty())
        })
}
