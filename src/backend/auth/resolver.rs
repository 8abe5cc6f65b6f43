/**
 * Session Resolver
 *
 * Turns request headers into the caller's identity. A token alone is not
 * trusted for authorization: after the signature and expiry check, the
 * user is re-read from the credential store so that deleted accounts lose
 * access and admin flags are always current.
 *
 * # Stale Claims
 *
 * When the credential store itself fails, the resolver follows the
 * configured `StaleClaimsPolicy`:
 *
 * - `TrustClaims` - answer from the token's own claims and log a warning
 * - `Strict` - fail the request with a storage error
 */

use axum::http::HeaderMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::backend::auth::cookies::extract_session_token;
use crate::backend::auth::sessions::{SessionClaims, TokenService};
use crate::backend::auth::users::UserStore;
use crate::backend::error::BackendError;
use crate::shared::user::User;

/// What to do with a valid token when the credential store cannot be read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StaleClaimsPolicy {
    /// Fall back to the token's claims
    #[default]
    TrustClaims,
    /// Propagate the storage failure
    Strict,
}

/// The authenticated caller of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub username: String,
    pub is_admin: bool,
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            is_admin: user.is_admin,
        }
    }
}

/// Resolves request identities from session tokens
#[derive(Debug, Clone)]
pub struct SessionResolver {
    tokens: TokenService,
    users: Arc<dyn UserStore>,
    policy: StaleClaimsPolicy,
}

impl SessionResolver {
    pub fn new(tokens: TokenService, users: Arc<dyn UserStore>, policy: StaleClaimsPolicy) -> Self {
        Self { tokens, users, policy }
    }

    pub fn policy(&self) -> StaleClaimsPolicy {
        self.policy
    }

    /// Resolve the identity behind a request
    ///
    /// # Returns
    ///
    /// - `Ok(None)` when there is no token, the token is invalid or expired,
    ///   or its account no longer exists
    /// - `Ok(Some(identity))` with the store's current username and admin flag
    ///
    /// # Errors
    ///
    /// A storage error, only under `StaleClaimsPolicy::Strict`.
    pub async fn resolve(&self, headers: &HeaderMap) -> Result<Option<Identity>, BackendError> {
        match extract_session_token(headers) {
            Some(token) => self.resolve_token(&token).await,
            None => Ok(None),
        }
    }

    /// Resolve a raw token
    pub async fn resolve_token(&self, token: &str) -> Result<Option<Identity>, BackendError> {
        let Some(claims) = self.tokens.verify(token) else {
            return Ok(None);
        };

        let Ok(user_id) = Uuid::parse_str(&claims.sub) else {
            tracing::warn!("Session token carries a malformed subject");
            return Ok(None);
        };

        match self.users.find_by_id(user_id).await {
            Ok(Some(user)) => Ok(Some(Identity::from(&user))),
            Ok(None) => {
                tracing::info!("Session for deleted user {} treated as anonymous", user_id);
                Ok(None)
            }
            Err(e) => match self.policy {
                StaleClaimsPolicy::TrustClaims => {
                    tracing::warn!(
                        "Credential store lookup failed ({}); trusting session claims for {}",
                        e,
                        claims.username
                    );
                    Ok(Some(identity_from_claims(user_id, claims)))
                }
                StaleClaimsPolicy::Strict => Err(e.into()),
            },
        }
    }
}

fn identity_from_claims(user_id: Uuid, claims: SessionClaims) -> Identity {
    Identity {
        user_id,
        username: claims.username,
        is_admin: claims.is_admin,
    }
}
