/**
 * Access Guard
 *
 * Extractors that gate handlers on the caller's session. A handler that
 * takes `AdminUser` cannot run for anonymous or non-admin callers:
 *
 * - no valid session → 401 Unauthorized
 * - session without admin rights → 403 Forbidden
 *
 * Identities come from `SessionResolver`, so the admin flag checked here is
 * the one currently in the credential store, not the one in the token.
 */

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::backend::auth::resolver::Identity;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Axum extractor for an authenticated caller
#[derive(Clone, Debug)]
pub struct AuthUser(pub Identity);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        state
            .sessions
            .resolve(&parts.headers)
            .await?
            .map(AuthUser)
            .ok_or_else(|| {
                tracing::debug!("Rejected unauthenticated request to {}", parts.uri.path());
                BackendError::unauthorized("Authentication required")
            })
    }
}

/// Axum extractor for an authenticated admin
#[derive(Clone, Debug)]
pub struct AdminUser(pub Identity);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthUser(identity) = AuthUser::from_request_parts(parts, state).await?;

        if !identity.is_admin {
            tracing::warn!("Non-admin {} denied access to {}", identity.username, parts.uri.path());
            return Err(BackendError::forbidden("Admin access required"));
        }

        Ok(AdminUser(identity))
    }
}
