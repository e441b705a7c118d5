//! Bearer-token authentication gate.
//!
//! Malformed headers are rejected locally without contacting the identity
//! provider. Well-formed headers cost exactly one provider call, and any
//! provider failure rejects the request.

use crate::domain::entities::AccessToken;
use crate::domain::outcome::{AuthDecision, RejectReason};
use crate::ports::outbound::{IdentityProvider, TokenResolution};
use std::sync::Arc;
use tracing::{debug, warn};

/// Case-sensitive scheme prefix, including the single separating space.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Authentication gate
#[derive(Clone)]
pub struct AuthGate {
    provider: Arc<dyn IdentityProvider>,
}

impl AuthGate {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    /// Authenticate the raw `Authorization` header value.
    pub async fn authenticate(&self, header: Option<&str>) -> AuthDecision {
        let token = match parse_bearer(header) {
            Ok(token) => token,
            Err(reason) => {
                debug!(reason = ?reason, "Rejected authorization header");
                return AuthDecision::Rejected(reason);
            }
        };

        match self.provider.resolve_user(&token).await {
            Ok(TokenResolution::Resolved(principal)) => AuthDecision::Authenticated(principal),
            Ok(TokenResolution::Unresolved) => {
                debug!("Identity provider did not resolve token");
                AuthDecision::Rejected(RejectReason::TokenUnresolved)
            }
            Err(e) => {
                warn!(error = %e, "Identity provider call failed, rejecting request");
                AuthDecision::Rejected(RejectReason::ProviderError)
            }
        }
    }
}

/// Extract the bearer token from a header value.
///
/// The prefix must match exactly and the remaining token must be non-empty.
pub fn parse_bearer(header: Option<&str>) -> Result<AccessToken, RejectReason> {
    let value = header.ok_or(RejectReason::MissingHeader)?;
    let token = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(RejectReason::MalformedHeader)?;

    if token.is_empty() {
        return Err(RejectReason::MalformedHeader);
    }

    Ok(AccessToken::new(token))
}
