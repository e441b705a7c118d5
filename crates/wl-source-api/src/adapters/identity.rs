//! Identity provider adapters.

use crate::domain::config::IdentityConfig;
use crate::domain::entities::{AccessToken, Principal};
use crate::domain::error::{IdentityError, ServiceError};
use crate::ports::outbound::{IdentityProvider, TokenResolution};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::HashSet;
use tracing::debug;

/// Resolves tokens against an OIDC-style userinfo endpoint.
///
/// The token is forwarded as `Authorization: Bearer <token>`. A 2xx answer
/// naming a user resolves the token; 401 and 403 mean the provider does not
/// recognise it.
pub struct HttpIdentityProvider {
    client: reqwest::Client,
    userinfo_url: String,
}

/// Fields of the userinfo response this adapter reads.
#[derive(Debug, Deserialize)]
struct UserInfo {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    sub: Option<String>,
}

impl UserInfo {
    fn subject(self) -> Option<String> {
        self.username
            .filter(|u| !u.is_empty())
            .or(self.sub.filter(|s| !s.is_empty()))
    }
}

impl HttpIdentityProvider {
    pub fn new(userinfo_url: impl Into<String>, config: &IdentityConfig) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ServiceError::Client {
                client: "identity",
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            userinfo_url: userinfo_url.into(),
        })
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn resolve_user(&self, token: &AccessToken) -> Result<TokenResolution, IdentityError> {
        let response = self
            .client
            .get(&self.userinfo_url)
            .bearer_auth(token.expose())
            .send()
            .await?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                debug!(status = status.as_u16(), "Userinfo endpoint rejected token");
                Ok(TokenResolution::Unresolved)
            }
            s if s.is_success() => {
                let info: UserInfo = response.json().await?;
                Ok(match info.subject() {
                    Some(subject) => TokenResolution::Resolved(Principal::new(subject)),
                    None => TokenResolution::Unresolved,
                })
            }
            s => Err(IdentityError::UnexpectedStatus(s.as_u16())),
        }
    }
}

/// Accepts a fixed set of tokens. Development and tests only.
#[derive(Debug, Default)]
pub struct StaticIdentityProvider {
    tokens: HashSet<String>,
}

impl StaticIdentityProvider {
    pub fn new<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            tokens: tokens
                .into_iter()
                .map(Into::into)
                .filter(|t: &String| !t.is_empty())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn resolve_user(&self, token: &AccessToken) -> Result<TokenResolution, IdentityError> {
        if self.tokens.contains(token.expose()) {
            Ok(TokenResolution::Resolved(Principal::new("static")))
        } else {
            Ok(TokenResolution::Unresolved)
        }
    }
}
