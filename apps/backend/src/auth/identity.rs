//! Identity assertion verification against the provider's introspection endpoint.
//!
//! The backend never parses or checks the provider token itself. One GET to
//! the tokeninfo endpoint decides; anything other than a 2xx with a usable
//! body means "no claims".

use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::IdentityProviderConfig;

/// `email_verified` as reported by the provider: a JSON boolean or a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmailVerified {
    Bool(bool),
    Text(String),
}

impl EmailVerified {
    /// Only `true` (or the string `"true"`, any case) counts as verified.
    pub fn as_bool(&self) -> bool {
        match self {
            EmailVerified::Bool(verified) => *verified,
            EmailVerified::Text(text) => text.trim().eq_ignore_ascii_case("true"),
        }
    }
}

/// Claims returned by the identity provider for a valid token.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IdentityClaims {
    /// Provider-issued subject, stable per account
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: Option<EmailVerified>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    /// Authorized party
    #[serde(default)]
    pub azp: Option<String>,
    #[serde(default)]
    pub aud: Option<String>,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("invalid introspection URL `{url}`: {reason}")]
    Endpoint { url: String, reason: String },
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Claims for `id_token` if the provider vouches for it, else `None`.
    async fn verify(&self, id_token: &str) -> Option<IdentityClaims>;
}

/// Verifier backed by an OAuth2 tokeninfo-style endpoint.
#[derive(Debug, Clone)]
pub struct TokenInfoVerifier {
    client: reqwest::Client,
    endpoint: Url,
    expected_audience: Option<String>,
}

impl TokenInfoVerifier {
    pub fn new(config: &IdentityProviderConfig) -> Result<Self, IdentityError> {
        let endpoint =
            Url::parse(&config.tokeninfo_url).map_err(|e| IdentityError::Endpoint {
                url: config.tokeninfo_url.clone(),
                reason: e.to_string(),
            })?;

        // No retries, so the timeout is the only bound on a hung provider
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            expected_audience: config.client_id.clone(),
        })
    }

    fn audience_matches(&self, claims: &IdentityClaims) -> bool {
        match &self.expected_audience {
            Some(expected) => claims.aud.as_deref() == Some(expected.as_str()),
            None => true,
        }
    }
}

#[async_trait]
impl IdentityVerifier for TokenInfoVerifier {
    async fn verify(&self, id_token: &str) -> Option<IdentityClaims> {
        if id_token.is_empty() {
            return None;
        }

        let response = match self
            .client
            .get(self.endpoint.clone())
            .query(&[("id_token", id_token)])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    timeout = e.is_timeout(),
                    error = %e.without_url(),
                    "identity provider unreachable"
                );
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "identity provider rejected token");
            return None;
        }

        let claims = match response.json::<IdentityClaims>().await {
            Ok(claims) => claims,
            Err(e) => {
                warn!(error = %e.without_url(), "identity provider returned an unreadable body");
                return None;
            }
        };

        if claims.sub.is_empty() {
            debug!("identity provider returned an empty subject");
            return None;
        }
        if !self.audience_matches(&claims) {
            debug!("identity token audience does not match this client");
            return None;
        }

        Some(claims)
    }
}
