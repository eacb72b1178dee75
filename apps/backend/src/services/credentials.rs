//! Credential orchestration: login, request authorization and the profile PIN gate.
//!
//! This is the only place the identity verifier, the session token codec and
//! the PIN store meet.

use std::sync::Arc;
use std::time::SystemTime;

use serde::Serialize;
use tracing::{debug, info};

use crate::auth::claims::{SessionClaims, SessionGrant};
use crate::auth::identity::IdentityVerifier;
use crate::auth::pin::{self, PinCredential};
use crate::error::AppError;
use crate::errors::domain::{DomainError, InfraErrorKind};
use crate::errors::ErrorCode;
use crate::logging::pii::Redacted;
use crate::logging::security;
use crate::state::security_config::SecurityConfig;

/// Result of a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedSession {
    pub token: String,
    /// Expiry (seconds since epoch), when the session has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

#[derive(Clone)]
pub struct CredentialService {
    identity: Arc<dyn IdentityVerifier>,
    security: SecurityConfig,
}

impl std::fmt::Debug for CredentialService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialService")
            .field("security", &self.security)
            .finish_non_exhaustive()
    }
}

impl CredentialService {
    pub fn new(identity: Arc<dyn IdentityVerifier>, security: SecurityConfig) -> Self {
        Self { identity, security }
    }

    pub fn security(&self) -> &SecurityConfig {
        &self.security
    }

    /// Exchange a provider identity token for a backend session token.
    ///
    /// Claims come exclusively from the provider's answer, never from the
    /// client request.
    pub async fn login(&self, provider_token: &str) -> Result<IssuedSession, AppError> {
        self.login_at(provider_token, SystemTime::now()).await
    }

    pub async fn login_at(
        &self,
        provider_token: &str,
        now: SystemTime,
    ) -> Result<IssuedSession, AppError> {
        if provider_token.trim().is_empty() {
            return Err(AppError::bad_request(
                ErrorCode::InvalidIdentityToken,
                "Identity token cannot be empty",
            ));
        }

        let Some(identity) = self.identity.verify(provider_token).await else {
            security::login_failed("provider_rejected");
            return Err(AppError::authentication_failed());
        };

        let grant = SessionGrant::from_identity(&identity);
        let signed = self
            .security
            .codec
            .sign_session_at(grant, self.security.session_ttl, now)?;

        info!(
            sub = %Redacted(&identity.sub),
            email = %identity.email.as_deref().map(Redacted).unwrap_or(Redacted("")),
            "session issued"
        );

        Ok(IssuedSession {
            token: signed.token,
            expires_at: signed.exp,
        })
    }

    /// Authenticate a presented session token.
    pub fn authorize(&self, token: &str) -> Result<SessionClaims, AppError> {
        self.authorize_at(token, SystemTime::now())
    }

    pub fn authorize_at(&self, token: &str, now: SystemTime) -> Result<SessionClaims, AppError> {
        Ok(self.security.codec.verify_session_at(token, now)?)
    }

    /// Check a candidate PIN against a profile's stored credential.
    ///
    /// Malformed PINs are rejected before any derivation. The derivation
    /// itself runs on the blocking pool.
    pub async fn verify_profile_pin(
        &self,
        candidate: &str,
        credential: &PinCredential,
    ) -> Result<bool, AppError> {
        if !pin::is_valid_format(candidate) {
            return Err(AppError::invalid(
                ErrorCode::InvalidPinFormat,
                "PIN must be exactly four digits",
            ));
        }

        let candidate = candidate.to_string();
        let credential = credential.clone();
        let matched = tokio::task::spawn_blocking(move || credential.matches(&candidate))
            .await
            .map_err(|e| {
                DomainError::infra(
                    InfraErrorKind::WorkerPool,
                    format!("PIN verification task failed: {e}"),
                )
            })?;

        debug!(matched, "profile PIN checked");
        Ok(matched)
    }

    /// Derive a fresh credential for `new_pin` on the blocking pool.
    pub async fn create_pin_credential(&self, new_pin: &str) -> Result<PinCredential, AppError> {
        if !pin::is_valid_format(new_pin) {
            return Err(AppError::invalid(
                ErrorCode::InvalidPinFormat,
                "PIN must be exactly four digits",
            ));
        }

        let new_pin = new_pin.to_string();
        let credential = tokio::task::spawn_blocking(move || PinCredential::create(&new_pin))
            .await
            .map_err(|e| {
                DomainError::infra(
                    InfraErrorKind::WorkerPool,
                    format!("PIN derivation task failed: {e}"),
                )
            })??;

        Ok(credential)
    }
}
