use std::sync::Arc;

use crate::auth::identity::IdentityVerifier;
use crate::repos::profile_pins::{InMemoryProfilePins, ProfilePinRepo};
use crate::services::credentials::CredentialService;

use super::security_config::SecurityConfig;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Login, token verification and PIN gate
    pub credentials: CredentialService,
    /// Storage for profile PIN credentials
    pub profile_pins: Arc<dyn ProfilePinRepo>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(
        identity: Arc<dyn IdentityVerifier>,
        security: SecurityConfig,
        profile_pins: Arc<dyn ProfilePinRepo>,
    ) -> Self {
        Self {
            credentials: CredentialService::new(identity, security),
            profile_pins,
        }
    }

    /// State with an in-memory profile PIN store
    pub fn in_memory(identity: Arc<dyn IdentityVerifier>, security: SecurityConfig) -> Self {
        Self::new(identity, security, Arc::new(InMemoryProfilePins::new()))
    }

    pub fn security(&self) -> &SecurityConfig {
        self.credentials.security()
    }
}
