use std::time::Duration;

use crate::auth::session_token::{SessionTokenCodec, TokenError};

/// Session token settings shared by every request worker.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Codec holding the process-wide signing secret
    pub codec: SessionTokenCodec,
    /// Lifetime of newly issued session tokens (`None` = no `exp` claim)
    pub session_ttl: Option<Duration>,
}

impl SecurityConfig {
    /// Create a new SecurityConfig with the given secret and no expiry
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Result<Self, TokenError> {
        Ok(Self {
            codec: SessionTokenCodec::new(jwt_secret)?,
            session_ttl: None,
        })
    }

    pub fn with_session_ttl(mut self, session_ttl: Option<Duration>) -> Self {
        self.session_ttl = session_ttl;
        self
    }

    /// Fixed secret and a one-hour TTL for tests.
    pub fn for_tests() -> Self {
        Self::new("test_secret_key_for_testing_purposes_only")
            .expect("test secret is non-empty")
            .with_session_ttl(Some(Duration::from_secs(3600)))
    }
}
