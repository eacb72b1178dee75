//! Profile PIN storage.
//!
//! Profiles live in an external store; this backend only needs the
//! (salt, hash) pair per profile, keyed by the owning account.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::auth::pin::PinCredential;
use crate::errors::domain::DomainError;

/// A profile within one account.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProfileKey {
    /// Account subject from the session token
    pub account: String,
    pub profile_id: String,
}

impl ProfileKey {
    pub fn new(account: impl Into<String>, profile_id: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            profile_id: profile_id.into(),
        }
    }
}

#[async_trait]
pub trait ProfilePinRepo: Send + Sync {
    async fn find(&self, key: &ProfileKey) -> Result<Option<PinCredential>, DomainError>;

    /// Insert or wholesale replace the credential for `key`.
    async fn upsert(&self, key: ProfileKey, credential: PinCredential) -> Result<(), DomainError>;

    /// Remove the credential; returns whether one existed.
    async fn delete(&self, key: &ProfileKey) -> Result<bool, DomainError>;
}

/// Process-local repository backed by a concurrent map.
#[derive(Debug, Default)]
pub struct InMemoryProfilePins {
    credentials: DashMap<ProfileKey, PinCredential>,
}

impl InMemoryProfilePins {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfilePinRepo for InMemoryProfilePins {
    async fn find(&self, key: &ProfileKey) -> Result<Option<PinCredential>, DomainError> {
        Ok(self.credentials.get(key).map(|entry| entry.value().clone()))
    }

    async fn upsert(&self, key: ProfileKey, credential: PinCredential) -> Result<(), DomainError> {
        self.credentials.insert(key, credential);
        Ok(())
    }

    async fn delete(&self, key: &ProfileKey) -> Result<bool, DomainError> {
        Ok(self.credentials.remove(key).is_some())
    }
}
