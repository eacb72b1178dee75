//! Profile PIN lifecycle: enable/replace, disable, status and unlock.

use tracing::info;

use crate::auth::pin::{self, PinError};
use crate::error::AppError;
use crate::logging::security;
use crate::repos::profile_pins::{ProfileKey, ProfilePinRepo};
use crate::services::credentials::CredentialService;

/// Enable PIN protection, or replace the existing PIN wholesale.
pub async fn set_pin(
    credentials: &CredentialService,
    repo: &dyn ProfilePinRepo,
    key: ProfileKey,
    new_pin: &str,
) -> Result<(), AppError> {
    let credential = credentials.create_pin_credential(new_pin).await?;
    repo.upsert(key.clone(), credential).await?;
    info!(profile_id = %key.profile_id, "profile PIN set");
    Ok(())
}

/// Disable PIN protection. Returns whether a PIN was configured.
pub async fn clear_pin(repo: &dyn ProfilePinRepo, key: &ProfileKey) -> Result<bool, AppError> {
    let removed = repo.delete(key).await?;
    if removed {
        info!(profile_id = %key.profile_id, "profile PIN cleared");
    }
    Ok(removed)
}

pub async fn pin_status(repo: &dyn ProfilePinRepo, key: &ProfileKey) -> Result<bool, AppError> {
    Ok(repo.find(key).await?.is_some())
}

/// Gate access to a profile. Profiles without a PIN are always unlocked.
///
/// The candidate must be well formed whether or not a PIN is configured.
pub async fn unlock(
    credentials: &CredentialService,
    repo: &dyn ProfilePinRepo,
    key: &ProfileKey,
    candidate: &str,
) -> Result<bool, AppError> {
    if !pin::is_valid_format(candidate) {
        return Err(PinError::InvalidFormat.into());
    }

    let Some(stored) = repo.find(key).await? else {
        return Ok(true);
    };

    let unlocked = credentials.verify_profile_pin(candidate, &stored).await?;
    if !unlocked {
        security::pin_rejected(&key.profile_id);
    }
    Ok(unlocked)
}
