//! Profile PIN credentials.
//!
//! A PIN is four ASCII digits, so the whole space is 10 000 values. The only
//! protection once a (salt, hash) pair leaks is the PBKDF2 work factor, which
//! must never be lowered.

use base64::DecodeError;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::auth::encoding::{b64url_decode, b64url_encode};

/// PBKDF2-HMAC-SHA-256 iteration count.
pub const PBKDF2_ITERATIONS: u32 = 100_000;
/// Random salt size in bytes.
pub const SALT_LEN: usize = 16;
/// Derived key size in bytes.
pub const HASH_LEN: usize = 32;
/// Number of digits in a profile PIN.
pub const PIN_LEN: usize = 4;

#[derive(Debug, Error)]
pub enum PinError {
    #[error("PIN must be exactly four ASCII digits")]
    InvalidFormat,
    #[error("salt is not valid base64url: {0}")]
    InvalidSalt(#[from] DecodeError),
}

/// Fresh random salt, base64url encoded.
pub fn generate_salt() -> String {
    let mut salt = [0u8; SALT_LEN];
    // ThreadRng is a CSPRNG reseeded from the OS
    rand::rng().fill_bytes(&mut salt);
    b64url_encode(salt)
}

/// Derive the stored hash for `pin` under `salt`.
///
/// Deterministic in `(salt, pin)`. Expensive by construction; run it off the
/// async executor.
pub fn hash_pin(salt: &str, pin: &str) -> Result<String, PinError> {
    let salt = b64url_decode(salt)?;
    let mut derived = [0u8; HASH_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(pin.as_bytes(), &salt, PBKDF2_ITERATIONS, &mut derived);
    Ok(b64url_encode(derived))
}

/// Check `pin` against a stored `(salt, hash)` pair in constant time.
///
/// Any failure, including an undecodable salt, is reported as `false`.
pub fn verify_pin(salt: &str, stored_hash: &str, pin: &str) -> bool {
    match hash_pin(salt, pin) {
        Ok(candidate) => candidate.as_bytes().ct_eq(stored_hash.as_bytes()).into(),
        Err(_) => false,
    }
}

/// True iff `pin` is exactly four ASCII decimal digits.
pub fn is_valid_format(pin: &str) -> bool {
    pin.len() == PIN_LEN && pin.bytes().all(|b| b.is_ascii_digit())
}

/// Persisted PIN credential for one profile. Never holds the plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinCredential {
    pub salt: String,
    pub hash: String,
}

impl PinCredential {
    /// Build a brand-new credential with a fresh salt.
    ///
    /// Rejects malformed PINs before any derivation runs.
    pub fn create(pin: &str) -> Result<Self, PinError> {
        if !is_valid_format(pin) {
            return Err(PinError::InvalidFormat);
        }
        let salt = generate_salt();
        let hash = hash_pin(&salt, pin)?;
        Ok(Self { salt, hash })
    }

    pub fn matches(&self, pin: &str) -> bool {
        verify_pin(&self.salt, &self.hash, pin)
    }
}
