//! Byte/text helpers shared by the session token codec and the PIN store.
//!
//! Every opaque value this subsystem emits (token segments, salts, derived
//! hashes) is URL-safe base64 without padding.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::{DecodeError, Engine};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Encode raw bytes as base64url without padding.
pub fn b64url_encode(bytes: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode base64url text without padding.
///
/// Padded input and non-canonical trailing bits are rejected.
pub fn b64url_decode(text: &str) -> Result<Vec<u8>, DecodeError> {
    URL_SAFE_NO_PAD.decode(text)
}

/// Serialize `value` to compact JSON and encode it as base64url.
pub fn encode_json_segment<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let json = serde_json::to_vec(value)?;
    Ok(b64url_encode(json))
}

/// Decode a base64url segment and parse its JSON content.
///
/// Returns `None` when either step fails; callers collapse both into one
/// rejection.
pub fn decode_json_segment<T: DeserializeOwned>(segment: &str) -> Option<T> {
    let bytes = b64url_decode(segment).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Seconds since the Unix epoch, or `None` for instants before it.
pub fn epoch_seconds(at: SystemTime) -> Option<i64> {
    at.duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|d| i64::try_from(d.as_secs()).ok())
}
