//! Stateless HS256 session tokens.
//!
//! A token is `base64url(header).base64url(payload).base64url(signature)`
//! with the signature being HMAC-SHA-256 over the first two segments. No
//! server-side record exists; validity is the signature plus the optional
//! `exp` claim.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::Sha256;
use thiserror::Error;
use tracing::debug;

use crate::auth::claims::{SessionClaims, SessionGrant};
use crate::auth::encoding::{
    b64url_decode, b64url_encode, decode_json_segment, encode_json_segment, epoch_seconds,
};

type HmacSha256 = Hmac<Sha256>;

/// The only algorithm this codec signs with or accepts.
pub const ALGORITHM: &str = "HS256";
const TOKEN_TYPE: &str = "JWT";

/// Claim keys the codec owns; callers may not supply them.
pub const RESERVED_CLAIMS: [&str; 2] = ["iat", "exp"];

/// Failure while minting a token. Only ever caused by server-side inputs.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("session token secret must not be empty")]
    EmptySecret,
    #[error("claim `{0}` is reserved and set by the codec")]
    ReservedClaim(String),
    #[error("system clock is before the Unix epoch")]
    ClockBeforeEpoch,
    #[error("failed to serialize token segment: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The single rejection outcome for presented tokens.
///
/// Malformed, forged and expired tokens are deliberately indistinguishable.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("invalid session token")]
pub struct InvalidToken;

/// Internal rejection reasons, logged at debug level and never returned.
#[derive(Debug, Clone, Copy)]
enum Rejection {
    Structure,
    Header,
    Signature,
    Payload,
    Expiry,
    Clock,
}

impl Rejection {
    fn as_str(self) -> &'static str {
        match self {
            Rejection::Structure => "structure",
            Rejection::Header => "header",
            Rejection::Signature => "signature",
            Rejection::Payload => "payload",
            Rejection::Expiry => "expired",
            Rejection::Clock => "clock",
        }
    }
}

fn reject<T>(reason: Rejection) -> Result<T, InvalidToken> {
    debug!(reason = reason.as_str(), "session token rejected");
    Err(InvalidToken)
}

/// A freshly minted token together with the `exp` it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedToken {
    pub token: String,
    pub exp: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenHeader {
    alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    typ: Option<String>,
}

/// Issues and verifies session tokens under one process-wide secret.
///
/// Cloning is cheap; the secret is shared read-only.
#[derive(Clone)]
pub struct SessionTokenCodec {
    secret: Arc<[u8]>,
}

impl std::fmt::Debug for SessionTokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokenCodec")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl SessionTokenCodec {
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, TokenError> {
        let secret: Vec<u8> = secret.into();
        if secret.is_empty() {
            return Err(TokenError::EmptySecret);
        }
        Ok(Self {
            secret: Arc::from(secret),
        })
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.secret).expect("HMAC can take key of any size")
    }

    fn signing_input_mac(&self, header: &str, payload: &str) -> HmacSha256 {
        let mut mac = self.mac();
        mac.update(header.as_bytes());
        mac.update(b".");
        mac.update(payload.as_bytes());
        mac
    }

    /// Mint a token for `claims`, stamped with the current time.
    pub fn issue(
        &self,
        claims: Map<String, Value>,
        expires_in: Option<Duration>,
    ) -> Result<String, TokenError> {
        self.issue_at(claims, expires_in, SystemTime::now())
    }

    /// Mint a token as if issued at `now`.
    ///
    /// `exp` is written only when `expires_in` is given.
    pub fn issue_at(
        &self,
        claims: Map<String, Value>,
        expires_in: Option<Duration>,
        now: SystemTime,
    ) -> Result<String, TokenError> {
        self.sign_at(claims, expires_in, now).map(|signed| signed.token)
    }

    /// Like [`issue_at`](Self::issue_at), also returning the stamped `exp`.
    pub fn sign_at(
        &self,
        claims: Map<String, Value>,
        expires_in: Option<Duration>,
        now: SystemTime,
    ) -> Result<SignedToken, TokenError> {
        if let Some(key) = RESERVED_CLAIMS.iter().find(|k| claims.contains_key(**k)) {
            return Err(TokenError::ReservedClaim((*key).to_string()));
        }

        let iat = epoch_seconds(now).ok_or(TokenError::ClockBeforeEpoch)?;

        let mut payload = Map::with_capacity(claims.len() + 2);
        payload.insert("iat".to_string(), Value::from(iat));
        payload.extend(claims);
        let exp = expires_in.map(|ttl| {
            let ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
            iat.saturating_add(ttl)
        });
        if let Some(exp) = exp {
            payload.insert("exp".to_string(), Value::from(exp));
        }

        let header = TokenHeader {
            alg: ALGORITHM.to_string(),
            typ: Some(TOKEN_TYPE.to_string()),
        };

        let encoded_header = encode_json_segment(&header)?;
        let encoded_payload = encode_json_segment(&payload)?;
        let signature = self
            .signing_input_mac(&encoded_header, &encoded_payload)
            .finalize()
            .into_bytes();

        Ok(SignedToken {
            token: format!(
                "{encoded_header}.{encoded_payload}.{}",
                b64url_encode(signature)
            ),
            exp,
        })
    }

    /// Verify `token` against the current time and return its payload.
    pub fn verify(&self, token: &str) -> Result<Map<String, Value>, InvalidToken> {
        self.verify_at(token, SystemTime::now())
    }

    /// Verify `token` as of `now` and return its payload.
    pub fn verify_at(&self, token: &str, now: SystemTime) -> Result<Map<String, Value>, InvalidToken> {
        let mut segments = token.split('.');
        let (Some(header), Some(payload), Some(signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return reject(Rejection::Structure);
        };

        match decode_json_segment::<TokenHeader>(header) {
            Some(h) if h.alg == ALGORITHM => {}
            _ => return reject(Rejection::Header),
        }

        let Ok(signature) = b64url_decode(signature) else {
            return reject(Rejection::Signature);
        };
        // verify_slice compares in constant time
        if self
            .signing_input_mac(header, payload)
            .verify_slice(&signature)
            .is_err()
        {
            return reject(Rejection::Signature);
        }

        let Some(Value::Object(claims)) = decode_json_segment::<Value>(payload) else {
            return reject(Rejection::Payload);
        };

        if let Some(exp) = claims.get("exp") {
            let Some(exp) = exp.as_i64() else {
                return reject(Rejection::Payload);
            };
            let Some(now) = epoch_seconds(now) else {
                return reject(Rejection::Clock);
            };
            if exp <= now {
                return reject(Rejection::Expiry);
            }
        }

        Ok(claims)
    }

    /// Mint a token for a typed grant.
    pub fn issue_session(
        &self,
        grant: SessionGrant,
        expires_in: Option<Duration>,
    ) -> Result<String, TokenError> {
        self.issue_session_at(grant, expires_in, SystemTime::now())
    }

    pub fn issue_session_at(
        &self,
        grant: SessionGrant,
        expires_in: Option<Duration>,
        now: SystemTime,
    ) -> Result<String, TokenError> {
        self.sign_session_at(grant, expires_in, now)
            .map(|signed| signed.token)
    }

    pub fn sign_session_at(
        &self,
        grant: SessionGrant,
        expires_in: Option<Duration>,
        now: SystemTime,
    ) -> Result<SignedToken, TokenError> {
        self.sign_at(grant.into_claim_map()?, expires_in, now)
    }

    /// Verify a token and decode its payload into [`SessionClaims`].
    ///
    /// A payload that verifies but lacks the typed fields (e.g. no `sub`)
    /// is rejected the same way as a forged one.
    pub fn verify_session(&self, token: &str) -> Result<SessionClaims, InvalidToken> {
        self.verify_session_at(token, SystemTime::now())
    }

    pub fn verify_session_at(
        &self,
        token: &str,
        now: SystemTime,
    ) -> Result<SessionClaims, InvalidToken> {
        let claims = self.verify_at(token, now)?;
        match serde_json::from_value(Value::Object(claims)) {
            Ok(claims) => Ok(claims),
            Err(_) => reject(Rejection::Payload),
        }
    }
}
