//! Typed session claims carried in backend-issued session tokens.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::auth::identity::IdentityClaims;

/// Claims the backend signs into a new session token.
///
/// `iat`/`exp` are absent on purpose: the codec stamps them at issue time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionGrant {
    /// External account identifier issued by the identity provider
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    /// Forward-compatible extension claims
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SessionGrant {
    pub fn new(sub: impl Into<String>) -> Self {
        Self {
            sub: sub.into(),
            email: None,
            email_verified: None,
            name: None,
            picture: None,
            extra: Map::new(),
        }
    }

    /// Build a grant from provider-verified identity claims only.
    ///
    /// Audience and authorized party stay behind; `email_verified` is
    /// normalized to a boolean here.
    pub fn from_identity(identity: &IdentityClaims) -> Self {
        Self {
            sub: identity.sub.clone(),
            email: identity.email.clone(),
            email_verified: identity.email_verified.as_ref().map(|v| v.as_bool()),
            name: identity.name.clone(),
            picture: identity.picture.clone(),
            extra: Map::new(),
        }
    }

    /// Flatten into the claim map handed to the codec.
    pub fn into_claim_map(self) -> Result<Map<String, Value>, serde_json::Error> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Err(serde::ser::Error::custom("session grant must be a JSON object")),
        }
    }
}

/// Claims recovered from a verified session token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
