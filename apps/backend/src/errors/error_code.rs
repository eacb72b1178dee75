//! Error codes for the credential backend API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in HTTP responses.

use core::fmt;

/// Centralized error codes for the credential backend API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// Missing or malformed Bearer token
    UnauthorizedMissingBearer,
    /// Session token failed verification (malformed, forged or expired)
    UnauthorizedInvalidToken,
    /// Identity provider did not vouch for the presented identity token
    AuthenticationFailed,

    // Request Validation
    /// Identity token missing from the login request
    InvalidIdentityToken,
    /// PIN is not exactly four ASCII digits
    InvalidPinFormat,
    /// Invalid profile identifier
    InvalidProfileId,
    /// General bad request error
    BadRequest,

    // System Errors
    /// Profile storage unavailable or failed
    StorageError,
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UnauthorizedMissingBearer => "UNAUTHORIZED_MISSING_BEARER",
            Self::UnauthorizedInvalidToken => "UNAUTHORIZED_INVALID_TOKEN",
            Self::AuthenticationFailed => "AUTHENTICATION_FAILED",

            Self::InvalidIdentityToken => "INVALID_IDENTITY_TOKEN",
            Self::InvalidPinFormat => "INVALID_PIN_FORMAT",
            Self::InvalidProfileId => "INVALID_PROFILE_ID",
            Self::BadRequest => "BAD_REQUEST",

            Self::StorageError => "STORAGE_ERROR",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
