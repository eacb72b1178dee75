//! Credential primitives: provider identity verification, session tokens
//! and profile PINs.

pub mod claims;
pub mod encoding;
pub mod identity;
pub mod pin;
pub mod session_token;

pub use claims::{SessionClaims, SessionGrant};
pub use identity::{EmailVerified, IdentityClaims, IdentityVerifier, TokenInfoVerifier};
pub use pin::{PinCredential, PinError};
pub use session_token::{InvalidToken, SessionTokenCodec, SignedToken, TokenError};
