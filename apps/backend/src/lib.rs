#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod auth;
pub mod config;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod logging;
pub mod middleware;
pub mod repos;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod trace_ctx;

// Re-exports for public API
pub use auth::claims::{SessionClaims, SessionGrant};
pub use auth::identity::{IdentityClaims, IdentityVerifier, TokenInfoVerifier};
pub use auth::pin::PinCredential;
pub use auth::session_token::{InvalidToken, SessionTokenCodec, SignedToken};
pub use config::Config;
pub use error::AppError;
pub use extractors::auth_token::AuthToken;
pub use extractors::current_session::CurrentSession;
pub use middleware::cors::cors_middleware;
pub use middleware::request_trace::RequestTrace;
pub use middleware::structured_logger::StructuredLogger;
pub use middleware::trace_span::TraceSpan;
pub use services::credentials::{CredentialService, IssuedSession};
pub use state::app_state::AppState;
pub use state::security_config::SecurityConfig;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::logging::init();
}
