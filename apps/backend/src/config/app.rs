//! Centralized application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use crate::error::AppError;

pub const DEFAULT_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";
pub const DEFAULT_SESSION_TTL_SECS: u64 = 3600;
/// Upper bound for `SESSION_TTL_SECS` (30 days)
pub const MAX_SESSION_TTL_SECS: u64 = 30 * 24 * 3600;
pub const DEFAULT_IDENTITY_TIMEOUT_SECS: u64 = 5;
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Where and how to reach the identity provider's introspection endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityProviderConfig {
    pub tokeninfo_url: String,
    /// Expected `aud` of provider tokens; unchecked when `None`
    pub client_id: Option<String>,
    pub timeout: Duration,
}

impl Default for IdentityProviderConfig {
    fn default() -> Self {
        Self {
            tokeninfo_url: DEFAULT_TOKENINFO_URL.to_string(),
            client_id: None,
            timeout: Duration::from_secs(DEFAULT_IDENTITY_TIMEOUT_SECS),
        }
    }
}

/// Centralized application configuration loaded from environment variables
#[derive(Clone)]
pub struct Config {
    // Server configuration
    pub host: String,
    pub port: u16,

    // Security configuration
    pub jwt_secret: String,
    /// Session token lifetime; `None` issues tokens without `exp`
    pub session_ttl: Option<Duration>,

    // Identity provider
    pub identity: IdentityProviderConfig,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("jwt_secret", &"[REDACTED]")
            .field("session_ttl", &self.session_ttl)
            .field("identity", &self.identity)
            .finish()
    }
}

impl Config {
    /// Load and validate all configuration from environment variables
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("BACKEND_HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port_str = lookup("BACKEND_PORT").unwrap_or_else(|| "3001".to_string());
        let port = port_str.parse::<u16>().map_err(|_| {
            AppError::config(format!(
                "BACKEND_PORT must be a valid port number, got '{port_str}'"
            ))
        })?;

        let jwt_secret = match lookup("BACKEND_JWT_SECRET") {
            Some(secret) if secret.len() >= MIN_JWT_SECRET_LEN => secret,
            Some(_) => {
                return Err(AppError::config(format!(
                    "BACKEND_JWT_SECRET is too short. It should be at least {MIN_JWT_SECRET_LEN} characters for security."
                )))
            }
            None => return Err(AppError::config("BACKEND_JWT_SECRET must be set.")),
        };

        let session_ttl_secs = parse_u64(
            &lookup,
            "SESSION_TTL_SECS",
            DEFAULT_SESSION_TTL_SECS,
        )?;
        if session_ttl_secs > MAX_SESSION_TTL_SECS {
            return Err(AppError::config(format!(
                "SESSION_TTL_SECS must be at most {MAX_SESSION_TTL_SECS}, got {session_ttl_secs}"
            )));
        }
        // 0 means tokens never expire on their own
        let session_ttl = (session_ttl_secs > 0).then(|| Duration::from_secs(session_ttl_secs));

        let tokeninfo_url =
            lookup("IDENTITY_TOKENINFO_URL").unwrap_or_else(|| DEFAULT_TOKENINFO_URL.to_string());
        if !(tokeninfo_url.starts_with("https://") || tokeninfo_url.starts_with("http://")) {
            return Err(AppError::config(format!(
                "IDENTITY_TOKENINFO_URL must be an http(s) URL, got '{tokeninfo_url}'"
            )));
        }

        let client_id = lookup("IDENTITY_CLIENT_ID").filter(|id| !id.trim().is_empty());

        let timeout_secs = parse_u64(
            &lookup,
            "IDENTITY_TIMEOUT_SECS",
            DEFAULT_IDENTITY_TIMEOUT_SECS,
        )?;
        if timeout_secs == 0 {
            return Err(AppError::config(
                "IDENTITY_TIMEOUT_SECS must be greater than zero",
            ));
        }

        Ok(Config {
            host,
            port,
            jwt_secret,
            session_ttl,
            identity: IdentityProviderConfig {
                tokeninfo_url,
                client_id,
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}

fn parse_u64<F>(lookup: &F, name: &str, default: u64) -> Result<u64, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
            AppError::config(format!("{name} must be a non-negative integer, got '{raw}'"))
        }),
    }
}
