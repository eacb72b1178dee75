use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Centralized registry for PII redaction regex patterns.
///
/// This module contains all hardcoded regex patterns used for PII redaction,
/// with a single allow per pattern construction site. All patterns are known
/// to be valid and tested at compile time.
pub struct PiiRegexRegistry;

impl PiiRegexRegistry {
    /// Email pattern: matches standard email addresses
    /// SAFETY: This regex pattern is a vetted literal that compiles successfully
    pub fn email() -> &'static Regex {
        static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b").unwrap()
        });
        &EMAIL_REGEX
    }

    /// Session token pattern: three dot-separated base64url segments
    /// SAFETY: This regex pattern is a vetted literal that compiles successfully
    pub fn session_token() -> &'static Regex {
        static SESSION_TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"[A-Za-z0-9_-]{8,}\.[A-Za-z0-9_-]{8,}\.[A-Za-z0-9_-]{8,}").unwrap()
        });
        &SESSION_TOKEN_REGEX
    }

    /// Base64-like token pattern: standard or url-safe alphabet (≥16 chars)
    /// SAFETY: This regex pattern is a vetted literal that compiles successfully
    pub fn base64_token() -> &'static Regex {
        static BASE64_TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"[A-Za-z0-9+/_-]{16,}={0,2}").unwrap()
        });
        &BASE64_TOKEN_REGEX
    }

    /// Hex token pattern: matches hexadecimal tokens (≥16 chars)
    /// SAFETY: This regex pattern is a vetted literal that compiles successfully
    pub fn hex_token() -> &'static Regex {
        static HEX_TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"\b[A-Fa-f0-9]{16,}\b").unwrap()
        });
        &HEX_TOKEN_REGEX
    }
}

/// Redacts sensitive information from a string.
///
/// This function conservatively masks:
/// - Emails: keeps first character of local part, replaces rest with ***, keeps full domain
/// - Session tokens: replaces whole `header.payload.signature` runs with [REDACTED_TOKEN]
/// - Opaque tokens: replaces base64-like or hex runs (≥16 chars) with [REDACTED_TOKEN]
///
/// Order: emails first, then session tokens, then loose tokens.
pub fn redact(input: &str) -> String {
    // First redact emails
    let email_redacted = PiiRegexRegistry::email().replace_all(input, |caps: &regex::Captures| {
        let full_match = &caps[0];
        if let Some(at_pos) = full_match.find('@') {
            let local_part = &full_match[..at_pos];
            let domain = &full_match[at_pos..];

            if local_part.is_empty() {
                // Edge case: no local part, just return the domain
                domain.to_string()
            } else {
                // Keep first char, replace rest with ***, keep full domain
                let first_char = &local_part[..1];
                format!("{first_char}***{domain}")
            }
        } else {
            // Fallback: shouldn't happen with proper email regex
            full_match.to_string()
        }
    });

    let session_redacted =
        PiiRegexRegistry::session_token().replace_all(&email_redacted, "[REDACTED_TOKEN]");

    // Then redact base64-like tokens
    let base64_redacted =
        PiiRegexRegistry::base64_token().replace_all(&session_redacted, "[REDACTED_TOKEN]");

    // Finally redact hex tokens
    PiiRegexRegistry::hex_token()
        .replace_all(&base64_redacted, "[REDACTED_TOKEN]")
        .to_string()
}

/// A wrapper that automatically redacts sensitive strings when displayed.
///
/// This provides ergonomic logging of sensitive data by automatically
/// applying PII redaction when the value is formatted for display.
pub struct Redacted<'a>(pub &'a str);

impl<'a> fmt::Display for Redacted<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", redact(self.0))
    }
}

impl<'a> fmt::Debug for Redacted<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", redact(self.0))
    }
}
