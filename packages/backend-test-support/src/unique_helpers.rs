//! Test helpers for generating unique test data
//!
//! ULID-based identifiers keep tests that share one in-memory store from
//! stepping on each other.

use ulid::Ulid;

/// Generate a unique string with the given prefix
///
/// # Examples
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// let id1 = unique_str("acct");
/// let id2 = unique_str("acct");
/// assert_ne!(id1, id2);
/// assert!(id1.starts_with("acct-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Generate a unique email address with the given prefix
///
/// # Examples
/// ```
/// use backend_test_support::unique_helpers::unique_email;
///
/// let email = unique_email("viewer");
/// assert!(email.ends_with("@example.test"));
/// assert!(email.starts_with("viewer-"));
/// ```
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.test", prefix, Ulid::new())
}

/// Generate a profile id that passes the backend's profile id rules
/// (`[A-Za-z0-9_-]`, at most 64 characters).
pub fn unique_profile_id() -> String {
    unique_str("profile").to_lowercase()
}
