use tracing::warn;

use crate::trace_ctx;

/// Log a security-relevant login failure event.
///
/// Neither the presented token nor the provider's answer is logged.
pub fn login_failed(reason: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_LOGIN_FAILED",
        %trace_id,
        reason,
        "Authentication failure"
    );
}

/// Log a rejected profile PIN attempt.
pub fn pin_rejected(profile_id: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_PIN_REJECTED",
        %trace_id,
        profile_id,
        "Profile PIN mismatch"
    );
}
