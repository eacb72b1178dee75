//! Per-request trace id, readable from anywhere on the request's task.
//!
//! `RequestTrace` opens the scope. Problem responses and security events
//! read it back. Work moved to another task (`tokio::spawn`,
//! `spawn_blocking`) falls outside the scope and reports [`UNKNOWN`].

use tokio::task_local;

/// Reported when no request scope is active.
pub const UNKNOWN: &str = "unknown";

task_local! {
    static TRACE_ID: String;
}

/// The current request's trace id, or [`UNKNOWN`].
pub fn trace_id() -> String {
    TRACE_ID
        .try_with(Clone::clone)
        .unwrap_or_else(|_| UNKNOWN.to_string())
}

/// Poll `future` with `trace_id` as the current trace id.
pub async fn scope<F>(trace_id: String, future: F) -> F::Output
where
    F: std::future::Future,
{
    TRACE_ID.scope(trace_id, future).await
}
