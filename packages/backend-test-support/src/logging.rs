//! Test logging shared by the backend's unit tests and integration binaries.
//!
//! `TEST_LOG` wins over `RUST_LOG`; with neither set only warnings are shown.
//! An invalid filter falls back to the default instead of failing the run.

use once_cell::sync::Lazy;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "warn";

static SUBSCRIBER: Lazy<()> = Lazy::new(|| {
    let directives = std::env::var("TEST_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| DEFAULT_FILTER.to_string());
    let filter =
        EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // A binary that installed its own capturing subscriber keeps it
    let _ = fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .without_time()
        .try_init();
});

/// Install the test subscriber. Safe to call from every test and ctor.
pub fn init() {
    Lazy::force(&SUBSCRIBER);
}
