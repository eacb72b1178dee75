//! Backend test support utilities
//!
//! Helpers shared by the backend's integration test binaries: logging
//! initialization, problem-details assertions and unique test identifiers.

pub mod logging;
pub mod problem_details;
pub mod unique_helpers;
