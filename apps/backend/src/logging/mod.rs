//! Structured security logging and PII redaction.

pub mod pii;
pub mod security;
