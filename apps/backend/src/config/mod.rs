//! Process configuration loaded once at startup.

pub mod app;

pub use app::{Config, IdentityProviderConfig};
