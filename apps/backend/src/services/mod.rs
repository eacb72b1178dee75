pub mod credentials;
pub mod profile_pins;

pub use credentials::{CredentialService, IssuedSession};
