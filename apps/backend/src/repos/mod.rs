//! Repository traits for domain layer.

pub mod profile_pins;

pub use profile_pins::{InMemoryProfilePins, ProfileKey, ProfilePinRepo};
