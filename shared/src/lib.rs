//! Shared configuration types for the AuthZ guard
//!
//! This crate provides the configuration surface used across the core and
//! infrastructure layers: key store location, revocation sweep cadence, and
//! event channel names.

pub mod config;

// Re-export commonly used items at crate root
pub use config::{AuthzConfig, EventChannelsConfig, KeyStoreConfig, RevocationConfig};
