//! Configuration module with business-specific sub-modules
//!
//! - `keys` - Public key store location for token verification
//! - `revocation` - Revocation cache sweep cadence
//! - `events` - Fanout channel names for cross-instance propagation

pub mod events;
pub mod keys;
pub mod revocation;

use serde::{Deserialize, Serialize};

pub use events::EventChannelsConfig;
pub use keys::KeyStoreConfig;
pub use revocation::RevocationConfig;

/// Complete guard configuration combining all sub-configurations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthzConfig {
    /// Public key store configuration
    #[serde(default)]
    pub keys: KeyStoreConfig,

    /// Revocation cache configuration
    #[serde(default)]
    pub revocation: RevocationConfig,

    /// Event channel configuration
    #[serde(default)]
    pub events: EventChannelsConfig,
}

impl AuthzConfig {
    /// Load configuration from an optional file plus `AUTHZ_*` environment
    /// variables (e.g. `AUTHZ_REVOCATION__SWEEP_INTERVAL_SECS=60`).
    ///
    /// Missing sources fall back to the defaults of each section.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder
            .add_source(config::Environment::with_prefix("AUTHZ").separator("__"))
            .build()?
            .try_deserialize()
    }
}
