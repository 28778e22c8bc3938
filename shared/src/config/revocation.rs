//! Revocation cache configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for the in-memory revocation cache.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RevocationConfig {
    /// Interval between expired-entry sweep passes, in seconds
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl RevocationConfig {
    /// Sweep interval as a [`Duration`]
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Default for RevocationConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

fn default_sweep_interval_secs() -> u64 {
    300
}
