//! Event channel configuration

use serde::{Deserialize, Serialize};

/// Names of the fanout channels used to propagate state changes between
/// running instances.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EventChannelsConfig {
    /// Channel carrying token revocation events
    #[serde(default = "default_revocation_channel")]
    pub revocation_channel: String,

    /// Channel carrying policy reload signals
    #[serde(default = "default_policy_channel")]
    pub policy_channel: String,
}

impl Default for EventChannelsConfig {
    fn default() -> Self {
        Self {
            revocation_channel: default_revocation_channel(),
            policy_channel: default_policy_channel(),
        }
    }
}

fn default_revocation_channel() -> String {
    String::from("auth.tokens.fanout")
}

fn default_policy_channel() -> String {
    String::from("rbac.update.fanout")
}
