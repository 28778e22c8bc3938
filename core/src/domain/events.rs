//! Wire events exchanged between instances over the fanout broker.

use serde::{Deserialize, Serialize};

/// Events broadcast to every running instance.
///
/// Delivery is at-least-once and unordered; every handler must therefore be
/// idempotent. Payloads with an unrecognized `event` discriminant fail to
/// decode and are dropped by the consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum AuthzEvent {
    /// A single token was revoked before its natural expiry
    #[serde(rename = "TOKEN_REVOKED")]
    TokenRevoked { token_id: String, exp: i64 },

    /// Every known token of one subject was revoked
    #[serde(rename = "TOKEN_REVOKED_ALL")]
    TokenRevokedAll { subject_id: String },

    /// The role/permission policy changed; rebuild the snapshot
    #[serde(rename = "POLICY_RELOAD")]
    PolicyReload,
}
