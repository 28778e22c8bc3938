//! Revocation cache entries.

use serde::{Deserialize, Serialize};

/// A revoked token identifier with its natural expiry.
///
/// Entries never outlive the token they revoke: once `expires_at` passes the
/// token would be rejected as expired anyway, so the sweep reclaims the entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevokedToken {
    /// The revocation key (normally the token's `jti` claim)
    pub token_id: String,

    /// Expiration timestamp (unix seconds)
    pub expires_at: i64,
}

impl RevokedToken {
    pub fn new(token_id: impl Into<String>, expires_at: i64) -> Self {
        Self {
            token_id: token_id.into(),
            expires_at,
        }
    }
}
