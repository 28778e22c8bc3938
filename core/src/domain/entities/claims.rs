//! Principal claims carried by verified access tokens.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims structure for the JWT payload.
///
/// `sub` identifies the principal and may be absent for pure
/// service-to-service tokens; `role` drives permission checks; `jti` is the
/// canonical revocation key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (principal ID), optional
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Role name used for permission checks
    #[serde(default)]
    pub role: String,

    /// JWT ID (unique identifier for the token)
    #[serde(default)]
    pub jti: String,

    /// Expiration timestamp (unix seconds)
    pub exp: i64,

    /// Issued at timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Not before timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,

    /// Issuer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Audience
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

impl Claims {
    /// Creates new claims for a token expiring after `ttl_minutes`.
    ///
    /// A fresh `jti` is generated so the token can be individually revoked.
    pub fn new(subject: Option<String>, role: impl Into<String>, ttl_minutes: i64) -> Self {
        let now = Utc::now();
        let expiry = now + Duration::minutes(ttl_minutes);

        Self {
            sub: subject,
            role: role.into(),
            jti: Uuid::new_v4().to_string(),
            exp: expiry.timestamp(),
            iat: Some(now.timestamp()),
            nbf: None,
            iss: None,
            aud: None,
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// The key under which this token is looked up in the revocation cache:
    /// the `jti` claim, falling back to the raw token string when the claim
    /// is absent.
    pub fn revocation_key<'a>(&'a self, raw_token: &'a str) -> &'a str {
        if self.jti.is_empty() {
            raw_token
        } else {
            &self.jti
        }
    }
}
