//! Key source port for verification key material.

use async_trait::async_trait;

use crate::errors::DomainResult;

/// Source of PEM-encoded public key material, keyed by the `kid` carried in a
/// token header.
///
/// Absence of a key is a normal, expected outcome (an unknown or rotated-out
/// `kid`), so it is modeled as `Ok(None)` rather than an error. Errors are
/// reserved for faults in the source itself.
#[async_trait]
pub trait KeySource: Send + Sync {
    /// Read the raw PEM bytes for `kid`, or `None` when the source has no
    /// material for that identifier.
    async fn read_key_material(&self, kid: &str) -> DomainResult<Option<Vec<u8>>>;
}
