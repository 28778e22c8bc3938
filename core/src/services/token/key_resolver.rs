//! Read-through cache mapping key identifiers to verification keys.

use std::sync::Arc;

use dashmap::DashMap;
use jsonwebtoken::DecodingKey;
use tracing::debug;

use crate::errors::{DomainResult, TokenError};
use crate::repositories::KeySource;

/// Resolves a `kid` to a parsed RSA public key.
///
/// Parsed keys are cached for the process lifetime; key rotation adds new
/// identifiers rather than changing existing material. Failed lookups are not
/// cached, so a key that appears in the source later is picked up on the next
/// request.
pub struct KeyResolver<K: KeySource> {
    source: K,
    cache: DashMap<String, Arc<DecodingKey>>,
}

impl<K: KeySource> KeyResolver<K> {
    /// Creates a resolver over the given key source
    pub fn new(source: K) -> Self {
        Self {
            source,
            cache: DashMap::new(),
        }
    }

    /// Resolve `kid` to a verification key, reading through to the source on
    /// a cache miss.
    ///
    /// # Errors
    ///
    /// * `TokenError::KeyNotFound` - the source has no material for `kid`
    /// * `TokenError::KeyMalformed` - the material is not a usable public key
    pub async fn resolve(&self, kid: &str) -> DomainResult<Arc<DecodingKey>> {
        if let Some(cached) = self.cache.get(kid) {
            return Ok(Arc::clone(cached.value()));
        }

        let pem = self
            .source
            .read_key_material(kid)
            .await?
            .ok_or_else(|| TokenError::KeyNotFound {
                kid: kid.to_string(),
            })?;

        let key = DecodingKey::from_rsa_pem(&pem).map_err(|_| TokenError::KeyMalformed {
            kid: kid.to_string(),
        })?;
        let key = Arc::new(key);

        // Concurrent misses for the same kid may race; the insert is
        // idempotent, last write wins.
        self.cache.insert(kid.to_string(), Arc::clone(&key));
        debug!(kid, "verification key cached");

        Ok(key)
    }

    #[cfg(test)]
    fn cached_keys(&self) -> usize {
        self.cache.len()
    }
}
