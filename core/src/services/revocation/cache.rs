//! Concurrent in-memory store of revoked token identifiers.
//!
//! Revocation state is process-memory only: it is rebuilt from broadcast
//! events and never reconciled from durable storage. Entries carry the
//! token's natural expiry so the cache never outgrows the set of tokens that
//! could still be presented.

use chrono::Utc;
use dashmap::DashMap;

use crate::domain::entities::revocation::RevokedToken;

/// Revoked-token store with a secondary per-subject index.
///
/// Both structures are sharded maps safe for unbounded concurrent readers;
/// writers never hold a lock across more than a single entry.
#[derive(Default)]
pub struct RevocationCache {
    /// token_id → expiry (unix seconds)
    revoked: DashMap<String, i64>,
    /// subject_id → tokens revoked with subject attribution
    by_subject: DashMap<String, Vec<RevokedToken>>,
}

impl RevocationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `token_id` revoked until `expires_at`.
    ///
    /// Idempotent; re-adding an existing id overwrites the expiry (last write
    /// wins - revocation expiries are monotonic in practice).
    pub fn add(&self, token_id: &str, expires_at: i64) {
        self.revoked.insert(token_id.to_string(), expires_at);
    }

    /// Mark `token_id` revoked and record it under `subject_id` so that
    /// subject-wide operations can find it later.
    ///
    /// A duplicate token_id for the same subject leaves the index unchanged.
    pub fn add_for_subject(&self, token_id: &str, expires_at: i64, subject_id: &str) {
        self.add(token_id, expires_at);

        let mut tokens = self.by_subject.entry(subject_id.to_string()).or_default();
        if !tokens.iter().any(|t| t.token_id == token_id) {
            tokens.push(RevokedToken::new(token_id, expires_at));
        }
    }

    /// Whether `token_id` is currently revoked.
    ///
    /// An entry whose expiry has passed reads as not-revoked even before the
    /// sweep physically removes it, so sweep staleness never affects
    /// correctness.
    pub fn is_revoked(&self, token_id: &str) -> bool {
        self.is_revoked_at(token_id, Utc::now().timestamp())
    }

    /// [`is_revoked`](Self::is_revoked) against an explicit clock
    pub fn is_revoked_at(&self, token_id: &str, now: i64) -> bool {
        self.revoked
            .get(token_id)
            .map(|entry| now < *entry.value())
            .unwrap_or(false)
    }

    /// Snapshot copy of the tokens recorded for `subject_id`
    pub fn tokens_for_subject(&self, subject_id: &str) -> Vec<RevokedToken> {
        self.by_subject
            .get(subject_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Drain the subject's index entry, revoking every drained token in the
    /// flat map. Returns the drained tokens.
    pub fn revoke_subject(&self, subject_id: &str) -> Vec<RevokedToken> {
        let Some((_, tokens)) = self.by_subject.remove(subject_id) else {
            return Vec::new();
        };
        for token in &tokens {
            self.add(&token.token_id, token.expires_at);
        }
        tokens
    }

    /// Remove every entry whose expiry is at or before `now`, from both the
    /// flat map and the subject index. A subject whose token list empties is
    /// removed entirely.
    ///
    /// Traversal is shard-by-shard, so readers are never blocked for the
    /// duration of a full scan. Returns the number of flat entries removed.
    pub fn sweep(&self, now: i64) -> usize {
        let before = self.revoked.len();
        self.revoked.retain(|_, expires_at| *expires_at > now);

        self.by_subject.retain(|_, tokens| {
            tokens.retain(|t| t.expires_at > now);
            !tokens.is_empty()
        });

        before.saturating_sub(self.revoked.len())
    }

    /// Number of revocation entries currently held (expired-but-unswept
    /// entries included)
    pub fn len(&self) -> usize {
        self.revoked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.revoked.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    #[test]
    fn added_token_is_revoked_until_expiry() {
        let cache = RevocationCache::new();
        cache.add("jti-1", NOW + 60);

        assert!(cache.is_revoked_at("jti-1", NOW));
        assert!(cache.is_revoked_at("jti-1", NOW + 59));
        // At and after the expiry instant the entry reads as not-revoked,
        // sweep or no sweep.
        assert!(!cache.is_revoked_at("jti-1", NOW + 60));
        assert!(!cache.is_revoked_at("jti-1", NOW + 61));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn unknown_token_is_not_revoked() {
        let cache = RevocationCache::new();
        assert!(!cache.is_revoked_at("never-seen", NOW));
    }

    #[test]
    fn add_is_idempotent() {
        let cache = RevocationCache::new();
        cache.add("jti-1", NOW + 60);
        cache.add("jti-1", NOW + 60);

        assert_eq!(cache.len(), 1);
        assert!(cache.is_revoked_at("jti-1", NOW));
    }

    #[test]
    fn add_last_write_wins_on_expiry() {
        let cache = RevocationCache::new();
        cache.add("jti-1", NOW + 60);
        cache.add("jti-1", NOW + 120);

        assert!(cache.is_revoked_at("jti-1", NOW + 90));
    }

    #[test]
    fn add_for_subject_populates_both_structures() {
        let cache = RevocationCache::new();
        cache.add_for_subject("jti-1", NOW + 60, "user-42");
        cache.add_for_subject("jti-1", NOW + 60, "user-42");

        assert!(cache.is_revoked_at("jti-1", NOW));
        let tokens = cache.tokens_for_subject("user-42");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0], RevokedToken::new("jti-1", NOW + 60));
    }

    #[test]
    fn tokens_for_subject_returns_a_snapshot() {
        let cache = RevocationCache::new();
        cache.add_for_subject("jti-1", NOW + 60, "user-42");

        let snapshot = cache.tokens_for_subject("user-42");
        cache.add_for_subject("jti-2", NOW + 60, "user-42");

        assert_eq!(snapshot.len(), 1);
        assert_eq!(cache.tokens_for_subject("user-42").len(), 2);
    }

    #[test]
    fn revoke_subject_drains_index_and_blacklists_all() {
        let cache = RevocationCache::new();
        for i in 0..3 {
            cache.add_for_subject(&format!("jti-{i}"), NOW + 600, "user-42");
        }

        let drained = cache.revoke_subject("user-42");
        assert_eq!(drained.len(), 3);
        assert!(cache.tokens_for_subject("user-42").is_empty());
        for i in 0..3 {
            assert!(cache.is_revoked_at(&format!("jti-{i}"), NOW));
        }

        // Second drain is a no-op
        assert!(cache.revoke_subject("user-42").is_empty());
    }

    #[test]
    fn sweep_removes_exactly_the_expired_entries() {
        let cache = RevocationCache::new();
        cache.add("expired-a", NOW - 10);
        cache.add("expired-b", NOW); // expires_at <= now is gone too
        cache.add("live", NOW + 600);

        let removed = cache.sweep(NOW);
        assert_eq!(removed, 2);
        assert_eq!(cache.len(), 1);
        assert!(cache.is_revoked_at("live", NOW));
        assert!(!cache.is_revoked_at("expired-a", NOW));
    }

    #[test]
    fn sweep_prunes_subject_index_and_drops_empty_subjects() {
        let cache = RevocationCache::new();
        cache.add_for_subject("old-1", NOW - 10, "user-a");
        cache.add_for_subject("old-2", NOW - 5, "user-a");
        cache.add_for_subject("old-3", NOW - 5, "user-b");
        cache.add_for_subject("live-1", NOW + 600, "user-b");

        cache.sweep(NOW);

        // user-a emptied and was removed outright
        assert!(cache.tokens_for_subject("user-a").is_empty());
        let b_tokens = cache.tokens_for_subject("user-b");
        assert_eq!(b_tokens.len(), 1);
        assert_eq!(b_tokens[0].token_id, "live-1");
    }

    #[test]
    fn sweep_on_empty_cache_is_harmless() {
        let cache = RevocationCache::new();
        assert_eq!(cache.sweep(NOW), 0);
        assert!(cache.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_adds_and_sweeps_stay_consistent() {
        use std::sync::Arc;

        let cache = Arc::new(RevocationCache::new());
        let mut handles = Vec::new();

        for worker in 0..4 {
            let cache = Arc::clone(&cache);
            handles.push(tokio::spawn(async move {
                for i in 0..100 {
                    let id = format!("w{worker}-jti-{i}");
                    cache.add_for_subject(&id, NOW + 600, &format!("user-{worker}"));
                    assert!(cache.is_revoked_at(&id, NOW));
                    if i % 10 == 0 {
                        cache.sweep(NOW);
                    }
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // Nothing was expired, so every entry survived the interleaved sweeps
        assert_eq!(cache.len(), 400);
        for worker in 0..4 {
            assert_eq!(cache.tokens_for_subject(&format!("user-{worker}")).len(), 100);
        }
    }
}
