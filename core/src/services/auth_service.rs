//! Authorization guard orchestrating verification, revocation, and
//! permission checks per request.

use std::sync::Arc;

use tracing::info;

use crate::domain::entities::claims::Claims;
use crate::errors::{DomainResult, TokenError};
use crate::repositories::{KeySource, RoleRepository};
use crate::services::events::bridge::EventBridge;
use crate::services::events::broker::MessageBroker;
use crate::services::policy::cache::PolicyCache;
use crate::services::revocation::cache::RevocationCache;
use crate::services::token::verifier::TokenVerifier;

/// Per-request entry point for the (external) request layer.
///
/// Signature and revocation checks are independently toggled per call, so
/// callers can run blacklist-only checks where a full verification is not
/// wanted (e.g. logout of an already-discarded token).
pub struct AuthService<K, R, B>
where
    K: KeySource,
    R: RoleRepository,
    B: MessageBroker,
{
    verifier: TokenVerifier<K>,
    revocations: Arc<RevocationCache>,
    policy: Arc<PolicyCache<R>>,
    events: Arc<EventBridge<B>>,
}

impl<K, R, B> AuthService<K, R, B>
where
    K: KeySource,
    R: RoleRepository,
    B: MessageBroker,
{
    pub fn new(
        verifier: TokenVerifier<K>,
        revocations: Arc<RevocationCache>,
        policy: Arc<PolicyCache<R>>,
        events: Arc<EventBridge<B>>,
    ) -> Self {
        Self {
            verifier,
            revocations,
            policy,
            events,
        }
    }

    /// Validate a token under the given flags and produce its claims.
    ///
    /// With `check_signature` a verification failure is fatal; without it the
    /// failure is tolerated and claims are extracted best-effort from the
    /// unverified payload (callers opt into the weaker guarantee
    /// deliberately). With `check_revocation` the token's revocation key -
    /// its `jti`, or the raw token when no `jti` is present - is looked up in
    /// the revocation cache and a hit is rejected regardless of signature
    /// validity.
    pub async fn authorize(
        &self,
        token: &str,
        check_signature: bool,
        check_revocation: bool,
    ) -> DomainResult<Claims> {
        let claims = match self.verifier.parse_and_verify(token).await {
            Ok(claims) => claims,
            Err(err) if check_signature => return Err(err),
            Err(_) => TokenVerifier::<K>::decode_unverified(token)?,
        };

        if check_revocation && self.revocations.is_revoked(claims.revocation_key(token)) {
            return Err(TokenError::TokenRevoked.into());
        }

        Ok(claims)
    }

    /// Case-insensitive permission check against the current policy snapshot
    pub fn check_permission(&self, role: &str, permission: &str) -> bool {
        self.policy.has_permission(role, permission)
    }

    /// Revoke a single token locally and broadcast the revocation.
    pub async fn revoke(&self, token_id: &str, expires_at: i64) {
        self.revocations.add(token_id, expires_at);
        info!(token_id, "token revoked");
        self.events.publish_token_revoked(token_id, expires_at).await;
    }

    /// Revoke a single token with subject attribution, so subject-wide
    /// operations can find it later, and broadcast the revocation.
    pub async fn revoke_for_subject(&self, token_id: &str, expires_at: i64, subject_id: &str) {
        self.revocations
            .add_for_subject(token_id, expires_at, subject_id);
        info!(token_id, subject_id, "token revoked for subject");
        self.events.publish_token_revoked(token_id, expires_at).await;
    }

    /// Revoke every token recorded for `subject_id`, broadcast the bulk
    /// revocation, and return how many tokens were affected locally.
    pub async fn revoke_all_for_subject(&self, subject_id: &str) -> usize {
        let drained = self.revocations.revoke_subject(subject_id);
        info!(subject_id, revoked = drained.len(), "subject tokens revoked");
        self.events.publish_subject_revoked(subject_id).await;
        drained.len()
    }

    /// Snapshot of the tokens currently recorded for `subject_id`
    pub fn all_tokens_for_subject(
        &self,
        subject_id: &str,
    ) -> Vec<crate::domain::entities::revocation::RevokedToken> {
        self.revocations.tokens_for_subject(subject_id)
    }

    /// The revocation cache this guard mutates, for wiring the sweeper and
    /// event consumers
    pub fn revocations(&self) -> &Arc<RevocationCache> {
        &self.revocations
    }

    /// The policy cache this guard queries
    pub fn policy(&self) -> &Arc<PolicyCache<R>> {
        &self.policy
    }
}
