//! Bridge between the local caches and the fanout broker.
//!
//! Outbound: state changes made locally are broadcast so every other instance
//! applies the same mutation. Inbound: one consumer loop per logical channel
//! decodes events and dispatches them to the revocation or policy cache.
//! Broker unavailability is never allowed to fail a request - the local cache
//! was already updated, so local correctness does not depend on the publish.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::events::AuthzEvent;
use crate::errors::DomainResult;
use crate::repositories::RoleRepository;
use crate::services::events::broker::MessageBroker;
use crate::services::policy::cache::PolicyCache;
use crate::services::revocation::cache::RevocationCache;

use authz_shared::EventChannelsConfig;

/// Publishes and consumes revocation and policy-reload events.
pub struct EventBridge<B: MessageBroker> {
    broker: Arc<B>,
    channels: EventChannelsConfig,
}

impl<B: MessageBroker> EventBridge<B> {
    pub fn new(broker: Arc<B>, channels: EventChannelsConfig) -> Self {
        Self { broker, channels }
    }

    /// Broadcast a single-token revocation. Best-effort: a broker failure is
    /// logged and swallowed.
    pub async fn publish_token_revoked(&self, token_id: &str, exp: i64) {
        let event = AuthzEvent::TokenRevoked {
            token_id: token_id.to_string(),
            exp,
        };
        self.publish(&self.channels.revocation_channel, &event).await;
    }

    /// Broadcast a subject-wide revocation. Best-effort.
    pub async fn publish_subject_revoked(&self, subject_id: &str) {
        let event = AuthzEvent::TokenRevokedAll {
            subject_id: subject_id.to_string(),
        };
        self.publish(&self.channels.revocation_channel, &event).await;
    }

    /// Broadcast a policy reload signal. Best-effort.
    pub async fn publish_policy_reload(&self) {
        self.publish(&self.channels.policy_channel, &AuthzEvent::PolicyReload)
            .await;
    }

    async fn publish(&self, channel: &str, event: &AuthzEvent) {
        let payload = match serde_json::to_vec(event) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(channel, error = %err, "failed to encode event");
                return;
            }
        };

        match self.broker.publish(channel, payload).await {
            Ok(()) => debug!(channel, ?event, "event published"),
            Err(err) => {
                warn!(channel, error = %err, "event publish failed; local state remains authoritative");
            }
        }
    }

    /// Start one consumer task per logical channel.
    ///
    /// Each task decodes incoming payloads and applies them to the caches;
    /// undecodable or unknown messages are dropped and logged. Tasks exit
    /// when `shutdown` fires or the broker closes the subscription.
    pub async fn spawn_consumers<R>(
        &self,
        revocations: Arc<RevocationCache>,
        policy: Arc<PolicyCache<R>>,
        shutdown: watch::Receiver<bool>,
    ) -> DomainResult<Vec<JoinHandle<()>>>
    where
        R: RoleRepository + 'static,
    {
        let mut handles = Vec::with_capacity(2);

        for channel in [
            self.channels.revocation_channel.clone(),
            self.channels.policy_channel.clone(),
        ] {
            let rx = self.broker.subscribe(&channel).await?;
            handles.push(tokio::spawn(consume(
                channel,
                rx,
                Arc::clone(&revocations),
                Arc::clone(&policy),
                shutdown.clone(),
            )));
        }

        Ok(handles)
    }
}

async fn consume<R: RoleRepository>(
    channel: String,
    mut rx: mpsc::Receiver<Vec<u8>>,
    revocations: Arc<RevocationCache>,
    policy: Arc<PolicyCache<R>>,
    mut shutdown: watch::Receiver<bool>,
) {
    info!(channel, "event consumer started");
    loop {
        tokio::select! {
            _ = shutdown.changed() => {
                info!(channel, "event consumer shutting down");
                break;
            }
            message = rx.recv() => match message {
                Some(payload) => dispatch(&channel, &payload, &revocations, &policy).await,
                None => {
                    warn!(channel, "event subscription closed");
                    break;
                }
            },
        }
    }
}

/// Decode one payload and apply it. All handlers are idempotent, so duplicate
/// or out-of-order delivery is harmless.
async fn dispatch<R: RoleRepository>(
    channel: &str,
    payload: &[u8],
    revocations: &RevocationCache,
    policy: &PolicyCache<R>,
) {
    let event: AuthzEvent = match serde_json::from_slice(payload) {
        Ok(event) => event,
        Err(err) => {
            warn!(channel, error = %err, "dropping undecodable event");
            return;
        }
    };

    match event {
        AuthzEvent::TokenRevoked { token_id, exp } => {
            revocations.add(&token_id, exp);
            debug!(channel, token_id, "applied token revocation event");
        }
        AuthzEvent::TokenRevokedAll { subject_id } => {
            let drained = revocations.revoke_subject(&subject_id);
            debug!(
                channel,
                subject_id,
                revoked = drained.len(),
                "applied subject revocation event"
            );
        }
        AuthzEvent::PolicyReload => {
            if let Err(err) = policy.reload().await {
                warn!(channel, error = %err, "policy reload failed; keeping previous snapshot");
            }
        }
    }
}
