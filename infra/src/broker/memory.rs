//! In-memory fanout broker.
//!
//! Stands in for the external fanout exchange in tests and single-host
//! deployments: every subscriber of a channel receives every message
//! published to it. Delivery is lossy for subscribers that stop draining
//! their queue, mirroring how a real broker sheds slow consumers.

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::warn;

use async_trait::async_trait;

use authz_core::errors::DomainResult;
use authz_core::services::MessageBroker;

const SUBSCRIBER_QUEUE_DEPTH: usize = 256;

/// Process-local fanout broker keyed by channel name.
#[derive(Default)]
pub struct InMemoryBroker {
    subscribers: DashMap<String, Vec<mpsc::Sender<Vec<u8>>>>,
}

impl InMemoryBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live subscriptions on `channel`
    pub fn subscriber_count(&self, channel: &str) -> usize {
        self.subscribers
            .get(channel)
            .map(|subs| subs.iter().filter(|tx| !tx.is_closed()).count())
            .unwrap_or(0)
    }
}

#[async_trait]
impl MessageBroker for InMemoryBroker {
    async fn publish(&self, channel: &str, payload: Vec<u8>) -> DomainResult<()> {
        let Some(mut subs) = self.subscribers.get_mut(channel) else {
            // Fanout with no subscribers delivers to no one
            return Ok(());
        };

        subs.retain(|tx| !tx.is_closed());
        for tx in subs.iter() {
            if tx.try_send(payload.clone()).is_err() {
                warn!(channel, "dropping message for saturated subscriber");
            }
        }
        Ok(())
    }

    async fn subscribe(&self, channel: &str) -> DomainResult<mpsc::Receiver<Vec<u8>>> {
        let (tx, rx) = mpsc::channel(SUBSCRIBER_QUEUE_DEPTH);
        self.subscribers
            .entry(channel.to_string())
            .or_default()
            .push(tx);
        Ok(rx)
    }
}
