//! Message broker port.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::errors::DomainResult;

/// Fanout-style publish/subscribe transport.
///
/// Delivery semantics are assumed at-least-once, unordered across consumers,
/// and possibly duplicated; the consuming side is responsible for idempotent
/// handling. Every subscriber of a channel receives every message published
/// to it.
#[async_trait]
pub trait MessageBroker: Send + Sync {
    /// Publish `payload` to every current subscriber of `channel`
    async fn publish(&self, channel: &str, payload: Vec<u8>) -> DomainResult<()>;

    /// Open a subscription on `channel`. Messages arrive on the returned
    /// receiver until the broker is dropped or the subscriber lags too far
    /// behind.
    async fn subscribe(&self, channel: &str) -> DomainResult<mpsc::Receiver<Vec<u8>>>;
}
