//! Cross-instance event propagation

pub mod bridge;
pub mod broker;

pub use bridge::EventBridge;
pub use broker::MessageBroker;
