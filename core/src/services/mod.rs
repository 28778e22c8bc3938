//! Business services layer

pub mod auth_service;
pub mod events;
pub mod policy;
pub mod revocation;
pub mod token;

#[cfg(test)]
pub(crate) mod testing;

// Re-export services
pub use auth_service::AuthService;
pub use events::{EventBridge, MessageBroker};
pub use policy::{PolicyCache, PolicySnapshot};
pub use revocation::{spawn_sweeper, RevocationCache};
pub use token::{KeyResolver, TokenVerifier};
