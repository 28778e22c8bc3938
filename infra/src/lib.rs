//! # AuthZ Infrastructure
//!
//! Adapters implementing the core's collaborator ports: a filesystem-backed
//! key source and an in-memory fanout broker.

pub mod broker;
pub mod keys;

pub use broker::InMemoryBroker;
pub use keys::FileKeySource;
