//! Message broker adapters

pub mod memory;

pub use memory::InMemoryBroker;
