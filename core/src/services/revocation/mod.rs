//! Token revocation services

pub mod cache;
pub mod sweeper;

pub use cache::RevocationCache;
pub use sweeper::spawn_sweeper;
