//! Role-based access control policy services

pub mod cache;

pub use cache::{PolicyCache, PolicySnapshot};
