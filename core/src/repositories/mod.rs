//! Collaborator ports consumed by the core.
//!
//! Each external dependency is expressed as a narrow capability trait; the
//! concrete adapters live in the infrastructure layer.

pub mod key_source;
pub mod role_repository;

pub use key_source::KeySource;
pub use role_repository::RoleRepository;
