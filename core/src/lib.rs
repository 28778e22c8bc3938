//! # AuthZ Core
//!
//! Core authorization logic for the guard service. This crate contains the
//! domain entities, the error taxonomy, the collaborator ports (key source,
//! role repository, message broker), and the services that make up the guard:
//! token verification, the revocation cache, the policy cache, and the event
//! bridge that keeps independent instances eventually consistent.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::{AuthzEvent, Claims, Permission, RevokedToken, Role};
pub use errors::*;
pub use repositories::*;
pub use services::*;
