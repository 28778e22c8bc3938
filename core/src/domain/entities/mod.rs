//! Domain entities

pub mod claims;
pub mod rbac;
pub mod revocation;

pub use claims::Claims;
pub use rbac::{Permission, Role};
pub use revocation::RevokedToken;
