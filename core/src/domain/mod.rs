//! Domain layer - entities and event wire types

pub mod entities;
pub mod events;

pub use entities::*;
pub use events::AuthzEvent;
