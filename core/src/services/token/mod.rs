//! Token verification services

pub mod key_resolver;
pub mod verifier;

pub use key_resolver::KeyResolver;
pub use verifier::TokenVerifier;
