//! Error type definitions for token verification, policy checks, and event
//! propagation. The presentation layer maps these to wire responses; this
//! crate only defines the taxonomy.

use thiserror::Error;

/// Token verification and revocation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Malformed token")]
    MalformedToken,

    #[error("No verification key found for kid '{kid}'")]
    KeyNotFound { kid: String },

    #[error("Key material for kid '{kid}' is not a usable public key")]
    KeyMalformed { kid: String },

    #[error("Token signature verification failed")]
    InvalidSignature,

    #[error("Token expired")]
    TokenExpired,

    #[error("Token not yet valid")]
    TokenNotYetValid,

    #[error("Token revoked")]
    TokenRevoked,
}

/// Policy cache and permission check errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// The role/permission repository could not be reached during a reload.
    /// The previous snapshot stays in place.
    #[error("Role repository unavailable: {message}")]
    RepositoryUnavailable { message: String },

    /// Caller-level denial, derived from a false permission check.
    #[error("Role '{role}' does not grant permission '{permission}'")]
    PermissionDenied { role: String, permission: String },
}

/// Message broker errors. Publish failures are absorbed at the event bridge
/// boundary; local cache state remains authoritative for the local instance.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BrokerError {
    #[error("Message broker unavailable: {message}")]
    Unavailable { message: String },
}
