//! Domain-specific error types and error handling.

mod types;

// Re-export all error types
pub use types::{BrokerError, PolicyError, TokenError};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error(transparent)]
    Broker(#[from] BrokerError),
}

pub type DomainResult<T> = Result<T, DomainError>;
