//! Domain-specific error types following panic-free policy.

use thiserror::Error;

/// Errors that can occur in domain operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Source address is not a dotted-quad IPv4 address
    #[error("Invalid source address '{address}' for session {key}")]
    InvalidAddress { key: String, address: String },

    /// Client identifier is not a 5-10 digit number
    #[error("Invalid client id '{client_id}' for session {key}")]
    InvalidClientId { key: String, client_id: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
