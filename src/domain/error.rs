//! Domain Layer - Errors
//!
//! Error kinds shared by the store contract and the board session.
//! Serializable so they can cross an IPC or HTTP boundary as data.

use serde::{Deserialize, Serialize};

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors
///
/// The board session handles all three variants the same way for
/// mutating operations (notice + full reload); the distinction exists
/// for callers that want to report more precisely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomainError {
    /// Connectivity or backend failure, assumed transient
    Store(String),
    /// Rejected input (e.g. empty name)
    Validation(String),
    /// Stale or unknown identifier
    NotFound(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainError::Store(msg) => write!(f, "Store error: {}", msg),
            DomainError::Validation(msg) => write!(f, "Invalid input: {}", msg),
            DomainError::NotFound(msg) => write!(f, "Not found: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}
