//! Store Layer - Core Trait
//!
//! The contract the board requires from the authoritative store.
//! Implementations can use SQLite, HTTP, in-memory, etc.

use async_trait::async_trait;

use crate::domain::{Client, ClientPatch, DomainResult, NewClient};

/// Authoritative client store, addressed by identifier
///
/// All operations are async and each succeeds or fails atomically.
#[async_trait]
pub trait ClientStore: Send + Sync {
    /// All clients, sorted by position ascending, created_at descending
    async fn list(&self) -> DomainResult<Vec<Client>>;

    /// Create a client. The store assigns id, created_at and the
    /// initial position (board-wide max + step, or the first-stage key
    /// on an empty board).
    async fn insert(&self, fields: &NewClient) -> DomainResult<Client>;

    /// Partially update a client. `NotFound` when the id is unknown.
    async fn update(&self, id: &str, patch: &ClientPatch) -> DomainResult<()>;

    /// Delete a client. Deleting an absent id succeeds.
    async fn delete(&self, id: &str) -> DomainResult<()>;
}
