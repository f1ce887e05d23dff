//! Leadboard Core
//!
//! Ordered-collection and optimistic-synchronization engine for a
//! kanban pipeline board. Layered architecture:
//! - domain: entities, stage flow, position key arithmetic
//! - store: the authoritative store contract and implementations
//! - board: ordered collection, drag resolution, sync session
//!
//! Rendering, forms and authentication live in the caller; they talk
//! to the engine through [`board::BoardSession`] commands and views.

pub mod board;
pub mod domain;
pub mod store;

pub use board::{BoardSession, CardRect, ClientCollection, Command};
pub use domain::{Client, ClientPatch, DomainError, DomainResult, NewClient, Stage};
pub use store::{ClientStore, MemoryStore, RestConfig, RestStore, SqliteStore};
