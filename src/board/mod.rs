//! Board Layer
//!
//! The ordered collection, drag gesture resolution and the sync
//! session that ties local mutation to the store.

mod collection;
mod drag;
mod session;

pub use collection::ClientCollection;
pub use drag::{drop_before, CardRect};
pub use session::{BoardSession, Command, LOAD_FAILURE_NOTICE, SYNC_FAILURE_NOTICE};
