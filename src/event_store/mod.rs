//! Event Store module
//!
//! Append-only, in-memory storage for viewer events.
//! Events live for the lifetime of the owning service instance.

mod error;
mod repository;

pub use error::EventStoreError;
pub use repository::{EventStore, StoredEvent};
