//! Event Store Errors
//!
//! Error types for event store operations.

/// Errors that can occur in the event store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventStoreError {
    /// Store reached its configured capacity
    #[error("Event store capacity of {capacity} events exceeded")]
    CapacityExceeded { capacity: usize },
}
