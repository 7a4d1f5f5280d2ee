//! Background Processor Errors

/// Errors returned when handing an event to the background processor
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProcessorError {
    /// Queue is at capacity; the event was not queued
    #[error("Background queue full (capacity {capacity})")]
    QueueFull { capacity: usize },

    /// Workers have shut down
    #[error("Background processor is shut down")]
    Closed,
}
