//! Command definitions
//!
//! Commands represent intentions to change the system state.

use serde::{Deserialize, Serialize};

use crate::domain::ViewerEvent;

/// Command to ingest one viewer event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackEventCommand {
    pub event: ViewerEvent,
}

impl TrackEventCommand {
    pub fn new(event: ViewerEvent) -> Self {
        Self { event }
    }
}

/// Outcome of a track command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackEventResult {
    /// 1-based position of the event in the store
    pub event_id: u64,
    /// Whether background work was queued for the event
    pub background_queued: bool,
}
