//! Track Handler
//!
//! Ingests viewer events: validate, append, then hand off to background work.

use std::sync::Arc;

use crate::error::AppResult;
use crate::event_store::EventStore;
use crate::processor::BackgroundProcessor;
use crate::state::AppState;

use super::{TrackEventCommand, TrackEventResult};

/// Handler for event ingestion
pub struct TrackEventHandler {
    store: EventStore,
    processor: Arc<BackgroundProcessor>,
}

impl TrackEventHandler {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            processor: Arc::clone(&state.processor),
        }
    }

    /// Execute the track command
    ///
    /// The event is in the store before its background work is queued, and
    /// the result is returned without waiting for that work. A refused
    /// hand-off is logged and does not fail ingestion.
    pub async fn execute(&self, command: TrackEventCommand) -> AppResult<TrackEventResult> {
        let event = command.event;
        event.validate()?;

        let event_id = self.store.record(event.clone()).await?;

        let background_queued = match self.processor.submit(event) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(event_id, error = %e, "Background work not queued");
                false
            }
        };

        tracing::debug!(event_id, background_queued, "Event saved");

        Ok(TrackEventResult {
            event_id,
            background_queued,
        })
    }
}
