//! Event Store Repository
//!
//! Ordered, append-only sequence of viewer events.
//! Appends are serialized by a write lock; readers clone a snapshot of
//! fully published events and never see a partially written record.

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::ViewerEvent;

use super::EventStoreError;

/// Event as held by the store
pub type StoredEvent = Arc<ViewerEvent>;

/// In-memory event store
///
/// Cloning yields another handle to the same underlying sequence.
#[derive(Debug, Clone)]
pub struct EventStore {
    events: Arc<RwLock<Vec<StoredEvent>>>,
    max_events: Option<usize>,
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EventStore {
    /// Create an unbounded event store
    pub fn new() -> Self {
        Self {
            events: Arc::new(RwLock::new(Vec::new())),
            max_events: None,
        }
    }

    /// Create an event store that rejects appends beyond `max_events`
    pub fn with_capacity_limit(max_events: usize) -> Self {
        Self {
            events: Arc::new(RwLock::new(Vec::new())),
            max_events: Some(max_events),
        }
    }

    /// Append an event and return its 1-based sequence position
    ///
    /// No deduplication: identical events are stored as separate entries.
    pub async fn record(&self, event: ViewerEvent) -> Result<u64, EventStoreError> {
        let event = Arc::new(event);
        let mut events = self.events.write().await;

        if let Some(capacity) = self.max_events {
            if events.len() >= capacity {
                tracing::warn!(capacity, "Event store full, rejecting event");
                return Err(EventStoreError::CapacityExceeded { capacity });
            }
        }

        events.push(event);
        Ok(events.len() as u64)
    }

    /// All events for a video, in insertion order
    pub async fn events_for(&self, video_id: u64) -> Vec<StoredEvent> {
        self.events
            .read()
            .await
            .iter()
            .filter(|e| e.video_id == video_id)
            .cloned()
            .collect()
    }

    /// Distinct video ids present in the store, ascending
    pub async fn video_ids(&self) -> Vec<u64> {
        self.events
            .read()
            .await
            .iter()
            .map(|e| e.video_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Number of recorded events
    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Configured capacity, if any
    pub fn capacity_limit(&self) -> Option<usize> {
        self.max_events
    }
}
