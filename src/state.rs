//! Service state
//!
//! Owns one instance of every core component. Handlers receive it by handle,
//! so independent instances never share events or cached analytics.

use std::sync::Arc;

use crate::aggregate::Aggregator;
use crate::config::Config;
use crate::event_store::EventStore;
use crate::jobs::BatchJobRunner;
use crate::processor::BackgroundProcessor;
use crate::projection::AnalyticsCache;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: EventStore,
    pub cache: AnalyticsCache,
    pub aggregator: Aggregator,
    pub processor: Arc<BackgroundProcessor>,
    pub batch: Arc<BatchJobRunner>,
}

impl AppState {
    /// Build the components from configuration and start the worker pool
    ///
    /// Must be called inside a Tokio runtime.
    pub fn new(config: &Config) -> Self {
        let store = match config.event_store_max_events {
            Some(max_events) => EventStore::with_capacity_limit(max_events),
            None => EventStore::new(),
        };
        let cache = AnalyticsCache::new();
        let aggregator =
            Aggregator::with_config(store.clone(), cache.clone(), config.aggregator.clone());
        let processor = Arc::new(BackgroundProcessor::start(config.processor.clone()));
        let batch = Arc::new(BatchJobRunner::with_config(
            aggregator.clone(),
            config.batch.clone(),
        ));

        Self {
            store,
            cache,
            aggregator,
            processor,
            batch,
        }
    }

    /// Stop background work
    pub async fn shutdown(&self) {
        self.processor.shutdown().await;
    }
}
