//! Query Handler
//!
//! Read-side operations: on-demand analytics, cached analytics and
//! service-wide counters.

use std::sync::Arc;

use serde::Serialize;

use crate::aggregate::Aggregator;
use crate::domain::VideoAnalytics;
use crate::error::{AppError, AppResult};
use crate::jobs::{BatchJobRunner, JobState};
use crate::processor::{BackgroundProcessor, ProcessorStats};
use crate::state::AppState;

/// Service-wide counters
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStats {
    pub total_events: usize,
    pub distinct_videos: usize,
    /// Configured event limit, `None` when unbounded
    pub store_capacity: Option<usize>,
    pub cached_videos: usize,
    pub total_watch_time: f64,
    pub avg_retention: f64,
    pub processor: ProcessorStats,
    pub batch_state: JobState,
}

/// Handler for analytics reads
pub struct AnalyticsQueryHandler {
    aggregator: Aggregator,
    processor: Arc<BackgroundProcessor>,
    batch: Arc<BatchJobRunner>,
}

impl AnalyticsQueryHandler {
    pub fn new(state: &AppState) -> Self {
        Self {
            aggregator: state.aggregator.clone(),
            processor: Arc::clone(&state.processor),
            batch: Arc::clone(&state.batch),
        }
    }

    /// Recompute analytics for a video (refreshes the cache)
    pub async fn video_analytics(&self, video_id: u64) -> VideoAnalytics {
        self.aggregator.aggregate(video_id).await
    }

    /// Last computed analytics, without recomputing
    pub async fn cached_analytics(&self, video_id: u64) -> AppResult<VideoAnalytics> {
        self.aggregator
            .cache()
            .get(video_id)
            .await
            .ok_or(AppError::NotCached(video_id))
    }

    /// Snapshot of service counters
    pub async fn stats(&self) -> ServiceStats {
        let store = self.aggregator.store();
        let cached = self.aggregator.cache().summary().await;

        ServiceStats {
            total_events: store.len().await,
            distinct_videos: store.video_ids().await.len(),
            store_capacity: store.capacity_limit(),
            cached_videos: cached.cached_videos,
            total_watch_time: cached.total_watch_time,
            avg_retention: cached.avg_retention,
            processor: self.processor.stats(),
            batch_state: self.batch.state(),
        }
    }
}
