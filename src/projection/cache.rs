//! Analytics Cache
//!
//! Last computed `VideoAnalytics` per video id.
//! No expiry and no invalidation on new events: a cached value stays as is
//! until the next aggregation for the same id overwrites it.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::aggregate::metrics::round2;
use crate::domain::VideoAnalytics;

/// Totals across every cached record
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CacheSummary {
    pub cached_videos: usize,
    /// Sum of `avg_watch_time` over records with data
    pub total_watch_time: f64,
    /// Mean `retention_rate` over records with data
    pub avg_retention: f64,
}

/// Result cache keyed by video id
#[derive(Debug, Clone, Default)]
pub struct AnalyticsCache {
    entries: Arc<RwLock<HashMap<u64, VideoAnalytics>>>,
}

impl AnalyticsCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached analytics for a video, if it has ever been aggregated
    pub async fn get(&self, video_id: u64) -> Option<VideoAnalytics> {
        self.entries.read().await.get(&video_id).cloned()
    }

    /// Store analytics for a video, overwriting any previous entry
    ///
    /// Concurrent writers for the same id resolve by completion order.
    pub async fn put(&self, video_id: u64, analytics: VideoAnalytics) {
        let previous = self.entries.write().await.insert(video_id, analytics);

        tracing::debug!(
            video_id,
            replaced = previous.is_some(),
            "Analytics cached"
        );
    }

    /// Number of cached videos
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Watch time and retention totals, read under a single lock
    ///
    /// Zero records (videos without events) count towards `cached_videos`
    /// only.
    pub async fn summary(&self) -> CacheSummary {
        let entries = self.entries.read().await;

        let (total_watch_time, retention_sum, with_data) = entries
            .values()
            .filter(|a| a.has_data())
            .fold((0.0, 0.0, 0usize), |(watch, retention, n), a| {
                (watch + a.avg_watch_time, retention + a.retention_rate, n + 1)
            });

        CacheSummary {
            cached_videos: entries.len(),
            total_watch_time: round2(total_watch_time),
            avg_retention: if with_data == 0 {
                0.0
            } else {
                round2(retention_sum / with_data as f64)
            },
        }
    }
}
