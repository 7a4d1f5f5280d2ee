//! Aggregator
//!
//! Filters the event store for one video and reduces the result into
//! `VideoAnalytics`, then memoizes it in the analytics cache.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::VideoAnalytics;
use crate::event_store::{EventStore, StoredEvent};
use crate::projection::AnalyticsCache;

use super::demographics::{DemographicsSource, StaticDemographics};
use super::metrics;

/// Tuning for the watch-time metrics
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Watch time a user needs to count as retained (default: 30 seconds)
    pub retention_threshold: Duration,
    /// Interactions per watched minute that score 100 (default: 1.0)
    pub engagement_target_per_minute: f64,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            retention_threshold: Duration::from_secs(30),
            engagement_target_per_minute: 1.0,
        }
    }
}

/// Computes per-video analytics from the event store
#[derive(Debug, Clone)]
pub struct Aggregator {
    store: EventStore,
    cache: AnalyticsCache,
    demographics: Arc<dyn DemographicsSource>,
    config: AggregatorConfig,
}

impl Aggregator {
    /// Create an aggregator with default configuration and static demographics
    pub fn new(store: EventStore, cache: AnalyticsCache) -> Self {
        Self::with_config(store, cache, AggregatorConfig::default())
    }

    /// Create with custom configuration
    pub fn with_config(store: EventStore, cache: AnalyticsCache, config: AggregatorConfig) -> Self {
        Self {
            store,
            cache,
            demographics: Arc::new(StaticDemographics::default()),
            config,
        }
    }

    /// Replace the demographics source
    pub fn with_demographics(mut self, source: Arc<dyn DemographicsSource>) -> Self {
        self.demographics = source;
        self
    }

    /// Aggregate analytics for a video and cache the result
    ///
    /// Never fails: a video without events yields `VideoAnalytics::empty`.
    pub async fn aggregate(&self, video_id: u64) -> VideoAnalytics {
        let events = self.store.events_for(video_id).await;
        let analytics = self.compute(video_id, &events);

        tracing::debug!(
            video_id,
            events = events.len(),
            peak_hour = %analytics.peak_hour,
            "Analytics aggregated"
        );

        self.cache.put(video_id, analytics.clone()).await;
        analytics
    }

    /// Reduce already-filtered events without touching the store or cache
    pub fn compute(&self, video_id: u64, events: &[StoredEvent]) -> VideoAnalytics {
        let Some(peak) = metrics::peak_hour(events) else {
            return VideoAnalytics::empty(video_id);
        };

        let engagement = metrics::compute(
            events,
            self.config.retention_threshold.as_secs_f64(),
            self.config.engagement_target_per_minute,
        );

        VideoAnalytics {
            video_id,
            title: VideoAnalytics::title_for(video_id),
            avg_watch_time: engagement.avg_watch_time,
            retention_rate: engagement.retention_rate,
            engagement_score: engagement.engagement_score,
            viewer_demographics: self.demographics.demographics(video_id),
            peak_hour: VideoAnalytics::peak_hour_label(peak),
        }
    }

    /// The cache this aggregator writes to
    pub fn cache(&self) -> &AnalyticsCache {
        &self.cache
    }

    /// The store this aggregator reads from
    pub fn store(&self) -> &EventStore {
        &self.store
    }
}
