//! Video Analytics
//!
//! Derived, recomputable summary of a video's event history.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Peak hour label used when a video has no events
pub const NO_PEAK_HOUR: &str = "N/A";

/// Demographic bucket label -> percentage of viewers
pub type Demographics = BTreeMap<String, u32>;

/// Aggregated analytics for one video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoAnalytics {
    pub video_id: u64,
    pub title: String,
    /// Mean session length in seconds
    pub avg_watch_time: f64,
    /// Percentage of viewers retained past the watch threshold (0-100)
    pub retention_rate: f64,
    /// Interaction intensity (0-100)
    pub engagement_score: f64,
    pub viewer_demographics: Demographics,
    /// `"{hour}:00"` in UTC, or `"N/A"` when there is no data
    pub peak_hour: String,
}

impl VideoAnalytics {
    /// The zero-valued record returned for a video with no events
    pub fn empty(video_id: u64) -> Self {
        Self {
            video_id,
            title: Self::title_for(video_id),
            avg_watch_time: 0.0,
            retention_rate: 0.0,
            engagement_score: 0.0,
            viewer_demographics: Demographics::new(),
            peak_hour: NO_PEAK_HOUR.to_string(),
        }
    }

    /// Display title, derived from the id until a catalogue exists
    pub fn title_for(video_id: u64) -> String {
        format!("Video {}", video_id)
    }

    /// Format an hour bucket as a peak hour label
    pub fn peak_hour_label(hour: u32) -> String {
        format!("{}:00", hour)
    }

    /// Whether this record was computed from at least one event
    pub fn has_data(&self) -> bool {
        self.peak_hour != NO_PEAK_HOUR
    }
}
