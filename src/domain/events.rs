//! Viewer Events
//!
//! Immutable records of what a viewer did to a video.
//! Events are created at ingestion and never mutated afterwards.

use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::DomainError;

/// Longest accepted `user_id`, in bytes
pub const MAX_USER_ID_LEN: usize = 256;

/// What the viewer did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewerAction {
    /// Viewer started watching
    Join,
    /// Viewer stopped watching
    Leave,
    /// Viewer interacted (like, comment, share...)
    Interact,
}

impl ViewerAction {
    /// Get the action as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewerAction::Join => "join",
            ViewerAction::Leave => "leave",
            ViewerAction::Interact => "interact",
        }
    }
}

impl std::fmt::Display for ViewerAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single engagement event for a video
///
/// Timestamps are normalised to UTC, so every hour-of-day computation is a
/// UTC hour. See [`deserialize_timestamp`] for the accepted input forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerEvent {
    pub video_id: u64,
    pub user_id: String,
    pub action: ViewerAction,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl ViewerEvent {
    pub fn new(
        video_id: u64,
        user_id: impl Into<String>,
        action: ViewerAction,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            video_id,
            user_id: user_id.into(),
            action,
            timestamp,
        }
    }

    /// UTC hour of day (0-23) the event happened in
    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }

    /// Boundary validation, run before the event reaches the store
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.user_id.trim().is_empty() {
            return Err(DomainError::InvalidEvent("user_id must not be empty".to_string()));
        }
        if self.user_id.len() > MAX_USER_ID_LEN {
            return Err(DomainError::InvalidEvent(format!(
                "user_id exceeds {} bytes",
                MAX_USER_ID_LEN
            )));
        }
        Ok(())
    }
}

// =========================================================================
// Timestamp parsing
// =========================================================================

/// Naive layouts, read as UTC wall-clock time
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Epoch values at or above this are milliseconds rather than seconds
const EPOCH_MILLIS_CUTOFF: i64 = 1_000_000_000_000;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    Integer(i64),
    Float(f64),
}

/// Accepts RFC 3339 with any offset, naive ISO-8601 with a `T` or a space
/// separator (taken as UTC), and epoch seconds as an integer or a float.
/// Integers of 13 or more digits are epoch milliseconds.
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::Text(s) => parse_timestamp(&s)
            .ok_or_else(|| D::Error::custom(format!("invalid timestamp: {s:?}"))),
        RawTimestamp::Integer(n) => {
            let parsed = if n.abs() < EPOCH_MILLIS_CUTOFF {
                DateTime::<Utc>::from_timestamp(n, 0)
            } else {
                DateTime::<Utc>::from_timestamp_millis(n)
            };
            parsed.ok_or_else(|| D::Error::custom("timestamp out of range"))
        }
        RawTimestamp::Float(secs) => from_fractional_secs(secs)
            .ok_or_else(|| D::Error::custom("timestamp out of range")),
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn from_fractional_secs(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::<Utc>::from_timestamp(whole as i64, nanos)
}

impl AsRef<ViewerEvent> for ViewerEvent {
    fn as_ref(&self) -> &ViewerEvent {
        self
    }
}
