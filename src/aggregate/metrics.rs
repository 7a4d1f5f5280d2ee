//! Engagement Metrics
//!
//! Pure reducers over a single video's events (already filtered, in store order).

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::domain::{ViewerAction, ViewerEvent};

const HOURS_PER_DAY: usize = 24;

/// Watch-time derived metrics for one video
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EngagementMetrics {
    pub avg_watch_time: f64,
    pub retention_rate: f64,
    pub engagement_score: f64,
}

/// Completed session lengths in seconds, per user
///
/// A `join` opens a session and a repeated `join` while open is ignored.
/// A `leave` closes the open session; without one it is ignored.
/// Sessions left open are closed at that user's latest event.
pub fn session_durations<'a, E>(events: &'a [E]) -> HashMap<&'a str, Vec<f64>>
where
    E: AsRef<ViewerEvent>,
{
    let mut open: HashMap<&str, DateTime<Utc>> = HashMap::new();
    let mut last_seen: HashMap<&str, DateTime<Utc>> = HashMap::new();
    let mut sessions: HashMap<&str, Vec<f64>> = HashMap::new();

    for event in events {
        let event = event.as_ref();
        let user = event.user_id.as_str();

        let seen = last_seen.entry(user).or_insert(event.timestamp);
        if event.timestamp > *seen {
            *seen = event.timestamp;
        }

        match event.action {
            ViewerAction::Join => {
                open.entry(user).or_insert(event.timestamp);
            }
            ViewerAction::Leave => {
                if let Some(start) = open.remove(user) {
                    sessions
                        .entry(user)
                        .or_default()
                        .push(duration_secs(start, event.timestamp));
                }
            }
            ViewerAction::Interact => {}
        }
    }

    for (user, start) in open {
        let end = last_seen.get(user).copied().unwrap_or(start);
        sessions.entry(user).or_default().push(duration_secs(start, end));
    }

    sessions
}

fn duration_secs(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_milliseconds().max(0) as f64 / 1000.0
}

/// Mean session length in seconds
pub fn avg_watch_time(sessions: &HashMap<&str, Vec<f64>>) -> f64 {
    let (total, count) = sessions
        .values()
        .flatten()
        .fold((0.0, 0usize), |(total, count), d| (total + d, count + 1));

    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

/// Percentage of session-holding users whose total watch time reaches `threshold_secs`
pub fn retention_rate(sessions: &HashMap<&str, Vec<f64>>, threshold_secs: f64) -> f64 {
    if sessions.is_empty() {
        return 0.0;
    }

    let retained = sessions
        .values()
        .filter(|durations| durations.iter().sum::<f64>() >= threshold_secs)
        .count();

    retained as f64 * 100.0 / sessions.len() as f64
}

/// Interactions per watched minute, scaled so `target_per_minute` scores 100
pub fn engagement_score(interactions: usize, total_watch_secs: f64, target_per_minute: f64) -> f64 {
    if total_watch_secs <= 0.0 || target_per_minute <= 0.0 {
        return 0.0;
    }

    let per_minute = interactions as f64 / (total_watch_secs / 60.0);
    (per_minute * 100.0 / target_per_minute).min(100.0)
}

/// UTC hour with the most events; ties go to the lowest hour
pub fn peak_hour<E>(events: &[E]) -> Option<u32>
where
    E: AsRef<ViewerEvent>,
{
    if events.is_empty() {
        return None;
    }

    let mut counts = [0usize; HOURS_PER_DAY];
    for event in events {
        counts[event.as_ref().hour() as usize] += 1;
    }

    let mut best = 0;
    for hour in 1..HOURS_PER_DAY {
        if counts[hour] > counts[best] {
            best = hour;
        }
    }

    Some(best as u32)
}

/// Compute watch-time metrics for one video's events
pub fn compute<E>(events: &[E], retention_threshold_secs: f64, target_per_minute: f64) -> EngagementMetrics
where
    E: AsRef<ViewerEvent>,
{
    let sessions = session_durations(events);
    let total_watch: f64 = sessions.values().flatten().sum();
    let interactions = events
        .iter()
        .filter(|e| e.as_ref().action == ViewerAction::Interact)
        .count();

    EngagementMetrics {
        avg_watch_time: round2(avg_watch_time(&sessions)),
        retention_rate: round2(retention_rate(&sessions, retention_threshold_secs)),
        engagement_score: round2(engagement_score(interactions, total_watch, target_per_minute)),
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
