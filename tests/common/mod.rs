//! Common test utilities

#![allow(dead_code)]

use std::time::Duration;

use axum::Router;
use chrono::{DateTime, TimeZone, Utc};

use video_analytics::jobs::{BatchConfig, SweepMode};
use video_analytics::processor::ProcessorConfig;
use video_analytics::{api, AppState, Config, ViewerAction, ViewerEvent};

/// Config tuned for tests: no simulated latency, small fixed sweep
pub fn test_config() -> Config {
    Config {
        processor: ProcessorConfig {
            simulated_latency: Duration::ZERO,
            ..ProcessorConfig::default()
        },
        batch: BatchConfig {
            sweep: SweepMode::Fixed(10),
            pause: Duration::from_millis(1),
        },
        ..Config::default()
    }
}

/// Fresh isolated state plus the router serving it
pub fn setup_app(config: &Config) -> (AppState, Router) {
    let state = AppState::new(config);
    let app = api::build_app(state.clone());
    (state, app)
}

pub fn at(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, hour, min, 0).unwrap()
}

pub fn event(video_id: u64, user: &str, action: ViewerAction, hour: u32, min: u32) -> ViewerEvent {
    ViewerEvent::new(video_id, user, action, at(hour, min))
}
