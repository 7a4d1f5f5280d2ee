//! Handler tests
//!
//! Exercise the handlers against an isolated in-process `AppState`.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::{TimeZone, Utc};

    use crate::config::Config;
    use crate::domain::{DomainError, ViewerAction, ViewerEvent};
    use crate::error::AppError;
    use crate::event_store::EventStoreError;
    use crate::handlers::{AnalyticsQueryHandler, TrackEventCommand, TrackEventHandler};
    use crate::jobs::JobState;
    use crate::processor::ProcessorConfig;
    use crate::state::AppState;

    fn test_config() -> Config {
        Config {
            processor: ProcessorConfig {
                simulated_latency: Duration::ZERO,
                ..ProcessorConfig::default()
            },
            ..Config::default()
        }
    }

    fn ev(video_id: u64, user: &str, action: ViewerAction, hour: u32, min: u32) -> ViewerEvent {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, hour, min, 0).unwrap();
        ViewerEvent::new(video_id, user, action, ts)
    }

    // =========================================================================
    // Event tracking
    // =========================================================================

    #[tokio::test]
    async fn test_track_returns_sequential_ids() {
        let state = AppState::new(&test_config());
        let handler = TrackEventHandler::new(&state);

        for expected in 1..=3u64 {
            let result = handler
                .execute(TrackEventCommand::new(ev(1, "u1", ViewerAction::Join, 10, 0)))
                .await
                .unwrap();
            assert_eq!(result.event_id, expected);
            assert!(result.background_queued);
        }
    }

    #[tokio::test]
    async fn test_track_rejects_blank_user() {
        let state = AppState::new(&test_config());
        let handler = TrackEventHandler::new(&state);

        let err = handler
            .execute(TrackEventCommand::new(ev(1, "", ViewerAction::Join, 10, 0)))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Domain(DomainError::InvalidEvent(_))));
        assert!(state.store.is_empty().await);
    }

    #[tokio::test]
    async fn test_track_respects_store_capacity() {
        let state = AppState::new(&Config {
            event_store_max_events: Some(1),
            ..test_config()
        });
        let handler = TrackEventHandler::new(&state);

        handler
            .execute(TrackEventCommand::new(ev(1, "u1", ViewerAction::Join, 10, 0)))
            .await
            .unwrap();
        let err = handler
            .execute(TrackEventCommand::new(ev(1, "u1", ViewerAction::Leave, 10, 5)))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::EventStore(EventStoreError::CapacityExceeded { capacity: 1 })
        ));
        // Rejected events are never handed to background work
        assert_eq!(state.processor.stats().submitted, 1);
    }

    #[tokio::test]
    async fn test_track_succeeds_after_processor_shutdown() {
        let state = AppState::new(&test_config());
        let handler = TrackEventHandler::new(&state);
        state.shutdown().await;

        let result = handler
            .execute(TrackEventCommand::new(ev(1, "u1", ViewerAction::Join, 10, 0)))
            .await
            .unwrap();

        assert_eq!(result.event_id, 1);
        assert!(!result.background_queued);
    }

    // =========================================================================
    // Queries
    // =========================================================================

    #[tokio::test]
    async fn test_end_to_end_peak_hour() {
        let state = AppState::new(&test_config());
        let tracker = TrackEventHandler::new(&state);
        let queries = AnalyticsQueryHandler::new(&state);

        for event in [
            ev(1, "u1", ViewerAction::Join, 10, 0),
            ev(1, "u1", ViewerAction::Interact, 10, 15),
            ev(1, "u1", ViewerAction::Leave, 10, 30),
            ev(1, "u2", ViewerAction::Join, 14, 5),
        ] {
            tracker.execute(TrackEventCommand::new(event)).await.unwrap();
        }

        let analytics = queries.video_analytics(1).await;
        assert_eq!(analytics.peak_hour, "10:00");
        assert_eq!(queries.cached_analytics(1).await.unwrap(), analytics);
    }

    #[tokio::test]
    async fn test_cached_analytics_missing() {
        let state = AppState::new(&test_config());
        let queries = AnalyticsQueryHandler::new(&state);

        let err = queries.cached_analytics(7).await.unwrap_err();
        assert!(matches!(err, AppError::NotCached(7)));
    }

    #[tokio::test]
    async fn test_stats() {
        let state = AppState::new(&test_config());
        let tracker = TrackEventHandler::new(&state);
        let queries = AnalyticsQueryHandler::new(&state);

        for event in [
            ev(1, "u1", ViewerAction::Join, 10, 0),
            ev(1, "u1", ViewerAction::Leave, 10, 1),
            ev(2, "u1", ViewerAction::Join, 11, 0),
        ] {
            tracker.execute(TrackEventCommand::new(event)).await.unwrap();
        }
        queries.video_analytics(1).await;
        queries.video_analytics(2).await;
        queries.video_analytics(99).await;

        let stats = queries.stats().await;
        assert_eq!(stats.total_events, 3);
        assert_eq!(stats.distinct_videos, 2);
        assert_eq!(stats.store_capacity, None);
        assert_eq!(stats.cached_videos, 3);
        // Video 1 has one 60s session, video 2 a zero-length one; 99 has no data
        assert_eq!(stats.total_watch_time, 60.0);
        assert_eq!(stats.avg_retention, 50.0);
        assert_eq!(stats.processor.submitted, 3);
        assert_eq!(stats.batch_state, JobState::Idle);
    }

    #[tokio::test]
    async fn test_stats_reports_store_capacity() {
        let state = AppState::new(&Config {
            event_store_max_events: Some(500),
            ..test_config()
        });
        let queries = AnalyticsQueryHandler::new(&state);

        let stats = queries.stats().await;
        assert_eq!(stats.store_capacity, Some(500));
        assert_eq!(stats.total_watch_time, 0.0);
        assert_eq!(stats.avg_retention, 0.0);
    }
}
