//! Integration tests for the event store, cache staleness and background work

use std::sync::Arc;
use std::time::Duration;

use tokio_test::assert_ok;

use video_analytics::aggregate::Aggregator;
use video_analytics::event_store::EventStore;
use video_analytics::projection::AnalyticsCache;
use video_analytics::ViewerAction;

mod common;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_appends_get_unique_positions() {
    let store = EventStore::new();
    let mut handles = Vec::new();

    for task in 0..8u64 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            let mut positions = Vec::new();
            for i in 0..250u32 {
                let event = common::event(task, &format!("u{}", i), ViewerAction::Interact, 12, 0);
                positions.push(store.record(event).await.unwrap());
            }
            positions
        }));
    }

    let mut positions = Vec::new();
    for handle in handles {
        positions.extend(handle.await.unwrap());
    }
    positions.sort_unstable();

    let expected: Vec<u64> = (1..=2000).collect();
    assert_eq!(positions, expected);
    assert_eq!(store.len().await, 2000);
    assert_eq!(store.events_for(3).await.len(), 250);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_aggregations_same_video() {
    let store = EventStore::new();
    let cache = AnalyticsCache::new();
    let aggregator = Arc::new(Aggregator::new(store.clone(), cache.clone()));
    store
        .record(common::event(1, "u", ViewerAction::Join, 8, 0))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..16 {
        let aggregator = Arc::clone(&aggregator);
        handles.push(tokio::spawn(async move { aggregator.aggregate(1).await }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap().peak_hour, "8:00");
    }

    assert_eq!(cache.len().await, 1);
    assert_eq!(cache.get(1).await.unwrap().peak_hour, "8:00");
}

#[tokio::test]
async fn test_cache_staleness_on_write() {
    let store = EventStore::new();
    let cache = AnalyticsCache::new();
    let aggregator = Aggregator::new(store.clone(), cache.clone());

    store.record(common::event(1, "a", ViewerAction::Join, 3, 0)).await.unwrap();
    let before = aggregator.aggregate(1).await;

    store.record(common::event(1, "b", ViewerAction::Join, 5, 0)).await.unwrap();
    store.record(common::event(1, "c", ViewerAction::Join, 5, 1)).await.unwrap();

    assert_eq!(cache.get(1).await.as_ref(), Some(&before));
    assert_eq!(before.peak_hour, "3:00");

    let after = aggregator.aggregate(1).await;
    assert_eq!(after.peak_hour, "5:00");
    assert_eq!(cache.get(1).await, Some(after));
}

#[tokio::test]
async fn test_background_work_sees_stored_event() {
    let (state, _) = common::setup_app(&common::test_config());
    let handler = video_analytics::handlers::TrackEventHandler::new(&state);

    let result = assert_ok!(
        handler
            .execute(video_analytics::handlers::TrackEventCommand::new(common::event(
                4,
                "u",
                ViewerAction::Interact,
                18,
                0
            )))
            .await
    );
    assert_eq!(result.event_id, 1);

    tokio::time::timeout(Duration::from_secs(5), async {
        while state.processor.activity(4).await.interactions == 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("background work did not run");

    assert_eq!(state.store.events_for(4).await.len(), 1);
    state.shutdown().await;
}
