//! Load Testing Tool
//!
//! Run with: cargo run --bin load_test --release -- --events 10000 --tasks 8

use std::time::{Duration, Instant};

use chrono::{Duration as ChronoDuration, Utc};
use rand::Rng;

use video_analytics::handlers::{TrackEventCommand, TrackEventHandler};
use video_analytics::processor::ProcessorConfig;
use video_analytics::{AppState, Config, ViewerAction, ViewerEvent};

const VIDEOS: u64 = 50;
const USERS: u32 = 500;

#[derive(Debug, Default)]
struct IngestTally {
    recorded: u64,
    queued: u64,
    failed: u64,
}

fn arg(args: &[String], name: &str, default: u64) -> u64 {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn random_event(rng: &mut impl Rng) -> ViewerEvent {
    let action = match rng.gen_range(0..3) {
        0 => ViewerAction::Join,
        1 => ViewerAction::Leave,
        _ => ViewerAction::Interact,
    };
    let timestamp = Utc::now() - ChronoDuration::seconds(rng.gen_range(0..86_400));

    ViewerEvent::new(
        rng.gen_range(1..=VIDEOS),
        format!("user-{}", rng.gen_range(0..USERS)),
        action,
        timestamp,
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    let event_count = arg(&args, "--events", 10_000);
    let tasks = arg(&args, "--tasks", 8).max(1);

    println!("Load Test - Ingesting {} events from {} tasks", event_count, tasks);

    let config = Config {
        processor: ProcessorConfig {
            simulated_latency: Duration::ZERO,
            queue_capacity: 65_536,
            ..ProcessorConfig::default()
        },
        ..Config::default()
    };
    let state = AppState::new(&config);

    let start = Instant::now();
    let per_task = event_count / tasks;
    let mut handles = Vec::with_capacity(tasks as usize);

    for _ in 0..tasks {
        let handler = TrackEventHandler::new(&state);
        handles.push(tokio::spawn(async move {
            let mut tally = IngestTally::default();
            for _ in 0..per_task {
                let event = random_event(&mut rand::thread_rng());
                match handler.execute(TrackEventCommand::new(event)).await {
                    Ok(result) => {
                        tally.recorded += 1;
                        if result.background_queued {
                            tally.queued += 1;
                        }
                    }
                    Err(_) => tally.failed += 1,
                }
            }
            tally
        }));
    }

    let mut totals = IngestTally::default();
    for handle in handles {
        let tally = handle.await?;
        totals.recorded += tally.recorded;
        totals.queued += tally.queued;
        totals.failed += tally.failed;
    }
    let success_count = totals.recorded;

    let ingest_elapsed = start.elapsed();
    println!("\n=== Ingestion ===");
    println!("Events recorded: {}", totals.recorded);
    println!("Background queued: {}", totals.queued);
    println!("Failed: {}", totals.failed);
    println!("Duration: {:?}", ingest_elapsed);
    println!(
        "Throughput: {:.2} events/sec",
        success_count as f64 / ingest_elapsed.as_secs_f64()
    );

    let start = Instant::now();
    for video_id in 1..=VIDEOS {
        state.aggregator.aggregate(video_id).await;
    }
    let aggregate_elapsed = start.elapsed();

    println!("\n=== Aggregation ===");
    println!("Videos aggregated: {}", VIDEOS);
    println!("Duration: {:?}", aggregate_elapsed);
    println!(
        "Average per video: {:.3} ms",
        aggregate_elapsed.as_secs_f64() * 1000.0 / VIDEOS as f64
    );

    state.shutdown().await;
    println!("\nBackground stats: {:?}", state.processor.stats());

    Ok(())
}
