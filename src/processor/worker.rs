//! Background Worker Pool
//!
//! Fire-and-forget processing of ingested events.
//! Work is observational: it maintains per-video activity counters and raises
//! interaction alerts, and never mutates the event store. Failures are logged
//! and counted, never retried.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;

use crate::domain::{ViewerAction, ViewerEvent};

use super::ProcessorError;

/// Configuration for the background processor
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Number of worker tasks (default: 4)
    pub workers: usize,
    /// Bounded queue capacity (default: 1024)
    pub queue_capacity: usize,
    /// Simulated I/O wait per event (default: 100ms)
    pub simulated_latency: Duration,
    /// Alert every N interactions on one video; 0 disables (default: 100)
    pub alert_interaction_threshold: u64,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            queue_capacity: 1024,
            simulated_latency: Duration::from_millis(100),
            alert_interaction_threshold: 100,
        }
    }
}

/// Live activity counters for one video
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VideoActivity {
    pub joins: u64,
    pub leaves: u64,
    pub interactions: u64,
}

impl VideoActivity {
    fn record(&mut self, action: ViewerAction) {
        match action {
            ViewerAction::Join => self.joins += 1,
            ViewerAction::Leave => self.leaves += 1,
            ViewerAction::Interact => self.interactions += 1,
        }
    }
}

/// Processor counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProcessorStats {
    /// Events accepted onto the queue
    pub submitted: u64,
    /// Events whose background work finished
    pub processed: u64,
    /// Events refused because the queue was full or closed
    pub rejected: u64,
}

#[derive(Debug, Default)]
struct Counters {
    submitted: AtomicU64,
    processed: AtomicU64,
    rejected: AtomicU64,
}

#[derive(Debug)]
struct Shared {
    config: ProcessorConfig,
    counters: Counters,
    activity: RwLock<HashMap<u64, VideoActivity>>,
}

impl Shared {
    async fn process(&self, worker_id: usize, event: ViewerEvent) {
        tracing::debug!(
            worker_id,
            video_id = event.video_id,
            action = %event.action,
            "Processing event"
        );

        if !self.config.simulated_latency.is_zero() {
            tokio::time::sleep(self.config.simulated_latency).await;
        }

        let interactions = {
            let mut activity = self.activity.write().await;
            let entry = activity.entry(event.video_id).or_default();
            entry.record(event.action);
            entry.interactions
        };

        let threshold = self.config.alert_interaction_threshold;
        if event.action == ViewerAction::Interact && threshold > 0 && interactions % threshold == 0 {
            tracing::warn!(
                video_id = event.video_id,
                interactions,
                "Interaction alert threshold reached"
            );
        }

        self.counters.processed.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(worker_id, video_id = event.video_id, "Event processed");
    }
}

/// Bounded queue plus fixed worker pool
#[derive(Debug)]
pub struct BackgroundProcessor {
    sender: mpsc::Sender<ViewerEvent>,
    shared: Arc<Shared>,
    shutdown_tx: watch::Sender<bool>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl BackgroundProcessor {
    /// Spawn the worker pool; must be called inside a Tokio runtime
    pub fn start(config: ProcessorConfig) -> Self {
        let worker_count = config.workers.max(1);
        let capacity = config.queue_capacity.max(1);

        let (sender, receiver) = mpsc::channel(capacity);
        let receiver = Arc::new(Mutex::new(receiver));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let shared = Arc::new(Shared {
            config,
            counters: Counters::default(),
            activity: RwLock::new(HashMap::new()),
        });

        let workers = (0..worker_count)
            .map(|worker_id| {
                tokio::spawn(run_worker(
                    worker_id,
                    Arc::clone(&receiver),
                    Arc::clone(&shared),
                    shutdown_rx.clone(),
                ))
            })
            .collect();

        tracing::info!(workers = worker_count, capacity, "Background processor started");

        Self {
            sender,
            shared,
            shutdown_tx,
            workers: Mutex::new(workers),
        }
    }

    /// Queue an event without waiting for its work to run
    pub fn submit(&self, event: ViewerEvent) -> Result<(), ProcessorError> {
        match self.sender.try_send(event) {
            Ok(()) => {
                self.shared.counters.submitted.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(TrySendError::Full(event)) => {
                self.shared.counters.rejected.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(video_id = event.video_id, "Background queue full, dropping event");
                Err(ProcessorError::QueueFull {
                    capacity: self.sender.max_capacity(),
                })
            }
            Err(TrySendError::Closed(_)) => {
                self.shared.counters.rejected.fetch_add(1, Ordering::Relaxed);
                Err(ProcessorError::Closed)
            }
        }
    }

    /// Snapshot of the processor counters
    pub fn stats(&self) -> ProcessorStats {
        let counters = &self.shared.counters;
        ProcessorStats {
            submitted: counters.submitted.load(Ordering::Relaxed),
            processed: counters.processed.load(Ordering::Relaxed),
            rejected: counters.rejected.load(Ordering::Relaxed),
        }
    }

    /// Activity counters for a video (zero when nothing was processed)
    pub async fn activity(&self, video_id: u64) -> VideoActivity {
        self.shared
            .activity
            .read()
            .await
            .get(&video_id)
            .copied()
            .unwrap_or_default()
    }

    /// Stop all workers and wait for them to exit
    ///
    /// Events still queued are dropped.
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);

        let handles = std::mem::take(&mut *self.workers.lock().await);
        for handle in handles {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Background worker panicked");
            }
        }

        tracing::info!(stats = ?self.stats(), "Background processor stopped");
    }
}

async fn run_worker(
    worker_id: usize,
    receiver: Arc<Mutex<mpsc::Receiver<ViewerEvent>>>,
    shared: Arc<Shared>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        if *shutdown.borrow() {
            break;
        }

        let next = {
            let mut receiver = receiver.lock().await;
            tokio::select! {
                event = receiver.recv() => event,
                _ = shutdown.changed() => None,
            }
        };

        match next {
            Some(event) => shared.process(worker_id, event).await,
            None => break,
        }
    }

    tracing::debug!(worker_id, "Background worker stopped");
}
