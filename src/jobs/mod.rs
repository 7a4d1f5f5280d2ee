//! Batch Jobs
//!
//! Unattended aggregation sweeps over a bounded set of video ids.
//! A sweep can be triggered on demand or run periodically by the scheduler.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::interval;

use crate::aggregate::Aggregator;

// =========================================================================
// Batch Job Runner
// =========================================================================

/// Which video ids a sweep visits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepMode {
    /// Ids `1..=n`, independent of what the store holds
    Fixed(u64),
    /// Distinct ids currently present in the event store
    StoreVideos,
}

impl Default for SweepMode {
    fn default() -> Self {
        Self::Fixed(100)
    }
}

/// Configuration for batch sweeps
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Ids to sweep (default: fixed 100)
    pub sweep: SweepMode,
    /// Cooperative pause between iterations (default: 10ms)
    pub pause: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            sweep: SweepMode::default(),
            pause: Duration::from_millis(10),
        }
    }
}

/// Lifecycle of the batch runner: `Idle -> Running -> Completed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Idle,
    Running,
    Completed,
}

/// Terminal status reported by a finished sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Completed,
}

/// Summary of one sweep
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub status: JobStatus,
    pub videos_processed: u64,
    /// Completion time
    pub timestamp: DateTime<Utc>,
    pub started_at: DateTime<Utc>,
}

/// Drives the aggregator over many video ids without client interaction
#[derive(Debug)]
pub struct BatchJobRunner {
    aggregator: Aggregator,
    config: BatchConfig,
    state: Mutex<JobState>,
}

impl BatchJobRunner {
    /// Create a runner with default configuration
    pub fn new(aggregator: Aggregator) -> Self {
        Self::with_config(aggregator, BatchConfig::default())
    }

    /// Create with custom configuration
    pub fn with_config(aggregator: Aggregator, config: BatchConfig) -> Self {
        Self {
            aggregator,
            config,
            state: Mutex::new(JobState::Idle),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> JobState {
        *lock_state(&self.state)
    }

    /// Run one sweep to completion
    ///
    /// Rejects a second sweep while one is in progress. Every iteration is
    /// an aggregation, which cannot fail, so a sweep that is polled to the end
    /// always completes. Dropping the future mid-sweep puts the runner back
    /// to `Idle`.
    pub async fn run(&self) -> Result<BatchReport, JobError> {
        let mut guard = RunGuard::acquire(&self.state)?;

        let started_at = Utc::now();
        let (total, video_ids) = self.sweep().await;
        tracing::info!(videos = total, "Starting batch analytics job");

        let mut videos_processed = 0u64;
        for video_id in video_ids {
            if videos_processed > 0 {
                self.pause().await;
            }
            self.aggregator.aggregate(video_id).await;
            videos_processed += 1;
        }

        guard.complete();

        let report = BatchReport {
            status: JobStatus::Completed,
            videos_processed,
            timestamp: Utc::now(),
            started_at,
        };

        tracing::info!(
            videos_processed,
            duration_ms = (report.timestamp - started_at).num_milliseconds(),
            "Batch analytics completed"
        );

        Ok(report)
    }

    /// Ids to visit, with their count. Fixed sweeps are generated lazily.
    async fn sweep(&self) -> (u64, Box<dyn Iterator<Item = u64> + Send>) {
        match self.config.sweep {
            SweepMode::Fixed(count) => (count, Box::new(1..=count)),
            SweepMode::StoreVideos => {
                let ids = self.aggregator.store().video_ids().await;
                (ids.len() as u64, Box::new(ids.into_iter()))
            }
        }
    }

    async fn pause(&self) {
        if self.config.pause.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.config.pause).await;
        }
    }
}

fn lock_state(state: &Mutex<JobState>) -> MutexGuard<'_, JobState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Holds the runner in `Running` for the lifetime of one sweep
///
/// Dropped without `complete()` (the sweep future was cancelled), it
/// returns the runner to `Idle`.
struct RunGuard<'a> {
    state: &'a Mutex<JobState>,
    completed: bool,
}

impl<'a> RunGuard<'a> {
    fn acquire(state: &'a Mutex<JobState>) -> Result<Self, JobError> {
        let mut current = lock_state(state);
        if *current == JobState::Running {
            return Err(JobError::AlreadyRunning);
        }
        *current = JobState::Running;
        Ok(Self {
            state,
            completed: false,
        })
    }

    fn complete(&mut self) {
        *lock_state(self.state) = JobState::Completed;
        self.completed = true;
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        if !self.completed {
            tracing::warn!("Batch sweep cancelled before completion");
            *lock_state(self.state) = JobState::Idle;
        }
    }
}

// =========================================================================
// Job Scheduler
// =========================================================================

/// Runs batch sweeps on a fixed interval
pub struct JobScheduler {
    runner: Arc<BatchJobRunner>,
    period: Duration,
}

impl JobScheduler {
    /// Create a scheduler for a shared runner
    pub fn new(runner: Arc<BatchJobRunner>, period: Duration) -> Self {
        Self { runner, period }
    }

    /// Start the job scheduler in the background
    /// Returns a handle that can be used to abort the scheduler
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    /// Run the scheduler loop
    async fn run(&self) {
        tracing::info!(period_secs = self.period.as_secs(), "Job scheduler started");

        let mut ticker = interval(self.period);
        // The first tick fires immediately; sweeps start one period after boot
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match self.runner.run().await {
                Ok(report) => {
                    tracing::debug!(videos_processed = report.videos_processed, "Scheduled sweep finished");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Scheduled sweep skipped");
                }
            }
        }
    }
}

/// Job execution errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobError {
    #[error("A batch job is already running")]
    AlreadyRunning,
}

// =========================================================================
// Tests
// =========================================================================
