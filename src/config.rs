//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::aggregate::AggregatorConfig;
use crate::jobs::{BatchConfig, SweepMode};
use crate::processor::ProcessorConfig;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// Optional cap on stored events
    pub event_store_max_events: Option<usize>,

    /// Background worker pool
    pub processor: ProcessorConfig,

    /// Batch sweep settings
    pub batch: BatchConfig,

    /// Period for scheduled sweeps; `None` disables the scheduler
    pub batch_interval: Option<Duration>,

    /// Metric tuning
    pub aggregator: AggregatorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            environment: "development".to_string(),
            event_store_max_events: None,
            processor: ProcessorConfig::default(),
            batch: BatchConfig::default(),
            batch_interval: None,
            aggregator: AggregatorConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = env::var("HOST").unwrap_or(defaults.host);
        let port = parse_or("PORT", defaults.port)?;
        let environment = env::var("ENVIRONMENT").unwrap_or(defaults.environment);

        let event_store_max_events = parse_optional("EVENT_STORE_MAX_EVENTS")?;

        let processor = ProcessorConfig {
            workers: parse_or("PROCESSOR_WORKERS", defaults.processor.workers)?.max(1),
            queue_capacity: parse_or("PROCESSOR_QUEUE_CAPACITY", defaults.processor.queue_capacity)?
                .max(1),
            simulated_latency: Duration::from_millis(parse_or(
                "PROCESSOR_DELAY_MS",
                defaults.processor.simulated_latency.as_millis() as u64,
            )?),
            alert_interaction_threshold: parse_or(
                "ALERT_INTERACTION_THRESHOLD",
                defaults.processor.alert_interaction_threshold,
            )?,
        };

        let sweep_size = parse_or("BATCH_SWEEP_SIZE", 100u64)?;
        let sweep = match env::var("BATCH_SWEEP_MODE").as_deref() {
            Err(_) | Ok("fixed") => SweepMode::Fixed(sweep_size),
            Ok("store") => SweepMode::StoreVideos,
            Ok(_) => return Err(ConfigError::InvalidValue("BATCH_SWEEP_MODE")),
        };
        let batch = BatchConfig {
            sweep,
            pause: Duration::from_millis(parse_or(
                "BATCH_PAUSE_MS",
                defaults.batch.pause.as_millis() as u64,
            )?),
        };

        let batch_interval = parse_optional::<u64>("BATCH_INTERVAL_SECS")?
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        let aggregator = AggregatorConfig {
            retention_threshold: Duration::from_secs(parse_or(
                "RETENTION_THRESHOLD_SECS",
                defaults.aggregator.retention_threshold.as_secs(),
            )?),
            engagement_target_per_minute: parse_or(
                "ENGAGEMENT_TARGET_PER_MINUTE",
                defaults.aggregator.engagement_target_per_minute,
            )?,
        };

        Ok(Self {
            host,
            port,
            environment,
            event_store_max_events,
            processor,
            batch,
            batch_interval,
            aggregator,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn parse_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    Ok(parse_optional(name)?.unwrap_or(default))
}

fn parse_optional<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(name)),
        Err(_) => Ok(None),
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
