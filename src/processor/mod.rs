//! Background Processor module
//!
//! Post-ingestion work that runs off the request path.
//! Events are queued on a bounded channel and consumed by a fixed worker pool.

mod error;
mod worker;

pub use error::ProcessorError;
pub use worker::{BackgroundProcessor, ProcessorConfig, ProcessorStats, VideoActivity};
