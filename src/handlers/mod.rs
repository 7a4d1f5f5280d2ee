//! Handlers module
//!
//! Orchestrate the core components for each inbound operation.
//! Track commands write to the store and feed the background processor;
//! queries read through the aggregator and cache.

mod commands;
mod query_handler;
mod track_handler;

#[cfg(test)]
mod tests;

pub use commands::*;
pub use query_handler::{AnalyticsQueryHandler, ServiceStats};
pub use track_handler::TrackEventHandler;
