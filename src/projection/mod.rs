//! Projection module
//!
//! Read-model of computed analytics.
//! Entries are derived from the event store and only refreshed by
//! re-running aggregation; new events do not invalidate them.

mod cache;

pub use cache::{AnalyticsCache, CacheSummary};
