//! Aggregate module
//!
//! Reduces a video's event history into `VideoAnalytics`.
//! Filtering and reduction are pure; the only side effect is the cache write.

mod aggregator;
pub mod demographics;
pub mod metrics;

pub use aggregator::{Aggregator, AggregatorConfig};
pub use demographics::{DemographicsSource, StaticDemographics};
pub use metrics::EngagementMetrics;
