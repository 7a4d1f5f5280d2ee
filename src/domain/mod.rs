//! Domain module
//!
//! Core domain types: viewer events and the analytics derived from them.

pub mod analytics;
pub mod error;
pub mod events;

pub use analytics::{Demographics, VideoAnalytics, NO_PEAK_HOUR};
pub use error::DomainError;
pub use events::{ViewerAction, ViewerEvent, MAX_USER_ID_LEN};
