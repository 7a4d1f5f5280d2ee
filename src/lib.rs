//! FanTV video analytics library
//!
//! Re-exports modules for integration testing and external use.

pub mod aggregate;
pub mod api;
pub mod domain;
pub mod event_store;
pub mod handlers;
pub mod jobs;
pub mod processor;
pub mod projection;
pub mod state;

pub mod config;
mod error;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use domain::{DomainError, VideoAnalytics, ViewerAction, ViewerEvent};
pub use state::AppState;
