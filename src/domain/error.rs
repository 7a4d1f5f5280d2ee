//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use thiserror::Error;

/// Errors raised while validating domain input
///
/// Analytics reads are total and never produce these; they only come from
/// the ingestion boundary and from configuring external data sources.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Event failed boundary validation
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    /// Demographic buckets are out of range
    #[error("Invalid demographics: buckets sum to {total}, must be at most 100")]
    InvalidDemographics { total: u32 },
}

impl DomainError {
    /// Check if this is a client error (caller's fault)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidEvent(_))
    }
}
