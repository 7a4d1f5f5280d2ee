//! Demographics Source
//!
//! Viewer events carry no demographic attributes, so the breakdown comes
//! from an external collaborator behind this trait.

use std::fmt::Debug;

use crate::domain::{Demographics, DomainError};

/// Supplies the demographic breakdown for a video
pub trait DemographicsSource: Debug + Send + Sync {
    fn demographics(&self, video_id: u64) -> Demographics;
}

/// Fixed breakdown returned for every video
#[derive(Debug, Clone, PartialEq)]
pub struct StaticDemographics {
    buckets: Demographics,
}

impl StaticDemographics {
    /// Build from explicit buckets; percentages must sum to at most 100
    pub fn new(buckets: Demographics) -> Result<Self, DomainError> {
        let total: u32 = buckets.values().sum();
        if total > 100 {
            return Err(DomainError::InvalidDemographics { total });
        }
        Ok(Self { buckets })
    }
}

impl Default for StaticDemographics {
    fn default() -> Self {
        let buckets = [
            ("age_18_24", 25),
            ("age_25_34", 40),
            ("age_35_44", 20),
            ("age_45_plus", 15),
        ]
        .into_iter()
        .map(|(label, pct)| (label.to_string(), pct))
        .collect();

        Self { buckets }
    }
}

impl DemographicsSource for StaticDemographics {
    fn demographics(&self, _video_id: u64) -> Demographics {
        self.buckets.clone()
    }
}
