//! Subscription volume: recruited people only count while they stay subscribed.

use super::VolumeStrategy;
use crate::error::GoalError;
use crate::flow::DailyFlowConfig;
use crate::plan::CompensationPlan;
use crate::population::{headcount_for_volume, Headcount};

/// Grosses the raw headcount up by `1 / retention_rate`, so that the people
/// still subscribed at qualification time cover the volume gap. Each
/// recruit counts for `average_volume_per_person * retention_rate`.
#[derive(Debug, Clone)]
pub struct SubscriptionVolume {
    retention_rate: f64,
}

impl SubscriptionVolume {
    /// `retention_rate` must be in (0, 1]; the registry validates it.
    pub fn new(retention_rate: f64) -> Self {
        Self { retention_rate }
    }

    pub fn retention_rate(&self) -> f64 {
        self.retention_rate
    }
}

impl VolumeStrategy for SubscriptionVolume {
    fn convert(
        &self,
        volume_delta: f64,
        _plan: &CompensationPlan,
        config: &DailyFlowConfig,
    ) -> Result<Headcount, GoalError> {
        let retained_volume = config.average_volume_per_person * self.retention_rate;
        let headcount = headcount_for_volume(volume_delta, retained_volume, config.customer_share)?;
        tracing::debug!(retained_volume, ?headcount, "converted subscription volume");
        Ok(headcount)
    }
}
