//! Volume-to-population conversion.
//!
//! Maps a volume gap to the number of new customers and partners needed to
//! close it. Every count is rounded up: overstating the people needed is an
//! acceptable bias, understating is not, since the headcount drives the
//! activity plan.

use serde::{Deserialize, Serialize};

use crate::error::GoalError;
use crate::flow::{ceil_count, covering_count, DailyFlowConfig};
use crate::plan::CompensationPlan;
use crate::vertical::VerticalAdapter;

/// Required new people, split by role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Headcount {
    pub customers: u64,
    pub partners: u64,
}

impl Headcount {
    pub fn total(&self) -> u64 {
        self.customers.saturating_add(self.partners)
    }

    pub fn is_zero(&self) -> bool {
        self.customers == 0 && self.partners == 0
    }
}

/// Volume still to be built: `max(0, required - current)`.
pub fn volume_delta(required_volume: f64, current_volume: f64) -> f64 {
    (required_volume - current_volume).max(0.0)
}

/// Split a raw (fractional) headcount by the configured customer share,
/// rounding each side up.
///
/// # Errors
///
/// Returns an error if a side would exceed [`crate::flow::MAX_COUNT`].
pub fn split_headcount(raw_headcount: f64, customer_share: f64) -> Result<Headcount, GoalError> {
    Ok(Headcount {
        customers: ceil_count(raw_headcount * customer_share)?,
        partners: ceil_count(raw_headcount * (1.0 - customer_share))?,
    })
}

/// The smallest split headcount whose combined volume, at
/// `volume_per_person` each, covers `volume_delta`.
///
/// # Errors
///
/// Returns an error if the headcount would exceed [`crate::flow::MAX_COUNT`].
pub fn headcount_for_volume(
    volume_delta: f64,
    volume_per_person: f64,
    customer_share: f64,
) -> Result<Headcount, GoalError> {
    let required = covering_count(volume_delta, volume_per_person)?;
    let mut headcount = split_headcount(volume_delta / volume_per_person, customer_share)?;

    let shortfall = required.saturating_sub(headcount.total());
    if customer_share > 0.0 {
        headcount.customers += shortfall;
    } else {
        headcount.partners += shortfall;
    }
    Ok(headcount)
}

/// Convert a volume gap with the generic formula: divide by the average
/// per-person volume, then split by the customer share.
///
/// # Errors
///
/// Returns an error if `volume_delta` is negative or not finite, or too
/// large to plan.
pub fn convert_by_average(
    volume_delta: f64,
    config: &DailyFlowConfig,
) -> Result<Headcount, GoalError> {
    if !volume_delta.is_finite() || volume_delta < 0.0 {
        return Err(GoalError::invalid_input(
            "volume_delta",
            format!("must be a non-negative number, got {volume_delta}"),
        ));
    }
    if volume_delta == 0.0 {
        return Ok(Headcount::default());
    }

    let headcount = headcount_for_volume(
        volume_delta,
        config.average_volume_per_person,
        config.customer_share,
    )?;
    tracing::debug!(volume_delta, ?headcount, "converted volume to headcount");
    Ok(headcount)
}

/// Convert a volume gap through the adapter's override, or the generic
/// formula when the adapter has none.
///
/// # Errors
///
/// Returns an error if the gap is invalid, or if an override needs nobody
/// for a positive gap.
pub fn convert(
    volume_delta: f64,
    plan: &CompensationPlan,
    config: &DailyFlowConfig,
    adapter: &VerticalAdapter,
) -> Result<Headcount, GoalError> {
    let Some(strategy) = adapter.volume_strategy() else {
        return convert_by_average(volume_delta, config);
    };
    if volume_delta == 0.0 {
        return Ok(Headcount::default());
    }

    let headcount = strategy.convert(volume_delta, plan, config)?;
    if volume_delta > 0.0 && headcount.is_zero() {
        tracing::warn!(
            vertical = adapter.vertical_id(),
            volume_delta,
            "adapter needs nobody for a positive volume gap"
        );
        return Err(GoalError::invalid_adapter(
            adapter.vertical_id(),
            "volume",
            format!("headcount is zero for a volume gap of {volume_delta}"),
        ));
    }
    Ok(headcount)
}
