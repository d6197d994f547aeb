//! Party-plan flow: new contacts arrive in batches through hosted events.

use super::FlowStrategy;
use crate::error::GoalError;
use crate::flow::{self, bounded_count, covering_count, DailyFlowConfig, FlowPlan, WeeklyTargets};
use crate::population::Headcount;

/// Plans new contacts as whole parties per week, each reaching
/// `guests_per_party` guests, then spreads a week's guests over its work days.
#[derive(Debug, Clone)]
pub struct PartyPlanFlow {
    guests_per_party: u32,
}

impl PartyPlanFlow {
    pub fn new(guests_per_party: u32) -> Self {
        Self {
            guests_per_party: guests_per_party.max(1),
        }
    }

    pub fn guests_per_party(&self) -> u32 {
        self.guests_per_party
    }
}

impl FlowStrategy for PartyPlanFlow {
    fn distribute(
        &self,
        headcount: &Headcount,
        horizon_months: f64,
        config: &DailyFlowConfig,
    ) -> Result<FlowPlan, GoalError> {
        if !horizon_months.is_finite() || horizon_months <= 0.0 {
            return Err(GoalError::invalid_input("horizon_months", "must be positive"));
        }

        let needed_contacts = flow::needed_contacts(headcount.total(), config)?;
        let (work_days, rush) = match config.work_days_in(horizon_months) {
            0 => (1, true),
            days => (days, false),
        };
        let days_per_week = u64::from(config.work_days_per_week).min(work_days);
        let weeks = (work_days as f64 / days_per_week as f64).max(1.0);

        let guests = u64::from(self.guests_per_party);
        let parties = covering_count(needed_contacts as f64, guests as f64)?;
        let parties_per_week = covering_count(parties as f64, weeks)?;
        let weekly_guests = bounded_count(parties_per_week.checked_mul(guests))?;

        let daily_new = covering_count(weekly_guests as f64, days_per_week as f64)?;
        let daily = flow::daily_targets(daily_new, config)?;
        let weekly = WeeklyTargets {
            new_contacts: weekly_guests,
            ..flow::weekly_targets(&daily, needed_contacts, work_days, config)?
        };

        tracing::debug!(parties, parties_per_week, weekly_guests, "distributed party-plan flow");

        Ok(FlowPlan {
            needed_contacts,
            work_days,
            rush,
            daily,
            weekly,
        })
    }
}
