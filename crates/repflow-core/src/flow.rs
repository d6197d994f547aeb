//! Daily flow distribution.
//!
//! Turns a required headcount into concrete per-day and per-week activity
//! counts across the funnel: new contacts, follow-ups on open leads, and
//! reactivations of dormant contacts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::GoalError;
use crate::population::Headcount;
use crate::vertical::VerticalAdapter;

/// Weeks per month used to size a horizon.
pub const WEEKS_PER_MONTH: f64 = 52.0 / 12.0;

/// Values within this distance of an integer round to that integer.
const ROUNDING_TOLERANCE: f64 = 1e-9;

/// Largest count the planner produces. Above it `f64` no longer holds every
/// integer, so derived targets would be meaningless.
pub const MAX_COUNT: u64 = 1 << 53;

fn too_large() -> GoalError {
    GoalError::invalid_input(
        "target_value",
        format!("too large to plan (a count would exceed {MAX_COUNT})"),
    )
}

/// Reject a count that overflowed or passed [`MAX_COUNT`].
pub(crate) fn bounded_count(count: Option<u64>) -> Result<u64, GoalError> {
    count.filter(|c| *c <= MAX_COUNT).ok_or_else(too_large)
}

/// Round a non-negative count up, ignoring floating-point noise.
pub(crate) fn ceil_count(value: f64) -> Result<u64, GoalError> {
    if value.is_nan() || value <= 0.0 {
        return Ok(0);
    }
    let count = (value - ROUNDING_TOLERANCE).ceil().max(0.0);
    if count > MAX_COUNT as f64 {
        return Err(too_large());
    }
    Ok(count as u64)
}

/// Smallest count `n` with `n * per_unit >= total`.
///
/// The tolerant rounding of [`ceil_count`] only proposes a candidate; it is
/// kept when it actually covers `total`, otherwise the next count is used.
pub(crate) fn covering_count(total: f64, per_unit: f64) -> Result<u64, GoalError> {
    let candidate = ceil_count(total / per_unit)?;
    if candidate as f64 * per_unit >= total {
        Ok(candidate)
    } else {
        bounded_count(candidate.checked_add(1))
    }
}

/// How often an open lead is followed up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowUpCadence {
    /// Touches a single lead receives before it is closed out
    pub max_touches: u32,
    /// Work days between touches
    pub interval_days: u32,
}

/// Funnel economics for a vertical.
///
/// Every field except `customer_share` and `max_daily_activities` must be
/// configured explicitly; the engine never guesses funnel rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyFlowConfig {
    pub contact_to_qualified_rate: f64,
    pub qualified_to_close_rate: f64,
    pub work_days_per_week: u32,
    pub follow_up: FollowUpCadence,
    /// Reactivations as a fraction of daily new-contact and follow-up load
    pub reactivation_fraction: f64,
    /// Volume one new customer or partner contributes on average
    pub average_volume_per_person: f64,
    /// Share of required people who are customers; the rest are partners
    #[serde(default = "default_customer_share")]
    pub customer_share: f64,
    /// Daily activity ceiling; a plan above it is flagged infeasible
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_daily_activities: Option<u32>,
}

fn default_customer_share() -> f64 {
    0.7
}

impl DailyFlowConfig {
    /// Check every field is in range.
    ///
    /// # Errors
    ///
    /// Returns [`GoalError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> Result<(), GoalError> {
        check_rate("contact_to_qualified_rate", self.contact_to_qualified_rate)?;
        check_rate("qualified_to_close_rate", self.qualified_to_close_rate)?;

        if !(1..=7).contains(&self.work_days_per_week) {
            return Err(GoalError::invalid_config(
                "work_days_per_week",
                format!("must be between 1 and 7, got {}", self.work_days_per_week),
            ));
        }
        if self.follow_up.max_touches == 0 {
            return Err(GoalError::invalid_config("follow_up.max_touches", "must be at least 1"));
        }
        if self.follow_up.interval_days == 0 {
            return Err(GoalError::invalid_config("follow_up.interval_days", "must be at least 1"));
        }
        if !(0.0..1.0).contains(&self.reactivation_fraction) {
            return Err(GoalError::invalid_config(
                "reactivation_fraction",
                format!("must be in [0, 1), got {}", self.reactivation_fraction),
            ));
        }
        if !self.average_volume_per_person.is_finite() || self.average_volume_per_person <= 0.0 {
            return Err(GoalError::invalid_config(
                "average_volume_per_person",
                format!("must be positive, got {}", self.average_volume_per_person),
            ));
        }
        if !(0.0..=1.0).contains(&self.customer_share) {
            return Err(GoalError::invalid_config(
                "customer_share",
                format!("must be in [0, 1], got {}", self.customer_share),
            ));
        }
        if self.max_daily_activities == Some(0) {
            return Err(GoalError::invalid_config(
                "max_daily_activities",
                "must be at least 1 when set",
            ));
        }
        Ok(())
    }

    /// Probability that a new contact ends up as a customer or partner.
    pub fn close_probability(&self) -> f64 {
        self.contact_to_qualified_rate * self.qualified_to_close_rate
    }

    /// Whole work days available in a horizon, before any rush flooring.
    pub fn work_days_in(&self, horizon_months: f64) -> u64 {
        let days = f64::from(self.work_days_per_week) * horizon_months * WEEKS_PER_MONTH;
        (days + ROUNDING_TOLERANCE).floor().max(0.0) as u64
    }
}

fn check_rate(key: &str, rate: f64) -> Result<(), GoalError> {
    if rate.is_finite() && rate > 0.0 && rate <= 1.0 {
        Ok(())
    } else {
        Err(GoalError::invalid_config(key, format!("must be in (0, 1], got {rate}")))
    }
}

/// Flow configurations by vertical, with an optional fallback.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowConfigSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DailyFlowConfig>,
    #[serde(default)]
    pub verticals: BTreeMap<String, DailyFlowConfig>,
}

impl FlowConfigSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default(mut self, config: DailyFlowConfig) -> Self {
        self.default = Some(config);
        self
    }

    pub fn with_vertical(
        mut self,
        vertical_id: impl Into<String>,
        config: DailyFlowConfig,
    ) -> Self {
        self.verticals.insert(vertical_id.into(), config);
        self
    }

    /// The vertical's own configuration, else the default.
    ///
    /// # Errors
    ///
    /// Returns [`GoalError::MissingFlowConfig`] when neither exists.
    pub fn for_vertical(&self, vertical_id: &str) -> Result<&DailyFlowConfig, GoalError> {
        self.verticals
            .get(vertical_id)
            .or(self.default.as_ref())
            .ok_or_else(|| GoalError::MissingFlowConfig(vertical_id.to_string()))
    }

    /// Validate every configuration in the set.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field, prefixed with its section.
    pub fn validate(&self) -> Result<(), GoalError> {
        let sections = self
            .default
            .iter()
            .map(|c| ("flow".to_string(), c))
            .chain(self.verticals.iter().map(|(id, c)| (format!("verticals.{id}"), c)));
        for (section, config) in sections {
            config.validate().map_err(|err| match err {
                GoalError::InvalidConfig { key, message } => GoalError::InvalidConfig {
                    key: format!("{section}.{key}"),
                    message,
                },
                other => other,
            })?;
        }
        Ok(())
    }
}

/// Activity counts for one work day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTargets {
    pub new_contacts: u64,
    pub follow_ups: u64,
    pub reactivations: u64,
}

impl DailyTargets {
    pub fn total(&self) -> u64 {
        self.new_contacts
            .saturating_add(self.follow_ups)
            .saturating_add(self.reactivations)
    }
}

/// Activity counts for one work week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyTargets {
    pub new_contacts: u64,
    pub follow_ups: u64,
    pub reactivations: u64,
}

/// The distributed activity plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowPlan {
    /// New contacts needed over the whole horizon
    pub needed_contacts: u64,
    /// Work days the contacts are spread across
    pub work_days: u64,
    /// Horizon held less than one work day and was floored to one
    pub rush: bool,
    pub daily: DailyTargets,
    pub weekly: WeeklyTargets,
}

/// Distribute a headcount across the horizon with the generic funnel formulas.
///
/// # Errors
///
/// Returns an error if the horizon is not positive or a count would exceed
/// [`MAX_COUNT`].
pub fn distribute_evenly(
    headcount: &Headcount,
    horizon_months: f64,
    config: &DailyFlowConfig,
) -> Result<FlowPlan, GoalError> {
    if !horizon_months.is_finite() || horizon_months <= 0.0 {
        return Err(GoalError::invalid_input("horizon_months", "must be positive"));
    }

    let needed_contacts = needed_contacts(headcount.total(), config)?;
    let (work_days, rush) = match config.work_days_in(horizon_months) {
        0 => (1, true),
        days => (days, false),
    };

    let new_contacts = covering_count(needed_contacts as f64, work_days as f64)?;
    let daily = daily_targets(new_contacts, config)?;
    let weekly = weekly_targets(&daily, needed_contacts, work_days, config)?;

    tracing::debug!(needed_contacts, work_days, rush, ?daily, "distributed flow");

    Ok(FlowPlan {
        needed_contacts,
        work_days,
        rush,
        daily,
        weekly,
    })
}

/// Distribute a headcount through the adapter's override, or the generic
/// formulas when the adapter has none.
///
/// # Errors
///
/// Returns an error if the horizon is not positive, or if an override
/// schedules no contacts for a positive headcount.
pub fn distribute(
    headcount: &Headcount,
    horizon_months: f64,
    config: &DailyFlowConfig,
    adapter: &VerticalAdapter,
) -> Result<FlowPlan, GoalError> {
    let Some(strategy) = adapter.flow_strategy() else {
        return distribute_evenly(headcount, horizon_months, config);
    };

    let plan = strategy.distribute(headcount, horizon_months, config)?;
    let message = if plan.work_days == 0 {
        Some("work_days is zero".to_string())
    } else if !headcount.is_zero() && (plan.needed_contacts == 0 || plan.daily.new_contacts == 0) {
        Some(format!("no new contacts scheduled for {} required people", headcount.total()))
    } else {
        None
    };
    if let Some(message) = message {
        tracing::warn!(vertical = adapter.vertical_id(), %message, "rejected adapter flow plan");
        return Err(GoalError::invalid_adapter(adapter.vertical_id(), "flow", message));
    }
    Ok(plan)
}

/// Contacts required to produce `conversions` closed people: the smallest
/// count whose expected conversions reach `conversions`.
///
/// # Errors
///
/// Returns an error if the count would exceed [`MAX_COUNT`].
pub fn needed_contacts(conversions: u64, config: &DailyFlowConfig) -> Result<u64, GoalError> {
    covering_count(conversions as f64, config.close_probability())
}

/// Derive follow-ups and reactivations from a fixed daily new-contact count.
///
/// # Errors
///
/// Returns an error if a count would exceed [`MAX_COUNT`].
pub fn daily_targets(
    new_contacts: u64,
    config: &DailyFlowConfig,
) -> Result<DailyTargets, GoalError> {
    let new_contacts = bounded_count(Some(new_contacts))?;
    let follow_ups = follow_up_load(new_contacts, config)?;
    let touches = bounded_count(new_contacts.checked_add(follow_ups))?;
    let reactivations = ceil_count(touches as f64 * config.reactivation_fraction)?;
    Ok(DailyTargets {
        new_contacts,
        follow_ups,
        reactivations,
    })
}

/// Daily touches needed to keep every open lead on cadence.
///
/// A qualified lead stays open for `max_touches` intervals and is touched
/// once per interval, so it never receives more than `max_touches` touches.
fn follow_up_load(daily_new_contacts: u64, config: &DailyFlowConfig) -> Result<u64, GoalError> {
    let cadence = &config.follow_up;
    let qualified_per_day = daily_new_contacts as f64 * config.contact_to_qualified_rate;
    let lead_lifetime_days = f64::from(cadence.max_touches) * f64::from(cadence.interval_days);
    let open_leads = qualified_per_day * lead_lifetime_days;
    ceil_count(open_leads / f64::from(cadence.interval_days))
}

/// Scale daily targets to a work week, never past the horizon's total.
///
/// # Errors
///
/// Returns an error if a weekly count would exceed [`MAX_COUNT`].
pub fn weekly_targets(
    daily: &DailyTargets,
    needed_contacts: u64,
    work_days: u64,
    config: &DailyFlowConfig,
) -> Result<WeeklyTargets, GoalError> {
    let days = u64::from(config.work_days_per_week).min(work_days);
    Ok(WeeklyTargets {
        new_contacts: bounded_count(daily.new_contacts.checked_mul(days))?.min(needed_contacts),
        follow_ups: bounded_count(daily.follow_ups.checked_mul(days))?,
        reactivations: bounded_count(daily.reactivations.checked_mul(days))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DailyFlowConfig {
        DailyFlowConfig {
            contact_to_qualified_rate: 0.3,
            qualified_to_close_rate: 0.2,
            work_days_per_week: 5,
            follow_up: FollowUpCadence {
                max_touches: 3,
                interval_days: 2,
            },
            reactivation_fraction: 0.1,
            average_volume_per_person: 250.0,
            customer_share: 0.7,
            max_daily_activities: None,
        }
    }

    #[test]
    fn test_needed_contacts_back_calculation() {
        // 12 / (0.3 * 0.2) = 200
        assert_eq!(needed_contacts(12, &config()).unwrap(), 200);
        assert_eq!(needed_contacts(13, &config()).unwrap(), 217);
        assert_eq!(needed_contacts(0, &config()).unwrap(), 0);
    }

    #[test]
    fn test_contacts_spread_evenly() {
        let headcount = Headcount {
            customers: 8,
            partners: 4,
        };
        // 6 months at 5 days/week = floor(130.0) = 130 work days
        let plan = distribute_evenly(&headcount, 6.0, &config()).unwrap();
        assert_eq!(plan.needed_contacts, 200);
        assert_eq!(plan.work_days, 130);
        assert!(!plan.rush);
        assert_eq!(plan.daily.new_contacts, 2);
        assert!(plan.daily.new_contacts * plan.work_days >= plan.needed_contacts);
    }

    #[test]
    fn test_work_days_in_horizon() {
        let cfg = config();
        assert_eq!(cfg.work_days_in(12.0), 260);
        assert_eq!(cfg.work_days_in(1.0), 21);
        assert_eq!(cfg.work_days_in(0.001), 0);
    }

    #[test]
    fn test_rush_horizon_floors_to_one_day() {
        let headcount = Headcount {
            customers: 1,
            partners: 0,
        };
        let plan = distribute_evenly(&headcount, 0.005, &config()).unwrap();
        assert!(plan.rush);
        assert_eq!(plan.work_days, 1);
        assert_eq!(plan.daily.new_contacts, plan.needed_contacts);
        assert_eq!(plan.weekly.new_contacts, plan.needed_contacts);
    }

    #[test]
    fn test_follow_up_load() {
        // 10 new/day * 0.3 = 3 qualified/day, open for 3 touches * 2 days = 18 leads,
        // one touch every 2 days = 9 touches/day
        let daily = daily_targets(10, &config()).unwrap();
        assert_eq!(daily.follow_ups, 9);
        // (10 + 9) * 0.1 = 1.9 -> 2
        assert_eq!(daily.reactivations, 2);
        assert_eq!(daily.total(), 21);
    }

    #[test]
    fn test_zero_headcount_yields_zero_targets() {
        let plan = distribute_evenly(&Headcount::default(), 3.0, &config()).unwrap();
        assert_eq!(plan.needed_contacts, 0);
        assert_eq!(plan.daily, DailyTargets::default());
        assert_eq!(plan.weekly, WeeklyTargets::default());
    }

    #[test]
    fn test_weekly_targets_scale_by_work_days() {
        let cfg = config();
        let daily = daily_targets(4, &cfg).unwrap();
        let weekly = weekly_targets(&daily, 1000, 100, &cfg).unwrap();
        assert_eq!(weekly.new_contacts, 20);
        assert_eq!(weekly.follow_ups, daily.follow_ups * 5);
    }

    #[test]
    fn test_validate_rejects_bad_rates() {
        let mut cfg = config();
        cfg.contact_to_qualified_rate = 0.0;
        assert!(matches!(
            cfg.validate(),
            Err(GoalError::InvalidConfig { ref key, .. }) if key == "contact_to_qualified_rate"
        ));

        let mut cfg = config();
        cfg.qualified_to_close_rate = 1.5;
        assert!(cfg.validate().is_err());

        let mut cfg = config();
        cfg.work_days_per_week = 8;
        assert!(cfg.validate().is_err());

        let mut cfg = config();
        cfg.reactivation_fraction = 1.0;
        assert!(cfg.validate().is_err());

        let mut cfg = config();
        cfg.average_volume_per_person = 0.0;
        assert!(cfg.validate().is_err());

        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_config_set_lookup() {
        let mut party = config();
        party.work_days_per_week = 6;
        let set = FlowConfigSet::new().with_default(config()).with_vertical("party", party);
        assert_eq!(set.for_vertical("party").unwrap().work_days_per_week, 6);
        assert_eq!(set.for_vertical("other").unwrap().work_days_per_week, 5);

        let empty = FlowConfigSet::new();
        assert_eq!(
            empty.for_vertical("other").unwrap_err(),
            GoalError::MissingFlowConfig("other".to_string())
        );
    }

    #[test]
    fn test_config_set_validation_names_section() {
        let mut bad = config();
        bad.follow_up.interval_days = 0;
        let set = FlowConfigSet::new().with_vertical("party", bad);
        assert!(matches!(
            set.validate(),
            Err(GoalError::InvalidConfig { ref key, .. })
                if key == "verticals.party.follow_up.interval_days"
        ));
    }

    #[test]
    fn test_customer_share_defaults_to_seventy_percent() {
        let toml_str = r#"
            contact_to_qualified_rate = 0.4
            qualified_to_close_rate = 0.25
            work_days_per_week = 5
            reactivation_fraction = 0.05
            average_volume_per_person = 100.0

            [follow_up]
            max_touches = 4
            interval_days = 3
        "#;
        let cfg: DailyFlowConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.customer_share, 0.7);
        assert_eq!(cfg.max_daily_activities, None);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_covering_count_never_rounds_below_total() {
        // 1.0000000005 sits inside the tolerance but one unit does not cover it
        assert_eq!(covering_count(10000.000005, 10000.0).unwrap(), 2);
        assert_eq!(covering_count(10000.0, 10000.0).unwrap(), 1);
        assert_eq!(covering_count(0.0, 10000.0).unwrap(), 0);
    }

    #[test]
    fn test_needed_contacts_reach_conversions() {
        let cfg = config();
        for conversions in 1..500u64 {
            let contacts = needed_contacts(conversions, &cfg).unwrap();
            assert!(contacts as f64 * cfg.close_probability() >= conversions as f64);
        }
    }

    #[test]
    fn test_oversized_counts_are_rejected() {
        let headcount = Headcount {
            customers: u64::MAX,
            partners: u64::MAX,
        };
        assert!(matches!(
            distribute_evenly(&headcount, 6.0, &config()),
            Err(GoalError::InvalidInput { ref field, .. }) if field == "target_value"
        ));
        assert!(daily_targets(u64::MAX, &config()).is_err());

        let daily = DailyTargets {
            new_contacts: MAX_COUNT,
            follow_ups: 0,
            reactivations: 0,
        };
        assert!(weekly_targets(&daily, MAX_COUNT, 100, &config()).is_err());
    }
}
