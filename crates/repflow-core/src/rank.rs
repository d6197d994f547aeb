//! Rank resolution.
//!
//! Maps an income, rank or volume goal onto a rank of the company's plan and
//! the group volume needed to hold it.

use serde::{Deserialize, Serialize};

use crate::error::GoalError;
use crate::goal::{GoalCalculationInput, GoalType};
use crate::plan::{CompensationPlan, RankDefinition};
use crate::vertical::VerticalAdapter;

/// Outcome of resolving a goal against a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankResolution {
    pub rank: RankDefinition,
    pub required_volume: f64,
    /// The goal is beyond every rank of the plan; `rank` is the top rank
    #[serde(default)]
    pub exceeds_plan: bool,
    /// Name of the rank the goal resolved to before it was lifted to the
    /// representative's current rank
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifted_from: Option<String>,
}

impl RankResolution {
    /// A resolution that holds `rank` at its own group volume.
    pub fn at(rank: &RankDefinition) -> Self {
        Self {
            rank: rank.clone(),
            required_volume: rank.required_group_volume,
            exceeds_plan: false,
            lifted_from: None,
        }
    }

    /// A goal beyond the plan, capped at the top rank.
    pub fn beyond(plan: &CompensationPlan, required_volume: f64) -> Self {
        Self {
            required_volume,
            exceeds_plan: true,
            ..Self::at(plan.highest_rank())
        }
    }
}

/// Resolve a goal with the generic rules, ignoring any current rank.
///
/// # Errors
///
/// Returns [`GoalError::RankNotFound`] for a rank goal naming a rank the
/// plan does not have.
pub fn resolve_target(
    input: &GoalCalculationInput,
    plan: &CompensationPlan,
) -> Result<RankResolution, GoalError> {
    let target = input.target_value;
    let resolution = match input.goal_type {
        GoalType::Rank => {
            let name = input.target_rank.as_deref().unwrap_or_default();
            let rank = plan.find_rank(name).ok_or_else(|| GoalError::RankNotFound {
                company_id: plan.company_id().to_string(),
                rank: name.to_string(),
            })?;
            RankResolution::at(rank)
        }
        GoalType::Volume => match plan.ranks().iter().find(|r| r.required_group_volume >= target) {
            Some(rank) => RankResolution::at(rank),
            None => RankResolution::beyond(plan, target),
        },
        // Ranks are ascending, so the first match is the cheapest rank
        // paying at least the target.
        GoalType::Income => match plan.ranks().iter().find(|r| r.estimated_payout >= target) {
            Some(rank) => RankResolution::at(rank),
            None => RankResolution::beyond(plan, plan.highest_rank().required_group_volume),
        },
    };
    Ok(resolution)
}

/// Resolve a goal's rank through the adapter's override, or the generic
/// rules when the adapter has none, then keep the result at or above the
/// representative's current rank.
///
/// # Errors
///
/// Returns an error if a named rank is missing from the plan, or if an
/// override returns a rank outside the plan or an unusable volume.
pub fn resolve_rank(
    input: &GoalCalculationInput,
    plan: &CompensationPlan,
    adapter: &VerticalAdapter,
) -> Result<RankResolution, GoalError> {
    let resolution = match adapter.rank_strategy() {
        Some(strategy) => {
            let resolution = strategy.resolve_rank(input, plan)?;
            check_override(&resolution, plan, adapter)?;
            resolution
        }
        None => resolve_target(input, plan)?,
    };

    let current = match input.current_rank.as_deref() {
        Some(name) => Some(plan.find_rank(name).ok_or_else(|| GoalError::RankNotFound {
            company_id: plan.company_id().to_string(),
            rank: name.to_string(),
        })?),
        None => None,
    };

    let resolution = match current {
        Some(current) if current.order > resolution.rank.order => RankResolution {
            lifted_from: Some(resolution.rank.name.clone()),
            ..RankResolution::at(current)
        },
        _ => resolution,
    };

    tracing::debug!(
        rank = %resolution.rank.name,
        required_volume = resolution.required_volume,
        exceeds_plan = resolution.exceeds_plan,
        "resolved rank"
    );
    Ok(resolution)
}

fn check_override(
    resolution: &RankResolution,
    plan: &CompensationPlan,
    adapter: &VerticalAdapter,
) -> Result<(), GoalError> {
    if !plan.contains(&resolution.rank) {
        tracing::warn!(
            vertical = adapter.vertical_id(),
            rank = %resolution.rank.name,
            "adapter returned a rank outside the plan"
        );
        return Err(GoalError::invalid_adapter(
            adapter.vertical_id(),
            "rank",
            format!(
                "rank '{}' is not part of the plan for company '{}'",
                resolution.rank.name,
                plan.company_id()
            ),
        ));
    }
    if !resolution.required_volume.is_finite() || resolution.required_volume < 0.0 {
        return Err(GoalError::invalid_adapter(
            adapter.vertical_id(),
            "rank",
            format!("required volume {} is not a non-negative number", resolution.required_volume),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::vertical::RankStrategy;

    fn plan() -> CompensationPlan {
        CompensationPlan::new(
            "acme",
            "wellness",
            vec![
                RankDefinition::new("Starter", 0, 0.0, 0.0),
                RankDefinition::new("TeamLeader", 1, 5000.0, 2200.0),
                RankDefinition::new("Director", 2, 20000.0, 8000.0),
            ],
        )
        .unwrap()
    }

    fn adapter() -> VerticalAdapter {
        VerticalAdapter::new("wellness")
    }

    #[test]
    fn test_income_picks_cheapest_rank_paying_enough() {
        let input = GoalCalculationInput::income("acme", "wellness", 2000.0, 6.0);
        let resolution = resolve_rank(&input, &plan(), &adapter()).unwrap();
        assert_eq!(resolution.rank.name, "TeamLeader");
        assert_eq!(resolution.required_volume, 5000.0);
        assert!(!resolution.exceeds_plan);
    }

    #[test]
    fn test_income_exact_payout_matches() {
        let input = GoalCalculationInput::income("acme", "wellness", 2200.0, 6.0);
        let resolution = resolve_rank(&input, &plan(), &adapter()).unwrap();
        assert_eq!(resolution.rank.name, "TeamLeader");
    }

    #[test]
    fn test_income_beyond_plan_caps_at_top_rank() {
        let input = GoalCalculationInput::income("acme", "wellness", 50_000.0, 6.0);
        let resolution = resolve_rank(&input, &plan(), &adapter()).unwrap();
        assert_eq!(resolution.rank.name, "Director");
        assert_eq!(resolution.required_volume, 20000.0);
        assert!(resolution.exceeds_plan);
    }

    #[test]
    fn test_volume_picks_lowest_rank_covering_target() {
        let input = GoalCalculationInput::volume("acme", "wellness", 6000.0, 6.0);
        let resolution = resolve_rank(&input, &plan(), &adapter()).unwrap();
        assert_eq!(resolution.rank.name, "Director");
        assert_eq!(resolution.required_volume, 20000.0);
    }

    #[test]
    fn test_volume_beyond_plan_keeps_target_volume() {
        let input = GoalCalculationInput::volume("acme", "wellness", 30000.0, 6.0);
        let resolution = resolve_rank(&input, &plan(), &adapter()).unwrap();
        assert_eq!(resolution.rank.name, "Director");
        assert_eq!(resolution.required_volume, 30000.0);
        assert!(resolution.exceeds_plan);
    }

    #[test]
    fn test_rank_goal_by_name() {
        let input = GoalCalculationInput::rank("acme", "wellness", "Director", 12.0);
        let resolution = resolve_rank(&input, &plan(), &adapter()).unwrap();
        assert_eq!(resolution.rank.order, 2);
    }

    #[test]
    fn test_unknown_rank_name() {
        let input = GoalCalculationInput::rank("acme", "wellness", "Emperor", 12.0);
        let err = resolve_rank(&input, &plan(), &adapter()).unwrap_err();
        assert_eq!(
            err,
            GoalError::RankNotFound {
                company_id: "acme".to_string(),
                rank: "Emperor".to_string()
            }
        );
    }

    #[test]
    fn test_never_below_current_rank() {
        let input = GoalCalculationInput::income("acme", "wellness", 100.0, 6.0)
            .with_current_rank("Director");
        let resolution = resolve_rank(&input, &plan(), &adapter()).unwrap();
        assert_eq!(resolution.rank.name, "Director");
        assert_eq!(resolution.lifted_from.as_deref(), Some("TeamLeader"));
    }

    #[test]
    fn test_unknown_current_rank() {
        let input = GoalCalculationInput::income("acme", "wellness", 100.0, 6.0)
            .with_current_rank("Nobody");
        assert!(matches!(
            resolve_rank(&input, &plan(), &adapter()),
            Err(GoalError::RankNotFound { .. })
        ));
    }

    struct Fabricating;

    impl RankStrategy for Fabricating {
        fn resolve_rank(
            &self,
            _input: &GoalCalculationInput,
            _plan: &CompensationPlan,
        ) -> Result<RankResolution, GoalError> {
            Ok(RankResolution::at(&RankDefinition::new("Galactic", 9, 1e9, 1e9)))
        }
    }

    #[test]
    fn test_override_outside_plan_rejected() {
        let adapter = VerticalAdapter::new("wellness").with_rank_strategy(Arc::new(Fabricating));
        let input = GoalCalculationInput::income("acme", "wellness", 100.0, 6.0);
        assert!(matches!(
            resolve_rank(&input, &plan(), &adapter),
            Err(GoalError::InvalidAdapterResult { ref stage, .. }) if stage == "rank"
        ));
    }
}
