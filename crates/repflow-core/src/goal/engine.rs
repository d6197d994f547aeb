use super::{GoalCalculationInput, GoalCalculationResult, GoalWarning};
use crate::error::GoalError;
use crate::flow::{self, FlowConfigSet};
use crate::plan::{InMemoryPlanStore, PlanStore};
use crate::population;
use crate::rank;
use crate::vertical::AdapterRegistry;

/// Goal resolution and activity planning engine.
///
/// The engine owns read-only reference data only. `calculate` is
/// deterministic and keeps no state between calls, so one engine can serve
/// any number of concurrent callers.
#[derive(Debug, Clone)]
pub struct GoalEngine<S: PlanStore = InMemoryPlanStore> {
    plans: S,
    adapters: AdapterRegistry,
    flow_configs: FlowConfigSet,
}

impl<S: PlanStore> GoalEngine<S> {
    pub fn new(plans: S, adapters: AdapterRegistry, flow_configs: FlowConfigSet) -> Self {
        Self {
            plans,
            adapters,
            flow_configs,
        }
    }

    pub fn plans(&self) -> &S {
        &self.plans
    }

    pub fn adapters(&self) -> &AdapterRegistry {
        &self.adapters
    }

    pub fn flow_configs(&self) -> &FlowConfigSet {
        &self.flow_configs
    }

    /// Calculate the activity plan for a goal.
    ///
    /// # Arguments
    /// * `input` - The goal, horizon and the representative's current standing
    ///
    /// # Returns
    /// The resolved rank, required headcount and daily/weekly targets, with
    /// soft warnings attached
    ///
    /// # Errors
    ///
    /// Fails on malformed input (before any lookup), an unknown company or
    /// rank, a missing or invalid flow configuration, or an adapter override
    /// that breaks the plan's invariants.
    pub fn calculate(
        &self,
        input: &GoalCalculationInput,
    ) -> Result<GoalCalculationResult, GoalError> {
        input.validate()?;

        let plan = self.plans.get_plan(&input.company_id)?;
        let mut warnings = Vec::new();

        let resolution = self.adapters.resolve(&input.vertical_id);
        if resolution.fell_back {
            warnings.push(GoalWarning::AdapterFallback {
                vertical_id: input.vertical_id.clone(),
            });
        }
        let adapter = resolution.adapter;

        let config = input.overrides.apply(self.flow_configs.for_vertical(&input.vertical_id)?);
        config.validate()?;

        let target = rank::resolve_rank(input, plan, &adapter)?;
        if target.exceeds_plan {
            warnings.push(GoalWarning::UnreachableGoal {
                highest_rank: target.rank.name.clone(),
            });
        }
        if let Some(goal_rank) = &target.lifted_from {
            warnings.push(GoalWarning::GoalBelowCurrentRank {
                goal_rank: goal_rank.clone(),
                current_rank: target.rank.name.clone(),
            });
        }

        let volume_delta = population::volume_delta(target.required_volume, input.current_volume);
        if volume_delta == 0.0 {
            warnings.push(GoalWarning::GoalAlreadyAchieved);
        }
        let headcount = population::convert(volume_delta, plan, &config, &adapter)?;

        let flow_plan = flow::distribute(&headcount, input.horizon_months, &config, &adapter)?;
        if flow_plan.rush {
            warnings.push(GoalWarning::RushHorizon {
                horizon_months: input.horizon_months,
            });
        }

        if let Some(max) = config.max_daily_activities {
            let daily_activities = flow_plan.daily.total();
            if daily_activities > u64::from(max) {
                warnings.push(GoalWarning::OverCapacity {
                    daily_activities,
                    max_daily_activities: max,
                });
            }
        }

        let feasible = !warnings.iter().any(GoalWarning::blocks_feasibility);
        tracing::debug!(
            company = %input.company_id,
            rank = %target.rank.name,
            feasible,
            warnings = warnings.len(),
            "goal calculated"
        );

        Ok(GoalCalculationResult {
            company_id: input.company_id.clone(),
            vertical_id: input.vertical_id.clone(),
            goal_type: input.goal_type,
            resolved_rank: target.rank,
            required_volume: target.required_volume,
            volume_delta,
            required_headcount: headcount,
            needed_contacts: flow_plan.needed_contacts,
            work_days: flow_plan.work_days,
            daily_targets: flow_plan.daily,
            weekly_targets: flow_plan.weekly,
            feasible,
            warnings,
        })
    }
}
