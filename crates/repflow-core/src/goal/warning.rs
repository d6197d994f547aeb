use serde::{Deserialize, Serialize};

/// Soft findings attached to a result. None of them blocks a best-effort plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "key", rename_all = "snake_case")]
pub enum GoalWarning {
    /// The goal is beyond the top rank; the plan targets the top rank instead
    UnreachableGoal { highest_rank: String },
    /// No adapter is registered for the vertical; generic formulas were used
    AdapterFallback { vertical_id: String },
    /// Current volume already covers the required volume
    GoalAlreadyAchieved,
    /// The horizon holds less than one work day
    RushHorizon { horizon_months: f64 },
    /// The goal sits below the current rank; the current rank is kept
    GoalBelowCurrentRank { goal_rank: String, current_rank: String },
    /// Daily activity exceeds the configured ceiling
    OverCapacity { daily_activities: u64, max_daily_activities: u32 },
}

impl GoalWarning {
    /// Stable identifier, safe to match on or translate.
    pub fn key(&self) -> &'static str {
        match self {
            GoalWarning::UnreachableGoal { .. } => "unreachable_goal",
            GoalWarning::AdapterFallback { .. } => "adapter_fallback",
            GoalWarning::GoalAlreadyAchieved => "goal_already_achieved",
            GoalWarning::RushHorizon { .. } => "rush_horizon",
            GoalWarning::GoalBelowCurrentRank { .. } => "goal_below_current_rank",
            GoalWarning::OverCapacity { .. } => "over_capacity",
        }
    }

    /// Whether this warning makes the goal infeasible.
    pub fn blocks_feasibility(&self) -> bool {
        matches!(self, GoalWarning::UnreachableGoal { .. } | GoalWarning::OverCapacity { .. })
    }
}

impl std::fmt::Display for GoalWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GoalWarning::UnreachableGoal { highest_rank } => {
                write!(f, "Goal exceeds maximum modeled rank; planning for {highest_rank}")
            }
            GoalWarning::AdapterFallback { vertical_id } => write!(
                f,
                "No adapter registered for vertical '{vertical_id}'; using default formulas"
            ),
            GoalWarning::GoalAlreadyAchieved => write!(f, "Volume goal already achieved"),
            GoalWarning::RushHorizon { horizon_months } => write!(
                f,
                "Rush: {horizon_months} months is under one work day; planning a single day"
            ),
            GoalWarning::GoalBelowCurrentRank {
                goal_rank,
                current_rank,
            } => write!(
                f,
                "Goal rank {goal_rank} is below current rank {current_rank}; keeping {current_rank}"
            ),
            GoalWarning::OverCapacity {
                daily_activities,
                max_daily_activities,
            } => write!(
                f,
                "{daily_activities} activities a day exceeds the limit of {max_daily_activities}"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_stable_phrases() {
        let unreachable = GoalWarning::UnreachableGoal {
            highest_rank: "Director".to_string(),
        };
        assert!(unreachable.to_string().contains("exceeds maximum modeled rank"));
        assert!(GoalWarning::GoalAlreadyAchieved.to_string().contains("goal already achieved"));
    }

    #[test]
    fn test_serialized_with_key_tag() {
        let json = serde_json::to_value(GoalWarning::GoalAlreadyAchieved).unwrap();
        assert_eq!(json["key"], "goal_already_achieved");

        let json = serde_json::to_value(GoalWarning::AdapterFallback {
            vertical_id: "wellness".to_string(),
        })
        .unwrap();
        assert_eq!(json["key"], GoalWarning::AdapterFallback { vertical_id: String::new() }.key());
        assert_eq!(json["vertical_id"], "wellness");
    }

    #[test]
    fn test_feasibility_blockers() {
        assert!(GoalWarning::UnreachableGoal {
            highest_rank: "X".to_string()
        }
        .blocks_feasibility());
        assert!(!GoalWarning::GoalAlreadyAchieved.blocks_feasibility());
    }
}
