//! Goal calculation.
//!
//! [`GoalEngine`] turns a representative's goal into a feasibility-checked
//! activity plan by composing rank resolution, volume conversion and flow
//! distribution.

mod engine;
mod input;
mod warning;

pub use engine::GoalEngine;
pub use input::{FlowOverrides, GoalCalculationInput, GoalType};
pub use warning::GoalWarning;

use serde::{Deserialize, Serialize};

use crate::flow::{DailyTargets, WeeklyTargets};
use crate::plan::RankDefinition;
use crate::population::Headcount;

/// The consolidated plan for one goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalCalculationResult {
    pub company_id: String,
    pub vertical_id: String,
    pub goal_type: GoalType,
    pub resolved_rank: RankDefinition,
    pub required_volume: f64,
    /// Volume still to build after the current volume
    pub volume_delta: f64,
    pub required_headcount: Headcount,
    /// New contacts needed over the whole horizon
    pub needed_contacts: u64,
    pub work_days: u64,
    pub daily_targets: DailyTargets,
    pub weekly_targets: WeeklyTargets,
    pub feasible: bool,
    pub warnings: Vec<GoalWarning>,
}

impl GoalCalculationResult {
    pub fn has_warning(&self, key: &str) -> bool {
        self.warnings.iter().any(|w| w.key() == key)
    }
}
