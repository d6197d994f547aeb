//! Ladder floor: entry ranks of some plans cannot be targeted as a goal.

use super::RankStrategy;
use crate::error::GoalError;
use crate::goal::GoalCalculationInput;
use crate::plan::CompensationPlan;
use crate::rank::{self, RankResolution};

/// Resolves with the generic rules, then lifts the result to the first rank
/// whose order index is at least `min_order`. A floor above the whole plan
/// lifts to the top rank; a result already at the top rank is kept as is.
#[derive(Debug, Clone)]
pub struct LadderFloorRanks {
    min_order: u32,
}

impl LadderFloorRanks {
    pub fn new(min_order: u32) -> Self {
        Self { min_order }
    }

    pub fn min_order(&self) -> u32 {
        self.min_order
    }
}

impl RankStrategy for LadderFloorRanks {
    fn resolve_rank(
        &self,
        input: &GoalCalculationInput,
        plan: &CompensationPlan,
    ) -> Result<RankResolution, GoalError> {
        let resolution = rank::resolve_target(input, plan)?;
        if resolution.rank.order >= self.min_order {
            return Ok(resolution);
        }

        let floor = match plan.ranks().iter().find(|r| r.order >= self.min_order) {
            Some(floor) => floor,
            None if resolution.rank.order == plan.highest_rank().order => return Ok(resolution),
            None => plan.highest_rank(),
        };
        Ok(RankResolution::at(floor))
    }
}
