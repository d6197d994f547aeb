//! Vertical adapters.
//!
//! A vertical (an industry category with its own compensation and funnel
//! economics) may override any of the engine's three formulas. Each
//! capability is its own trait; a [`VerticalAdapter`] bundles the ones a
//! vertical overrides and leaves the rest to the generic formulas.
//!
//! Adapters are collected in an [`AdapterRegistry`] built once when the
//! application is composed and handed to the engine explicitly.

mod ladder_floor;
mod party_plan;
mod registry;
mod subscription;

pub use ladder_floor::LadderFloorRanks;
pub use party_plan::PartyPlanFlow;
pub use registry::{
    AdapterRegistry, AdapterResolution, AdapterSpec, LadderFloorSpec, PartyPlanSpec,
    SubscriptionSpec,
};
pub use subscription::SubscriptionVolume;

use std::fmt;
use std::sync::Arc;

use crate::error::GoalError;
use crate::flow::{DailyFlowConfig, FlowPlan};
use crate::goal::GoalCalculationInput;
use crate::plan::CompensationPlan;
use crate::population::Headcount;
use crate::rank::RankResolution;

/// Replaces rank resolution for a vertical.
///
/// The returned rank must be one of `plan`'s ranks; anything else is
/// rejected as an invalid adapter result.
pub trait RankStrategy: Send + Sync {
    fn resolve_rank(
        &self,
        input: &GoalCalculationInput,
        plan: &CompensationPlan,
    ) -> Result<RankResolution, GoalError>;
}

/// Replaces volume-to-headcount conversion for a vertical.
///
/// Only called for a positive volume gap.
pub trait VolumeStrategy: Send + Sync {
    fn convert(
        &self,
        volume_delta: f64,
        plan: &CompensationPlan,
        config: &DailyFlowConfig,
    ) -> Result<Headcount, GoalError>;
}

/// Replaces daily flow distribution for a vertical.
pub trait FlowStrategy: Send + Sync {
    fn distribute(
        &self,
        headcount: &Headcount,
        horizon_months: f64,
        config: &DailyFlowConfig,
    ) -> Result<FlowPlan, GoalError>;
}

/// The overrides registered for one vertical. Capabilities left unset use
/// the generic formulas.
#[derive(Clone)]
pub struct VerticalAdapter {
    vertical_id: String,
    rank: Option<Arc<dyn RankStrategy>>,
    volume: Option<Arc<dyn VolumeStrategy>>,
    flow: Option<Arc<dyn FlowStrategy>>,
}

impl VerticalAdapter {
    /// An adapter with no overrides.
    pub fn new(vertical_id: impl Into<String>) -> Self {
        Self {
            vertical_id: vertical_id.into(),
            rank: None,
            volume: None,
            flow: None,
        }
    }

    pub fn with_rank_strategy(mut self, strategy: Arc<dyn RankStrategy>) -> Self {
        self.rank = Some(strategy);
        self
    }

    pub fn with_volume_strategy(mut self, strategy: Arc<dyn VolumeStrategy>) -> Self {
        self.volume = Some(strategy);
        self
    }

    pub fn with_flow_strategy(mut self, strategy: Arc<dyn FlowStrategy>) -> Self {
        self.flow = Some(strategy);
        self
    }

    pub fn vertical_id(&self) -> &str {
        &self.vertical_id
    }

    pub fn rank_strategy(&self) -> Option<&dyn RankStrategy> {
        self.rank.as_deref()
    }

    pub fn volume_strategy(&self) -> Option<&dyn VolumeStrategy> {
        self.volume.as_deref()
    }

    pub fn flow_strategy(&self) -> Option<&dyn FlowStrategy> {
        self.flow.as_deref()
    }

    /// Names of the overridden capabilities.
    pub fn capabilities(&self) -> Vec<&'static str> {
        let mut caps = Vec::new();
        if self.rank.is_some() {
            caps.push("rank");
        }
        if self.volume.is_some() {
            caps.push("volume");
        }
        if self.flow.is_some() {
            caps.push("flow");
        }
        caps
    }
}

impl fmt::Debug for VerticalAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerticalAdapter")
            .field("vertical_id", &self.vertical_id)
            .field("capabilities", &self.capabilities())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_reflect_overrides() {
        let adapter = VerticalAdapter::new("party")
            .with_flow_strategy(Arc::new(PartyPlanFlow::new(8)))
            .with_volume_strategy(Arc::new(SubscriptionVolume::new(0.5)));
        assert_eq!(adapter.capabilities(), vec!["volume", "flow"]);
        assert!(adapter.rank_strategy().is_none());
        assert!(format!("{adapter:?}").contains("party"));
    }
}
