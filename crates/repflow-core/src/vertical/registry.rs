use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{LadderFloorRanks, PartyPlanFlow, SubscriptionVolume, VerticalAdapter};
use crate::error::GoalError;

/// Configuration of the built-in overrides for one vertical.
///
/// ```toml
/// [adapters.home-parties]
/// party_plan = { guests_per_party = 8 }
/// subscription = { retention_rate = 0.6 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdapterSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party_plan: Option<PartyPlanSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription: Option<SubscriptionSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ladder_floor: Option<LadderFloorSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyPlanSpec {
    pub guests_per_party: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionSpec {
    pub retention_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LadderFloorSpec {
    pub min_order: u32,
}

impl AdapterSpec {
    /// Build the adapter for `vertical_id`.
    ///
    /// # Errors
    ///
    /// Returns [`GoalError::InvalidConfig`] if a parameter is out of range.
    pub fn build(&self, vertical_id: &str) -> Result<VerticalAdapter, GoalError> {
        let mut adapter = VerticalAdapter::new(vertical_id);

        if let Some(spec) = &self.ladder_floor {
            adapter = adapter.with_rank_strategy(Arc::new(LadderFloorRanks::new(spec.min_order)));
        }
        if let Some(spec) = &self.subscription {
            let rate = spec.retention_rate;
            if !(rate.is_finite() && rate > 0.0 && rate <= 1.0) {
                return Err(GoalError::invalid_config(
                    &format!("adapters.{vertical_id}.subscription.retention_rate"),
                    format!("must be in (0, 1], got {rate}"),
                ));
            }
            adapter = adapter.with_volume_strategy(Arc::new(SubscriptionVolume::new(rate)));
        }
        if let Some(spec) = &self.party_plan {
            if spec.guests_per_party == 0 {
                return Err(GoalError::invalid_config(
                    &format!("adapters.{vertical_id}.party_plan.guests_per_party"),
                    "must be at least 1",
                ));
            }
            adapter =
                adapter.with_flow_strategy(Arc::new(PartyPlanFlow::new(spec.guests_per_party)));
        }

        Ok(adapter)
    }
}

/// The adapter chosen for a vertical.
#[derive(Debug, Clone)]
pub struct AdapterResolution {
    pub adapter: VerticalAdapter,
    /// No adapter was registered; `adapter` carries no overrides
    pub fell_back: bool,
}

/// Vertical adapters keyed by vertical id.
#[derive(Debug, Clone, Default)]
pub struct AdapterRegistry {
    adapters: BTreeMap<String, VerticalAdapter>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from configured specs.
    ///
    /// # Errors
    ///
    /// Returns an error if any spec has an out-of-range parameter.
    pub fn from_specs(specs: &BTreeMap<String, AdapterSpec>) -> Result<Self, GoalError> {
        let mut registry = Self::new();
        for (vertical_id, spec) in specs {
            registry.register(spec.build(vertical_id)?);
        }
        Ok(registry)
    }

    /// Register an adapter, returning the one it replaces.
    pub fn register(&mut self, adapter: VerticalAdapter) -> Option<VerticalAdapter> {
        self.adapters.insert(adapter.vertical_id().to_string(), adapter)
    }

    pub fn get(&self, vertical_id: &str) -> Option<&VerticalAdapter> {
        self.adapters.get(vertical_id)
    }

    pub fn vertical_ids(&self) -> Vec<&str> {
        self.adapters.keys().map(String::as_str).collect()
    }

    pub fn adapters(&self) -> impl Iterator<Item = &VerticalAdapter> {
        self.adapters.values()
    }

    /// The adapter for a vertical, or an override-free default adapter.
    pub fn resolve(&self, vertical_id: &str) -> AdapterResolution {
        match self.adapters.get(vertical_id) {
            Some(adapter) => AdapterResolution {
                adapter: adapter.clone(),
                fell_back: false,
            },
            None => {
                tracing::warn!(
                    vertical = vertical_id,
                    "no adapter registered, using default formulas"
                );
                AdapterResolution {
                    adapter: VerticalAdapter::new(vertical_id),
                    fell_back: true,
                }
            }
        }
    }
}
