//! TOML plan catalog.
//!
//! The catalog is the reference data the engine calculates against:
//! compensation plans, funnel configuration per vertical, and the built-in
//! adapters enabled per vertical.
//!
//! ```toml
//! [[plans]]
//! company_id = "acme"
//! vertical_id = "wellness"
//!
//! [[plans.ranks]]
//! name = "Starter"
//! order = 0
//! required_group_volume = 0.0
//! estimated_payout = 0.0
//!
//! [flow]
//! contact_to_qualified_rate = 0.3
//! qualified_to_close_rate = 0.2
//! work_days_per_week = 5
//! reactivation_fraction = 0.1
//! average_volume_per_person = 250.0
//! follow_up = { max_touches = 3, interval_days = 2 }
//!
//! [adapters.home-parties]
//! party_plan = { guests_per_party = 8 }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::flow::{DailyFlowConfig, FlowConfigSet};
use crate::goal::GoalEngine;
use crate::plan::{CompensationPlan, InMemoryPlanStore};
use crate::vertical::{AdapterRegistry, AdapterSpec};

/// Reference data loaded from a catalog file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub plans: Vec<CompensationPlan>,
    /// Funnel configuration for verticals without their own section
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow: Option<DailyFlowConfig>,
    #[serde(default)]
    pub verticals: BTreeMap<String, DailyFlowConfig>,
    #[serde(default)]
    pub adapters: BTreeMap<String, AdapterSpec>,
}

impl Catalog {
    /// Parse and validate a catalog document.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed, a plan's ladder is invalid,
    /// or a flow configuration is out of range.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let catalog: Catalog = toml::from_str(content)?;
        catalog.flow_configs().validate()?;
        Ok(catalog)
    }

    /// Load a catalog file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid catalog.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Custom(format!("cannot read catalog at {}: {e}", path.display()))
        })?;
        tracing::debug!(path = %path.display(), "loading catalog");
        Self::from_toml_str(&content)
    }

    pub fn flow_configs(&self) -> FlowConfigSet {
        FlowConfigSet {
            default: self.flow.clone(),
            verticals: self.verticals.clone(),
        }
    }

    pub fn find_plan(&self, company_id: &str) -> Option<&CompensationPlan> {
        self.plans.iter().find(|p| p.company_id() == company_id)
    }

    /// Compose an engine over this catalog's data.
    ///
    /// # Errors
    ///
    /// Returns an error if two plans share a company id or an adapter spec is
    /// out of range.
    pub fn into_engine(self) -> Result<GoalEngine> {
        let flow_configs = self.flow_configs();
        let adapters = AdapterRegistry::from_specs(&self.adapters)?;
        let plans = InMemoryPlanStore::from_plans(self.plans)?;
        Ok(GoalEngine::new(plans, adapters, flow_configs))
    }
}
