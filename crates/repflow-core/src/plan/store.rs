use std::collections::BTreeMap;

use super::CompensationPlan;
use crate::error::{GoalError, PlanError};

/// Read-only lookup of compensation plans by company id.
///
/// Implementations are populated by the caller's data layer before any
/// calculation runs; the engine only reads from them.
pub trait PlanStore: Send + Sync {
    /// Look up the plan for a company.
    fn get_plan(&self, company_id: &str) -> Result<&CompensationPlan, GoalError>;

    /// Known company ids, sorted.
    fn company_ids(&self) -> Vec<&str>;
}

/// Plan store backed by an in-memory map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPlanStore {
    plans: BTreeMap<String, CompensationPlan>,
}

impl InMemoryPlanStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from validated plans.
    ///
    /// # Errors
    ///
    /// Returns an error if two plans share a company id.
    pub fn from_plans(
        plans: impl IntoIterator<Item = CompensationPlan>,
    ) -> Result<Self, PlanError> {
        let mut map = BTreeMap::new();
        for plan in plans {
            let company_id = plan.company_id().to_string();
            if map.contains_key(&company_id) {
                return Err(PlanError::DuplicateCompany(company_id));
            }
            map.insert(company_id, plan);
        }
        Ok(Self { plans: map })
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    pub fn plans(&self) -> impl Iterator<Item = &CompensationPlan> {
        self.plans.values()
    }
}

impl PlanStore for InMemoryPlanStore {
    fn get_plan(&self, company_id: &str) -> Result<&CompensationPlan, GoalError> {
        self.plans
            .get(company_id)
            .ok_or_else(|| GoalError::CompanyNotFound(company_id.to_string()))
    }

    fn company_ids(&self) -> Vec<&str> {
        self.plans.keys().map(String::as_str).collect()
    }
}
