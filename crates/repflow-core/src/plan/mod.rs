//! Compensation plan reference data.
//!
//! A compensation plan is a company's ordered rank ladder. Plans are
//! immutable once built: the only constructor validates the ladder, so
//! every `CompensationPlan` in the system is well-formed.

mod store;

pub use store::{InMemoryPlanStore, PlanStore};

use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// A named tier in a compensation plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankDefinition {
    pub name: String,
    /// Position in the ladder; strictly increasing from the entry rank
    pub order: u32,
    #[serde(default)]
    pub required_personal_volume: f64,
    pub required_group_volume: f64,
    pub estimated_payout: f64,
    #[serde(default = "default_qualification_window")]
    pub qualification_window_months: u32,
}

fn default_qualification_window() -> u32 {
    1
}

impl RankDefinition {
    pub fn new(
        name: impl Into<String>,
        order: u32,
        required_group_volume: f64,
        estimated_payout: f64,
    ) -> Self {
        Self {
            name: name.into(),
            order,
            required_personal_volume: 0.0,
            required_group_volume,
            estimated_payout,
            qualification_window_months: default_qualification_window(),
        }
    }

    pub fn with_personal_volume(mut self, volume: f64) -> Self {
        self.required_personal_volume = volume;
        self
    }

    pub fn with_qualification_window(mut self, months: u32) -> Self {
        self.qualification_window_months = months;
        self
    }
}

/// A company's rank ladder, ordered from entry rank to top rank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompensationPlan {
    company_id: String,
    vertical_id: String,
    ranks: Vec<RankDefinition>,
}

impl CompensationPlan {
    /// Build a plan, sorting ranks by order index and validating the ladder.
    ///
    /// # Errors
    ///
    /// Returns an error if the ladder is empty, a rank name repeats, a number
    /// is negative or non-finite, or order index, group volume and payout do
    /// not all strictly increase together.
    pub fn new(
        company_id: impl Into<String>,
        vertical_id: impl Into<String>,
        mut ranks: Vec<RankDefinition>,
    ) -> Result<Self, PlanError> {
        let company_id = company_id.into();
        if ranks.is_empty() {
            return Err(PlanError::EmptyLadder(company_id));
        }

        ranks.sort_by_key(|r| r.order);

        for (i, rank) in ranks.iter().enumerate() {
            if ranks[..i].iter().any(|other| other.name == rank.name) {
                return Err(PlanError::DuplicateRank {
                    company_id,
                    rank: rank.name.clone(),
                });
            }

            for (field, value) in [
                ("required_personal_volume", rank.required_personal_volume),
                ("required_group_volume", rank.required_group_volume),
                ("estimated_payout", rank.estimated_payout),
            ] {
                if !value.is_finite() || value < 0.0 {
                    return Err(PlanError::InvalidNumber {
                        company_id,
                        rank: rank.name.clone(),
                        field: field.to_string(),
                        value,
                    });
                }
            }

            if i == 0 {
                continue;
            }
            let below = &ranks[i - 1];
            let field = if rank.order == below.order {
                Some("order")
            } else if rank.required_group_volume <= below.required_group_volume {
                Some("required_group_volume")
            } else if rank.estimated_payout <= below.estimated_payout {
                Some("estimated_payout")
            } else {
                None
            };
            if let Some(field) = field {
                return Err(PlanError::NotIncreasing {
                    company_id,
                    rank: rank.name.clone(),
                    field: field.to_string(),
                });
            }
        }

        Ok(Self {
            company_id,
            vertical_id: vertical_id.into(),
            ranks,
        })
    }

    pub fn company_id(&self) -> &str {
        &self.company_id
    }

    pub fn vertical_id(&self) -> &str {
        &self.vertical_id
    }

    /// Ranks in ascending order.
    pub fn ranks(&self) -> &[RankDefinition] {
        &self.ranks
    }

    pub fn find_rank(&self, name: &str) -> Option<&RankDefinition> {
        self.ranks.iter().find(|r| r.name == name)
    }

    /// The top rank. A plan always has at least one rank.
    pub fn highest_rank(&self) -> &RankDefinition {
        // Non-empty is checked in `new`.
        &self.ranks[self.ranks.len() - 1]
    }

    /// Whether `rank` is one of this plan's ranks, field for field.
    pub fn contains(&self, rank: &RankDefinition) -> bool {
        self.ranks.iter().any(|r| r == rank)
    }
}

impl<'de> Deserialize<'de> for CompensationPlan {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawPlan {
            company_id: String,
            vertical_id: String,
            ranks: Vec<RankDefinition>,
        }

        let raw = RawPlan::deserialize(deserializer)?;
        CompensationPlan::new(raw.company_id, raw.vertical_id, raw.ranks)
            .map_err(serde::de::Error::custom)
    }
}
