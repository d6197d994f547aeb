use serde::{Deserialize, Serialize};

use crate::error::GoalError;
use crate::flow::DailyFlowConfig;

/// What kind of outcome a representative is aiming for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    /// A monthly income figure
    Income,
    /// A named rank of the compensation plan
    Rank,
    /// A raw group volume target
    Volume,
}

impl std::str::FromStr for GoalType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(GoalType::Income),
            "rank" => Ok(GoalType::Rank),
            "volume" => Ok(GoalType::Volume),
            other => Err(format!("unknown goal type '{other}' (expected income, rank or volume)")),
        }
    }
}

impl std::fmt::Display for GoalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GoalType::Income => "income",
            GoalType::Rank => "rank",
            GoalType::Volume => "volume",
        };
        f.write_str(s)
    }
}

/// Per-call overrides of the vertical's flow configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_to_qualified_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualified_to_close_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_share: Option<f64>,
}

impl FlowOverrides {
    pub fn is_empty(&self) -> bool {
        self == &FlowOverrides::default()
    }

    /// Layer these overrides over a base configuration.
    pub fn apply(&self, base: &DailyFlowConfig) -> DailyFlowConfig {
        let mut config = base.clone();
        if let Some(rate) = self.contact_to_qualified_rate {
            config.contact_to_qualified_rate = rate;
        }
        if let Some(rate) = self.qualified_to_close_rate {
            config.qualified_to_close_rate = rate;
        }
        if let Some(share) = self.customer_share {
            config.customer_share = share;
        }
        config
    }

    fn validate(&self) -> Result<(), GoalError> {
        for (field, rate) in [
            ("overrides.contact_to_qualified_rate", self.contact_to_qualified_rate),
            ("overrides.qualified_to_close_rate", self.qualified_to_close_rate),
        ] {
            if let Some(rate) = rate {
                if !(rate.is_finite() && rate > 0.0 && rate <= 1.0) {
                    return Err(GoalError::invalid_input(
                        field,
                        format!("must be in (0, 1], got {rate}"),
                    ));
                }
            }
        }
        if let Some(share) = self.customer_share {
            if !(0.0..=1.0).contains(&share) {
                return Err(GoalError::invalid_input(
                    "overrides.customer_share",
                    format!("must be in [0, 1], got {share}"),
                ));
            }
        }
        Ok(())
    }
}

/// A representative's goal, as handed to the engine.
///
/// Income and volume goals carry their figure in `target_value`; rank goals
/// name their rank in `target_rank`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalCalculationInput {
    pub goal_type: GoalType,
    #[serde(default)]
    pub target_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_rank: Option<String>,
    pub horizon_months: f64,
    pub vertical_id: String,
    pub company_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_rank: Option<String>,
    #[serde(default)]
    pub current_volume: f64,
    #[serde(default, skip_serializing_if = "FlowOverrides::is_empty")]
    pub overrides: FlowOverrides,
}

impl GoalCalculationInput {
    fn new(goal_type: GoalType, company_id: &str, vertical_id: &str, horizon_months: f64) -> Self {
        Self {
            goal_type,
            target_value: 0.0,
            target_rank: None,
            horizon_months,
            vertical_id: vertical_id.to_string(),
            company_id: company_id.to_string(),
            current_rank: None,
            current_volume: 0.0,
            overrides: FlowOverrides::default(),
        }
    }

    /// Reach a monthly income.
    pub fn income(company_id: &str, vertical_id: &str, amount: f64, horizon_months: f64) -> Self {
        Self {
            target_value: amount,
            ..Self::new(GoalType::Income, company_id, vertical_id, horizon_months)
        }
    }

    /// Reach a named rank.
    pub fn rank(company_id: &str, vertical_id: &str, rank: &str, horizon_months: f64) -> Self {
        Self {
            target_rank: Some(rank.to_string()),
            ..Self::new(GoalType::Rank, company_id, vertical_id, horizon_months)
        }
    }

    /// Reach a group volume.
    pub fn volume(company_id: &str, vertical_id: &str, volume: f64, horizon_months: f64) -> Self {
        Self {
            target_value: volume,
            ..Self::new(GoalType::Volume, company_id, vertical_id, horizon_months)
        }
    }

    pub fn with_current_rank(mut self, rank: &str) -> Self {
        self.current_rank = Some(rank.to_string());
        self
    }

    pub fn with_current_volume(mut self, volume: f64) -> Self {
        self.current_volume = volume;
        self
    }

    pub fn with_overrides(mut self, overrides: FlowOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Reject malformed input before any lookup happens.
    ///
    /// # Errors
    ///
    /// Returns [`GoalError::InvalidInput`] naming the offending field.
    pub fn validate(&self) -> Result<(), GoalError> {
        match self.goal_type {
            GoalType::Income | GoalType::Volume => {
                if !self.target_value.is_finite() || self.target_value <= 0.0 {
                    return Err(GoalError::invalid_input(
                        "target_value",
                        format!("must be positive, got {}", self.target_value),
                    ));
                }
            }
            GoalType::Rank => {
                if self.target_rank.as_deref().map_or(true, |r| r.trim().is_empty()) {
                    return Err(GoalError::invalid_input(
                        "target_rank",
                        "rank goals must name a rank",
                    ));
                }
            }
        }

        if !self.horizon_months.is_finite() || self.horizon_months <= 0.0 {
            return Err(GoalError::invalid_input(
                "horizon_months",
                format!("must be positive, got {}", self.horizon_months),
            ));
        }
        if !self.current_volume.is_finite() || self.current_volume < 0.0 {
            return Err(GoalError::invalid_input(
                "current_volume",
                format!("must be non-negative, got {}", self.current_volume),
            ));
        }
        if self.company_id.trim().is_empty() {
            return Err(GoalError::invalid_input("company_id", "must not be empty"));
        }
        if self.vertical_id.trim().is_empty() {
            return Err(GoalError::invalid_input("vertical_id", "must not be empty"));
        }
        self.overrides.validate()
    }
}
