//! Core error types for repflow-core.
//!
//! This module defines the error hierarchy using thiserror. Calculation
//! failures surface as [`GoalError`]; malformed reference data as
//! [`PlanError`]; configuration problems as [`ConfigError`].

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for repflow-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Goal calculation errors
    #[error("Goal calculation error: {0}")]
    Goal(#[from] GoalError),

    /// Compensation plan errors
    #[error("Plan error: {0}")]
    Plan(#[from] PlanError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Hard failures of a goal calculation. Every variant aborts the call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GoalError {
    /// Malformed input, detected before any lookup, or a target too large
    /// to plan
    #[error("Invalid input for '{field}': {message}")]
    InvalidInput { field: String, message: String },

    /// Unknown company id
    #[error("Company not found: {0}")]
    CompanyNotFound(String),

    /// Rank name not present in the company's plan
    #[error("Rank '{rank}' not found in plan for company '{company_id}'")]
    RankNotFound { company_id: String, rank: String },

    /// An adapter override broke the plan's invariants
    #[error("Adapter for vertical '{vertical_id}' returned an invalid {stage} result: {message}")]
    InvalidAdapterResult {
        vertical_id: String,
        stage: String,
        message: String,
    },

    /// No flow configuration for the vertical and no default
    #[error("No flow configuration for vertical '{0}' and no default configured")]
    MissingFlowConfig(String),

    /// Flow configuration present but out of range
    #[error("Invalid flow configuration for '{key}': {message}")]
    InvalidConfig { key: String, message: String },
}

impl GoalError {
    pub(crate) fn invalid_input(field: &str, message: impl Into<String>) -> Self {
        GoalError::InvalidInput {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn invalid_config(key: &str, message: impl Into<String>) -> Self {
        GoalError::InvalidConfig {
            key: key.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn invalid_adapter(
        vertical_id: &str,
        stage: &str,
        message: impl Into<String>,
    ) -> Self {
        GoalError::InvalidAdapterResult {
            vertical_id: vertical_id.to_string(),
            stage: stage.to_string(),
            message: message.into(),
        }
    }
}

/// Compensation plan validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    /// Plan has no ranks
    #[error("Plan for company '{0}' has no ranks")]
    EmptyLadder(String),

    /// Two ranks share a name
    #[error("Plan for company '{company_id}' defines rank '{rank}' more than once")]
    DuplicateRank { company_id: String, rank: String },

    /// Ladder is not strictly increasing
    #[error("Plan for company '{company_id}': rank '{rank}' needs a higher {field} than below")]
    NotIncreasing {
        company_id: String,
        rank: String,
        field: String,
    },

    /// Negative or non-finite number
    #[error("Plan for company '{company_id}': rank '{rank}' has invalid {field} ({value})")]
    InvalidNumber {
        company_id: String,
        rank: String,
        field: String,
        value: f64,
    },

    /// Same company defined twice in one catalog
    #[error("Company '{0}' is defined more than once")]
    DuplicateCompany(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl From<GoalError> for ConfigError {
    fn from(err: GoalError) -> Self {
        match err {
            GoalError::InvalidConfig { key, message } => ConfigError::InvalidValue { key, message },
            other => ConfigError::ParseFailed(other.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
