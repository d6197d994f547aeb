//! # Repflow Core Library
//!
//! This library turns a sales representative's goal (an income figure, a
//! compensation-plan rank, or a raw volume target) into a feasibility-checked
//! daily and weekly activity plan. The CLI is a thin layer over the same
//! library.
//!
//! ## Architecture
//!
//! - **Plans**: Validated, immutable compensation-plan rank ladders
//! - **Verticals**: Per-industry overrides of the generic formulas, resolved
//!   through a registry built at composition time
//! - **Resolution stages**: Rank resolution, volume-to-headcount conversion
//!   and daily flow distribution
//! - **Storage**: TOML plan catalog and TOML user configuration
//!
//! ## Key Components
//!
//! - [`GoalEngine`]: Pure, stateless goal calculation
//! - [`CompensationPlan`]: A company's rank ladder
//! - [`AdapterRegistry`]: Vertical adapters keyed by vertical id
//! - [`Catalog`]: Plan catalog loader
//! - [`Config`]: Application configuration management

pub mod error;
pub mod flow;
pub mod goal;
pub mod plan;
pub mod population;
pub mod rank;
pub mod storage;
pub mod vertical;

pub use error::{ConfigError, CoreError, GoalError, PlanError};
pub use flow::{
    DailyFlowConfig, DailyTargets, FlowConfigSet, FlowPlan, FollowUpCadence, WeeklyTargets,
};
pub use goal::{
    FlowOverrides, GoalCalculationInput, GoalCalculationResult, GoalEngine, GoalType, GoalWarning,
};
pub use plan::{CompensationPlan, InMemoryPlanStore, PlanStore, RankDefinition};
pub use population::Headcount;
pub use rank::RankResolution;
pub use storage::{Catalog, Config};
pub use vertical::{
    AdapterRegistry, AdapterResolution, AdapterSpec, FlowStrategy, RankStrategy, VerticalAdapter,
    VolumeStrategy,
};
