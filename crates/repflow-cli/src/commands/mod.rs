pub mod common;
pub mod completions;
pub mod config;
pub mod goal;
pub mod plan;
pub mod vertical;
