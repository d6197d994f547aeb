mod catalog;
mod config;

pub use catalog::Catalog;
pub use config::Config;

use std::path::PathBuf;

use crate::error::Result;

/// Returns `~/.config/repflow[-dev]/` based on REPFLOW_ENV.
///
/// Set REPFLOW_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("REPFLOW_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("repflow-dev")
    } else {
        base_dir.join("repflow")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
