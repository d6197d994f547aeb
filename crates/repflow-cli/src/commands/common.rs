//! Shared helpers for commands that read the plan catalog.

use std::path::Path;

use repflow_core::{Catalog, Config};

/// Load the catalog from `override_path`, else from the configured path.
pub fn load_catalog(override_path: Option<&Path>) -> Result<Catalog, Box<dyn std::error::Error>> {
    let path = match override_path {
        Some(path) => path.to_path_buf(),
        None => Config::load_or_default().catalog_path()?,
    };
    if !path.exists() {
        return Err(format!(
            "no plan catalog at {} (pass --catalog or run `config set catalog_path <path>`)",
            path.display()
        )
        .into());
    }
    tracing::debug!(path = %path.display(), "using plan catalog");
    Ok(Catalog::load(&path)?)
}

/// Format a volume or currency figure without a trailing `.0`.
pub fn fmt_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}
