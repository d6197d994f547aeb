use std::collections::BTreeSet;
use std::error::Error;
use std::path::Path;

use clap::Subcommand;
use repflow_core::AdapterRegistry;

use super::common::load_catalog;

#[derive(Subcommand)]
pub enum VerticalAction {
    /// List verticals with their flow configuration source and adapters
    List,
}

pub fn run(action: VerticalAction, catalog_path: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let catalog = load_catalog(catalog_path)?;

    match action {
        VerticalAction::List => {
            let registry = AdapterRegistry::from_specs(&catalog.adapters)?;

            let verticals: BTreeSet<&str> = catalog
                .plans
                .iter()
                .map(|p| p.vertical_id())
                .chain(catalog.verticals.keys().map(String::as_str))
                .chain(registry.vertical_ids())
                .collect();

            if verticals.is_empty() {
                println!("No verticals in catalog.");
                return Ok(());
            }

            for vertical_id in verticals {
                let flow = if catalog.verticals.contains_key(vertical_id) {
                    "own flow config"
                } else if catalog.flow.is_some() {
                    "default flow config"
                } else {
                    "no flow config"
                };
                let adapter = match registry.get(vertical_id) {
                    Some(adapter) if adapter.capabilities().is_empty() => {
                        "adapter: generic".to_string()
                    }
                    Some(adapter) => format!("adapter: {}", adapter.capabilities().join(", ")),
                    None => "no adapter (falls back)".to_string(),
                };
                println!("{vertical_id:<20} {flow:<20} {adapter}");
            }
        }
    }
    Ok(())
}
