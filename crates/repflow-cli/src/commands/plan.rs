use std::error::Error;
use std::path::Path;

use clap::Subcommand;

use super::common::{fmt_amount, load_catalog};

#[derive(Subcommand)]
pub enum PlanAction {
    /// List companies in the catalog
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a company's rank ladder
    Show {
        /// Company id
        company: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: PlanAction, catalog_path: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let catalog = load_catalog(catalog_path)?;

    match action {
        PlanAction::List { json } => {
            if json {
                let summary: Vec<_> = catalog
                    .plans
                    .iter()
                    .map(|p| {
                        serde_json::json!({
                            "company_id": p.company_id(),
                            "vertical_id": p.vertical_id(),
                            "ranks": p.ranks().len(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else if catalog.plans.is_empty() {
                println!("No plans in catalog.");
            } else {
                for plan in &catalog.plans {
                    println!(
                        "{:<20} {:<20} {} ranks",
                        plan.company_id(),
                        plan.vertical_id(),
                        plan.ranks().len()
                    );
                }
            }
        }
        PlanAction::Show { company, json } => {
            let plan = catalog
                .find_plan(&company)
                .ok_or_else(|| format!("company not found: {company}"))?;
            if json {
                println!("{}", serde_json::to_string_pretty(plan)?);
                return Ok(());
            }

            println!("\n{} ({})\n", plan.company_id(), plan.vertical_id());
            println!(
                "  {:>5}  {:<20}{:>12}{:>12}{:>12}{:>8}",
                "Order", "Rank", "Personal", "Group", "Payout", "Window"
            );
            for rank in plan.ranks() {
                println!(
                    "  {:>5}  {:<20}{:>12}{:>12}{:>12}{:>7}m",
                    rank.order,
                    rank.name,
                    fmt_amount(rank.required_personal_volume),
                    fmt_amount(rank.required_group_volume),
                    fmt_amount(rank.estimated_payout),
                    rank.qualification_window_months
                );
            }
        }
    }
    Ok(())
}
