//! Goal calculation command.

use std::error::Error;
use std::path::Path;

use clap::Subcommand;
use repflow_core::{Config, FlowOverrides, GoalCalculationInput, GoalCalculationResult, GoalType};

use super::common::{fmt_amount, load_catalog};

#[derive(Subcommand)]
pub enum GoalAction {
    /// Calculate the daily activity plan for a goal
    Calc {
        /// Goal type: income, rank or volume
        #[arg(long = "type")]
        goal_type: GoalType,
        /// Income or volume figure, or the rank name for rank goals
        #[arg(long)]
        target: String,
        /// Horizon in months (defaults to goal.horizon_months)
        #[arg(long)]
        horizon: Option<f64>,
        /// Company id (defaults to goal.company_id)
        #[arg(long)]
        company: Option<String>,
        /// Vertical id (defaults to goal.vertical_id, then the plan's vertical)
        #[arg(long)]
        vertical: Option<String>,
        /// Current rank name
        #[arg(long)]
        current_rank: Option<String>,
        /// Current group volume
        #[arg(long, default_value_t = 0.0)]
        current_volume: f64,
        /// Override contact-to-qualified rate
        #[arg(long)]
        contact_rate: Option<f64>,
        /// Override qualified-to-close rate
        #[arg(long)]
        close_rate: Option<f64>,
        /// Override customer share (0-1)
        #[arg(long)]
        customer_share: Option<f64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: GoalAction, catalog_path: Option<&Path>) -> Result<(), Box<dyn Error>> {
    match action {
        GoalAction::Calc {
            goal_type,
            target,
            horizon,
            company,
            vertical,
            current_rank,
            current_volume,
            contact_rate,
            close_rate,
            customer_share,
            json,
        } => {
            let config = Config::load_or_default();
            let catalog = load_catalog(catalog_path)?;

            let company_id = company
                .or_else(|| config.goal.company_id.clone())
                .ok_or("no company given (pass --company or set goal.company_id)")?;
            let vertical_id = match vertical.or_else(|| config.goal.vertical_id.clone()) {
                Some(v) => v,
                None => catalog
                    .find_plan(&company_id)
                    .map(|p| p.vertical_id().to_string())
                    .ok_or_else(|| format!("company not found: {company_id}"))?,
            };
            let horizon_months = horizon
                .or(config.goal.horizon_months)
                .ok_or("no horizon given (pass --horizon or set goal.horizon_months)")?;

            let (company, vertical, horizon) = (&company_id, &vertical_id, horizon_months);
            let mut input = match goal_type {
                GoalType::Rank => GoalCalculationInput::rank(company, vertical, &target, horizon),
                GoalType::Income | GoalType::Volume => {
                    let value: f64 = target
                        .parse()
                        .map_err(|_| format!("target '{target}' is not a number"))?;
                    if goal_type == GoalType::Income {
                        GoalCalculationInput::income(company, vertical, value, horizon)
                    } else {
                        GoalCalculationInput::volume(company, vertical, value, horizon)
                    }
                }
            };
            if let Some(rank) = current_rank {
                input = input.with_current_rank(&rank);
            }
            input = input.with_current_volume(current_volume).with_overrides(FlowOverrides {
                contact_to_qualified_rate: contact_rate,
                qualified_to_close_rate: close_rate,
                customer_share,
            });

            let engine = catalog.into_engine()?;
            let result = engine.calculate(&input)?;

            if json || config.output.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_result(&result, horizon_months);
            }
        }
    }
    Ok(())
}

fn print_result(result: &GoalCalculationResult, horizon_months: f64) {
    println!("\nGoal Plan ({} / {})\n", result.company_id, result.vertical_id);
    println!("{}", "=".repeat(50));
    println!(
        "  Target rank:      {} (order {})",
        result.resolved_rank.name, result.resolved_rank.order
    );
    println!("  Required volume:  {}", fmt_amount(result.required_volume));
    println!("  Volume to build:  {}", fmt_amount(result.volume_delta));
    println!(
        "  People needed:    {} customers, {} partners",
        result.required_headcount.customers, result.required_headcount.partners
    );
    println!(
        "  New contacts:     {} over {} work days ({} months)",
        result.needed_contacts, result.work_days, horizon_months
    );

    println!("\n  {:<16}{:>8}{:>8}", "", "Daily", "Weekly");
    println!(
        "  {:<16}{:>8}{:>8}",
        "New contacts", result.daily_targets.new_contacts, result.weekly_targets.new_contacts
    );
    println!(
        "  {:<16}{:>8}{:>8}",
        "Follow-ups", result.daily_targets.follow_ups, result.weekly_targets.follow_ups
    );
    println!(
        "  {:<16}{:>8}{:>8}",
        "Reactivations", result.daily_targets.reactivations, result.weekly_targets.reactivations
    );

    println!("\n  Feasible: {}", if result.feasible { "yes" } else { "no" });
    for warning in &result.warnings {
        println!("  ! [{}] {}", warning.key(), warning);
    }
    println!("{}", "=".repeat(50));
}
