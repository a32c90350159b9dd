//! Actions command implementation.

use super::{CliError, OutputFormat};
use craftopt::craft::{Action, ActionCatalog, EffectKind};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonAction {
    key: &'static str,
    name: &'static str,
    cp_cost: f64,
    durability_cost: f64,
    success_probability: f64,
    active_turns: Option<u32>,
}

fn active_turns(action: &Action) -> Option<u32> {
    match action.kind {
        EffectKind::CountDown { turns } => Some(turns),
        EffectKind::Immediate | EffectKind::CountUp => None,
    }
}

/// Execute the actions command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub(crate) fn execute(format: OutputFormat) -> Result<(), CliError> {
    let catalog = ActionCatalog::standard();

    match format {
        OutputFormat::Text => {
            println!("{:<20} {:<24} {:>4} {:>4} {:>5} {:>5}", "KEY", "NAME", "CP", "DUR", "SUCC", "TURNS");
            for action in catalog.iter() {
                let turns = active_turns(action).map_or_else(String::new, |t| t.to_string());
                println!(
                    "{:<20} {:<24} {:>4.0} {:>4.0} {:>5.2} {:>5}",
                    action.id.short_name(),
                    action.name,
                    action.cp_cost,
                    action.durability_cost,
                    action.success_probability,
                    turns
                );
            }
        }
        OutputFormat::Json => {
            let actions: Vec<JsonAction> = catalog
                .iter()
                .map(|action| JsonAction {
                    key: action.id.short_name(),
                    name: action.name,
                    cp_cost: action.cp_cost,
                    durability_cost: action.durability_cost,
                    success_probability: action.success_probability,
                    active_turns: active_turns(action),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&actions)?);
        }
    }

    Ok(())
}
