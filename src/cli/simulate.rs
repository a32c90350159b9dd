//! Simulate command implementation.

use super::output::{
    JsonReport, format_monte_carlo, format_run_header, format_sequence, format_trace,
};
use super::settings::Settings;
use super::{CliError, OutputFormat, resolve_seed};
use craftopt::craft::{TraceStep, simulate_traced};
use craftopt::solver::run_monte_carlo;
use std::path::PathBuf;

/// Execute the simulate command.
///
/// # Errors
///
/// Returns an error if the settings cannot be loaded or are invalid.
pub(crate) fn execute(
    settings: PathBuf,
    seed: Option<u64>,
    runs: Option<usize>,
    format: OutputFormat,
) -> Result<(), CliError> {
    let settings = Settings::load(&settings)?;
    let synth = settings.synth()?;
    let sequence = settings.sequence(&synth)?;
    if sequence.is_empty() {
        return Err(CliError::new("settings contain no sequence to simulate"));
    }
    let seed = resolve_seed(seed, settings.seed);
    let runs = runs.unwrap_or(settings.max_montecarlo_runs);

    let mut trace: Vec<TraceStep> = Vec::with_capacity(sequence.len() + 1);
    let outcome = simulate_traced(&sequence, &synth, &mut trace);
    let report = run_monte_carlo(&sequence, &synth, runs, seed)?;

    match format {
        OutputFormat::Text => {
            print!("{}", format_run_header(seed, synth.use_conditions()));
            println!("Sequence: {}", format_sequence(&sequence));
            println!();
            println!("Probabilistic Result");
            print!("{}", format_trace(&trace, &outcome));
            println!();
            print!("{}", format_monte_carlo(&report));
        }
        OutputFormat::Json => {
            let json = JsonReport::new(seed, &sequence, &outcome, report);
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(())
}
