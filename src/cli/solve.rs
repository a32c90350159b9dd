//! Solve command implementation: tree-based search seeded from the settings sequence.

use super::output::{
    JsonReport, format_monte_carlo, format_run_header, format_solver_text, format_trace,
};
use super::settings::Settings;
use super::{CliError, OutputFormat, generation_bar, resolve_seed};
use craftopt::craft::{TraceStep, simulate_traced};
use craftopt::gp::EvolutionConfig;
use craftopt::solver::{GpConfig, run_gp, run_monte_carlo};
use std::path::PathBuf;

/// Execute the solve command.
///
/// # Errors
///
/// Returns an error if the settings cannot be loaded or the solver
/// configuration is invalid.
pub(crate) fn execute(
    settings: PathBuf,
    seed: Option<u64>,
    format: OutputFormat,
    progress: bool,
) -> Result<(), CliError> {
    let settings = Settings::load(&settings)?;
    let synth = settings.synth()?;
    let seed_sequence = settings.sequence(&synth)?;
    let seed = resolve_seed(seed, settings.seed);

    let config = GpConfig {
        fitness: settings.fitness(),
        seed,
        evolution: EvolutionConfig {
            population_size: settings.solver.population,
            offspring_size: settings.solver.population,
            generations: settings.solver.generations,
            ..EvolutionConfig::default()
        },
        ..GpConfig::default()
    };

    let pb = generation_bar(config.evolution.generations, progress);
    let result = run_gp(&synth, &config, &seed_sequence, |_| {
        if let Some(pb) = &pb {
            pb.inc(1);
        }
        true
    })?;
    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let report = run_monte_carlo(&result.best_sequence, &synth, settings.max_montecarlo_runs, seed)?;

    match format {
        OutputFormat::Text => {
            print!("{}", format_run_header(seed, synth.use_conditions()));
            print!(
                "{}",
                format_solver_text(
                    "GP",
                    seed,
                    result.best_fitness,
                    result.generations_completed,
                    result.cancelled,
                    &result.best_sequence,
                )
            );
            println!();
            let mut trace: Vec<TraceStep> = Vec::new();
            let outcome = simulate_traced(&result.best_sequence, &synth, &mut trace);
            println!("Probabilistic Result");
            print!("{}", format_trace(&trace, &outcome));
            println!();
            print!("{}", format_monte_carlo(&report));
        }
        OutputFormat::Json => {
            let mut json = JsonReport::new(seed, &result.best_sequence, &result.outcome, report);
            json.best_fitness = Some(result.best_fitness);
            json.logbook = result.logbook.records().to_vec();
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(())
}
