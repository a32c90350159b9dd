//! Output formatting utilities for CLI.

use craftopt::craft::{ActionId, MonteCarloReport, Outcome, TRACE_HEADER, TraceStep};
use craftopt::gp::GenerationRecord;
use serde::Serialize;
use std::fmt::Write;

/// JSON-serializable end state of the expected-value simulation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct JsonFinalState {
    pub(super) durability: f64,
    pub(super) durability_ok: bool,
    pub(super) cp: f64,
    pub(super) cp_ok: bool,
    pub(super) progress: f64,
    pub(super) progress_ok: bool,
    pub(super) quality: f64,
    pub(super) wasted_actions: u32,
}

impl JsonFinalState {
    pub(super) fn from_outcome(outcome: &Outcome) -> Self {
        Self {
            durability: outcome.durability,
            durability_ok: outcome.durability_ok,
            cp: outcome.cp,
            cp_ok: outcome.cp_ok,
            progress: outcome.progress,
            progress_ok: outcome.progress_ok,
            quality: outcome.quality,
            wasted_actions: outcome.wasted_actions,
        }
    }
}

/// JSON-serializable command result.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct JsonReport {
    /// Seed driving the random draws.
    pub(super) seed: u64,
    /// Sequence that was simulated or found.
    pub(super) best_sequence: Vec<&'static str>,
    /// Penalized fitness, for solver runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) best_fitness: Option<f64>,
    pub(super) final_state: JsonFinalState,
    pub(super) monte_carlo: MonteCarloReport,
    /// Per-generation statistics, for solver runs.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(super) logbook: Vec<GenerationRecord>,
}

impl JsonReport {
    pub(super) fn new(
        seed: u64,
        sequence: &[ActionId],
        outcome: &Outcome,
        monte_carlo: MonteCarloReport,
    ) -> Self {
        Self {
            seed,
            best_sequence: sequence.iter().map(|id| id.short_name()).collect(),
            best_fitness: None,
            final_state: JsonFinalState::from_outcome(outcome),
            monte_carlo,
            logbook: Vec::new(),
        }
    }
}

/// Format the trace table followed by the end-state flags.
pub(super) fn format_trace(trace: &[TraceStep], outcome: &Outcome) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "{TRACE_HEADER}");
    for step in trace {
        let _ = writeln!(output, "{step}");
    }
    output.push('\n');
    let _ = writeln!(
        output,
        "Progress Check: {}, Durability Check: {}, CP Check: {}, Tricks Check: {}, Wasted Actions: {}",
        outcome.progress_ok,
        outcome.durability_ok,
        outcome.cp_ok,
        outcome.tricks_ok,
        outcome.wasted_actions
    );
    output
}

/// Format a Monte Carlo summary.
pub(super) fn format_monte_carlo(report: &MonteCarloReport) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Monte Carlo Result of {} runs", report.runs);
    let _ = writeln!(output, "{:<10} {:>5} {:>5} {:>7} {:>7} {:>5}", "", "DUR", "CP", "QUA", "PRG", "HQ%");
    let _ = writeln!(
        output,
        "{:<10} {:>5.0} {:>5.0} {:>7.1} {:>7.1} {:>5}",
        "Average",
        report.mean.durability,
        report.mean.cp,
        report.mean.quality,
        report.mean.progress,
        report.mean_hq_percent
    );
    let _ = writeln!(
        output,
        "{:<10} {:>5.0} {:>5.0} {:>7.1} {:>7.1} {:>5}",
        "Minimum",
        report.min.durability,
        report.min.cp,
        report.min.quality,
        report.min.progress,
        report.min_hq_percent
    );
    let _ = writeln!(
        output,
        "Success Rate: {}/{} ({:.1}%)",
        report.success_count,
        report.runs,
        report.success_rate() * 100.0
    );
    output
}

/// Format the line naming the seed and condition model of a run.
pub(super) fn format_run_header(seed: u64, use_conditions: bool) -> String {
    format!("Seed: {seed}, Use Conditions: {use_conditions}\n")
}

/// Format a sequence as a comma-separated list of short keys.
pub(super) fn format_sequence(sequence: &[ActionId]) -> String {
    sequence.iter().map(|id| id.short_name()).collect::<Vec<_>>().join(", ")
}

/// Format a solver run summary.
pub(super) fn format_solver_text(
    label: &str,
    seed: u64,
    best_fitness: f64,
    generations: usize,
    cancelled: bool,
    sequence: &[ActionId],
) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "{label} Result (seed: {seed})");
    let _ = writeln!(output, "  Generations: {generations}{}", if cancelled { " (stopped early)" } else { "" });
    let _ = writeln!(output, "  Best Fitness: {best_fitness:.1}");
    let _ = writeln!(output, "  Best Sequence ({} steps): {}", sequence.len(), format_sequence(sequence));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use craftopt::craft::Totals;

    fn outcome() -> Outcome {
        Outcome {
            steps: 2,
            last_action: Some(ActionId::BasicSynthesis),
            durability: 40.0,
            cp: 252.0,
            quality: 0.0,
            progress: 81.0,
            wasted_actions: 0,
            tricks_used: 0,
            progress_ok: true,
            cp_ok: true,
            durability_ok: true,
            tricks_ok: true,
        }
    }

    #[test]
    fn test_json_report_shape() {
        let report = MonteCarloReport {
            runs: 10,
            mean: Totals::default(),
            min: Totals::default(),
            success_count: 10,
            mean_hq_percent: 1,
            min_hq_percent: 1,
        };
        let json = JsonReport::new(7, &[ActionId::BasicSynthesis], &outcome(), report);
        let value = serde_json::to_value(&json).unwrap();
        assert_eq!(value["bestSequence"][0], "basicSynth");
        assert_eq!(value["finalState"]["progressOk"], true);
        assert_eq!(value["monteCarlo"]["successCount"], 10);
        assert!(value.get("logbook").is_none());
        assert!(value.get("bestFitness").is_none());
    }

    #[test]
    fn test_format_trace_has_header_and_flags() {
        let text = format_trace(&[], &outcome());
        assert!(text.starts_with(TRACE_HEADER));
        assert!(text.contains("Progress Check: true"));
    }

    #[test]
    fn test_format_run_header() {
        assert_eq!(format_run_header(42, true), "Seed: 42, Use Conditions: true\n");
        assert_eq!(format_run_header(0, false), "Seed: 0, Use Conditions: false\n");
    }

    #[test]
    fn test_format_sequence() {
        let text = format_sequence(&[ActionId::InnerQuiet, ActionId::BasicTouch]);
        assert_eq!(text, "innerQuiet, basicTouch");
    }
}
