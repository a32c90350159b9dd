// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Craftopt: a crafting rotation simulator and evolutionary optimizer.
//!
//! This crate provides:
//! - An expected-value simulator that folds success odds and crafting
//!   conditions into a single deterministic trajectory
//! - A sampled simulator and Monte Carlo estimator for the same rules
//! - Genetic algorithm and genetic programming searches over action sequences
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │     Solver (run_ga / run_gp)        │
//! ├─────────────────────────────────────┤
//! │   Evolutionary Engine (gp)          │
//! ├─────────────────────────────────────┤
//! │   Crafting Model (craft)            │
//! └─────────────────────────────────────┘
//! ```

pub mod craft;
pub mod error;
pub mod gp;
pub mod solver;

pub use error::ConfigError;

// Re-export the types most callers need at crate root
pub use craft::{
    ActionCatalog, ActionId, Crafter, MonteCarloReport, Outcome, Recipe, Synth, TraceStep,
};
pub use solver::{
    GaConfig, GaResult, GpConfig, GpResult, SolverResult, run_expected_value, run_ga, run_gp,
    run_monte_carlo,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_root_reexports_drive_a_run() {
        let crafter = Crafter {
            level: 25,
            craftsmanship: 136.0,
            control: 137.0,
            cp: 252.0,
            actions: vec![ActionId::BasicSynthesis],
        };
        let recipe = Recipe {
            level: 10,
            difficulty: 45.0,
            durability: 60.0,
            start_quality: 0.0,
            max_quality: 629.0,
        };
        let synth = Synth::new(crafter, recipe, 0, false, Arc::new(ActionCatalog::standard())).unwrap();
        let outcome = run_expected_value(&[ActionId::BasicSynthesis; 2], &synth);
        assert!(outcome.progress_ok);
        assert_eq!(outcome.wasted_actions, 0);
    }
}
