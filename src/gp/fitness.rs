//! Fitness evaluation.
//!
//! A candidate's fitness is the quality its sequence reaches in the
//! expected-value simulation, minus a heavy penalty for every wasted action
//! and every failed end-state constraint.

// Fitness evaluation uses intentional casts
#![allow(clippy::cast_precision_loss)]

use crate::craft::{ActionId, Outcome, Synth, simulate};
use crate::gp::genome::Individual;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Default penalty per wasted action or failed constraint.
pub const DEFAULT_PENALTY_WEIGHT: f64 = 10_000.0;

/// Configuration for fitness evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FitnessConfig {
    /// Penalty per wasted action or failed constraint.
    pub penalty_weight: f64,
}

impl Default for FitnessConfig {
    fn default() -> Self {
        Self {
            penalty_weight: DEFAULT_PENALTY_WEIGHT,
        }
    }
}

/// Penalized quality of an outcome.
#[must_use]
pub fn outcome_fitness(outcome: &Outcome, penalty_weight: f64) -> f64 {
    let penalties = outcome.wasted_actions + outcome.violations();
    outcome.quality - penalty_weight * f64::from(penalties)
}

/// Simulate `sequence` and score it.
#[must_use]
pub fn evaluate_sequence(sequence: &[ActionId], synth: &Synth, config: &FitnessConfig) -> f64 {
    outcome_fitness(&simulate(sequence, synth), config.penalty_weight)
}

/// Evaluate every individual whose fitness is not cached, in place.
///
/// With `parallel` set the work fans out over the rayon pool; results are
/// written back into the same slots, so order is preserved either way.
/// Returns the number of evaluations performed.
pub fn evaluate_invalid<G, F>(population: &mut [Individual<G>], evaluate: F, parallel: bool) -> usize
where
    G: Send,
    F: Fn(&G) -> f64 + Sync,
{
    let pending = population.iter().filter(|ind| !ind.is_valid()).count();
    if pending == 0 {
        return 0;
    }

    let score = |ind: &mut Individual<G>| {
        if ind.fitness.is_none() {
            ind.fitness = Some(evaluate(&ind.genome));
        }
    };
    if parallel {
        population.par_iter_mut().for_each(score);
    } else {
        population.iter_mut().for_each(score);
    }
    pending
}
