//! Evolutionary search over action sequences.
//!
//! This module provides a small, DEAP-style evolutionary framework: genome
//! representations, variation operators, selection, the generational loops
//! and their bookkeeping. The solver plugs the crafting simulator in as the
//! fitness function through a [`Toolbox`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   ea_simple │ (μ+λ) │ (μ,λ)         │
//! ├─────────────────────────────────────┤
//! │  Selection │ Crossover │ Mutation   │
//! ├─────────────────────────────────────┤
//! │  Fitness Evaluation (rayon)         │
//! ├─────────────────────────────────────┤
//! │  Hall of Fame │ Logbook             │
//! └─────────────────────────────────────┘
//! ```

mod crossover;
mod evolution;
mod fitness;
mod genome;
mod mutation;
mod selection;
mod statistics;

pub use crossover::{cx_one_point, cx_one_point_tree};
pub use evolution::{
    Algorithm, EvolutionConfig, EvolutionRun, Toolbox, ea_mu_comma_lambda, ea_mu_plus_lambda,
    ea_simple, evolve, var_and, var_or,
};
pub use fitness::{
    DEFAULT_PENALTY_WEIGHT, FitnessConfig, evaluate_invalid, evaluate_sequence, outcome_fitness,
};
pub use genome::{ActionTree, Individual, initial_guess, random_sequence};
pub use mutation::{MutationConfig, mut_shuffle_indexes, mut_uniform_tree};
pub use selection::{SelectionConfig, sel_best, sel_tournament};
pub use statistics::{FitnessStats, GenerationRecord, HallOfFame, Logbook};
