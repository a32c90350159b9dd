//! Solver entry points.
//!
//! These wire a [`Synth`] to the simulators and to the evolutionary engine:
//! [`run_expected_value`] and [`run_monte_carlo`] score a fixed sequence,
//! [`run_ga`] and [`run_gp`] search for a better one.

mod toolbox;

pub use toolbox::{SequenceToolbox, TreeToolbox};

use crate::craft::{ActionId, MonteCarloReport, Outcome, Synth, estimate, simulate};
use crate::error::{ConfigError, check_positive, check_probability};
use crate::gp::{
    ActionTree, EvolutionConfig, EvolutionRun, FitnessConfig, HallOfFame, Individual, Logbook,
    MutationConfig, SelectionConfig, evolve, initial_guess, random_sequence,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

/// Default RNG seed.
pub const DEFAULT_SEED: u64 = 64;

/// Configuration for the fixed-length genetic algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GaConfig {
    /// Fitness evaluation configuration.
    pub fitness: FitnessConfig,
    /// Length of every candidate sequence.
    pub sequence_length: usize,
    /// RNG seed for reproducibility.
    pub seed: u64,
    /// Seed the population with the hand-built initial guess.
    pub use_initial_guess: bool,
    /// Generational loop configuration.
    pub evolution: EvolutionConfig,
    /// Selection configuration.
    pub selection: SelectionConfig,
    /// Mutation configuration.
    pub mutation: MutationConfig,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            fitness: FitnessConfig::default(),
            sequence_length: 20,
            seed: DEFAULT_SEED,
            use_initial_guess: true,
            evolution: EvolutionConfig::default(),
            selection: SelectionConfig { tournament_size: 3 },
            mutation: MutationConfig::default(),
        }
    }
}

impl GaConfig {
    /// Check every parameter.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] describing the first invalid parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("sequence length", self.sequence_length)?;
        check_positive("tournament size", self.selection.tournament_size)?;
        check_probability("indpb", self.mutation.indpb)?;
        self.evolution.validate()
    }
}

/// Configuration for the tree-based genetic program.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GpConfig {
    /// Fitness evaluation configuration.
    pub fitness: FitnessConfig,
    /// RNG seed for reproducibility.
    pub seed: u64,
    /// Minimum height of initial trees.
    pub init_min_depth: usize,
    /// Maximum height of initial trees.
    pub init_max_depth: usize,
    /// Offspring taller than this are replaced by their parent.
    pub depth_limit: usize,
    /// Generational loop configuration.
    pub evolution: EvolutionConfig,
    /// Selection configuration.
    pub selection: SelectionConfig,
    /// Mutation configuration.
    pub mutation: MutationConfig,
}

impl Default for GpConfig {
    fn default() -> Self {
        Self {
            fitness: FitnessConfig::default(),
            seed: DEFAULT_SEED,
            init_min_depth: 1,
            init_max_depth: 5,
            depth_limit: 17,
            evolution: EvolutionConfig::default(),
            selection: SelectionConfig { tournament_size: 7 },
            mutation: MutationConfig::default(),
        }
    }
}

impl GpConfig {
    /// Check every parameter.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] describing the first invalid parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("tournament size", self.selection.tournament_size)?;
        check_positive("depth limit", self.depth_limit)?;
        if self.init_min_depth > self.init_max_depth {
            #[allow(clippy::cast_precision_loss)]
            let value = self.init_min_depth as f64;
            return Err(ConfigError::InvalidModel {
                field: "initial tree depth",
                value,
            });
        }
        self.evolution.validate()
    }
}

/// Result of a GA or GP run.
#[derive(Debug, Clone)]
pub struct SolverResult<G> {
    /// Best sequence found.
    pub best_sequence: Vec<ActionId>,
    /// Fitness of the best sequence.
    pub best_fitness: f64,
    /// Expected-value outcome of the best sequence.
    pub outcome: Outcome,
    /// Final population.
    pub population: Vec<Individual<G>>,
    /// Best individuals ever seen.
    pub hall_of_fame: HallOfFame<G>,
    /// Per-generation statistics.
    pub logbook: Logbook,
    /// Generations completed after the initial evaluation.
    pub generations_completed: usize,
    /// The hook stopped the run early.
    pub cancelled: bool,
}

/// Result of [`run_ga`].
pub type GaResult = SolverResult<Vec<ActionId>>;

/// Result of [`run_gp`].
pub type GpResult = SolverResult<ActionTree>;

/// Expected-value simulation of `sequence`.
#[must_use]
pub fn run_expected_value(sequence: &[ActionId], synth: &Synth) -> Outcome {
    simulate(sequence, synth)
}

/// Monte Carlo estimate of `sequence` over `n_runs` seeded runs.
///
/// # Errors
///
/// Returns [`ConfigError::NonPositive`] when `n_runs` is zero.
pub fn run_monte_carlo(
    sequence: &[ActionId],
    synth: &Synth,
    n_runs: usize,
    seed: u64,
) -> Result<MonteCarloReport, ConfigError> {
    check_positive("monte carlo runs", n_runs)?;
    let mut rng = SmallRng::seed_from_u64(seed);
    Ok(estimate(sequence, synth, n_runs, &mut rng))
}

/// Search fixed-length sequences with the genetic algorithm.
///
/// `hook` is called after each generation with its number and stops the
/// run by returning `false`.
///
/// # Errors
///
/// Returns a [`ConfigError`] if `config` is invalid or the crafter has no
/// usable actions.
pub fn run_ga<H>(synth: &Synth, config: &GaConfig, hook: H) -> Result<GaResult, ConfigError>
where
    H: FnMut(usize) -> bool,
{
    config.validate()?;
    let actions = usable_actions(synth)?;
    let mut rng = SmallRng::seed_from_u64(config.seed);

    let length = config.sequence_length;
    let mut population: Vec<Individual<Vec<ActionId>>> = (0..config.evolution.population_size)
        .map(|_| Individual::new(random_sequence(&actions, length, &mut rng)))
        .collect();
    if config.use_initial_guess {
        seed_population(&mut population, initial_guess(synth, length));
    }

    log::info!(
        "GA: population {}, {} generations, length {length}, seed {}",
        config.evolution.population_size,
        config.evolution.generations,
        config.seed
    );

    let toolbox = SequenceToolbox::new(
        synth,
        config.fitness,
        config.selection.tournament_size,
        config.mutation.indpb,
    );
    let run = evolve(population, &toolbox, &config.evolution, &mut rng, hook)?;
    Ok(finish(run, synth, Clone::clone))
}

/// Search variable-length sequences with the tree-based genetic program.
///
/// A non-empty `seed_sequence` is folded into a tree and placed at the head
/// of the initial population.
///
/// # Errors
///
/// Returns a [`ConfigError`] if `config` is invalid or the crafter has no
/// usable actions.
pub fn run_gp<H>(
    synth: &Synth,
    config: &GpConfig,
    seed_sequence: &[ActionId],
    hook: H,
) -> Result<GpResult, ConfigError>
where
    H: FnMut(usize) -> bool,
{
    config.validate()?;
    let actions = usable_actions(synth)?;
    let mut rng = SmallRng::seed_from_u64(config.seed);

    let mut population: Vec<Individual<ActionTree>> = (0..config.evolution.population_size)
        .map(|_| {
            Individual::new(ActionTree::half_and_half(
                &actions,
                config.init_min_depth,
                config.init_max_depth,
                &mut rng,
            ))
        })
        .collect();
    if let Some(tree) = ActionTree::from_sequence(seed_sequence) {
        seed_population(&mut population, tree);
    }

    log::info!(
        "GP: population {}, {} generations, seed {}",
        config.evolution.population_size,
        config.evolution.generations,
        config.seed
    );

    let toolbox = TreeToolbox::new(
        synth,
        actions,
        config.fitness,
        config.selection.tournament_size,
        config.mutation,
        config.depth_limit,
    );
    let run = evolve(population, &toolbox, &config.evolution, &mut rng, hook)?;
    Ok(finish(run, synth, ActionTree::flatten))
}

fn usable_actions(synth: &Synth) -> Result<Vec<ActionId>, ConfigError> {
    let actions = synth.crafter().actions.clone();
    if actions.is_empty() {
        return Err(ConfigError::NoActions);
    }
    Ok(actions)
}

/// Drop the last random individual and put `genome` first.
fn seed_population<G>(population: &mut Vec<Individual<G>>, genome: G) {
    population.pop();
    population.insert(0, Individual::new(genome));
}

fn finish<G, F>(run: EvolutionRun<G>, synth: &Synth, to_sequence: F) -> SolverResult<G>
where
    G: Clone + PartialEq,
    F: Fn(&G) -> Vec<ActionId>,
{
    let (best_sequence, best_fitness) = run
        .best()
        .map(|best| (to_sequence(&best.genome), best.rank_fitness()))
        .unwrap_or_default();
    let outcome = simulate(&best_sequence, synth);

    log::info!(
        "Best fitness {best_fitness:.1} after {} generations{}",
        run.generations_completed,
        if run.cancelled { " (stopped early)" } else { "" }
    );

    SolverResult {
        best_sequence,
        best_fitness,
        outcome,
        population: run.population,
        hall_of_fame: run.hall_of_fame,
        logbook: run.logbook,
        generations_completed: run.generations_completed,
        cancelled: run.cancelled,
    }
}
