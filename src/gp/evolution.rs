//! Generational evolution loops.
//!
//! The loops are generic over a [`Toolbox`] that knows how to evaluate,
//! mate, mutate and select one genome type. Each generation selects
//! parents, varies them, evaluates only the offspring whose fitness was
//! invalidated, updates the hall of fame and logbook, then asks the hook
//! whether to keep going.

use crate::error::{ConfigError, check_positive, check_probability};
use crate::gp::fitness::evaluate_invalid;
use crate::gp::genome::Individual;
use crate::gp::selection::sel_best;
use crate::gp::statistics::{HallOfFame, Logbook};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Operators for one genome type.
pub trait Toolbox: Sync {
    /// The genome being evolved.
    type Genome: Clone + PartialEq + Send;

    /// Fitness of a genome; higher is better.
    fn evaluate(&self, genome: &Self::Genome) -> f64;

    /// Recombine two genomes in place.
    fn mate<R: Rng>(&self, a: &mut Self::Genome, b: &mut Self::Genome, rng: &mut R);

    /// Mutate a genome in place.
    fn mutate<R: Rng>(&self, genome: &mut Self::Genome, rng: &mut R);

    /// Choose `k` individuals from `population`.
    fn select<R: Rng>(
        &self,
        population: &[Individual<Self::Genome>],
        k: usize,
        rng: &mut R,
    ) -> Vec<Individual<Self::Genome>>;
}

/// Which generational strategy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    /// Select a full population, vary with [`var_and`], replace wholesale.
    #[default]
    Simple,
    /// Best μ of parents and λ offspring made by [`var_or`].
    MuPlusLambda,
    /// Best μ of the λ offspring alone.
    MuCommaLambda,
}

/// Configuration for the evolution process.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EvolutionConfig {
    /// Population size (μ).
    pub population_size: usize,
    /// Offspring per generation (λ) for the μ/λ strategies.
    pub offspring_size: usize,
    /// Number of generations to run.
    pub generations: usize,
    /// Crossover probability.
    pub cxpb: f64,
    /// Mutation probability.
    pub mutpb: f64,
    /// Generational strategy.
    pub algorithm: Algorithm,
    /// Hall of fame capacity.
    pub hall_of_fame_size: usize,
    /// Evaluate on the rayon pool.
    pub parallel: bool,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 300,
            offspring_size: 300,
            generations: 50,
            cxpb: 0.5,
            mutpb: 0.2,
            algorithm: Algorithm::Simple,
            hall_of_fame_size: 1,
            parallel: true,
        }
    }
}

impl EvolutionConfig {
    /// Check sizes and probabilities.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for a zero population or generation count,
    /// a probability outside `[0, 1]`, `cxpb + mutpb > 1` for the μ/λ
    /// strategies, or λ below μ for (μ,λ).
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("population size", self.population_size)?;
        check_positive("generations", self.generations)?;
        check_probability("cxpb", self.cxpb)?;
        check_probability("mutpb", self.mutpb)?;
        match self.algorithm {
            Algorithm::Simple => Ok(()),
            Algorithm::MuPlusLambda => {
                check_positive("offspring size", self.offspring_size)?;
                check_variation_sum(self.cxpb, self.mutpb)
            }
            Algorithm::MuCommaLambda => {
                check_variation_sum(self.cxpb, self.mutpb)?;
                if self.offspring_size < self.population_size {
                    return Err(ConfigError::LambdaBelowMu {
                        mu: self.population_size,
                        lambda: self.offspring_size,
                    });
                }
                Ok(())
            }
        }
    }
}

fn check_variation_sum(cxpb: f64, mutpb: f64) -> Result<(), ConfigError> {
    if cxpb + mutpb > 1.0 {
        Err(ConfigError::ProbabilitySum { cxpb, mutpb })
    } else {
        Ok(())
    }
}

/// Everything a finished (or cancelled) run leaves behind.
#[derive(Debug, Clone)]
pub struct EvolutionRun<G> {
    /// Population after the last completed generation.
    pub population: Vec<Individual<G>>,
    /// Best individuals ever seen.
    pub hall_of_fame: HallOfFame<G>,
    /// One record per generation, starting with generation 0.
    pub logbook: Logbook,
    /// Generations completed after the initial evaluation.
    pub generations_completed: usize,
    /// The hook stopped the run early.
    pub cancelled: bool,
}

impl<G: Clone + PartialEq> EvolutionRun<G> {
    /// Best individual ever seen.
    #[must_use]
    pub fn best(&self) -> Option<&Individual<G>> {
        self.hall_of_fame.best()
    }
}

/// Crossover on adjacent pairs, then mutation, on a copy of `population`.
///
/// Each pair `(0, 1), (2, 3), ...` mates with probability `cxpb`, then each child
/// mutates with probability `mutpb`. Touched children lose their fitness.
#[must_use]
pub fn var_and<T: Toolbox, R: Rng>(
    population: &[Individual<T::Genome>],
    toolbox: &T,
    cxpb: f64,
    mutpb: f64,
    rng: &mut R,
) -> Vec<Individual<T::Genome>> {
    let mut offspring = population.to_vec();

    for pair in offspring.chunks_exact_mut(2) {
        if rng.r#gen::<f64>() < cxpb {
            let (left, right) = pair.split_at_mut(1);
            toolbox.mate(&mut left[0].genome, &mut right[0].genome, rng);
            left[0].invalidate();
            right[0].invalidate();
        }
    }

    for child in &mut offspring {
        if rng.r#gen::<f64>() < mutpb {
            toolbox.mutate(&mut child.genome, rng);
            child.invalidate();
        }
    }

    offspring
}

/// Produce `lambda` children, each by crossover, mutation or reproduction.
///
/// Crossover picks two parents with replacement and keeps the first child;
/// mutation and reproduction pick one parent.
///
/// # Errors
///
/// Returns [`ConfigError::ProbabilitySum`] if `cxpb + mutpb > 1`.
pub fn var_or<T: Toolbox, R: Rng>(
    population: &[Individual<T::Genome>],
    toolbox: &T,
    lambda: usize,
    cxpb: f64,
    mutpb: f64,
    rng: &mut R,
) -> Result<Vec<Individual<T::Genome>>, ConfigError> {
    check_variation_sum(cxpb, mutpb)?;
    if population.is_empty() {
        return Ok(Vec::new());
    }

    let mut offspring = Vec::with_capacity(lambda);
    for _ in 0..lambda {
        let op: f64 = rng.r#gen();
        if op < cxpb {
            let mut first = population[rng.gen_range(0..population.len())].clone();
            let mut second = population[rng.gen_range(0..population.len())].genome.clone();
            toolbox.mate(&mut first.genome, &mut second, rng);
            first.invalidate();
            offspring.push(first);
        } else if op < cxpb + mutpb {
            let mut child = population[rng.gen_range(0..population.len())].clone();
            toolbox.mutate(&mut child.genome, rng);
            child.invalidate();
            offspring.push(child);
        } else {
            offspring.push(population[rng.gen_range(0..population.len())].clone());
        }
    }
    Ok(offspring)
}

/// Generation-0 bookkeeping and the per-generation loop shared by all
/// strategies.
///
/// `vary` breeds offspring from the current population; those offspring are
/// evaluated, counted and offered to the hall of fame before `survive`
/// merges them with the parents into the next population.
fn run_generations<T, R, H, V, S>(
    mut population: Vec<Individual<T::Genome>>,
    toolbox: &T,
    config: &EvolutionConfig,
    rng: &mut R,
    mut hook: H,
    mut vary: V,
    mut survive: S,
) -> Result<EvolutionRun<T::Genome>, ConfigError>
where
    T: Toolbox,
    R: Rng,
    H: FnMut(usize) -> bool,
    V: FnMut(&[Individual<T::Genome>], &mut R) -> Result<Vec<Individual<T::Genome>>, ConfigError>,
    S: FnMut(Vec<Individual<T::Genome>>, Vec<Individual<T::Genome>>) -> Vec<Individual<T::Genome>>,
{
    config.validate()?;

    let mut hall_of_fame = HallOfFame::new(config.hall_of_fame_size);
    let mut logbook = Logbook::new();

    let evaluations = evaluate_invalid(&mut population, |g| toolbox.evaluate(g), config.parallel);
    hall_of_fame.update(&population);
    logbook.record(0, evaluations, &population);
    log_generation(0, &logbook);

    let mut generations_completed = 0;
    let mut cancelled = false;

    for generation in 1..=config.generations {
        let mut offspring = vary(&population, rng)?;
        let evaluations = evaluate_invalid(&mut offspring, |g| toolbox.evaluate(g), config.parallel);

        if hall_of_fame.update(&offspring) {
            if let Some(best) = hall_of_fame.best_fitness() {
                log::debug!("Gen {generation:>5}: new best {best:.4}");
            }
        }
        population = survive(population, offspring);

        logbook.record(generation, evaluations, &population);
        log_generation(generation, &logbook);
        generations_completed = generation;

        if !hook(generation) {
            log::info!("Evolution stopped by caller after generation {generation}");
            cancelled = true;
            break;
        }
    }

    Ok(EvolutionRun {
        population,
        hall_of_fame,
        logbook,
        generations_completed,
        cancelled,
    })
}

fn log_generation(generation: usize, logbook: &Logbook) {
    if let Some(record) = logbook.last() {
        log::info!(
            "Gen {:>5}: best={:.4} mean={:.4} std={:.4}",
            generation,
            record.max,
            record.mean,
            record.std
        );
    }
}

/// The simplest generational loop: tournament-select a full population,
/// vary it with [`var_and`] and replace the parents wholesale.
///
/// # Errors
///
/// Returns a [`ConfigError`] if `config` fails validation.
pub fn ea_simple<T, R, H>(
    population: Vec<Individual<T::Genome>>,
    toolbox: &T,
    config: &EvolutionConfig,
    rng: &mut R,
    hook: H,
) -> Result<EvolutionRun<T::Genome>, ConfigError>
where
    T: Toolbox,
    R: Rng,
    H: FnMut(usize) -> bool,
{
    run_generations(
        population,
        toolbox,
        config,
        rng,
        hook,
        |population, rng| {
            let parents = toolbox.select(population, population.len(), rng);
            Ok(var_and(&parents, toolbox, config.cxpb, config.mutpb, rng))
        },
        |_, offspring| offspring,
    )
}

/// (μ+λ): λ children from [`var_or`], survivors are the best μ of parents
/// and children together.
///
/// # Errors
///
/// Returns a [`ConfigError`] if `config` fails validation.
pub fn ea_mu_plus_lambda<T, R, H>(
    population: Vec<Individual<T::Genome>>,
    toolbox: &T,
    config: &EvolutionConfig,
    rng: &mut R,
    hook: H,
) -> Result<EvolutionRun<T::Genome>, ConfigError>
where
    T: Toolbox,
    R: Rng,
    H: FnMut(usize) -> bool,
{
    let mu = config.population_size;
    run_generations(
        population,
        toolbox,
        config,
        rng,
        hook,
        |population, rng| {
            var_or(
                population,
                toolbox,
                config.offspring_size,
                config.cxpb,
                config.mutpb,
                rng,
            )
        },
        |mut population, offspring| {
            population.extend(offspring);
            sel_best(&population, mu)
        },
    )
}

/// (μ,λ): λ children from [`var_or`], survivors are the best μ children.
///
/// # Errors
///
/// Returns a [`ConfigError`] if `config` fails validation, including λ < μ.
pub fn ea_mu_comma_lambda<T, R, H>(
    population: Vec<Individual<T::Genome>>,
    toolbox: &T,
    config: &EvolutionConfig,
    rng: &mut R,
    hook: H,
) -> Result<EvolutionRun<T::Genome>, ConfigError>
where
    T: Toolbox,
    R: Rng,
    H: FnMut(usize) -> bool,
{
    let mu = config.population_size;
    run_generations(
        population,
        toolbox,
        config,
        rng,
        hook,
        |population, rng| {
            var_or(
                population,
                toolbox,
                config.offspring_size,
                config.cxpb,
                config.mutpb,
                rng,
            )
        },
        |_, offspring| sel_best(&offspring, mu),
    )
}

/// Run the strategy named in `config.algorithm`.
///
/// # Errors
///
/// Returns a [`ConfigError`] if `config` fails validation.
pub fn evolve<T, R, H>(
    population: Vec<Individual<T::Genome>>,
    toolbox: &T,
    config: &EvolutionConfig,
    rng: &mut R,
    hook: H,
) -> Result<EvolutionRun<T::Genome>, ConfigError>
where
    T: Toolbox,
    R: Rng,
    H: FnMut(usize) -> bool,
{
    match config.algorithm {
        Algorithm::Simple => ea_simple(population, toolbox, config, rng, hook),
        Algorithm::MuPlusLambda => ea_mu_plus_lambda(population, toolbox, config, rng, hook),
        Algorithm::MuCommaLambda => ea_mu_comma_lambda(population, toolbox, config, rng, hook),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gp::crossover::cx_one_point;
    use crate::gp::selection::sel_tournament;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    /// Maximize the number of ones in a bit string.
    struct OneMax;

    impl Toolbox for OneMax {
        type Genome = Vec<u8>;

        fn evaluate(&self, genome: &Vec<u8>) -> f64 {
            genome.iter().map(|&b| f64::from(b)).sum()
        }

        fn mate<R: Rng>(&self, a: &mut Vec<u8>, b: &mut Vec<u8>, rng: &mut R) {
            cx_one_point(a, b, rng);
        }

        fn mutate<R: Rng>(&self, genome: &mut Vec<u8>, rng: &mut R) {
            let i = rng.gen_range(0..genome.len());
            genome[i] ^= 1;
        }

        fn select<R: Rng>(
            &self,
            population: &[Individual<Vec<u8>>],
            k: usize,
            rng: &mut R,
        ) -> Vec<Individual<Vec<u8>>> {
            sel_tournament(population, k, 3, rng)
        }
    }

    fn population(size: usize, rng: &mut SmallRng) -> Vec<Individual<Vec<u8>>> {
        (0..size)
            .map(|_| Individual::new((0..20).map(|_| rng.gen_range(0..2)).collect()))
            .collect()
    }

    fn config(algorithm: Algorithm) -> EvolutionConfig {
        EvolutionConfig {
            population_size: 40,
            offspring_size: 60,
            generations: 15,
            cxpb: 0.5,
            mutpb: 0.3,
            algorithm,
            hall_of_fame_size: 3,
            parallel: false,
        }
    }

    #[test]
    fn test_evolution_config_default() {
        let config = EvolutionConfig::default();
        assert_eq!(config.population_size, 300);
        assert_eq!(config.generations, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_probabilities() {
        let mut bad = config(Algorithm::MuPlusLambda);
        bad.cxpb = 0.8;
        bad.mutpb = 0.4;
        assert_eq!(
            bad.validate(),
            Err(ConfigError::ProbabilitySum {
                cxpb: 0.8,
                mutpb: 0.4
            })
        );

        let mut comma = config(Algorithm::MuCommaLambda);
        comma.offspring_size = 10;
        assert_eq!(
            comma.validate(),
            Err(ConfigError::LambdaBelowMu { mu: 40, lambda: 10 })
        );

        let mut zero = config(Algorithm::Simple);
        zero.population_size = 0;
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_var_and_invalidates_touched() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut parents = population(10, &mut rng);
        for ind in &mut parents {
            ind.fitness = Some(OneMax.evaluate(&ind.genome));
        }

        let untouched = var_and(&parents, &OneMax, 0.0, 0.0, &mut rng);
        assert_eq!(untouched, parents);

        let touched = var_and(&parents, &OneMax, 1.0, 1.0, &mut rng);
        assert!(touched.iter().all(|ind| ind.fitness.is_none()));
        assert_eq!(touched.len(), parents.len());
    }

    #[test]
    fn test_var_or_rejects_probability_sum() {
        let mut rng = SmallRng::seed_from_u64(2);
        let parents = population(5, &mut rng);
        let err = var_or(&parents, &OneMax, 5, 0.7, 0.5, &mut rng).unwrap_err();
        assert_eq!(err, ConfigError::ProbabilitySum { cxpb: 0.7, mutpb: 0.5 });
    }

    #[test]
    fn test_var_or_produces_lambda() {
        let mut rng = SmallRng::seed_from_u64(3);
        let parents = population(5, &mut rng);
        let offspring = var_or(&parents, &OneMax, 17, 0.4, 0.4, &mut rng).unwrap();
        assert_eq!(offspring.len(), 17);
    }

    #[test]
    fn test_each_algorithm_improves_onemax() {
        for algorithm in [Algorithm::Simple, Algorithm::MuPlusLambda, Algorithm::MuCommaLambda] {
            let mut rng = SmallRng::seed_from_u64(42);
            let start = population(40, &mut rng);
            let config = config(algorithm);
            let run = evolve(start, &OneMax, &config, &mut rng, |_| true).unwrap();

            assert_eq!(run.generations_completed, 15);
            assert!(!run.cancelled);
            assert_eq!(run.logbook.len(), 16);
            assert_eq!(run.population.len(), 40);

            let first = run.logbook.records()[0].max;
            let best = run.best().unwrap().fitness.unwrap();
            assert!(best >= first, "{algorithm:?}");
        }
    }

    #[test]
    fn test_hall_of_fame_best_is_monotonic() {
        let mut rng = SmallRng::seed_from_u64(9);
        let start = population(40, &mut rng);
        let config = config(Algorithm::Simple);
        let run = ea_simple(start, &OneMax, &config, &mut rng, |_| true).unwrap();
        let overall = run
            .logbook
            .records()
            .iter()
            .map(|r| r.max)
            .fold(f64::NEG_INFINITY, f64::max);
        assert!((run.best().unwrap().fitness.unwrap() - overall).abs() < f64::EPSILON);
    }

    #[test]
    fn test_logbook_counts_offspring_evaluations() {
        for algorithm in [Algorithm::Simple, Algorithm::MuPlusLambda, Algorithm::MuCommaLambda] {
            let mut rng = SmallRng::seed_from_u64(42);
            let start = population(40, &mut rng);
            let run = evolve(start, &OneMax, &config(algorithm), &mut rng, |_| true).unwrap();

            let records = run.logbook.records();
            assert_eq!(records[0].evaluations, 40);
            assert!(
                records[1..].iter().all(|r| r.evaluations > 0),
                "{algorithm:?}: {:?}",
                records.iter().map(|r| r.evaluations).collect::<Vec<_>>()
            );
            if algorithm != Algorithm::Simple {
                assert!(records[1..].iter().all(|r| r.evaluations <= 60));
            }
        }
    }

    #[test]
    fn test_mu_comma_lambda_offers_all_offspring_to_hall_of_fame() {
        let mut rng = SmallRng::seed_from_u64(11);
        let start = population(2, &mut rng);
        let config = EvolutionConfig {
            population_size: 2,
            offspring_size: 30,
            generations: 1,
            hall_of_fame_size: 5,
            ..config(Algorithm::MuCommaLambda)
        };
        let run = ea_mu_comma_lambda(start, &OneMax, &config, &mut rng, |_| true).unwrap();

        // Two parents and two survivors could fill at most four slots.
        assert_eq!(run.population.len(), 2);
        assert_eq!(run.hall_of_fame.len(), 5);
    }

    #[test]
    fn test_hook_cancels() {
        let mut rng = SmallRng::seed_from_u64(5);
        let start = population(40, &mut rng);
        let config = config(Algorithm::Simple);
        let mut seen = Vec::new();
        let run = ea_simple(start, &OneMax, &config, &mut rng, |generation| {
            seen.push(generation);
            generation < 3
        })
        .unwrap();

        assert!(run.cancelled);
        assert_eq!(run.generations_completed, 3);
        assert_eq!(run.logbook.len(), 4);
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[test]
    fn test_seed_reproducible() {
        let run = |seed| {
            let mut rng = SmallRng::seed_from_u64(seed);
            let start = population(40, &mut rng);
            ea_simple(start, &OneMax, &config(Algorithm::Simple), &mut rng, |_| true).unwrap()
        };
        let a = run(77);
        let b = run(77);
        assert_eq!(a.population, b.population);
        assert_eq!(a.logbook, b.logbook);
    }
}
