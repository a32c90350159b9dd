//! Selection operators.
//!
//! Tournament selection drives the generational loop; best-of selection
//! picks survivors in the (μ+λ) and (μ,λ) strategies.

use crate::gp::genome::Individual;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Configuration for selection operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectionConfig {
    /// Number of individuals competing in each tournament.
    pub tournament_size: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self { tournament_size: 3 }
    }
}

/// Pick `k` individuals, each the winner of a tournament of `tournament_size`
/// entrants drawn with replacement.
#[must_use]
pub fn sel_tournament<G: Clone, R: Rng>(
    population: &[Individual<G>],
    k: usize,
    tournament_size: usize,
    rng: &mut R,
) -> Vec<Individual<G>> {
    if population.is_empty() {
        return Vec::new();
    }
    let fitness: Vec<f64> = population.iter().map(Individual::rank_fitness).collect();
    (0..k)
        .map(|_| population[tournament_select(&fitness, tournament_size, rng)].clone())
        .collect()
}

/// The `k` fittest individuals, best first.
#[must_use]
pub fn sel_best<G: Clone>(population: &[Individual<G>], k: usize) -> Vec<Individual<G>> {
    best_indices(population, k)
        .into_iter()
        .map(|i| population[i].clone())
        .collect()
}

/// Indices of the top `count` individuals by fitness.
fn best_indices<G>(population: &[Individual<G>], count: usize) -> Vec<usize> {
    let mut indexed: Vec<(usize, f64)> = population
        .iter()
        .map(Individual::rank_fitness)
        .enumerate()
        .collect();
    indexed.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    indexed.into_iter().take(count).map(|(i, _)| i).collect()
}

/// Tournament selection: randomly select k individuals and return the best.
fn tournament_select<R: Rng>(fitness: &[f64], k: usize, rng: &mut R) -> usize {
    let pop_size = fitness.len();
    if pop_size == 0 {
        return 0;
    }

    let k = k.max(1);
    let mut best_idx = rng.gen_range(0..pop_size);
    let mut best_fitness = fitness[best_idx];

    for _ in 1..k {
        let idx = rng.gen_range(0..pop_size);
        if fitness[idx] > best_fitness {
            best_idx = idx;
            best_fitness = fitness[idx];
        }
    }

    best_idx
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn population(fitness: &[f64]) -> Vec<Individual<usize>> {
        fitness
            .iter()
            .enumerate()
            .map(|(i, &f)| Individual {
                genome: i,
                fitness: Some(f),
            })
            .collect()
    }

    #[test]
    fn test_tournament_selection_prefers_fitter() {
        let mut rng = SmallRng::seed_from_u64(42);
        let fitness = vec![0.1, 0.5, 0.9, 0.2, 0.8];

        let mut counts = [0usize; 5];
        for _ in 0..1000 {
            let idx = tournament_select(&fitness, 3, &mut rng);
            counts[idx] += 1;
        }

        let max_idx = counts.iter().enumerate().max_by_key(|(_, c)| *c).unwrap().0;
        assert_eq!(max_idx, 2);
    }

    #[test]
    fn test_sel_tournament_returns_k_clones() {
        let mut rng = SmallRng::seed_from_u64(3);
        let pop = population(&[1.0, 2.0, 3.0]);
        let chosen = sel_tournament(&pop, 10, 3, &mut rng);
        assert_eq!(chosen.len(), 10);
        assert!(chosen.iter().all(|ind| pop.contains(ind)));
    }

    #[test]
    fn test_sel_best_orders_descending() {
        let pop = population(&[0.3, 0.9, 0.1, 0.8, 0.5]);
        let best = sel_best(&pop, 2);
        assert_eq!(best.len(), 2);
        assert_eq!(best[0].genome, 1);
        assert_eq!(best[1].genome, 3);
    }

    #[test]
    fn test_unevaluated_rank_last() {
        let mut pop = population(&[-50.0, 4.0]);
        pop.push(Individual::new(99));
        let best = sel_best(&pop, 3);
        assert_eq!(best[2].genome, 99);
    }

    #[test]
    fn test_empty_population() {
        let mut rng = SmallRng::seed_from_u64(0);
        let pop: Vec<Individual<usize>> = Vec::new();
        assert!(sel_tournament(&pop, 5, 3, &mut rng).is_empty());
        assert!(sel_best(&pop, 5).is_empty());
    }
}
