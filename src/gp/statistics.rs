//! Run bookkeeping: population statistics, the logbook and the hall of fame.

// Statistics uses intentional casts
#![allow(clippy::cast_precision_loss)]

use crate::gp::genome::Individual;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Summary of a population's fitness values.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FitnessStats {
    /// Mean fitness of the population.
    pub mean: f64,
    /// Standard deviation of fitness.
    pub std: f64,
    /// Worst fitness in the population.
    pub min: f64,
    /// Best fitness in the population.
    pub max: f64,
}

impl FitnessStats {
    /// Calculate statistics from fitness values.
    #[must_use]
    pub fn from_fitness(fitness: &[f64]) -> Self {
        if fitness.is_empty() {
            return Self::default();
        }

        let sum: f64 = fitness.iter().sum();
        let mean = sum / fitness.len() as f64;

        let max = fitness.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = fitness.iter().copied().fold(f64::INFINITY, f64::min);

        let variance: f64 =
            fitness.iter().map(|f| (f - mean).powi(2)).sum::<f64>() / fitness.len() as f64;

        Self {
            mean,
            std: variance.sqrt(),
            min,
            max,
        }
    }

    /// Statistics over the evaluated members of a population.
    #[must_use]
    pub fn from_population<G>(population: &[Individual<G>]) -> Self {
        let fitness: Vec<f64> = population.iter().filter_map(|ind| ind.fitness).collect();
        Self::from_fitness(&fitness)
    }
}

/// One logbook line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// Generation number; 0 is the initial population.
    pub generation: usize,
    /// Individuals evaluated this generation.
    pub evaluations: usize,
    /// Mean fitness.
    pub mean: f64,
    /// Fitness standard deviation.
    pub std: f64,
    /// Worst fitness.
    pub min: f64,
    /// Best fitness.
    pub max: f64,
}

/// Per-generation history of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Logbook {
    records: Vec<GenerationRecord>,
}

impl Logbook {
    /// Empty logbook.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record built from a population snapshot.
    pub fn record<G>(
        &mut self,
        generation: usize,
        evaluations: usize,
        population: &[Individual<G>],
    ) -> GenerationRecord {
        let stats = FitnessStats::from_population(population);
        let record = GenerationRecord {
            generation,
            evaluations,
            mean: stats.mean,
            std: stats.std,
            min: stats.min,
            max: stats.max,
        };
        self.records.push(record);
        record
    }

    /// All records in generation order.
    #[must_use]
    pub fn records(&self) -> &[GenerationRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Most recent record.
    #[must_use]
    pub fn last(&self) -> Option<&GenerationRecord> {
        self.records.last()
    }
}

/// The best individuals seen during a run.
///
/// Holds at most `capacity` distinct genomes, best first. An entry is only
/// displaced by a strictly fitter one, so the best fitness never drops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HallOfFame<G> {
    capacity: usize,
    entries: Vec<Individual<G>>,
}

impl<G: Clone + PartialEq> HallOfFame<G> {
    /// Empty hall of fame holding up to `capacity` entries (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Vec::with_capacity(capacity.max(1)),
        }
    }

    /// Consider every evaluated member of `population`.
    ///
    /// Returns `true` if the best entry improved.
    pub fn update(&mut self, population: &[Individual<G>]) -> bool {
        let before = self.best_fitness();
        for candidate in population {
            let Some(fitness) = candidate.fitness else {
                continue;
            };
            let full = self.entries.len() >= self.capacity;
            if full && self.worst_fitness().is_some_and(|worst| fitness <= worst) {
                continue;
            }
            if self.entries.iter().any(|entry| entry.genome == candidate.genome) {
                continue;
            }
            if full {
                self.entries.pop();
            }
            let position = self
                .entries
                .iter()
                .position(|entry| {
                    entry
                        .rank_fitness()
                        .partial_cmp(&fitness)
                        .is_some_and(|ord| ord == Ordering::Less)
                })
                .unwrap_or(self.entries.len());
            self.entries.insert(position, candidate.clone());
        }
        match (before, self.best_fitness()) {
            (None, Some(_)) => true,
            (Some(old), Some(new)) => new > old,
            _ => false,
        }
    }

    /// Best individual so far.
    #[must_use]
    pub fn best(&self) -> Option<&Individual<G>> {
        self.entries.first()
    }

    /// Fitness of the best individual.
    #[must_use]
    pub fn best_fitness(&self) -> Option<f64> {
        self.entries.first().and_then(|entry| entry.fitness)
    }

    fn worst_fitness(&self) -> Option<f64> {
        self.entries.last().and_then(|entry| entry.fitness)
    }

    /// All entries, best first.
    #[must_use]
    pub fn entries(&self) -> &[Individual<G>] {
        &self.entries
    }

    /// Maximum number of entries.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been admitted yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
