//! Toolboxes binding the crafting simulator to the evolutionary engine.

use crate::craft::{ActionId, Synth};
use crate::gp::{
    ActionTree, FitnessConfig, Individual, MutationConfig, Toolbox, cx_one_point,
    cx_one_point_tree, evaluate_sequence, mut_shuffle_indexes, mut_uniform_tree, sel_tournament,
};
use rand::Rng;

/// Fixed-length sequence genomes for the GA.
#[derive(Debug)]
pub struct SequenceToolbox<'s> {
    synth: &'s Synth,
    fitness: FitnessConfig,
    tournament_size: usize,
    indpb: f64,
}

impl<'s> SequenceToolbox<'s> {
    /// Toolbox scoring sequences against `synth`.
    #[must_use]
    pub fn new(synth: &'s Synth, fitness: FitnessConfig, tournament_size: usize, indpb: f64) -> Self {
        Self {
            synth,
            fitness,
            tournament_size,
            indpb,
        }
    }
}

impl Toolbox for SequenceToolbox<'_> {
    type Genome = Vec<ActionId>;

    fn evaluate(&self, genome: &Vec<ActionId>) -> f64 {
        evaluate_sequence(genome, self.synth, &self.fitness)
    }

    fn mate<R: Rng>(&self, a: &mut Vec<ActionId>, b: &mut Vec<ActionId>, rng: &mut R) {
        cx_one_point(a, b, rng);
    }

    fn mutate<R: Rng>(&self, genome: &mut Vec<ActionId>, rng: &mut R) {
        mut_shuffle_indexes(genome, self.indpb, rng);
    }

    fn select<R: Rng>(
        &self,
        population: &[Individual<Vec<ActionId>>],
        k: usize,
        rng: &mut R,
    ) -> Vec<Individual<Vec<ActionId>>> {
        sel_tournament(population, k, self.tournament_size, rng)
    }
}

/// Tree genomes for the GP.
///
/// Offspring taller than `depth_limit` are discarded in favour of the
/// parent they came from.
#[derive(Debug)]
pub struct TreeToolbox<'s> {
    synth: &'s Synth,
    actions: Vec<ActionId>,
    fitness: FitnessConfig,
    tournament_size: usize,
    mutation: MutationConfig,
    depth_limit: usize,
}

impl<'s> TreeToolbox<'s> {
    /// Toolbox building trees from `actions` and scoring them against `synth`.
    #[must_use]
    pub fn new(
        synth: &'s Synth,
        actions: Vec<ActionId>,
        fitness: FitnessConfig,
        tournament_size: usize,
        mutation: MutationConfig,
        depth_limit: usize,
    ) -> Self {
        Self {
            synth,
            actions,
            fitness,
            tournament_size,
            mutation,
            depth_limit,
        }
    }
}

impl Toolbox for TreeToolbox<'_> {
    type Genome = ActionTree;

    fn evaluate(&self, genome: &ActionTree) -> f64 {
        evaluate_sequence(&genome.flatten(), self.synth, &self.fitness)
    }

    fn mate<R: Rng>(&self, a: &mut ActionTree, b: &mut ActionTree, rng: &mut R) {
        let (parent_a, parent_b) = (a.clone(), b.clone());
        cx_one_point_tree(a, b, rng);
        if a.depth() > self.depth_limit {
            *a = parent_a;
        }
        if b.depth() > self.depth_limit {
            *b = parent_b;
        }
    }

    fn mutate<R: Rng>(&self, genome: &mut ActionTree, rng: &mut R) {
        let parent = genome.clone();
        mut_uniform_tree(genome, &self.actions, &self.mutation, rng);
        if genome.depth() > self.depth_limit {
            *genome = parent;
        }
    }

    fn select<R: Rng>(
        &self,
        population: &[Individual<ActionTree>],
        k: usize,
        rng: &mut R,
    ) -> Vec<Individual<ActionTree>> {
        sel_tournament(population, k, self.tournament_size, rng)
    }
}
