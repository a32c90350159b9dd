//! Genome representations for the two optimizers.
//!
//! The GA evolves fixed-length action vectors. The GP evolves binary
//! [`ActionTree`]s whose leaves, read left to right, form the sequence.

// Genome uses intentional casts for random generation
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use crate::craft::{ActionId, Synth};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// A genome paired with its cached fitness.
///
/// `fitness` is `None` until evaluated and is cleared whenever the genome
/// is changed by crossover or mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual<G> {
    /// The candidate solution.
    pub genome: G,
    /// Cached fitness, if valid.
    pub fitness: Option<f64>,
}

impl<G> Individual<G> {
    /// Wrap an unevaluated genome.
    #[must_use]
    pub fn new(genome: G) -> Self {
        Self {
            genome,
            fitness: None,
        }
    }

    /// Whether the cached fitness is current.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.fitness.is_some()
    }

    /// Drop the cached fitness.
    pub fn invalidate(&mut self) {
        self.fitness = None;
    }

    /// Fitness for ranking; unevaluated individuals rank last.
    #[must_use]
    pub fn rank_fitness(&self) -> f64 {
        self.fitness.unwrap_or(f64::NEG_INFINITY)
    }
}

/// Binary tree over actions.
///
/// `Seq(a, b)` means "run `a`, then `b`".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionTree {
    /// A single action.
    Leaf(ActionId),
    /// Two subtrees run in order.
    Seq(Box<ActionTree>, Box<ActionTree>),
}

impl ActionTree {
    /// Join two trees.
    #[must_use]
    pub fn seq(left: Self, right: Self) -> Self {
        Self::Seq(Box::new(left), Box::new(right))
    }

    /// Left fold of a sequence: `Seq(Seq(a, b), c)` for `[a, b, c]`.
    ///
    /// Returns `None` for an empty sequence.
    #[must_use]
    pub fn from_sequence(sequence: &[ActionId]) -> Option<Self> {
        let (&first, rest) = sequence.split_first()?;
        Some(
            rest.iter()
                .fold(Self::Leaf(first), |tree, &id| Self::seq(tree, Self::Leaf(id))),
        )
    }

    /// Leaves in order.
    #[must_use]
    pub fn flatten(&self) -> Vec<ActionId> {
        let mut out = Vec::with_capacity(self.leaf_count());
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(&self, out: &mut Vec<ActionId>) {
        match self {
            Self::Leaf(id) => out.push(*id),
            Self::Seq(left, right) => {
                left.flatten_into(out);
                right.flatten_into(out);
            }
        }
    }

    /// Total number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::Seq(left, right) => 1 + left.node_count() + right.node_count(),
        }
    }

    /// Number of leaves.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::Seq(left, right) => left.leaf_count() + right.leaf_count(),
        }
    }

    /// Height of the tree; a single leaf has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Leaf(_) => 0,
            Self::Seq(left, right) => 1 + left.depth().max(right.depth()),
        }
    }

    /// Subtree at a preorder index.
    #[must_use]
    pub fn subtree(&self, mut index: usize) -> Option<&Self> {
        if index == 0 {
            return Some(self);
        }
        index -= 1;

        match self {
            Self::Leaf(_) => None,
            Self::Seq(left, right) => {
                let left_count = left.node_count();
                if index < left_count {
                    left.subtree(index)
                } else {
                    right.subtree(index - left_count)
                }
            }
        }
    }

    /// Copy of this tree with the subtree at a preorder index replaced.
    #[must_use]
    pub fn replace_subtree(&self, mut index: usize, donor: &Self) -> Option<Self> {
        if index == 0 {
            return Some(donor.clone());
        }
        index -= 1;

        match self {
            Self::Leaf(_) => None,
            Self::Seq(left, right) => {
                let left_count = left.node_count();
                if index < left_count {
                    let new_left = left.replace_subtree(index, donor)?;
                    Some(Self::Seq(Box::new(new_left), right.clone()))
                } else {
                    let new_right = right.replace_subtree(index - left_count, donor)?;
                    Some(Self::Seq(left.clone(), Box::new(new_right)))
                }
            }
        }
    }

    /// Tree whose every leaf sits exactly at `height`.
    ///
    /// `actions` must not be empty.
    #[must_use]
    pub fn full<R: Rng>(actions: &[ActionId], height: usize, rng: &mut R) -> Self {
        if height == 0 {
            Self::Leaf(random_action(actions, rng))
        } else {
            Self::seq(
                Self::full(actions, height - 1, rng),
                Self::full(actions, height - 1, rng),
            )
        }
    }

    /// Tree of irregular shape with leaves between `min_depth` and `height`.
    ///
    /// Below `min_depth` a node is always a join. Past it, a node becomes a
    /// leaf with the ratio of actions to all primitives.
    #[must_use]
    pub fn grow<R: Rng>(actions: &[ActionId], min_depth: usize, height: usize, rng: &mut R) -> Self {
        Self::grow_at(actions, 0, min_depth, height, rng)
    }

    fn grow_at<R: Rng>(
        actions: &[ActionId],
        depth: usize,
        min_depth: usize,
        height: usize,
        rng: &mut R,
    ) -> Self {
        let terminal_ratio = actions.len() as f64 / (actions.len() + 1) as f64;
        if depth >= height || (depth >= min_depth && rng.gen_bool(terminal_ratio)) {
            Self::Leaf(random_action(actions, rng))
        } else {
            Self::seq(
                Self::grow_at(actions, depth + 1, min_depth, height, rng),
                Self::grow_at(actions, depth + 1, min_depth, height, rng),
            )
        }
    }

    /// Ramped half-and-half: height drawn from `min_depth..=max_depth`,
    /// then either [`full`](Self::full) or [`grow`](Self::grow) with equal odds.
    #[must_use]
    pub fn half_and_half<R: Rng>(
        actions: &[ActionId],
        min_depth: usize,
        max_depth: usize,
        rng: &mut R,
    ) -> Self {
        let height = rng.gen_range(min_depth..=max_depth.max(min_depth));
        if rng.gen_bool(0.5) {
            Self::full(actions, height, rng)
        } else {
            Self::grow(actions, min_depth, height, rng)
        }
    }
}

fn random_action<R: Rng>(actions: &[ActionId], rng: &mut R) -> ActionId {
    actions.choose(rng).copied().unwrap_or(ActionId::Dummy)
}

/// Random fixed-length sequence over `actions`.
#[must_use]
pub fn random_sequence<R: Rng>(actions: &[ActionId], length: usize, rng: &mut R) -> Vec<ActionId> {
    (0..length).map(|_| random_action(actions, rng)).collect()
}

/// Hand-built starting sequence for the GA.
///
/// Enough Basic Synthesis at the end to finish the craft, dummies in front,
/// then Inner Quiet at position 0 and Hasty Touch at positions 2 to 4.
#[must_use]
pub fn initial_guess(synth: &Synth, length: usize) -> Vec<ActionId> {
    let basic = synth.catalog().get(ActionId::BasicSynthesis);
    let per_step =
        basic.success_probability * basic.progress_multiplier * synth.base_progress_increase();
    let needed = if per_step > 0.0 {
        (synth.recipe().difficulty / per_step).ceil() as usize
    } else {
        length
    };
    let needed = needed.min(length);

    let mut sequence = vec![ActionId::Dummy; length - needed];
    sequence.extend(std::iter::repeat_n(ActionId::BasicSynthesis, needed));

    if let Some(slot) = sequence.get_mut(0) {
        *slot = ActionId::InnerQuiet;
    }
    for slot in sequence.iter_mut().skip(2).take(3) {
        *slot = ActionId::HastyTouch;
    }
    sequence
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::craft::{ActionCatalog, Crafter, Recipe};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use std::sync::Arc;

    const ACTIONS: [ActionId; 4] = [
        ActionId::BasicSynthesis,
        ActionId::BasicTouch,
        ActionId::MastersMend,
        ActionId::SteadyHand,
    ];

    fn synth(difficulty: f64) -> Synth {
        let crafter = Crafter {
            level: 25,
            craftsmanship: 136.0,
            control: 137.0,
            cp: 252.0,
            actions: ACTIONS.to_vec(),
        };
        let recipe = Recipe {
            level: 10,
            difficulty,
            durability: 60.0,
            start_quality: 0.0,
            max_quality: 629.0,
        };
        Synth::new(crafter, recipe, 0, true, Arc::new(ActionCatalog::standard())).unwrap()
    }

    #[test]
    fn test_from_sequence_left_fold() {
        let seq = [ActionId::InnerQuiet, ActionId::BasicTouch, ActionId::BasicSynthesis];
        let tree = ActionTree::from_sequence(&seq).unwrap();
        let expected = ActionTree::seq(
            ActionTree::seq(
                ActionTree::Leaf(ActionId::InnerQuiet),
                ActionTree::Leaf(ActionId::BasicTouch),
            ),
            ActionTree::Leaf(ActionId::BasicSynthesis),
        );
        assert_eq!(tree, expected);
        assert_eq!(tree.flatten(), seq);
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.node_count(), 5);
        assert!(ActionTree::from_sequence(&[]).is_none());
    }

    #[test]
    fn test_subtree_preorder() {
        let tree = ActionTree::from_sequence(&[
            ActionId::InnerQuiet,
            ActionId::BasicTouch,
            ActionId::BasicSynthesis,
        ])
        .unwrap();
        assert_eq!(tree.subtree(0), Some(&tree));
        assert_eq!(tree.subtree(2), Some(&ActionTree::Leaf(ActionId::InnerQuiet)));
        assert_eq!(tree.subtree(4), Some(&ActionTree::Leaf(ActionId::BasicSynthesis)));
        assert_eq!(tree.subtree(5), None);
    }

    #[test]
    fn test_replace_subtree() {
        let tree = ActionTree::from_sequence(&[ActionId::InnerQuiet, ActionId::BasicTouch]).unwrap();
        let donor = ActionTree::from_sequence(&[ActionId::Observe, ActionId::Observe]).unwrap();
        let replaced = tree.replace_subtree(2, &donor).unwrap();
        assert_eq!(
            replaced.flatten(),
            vec![ActionId::InnerQuiet, ActionId::Observe, ActionId::Observe]
        );
        assert!(tree.replace_subtree(9, &donor).is_none());
    }

    #[test]
    fn test_full_tree_shape() {
        let mut rng = SmallRng::seed_from_u64(42);
        let tree = ActionTree::full(&ACTIONS, 3, &mut rng);
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.leaf_count(), 8);
        assert!(tree.flatten().iter().all(|id| ACTIONS.contains(id)));
    }

    #[test]
    fn test_half_and_half_depth_range() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..200 {
            let tree = ActionTree::half_and_half(&ACTIONS, 1, 5, &mut rng);
            assert!((1..=5).contains(&tree.depth()));
        }
    }

    #[test]
    fn test_random_sequence_uses_actions() {
        let mut rng = SmallRng::seed_from_u64(1);
        let seq = random_sequence(&ACTIONS, 25, &mut rng);
        assert_eq!(seq.len(), 25);
        assert!(seq.iter().all(|id| ACTIONS.contains(id)));
    }

    #[test]
    fn test_initial_guess_layout() {
        // 0.9 * 45 = 40.5 per step; 200 / 40.5 -> 5 steps
        let guess = initial_guess(&synth(200.0), 12);
        assert_eq!(guess.len(), 12);
        assert_eq!(guess[0], ActionId::InnerQuiet);
        assert_eq!(guess[1], ActionId::Dummy);
        assert_eq!(&guess[2..5], &[ActionId::HastyTouch; 3]);
        assert_eq!(&guess[5..7], &[ActionId::Dummy; 2]);
        assert_eq!(&guess[7..], &[ActionId::BasicSynthesis; 5]);
    }

    #[test]
    fn test_initial_guess_caps_synth_count() {
        let guess = initial_guess(&synth(5000.0), 3);
        assert_eq!(
            guess,
            vec![ActionId::InnerQuiet, ActionId::BasicSynthesis, ActionId::HastyTouch]
        );
        assert!(initial_guess(&synth(100.0), 0).is_empty());
    }

    #[test]
    fn test_individual_invalidate() {
        let mut ind = Individual::new(vec![ActionId::Observe]);
        assert!(!ind.is_valid());
        assert!(ind.rank_fitness().is_infinite());
        ind.fitness = Some(12.0);
        assert!(ind.is_valid());
        ind.invalidate();
        assert_eq!(ind.fitness, None);
    }
}
