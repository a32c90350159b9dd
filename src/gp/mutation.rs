//! Mutation operators.

use crate::craft::ActionId;
use crate::gp::genome::ActionTree;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Configuration for mutation operations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MutationConfig {
    /// Per-position chance of a swap in shuffle mutation.
    pub indpb: f64,
    /// Minimum height of replacement subtrees.
    pub subtree_min_depth: usize,
    /// Maximum height of replacement subtrees.
    pub subtree_max_depth: usize,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            indpb: 0.05,
            subtree_min_depth: 0,
            subtree_max_depth: 2,
        }
    }
}

/// Shuffle mutation: each position swaps, with probability `indpb`, with
/// another position chosen uniformly among the rest.
pub fn mut_shuffle_indexes<T, R: Rng>(genome: &mut [T], indpb: f64, rng: &mut R) {
    let size = genome.len();
    if size < 2 {
        return;
    }
    for i in 0..size {
        if rng.r#gen::<f64>() < indpb {
            let mut other = rng.gen_range(0..size - 1);
            if other >= i {
                other += 1;
            }
            genome.swap(i, other);
        }
    }
}

/// Uniform subtree mutation: a random node is replaced by a fresh full tree
/// of height drawn from the configured range.
pub fn mut_uniform_tree<R: Rng>(
    tree: &mut ActionTree,
    actions: &[ActionId],
    config: &MutationConfig,
    rng: &mut R,
) {
    let index = rng.gen_range(0..tree.node_count());
    let max_depth = config.subtree_max_depth.max(config.subtree_min_depth);
    let height = rng.gen_range(config.subtree_min_depth..=max_depth);
    let donor = ActionTree::full(actions, height, rng);
    if let Some(mutated) = tree.replace_subtree(index, &donor) {
        *tree = mutated;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut genome: Vec<u32> = (0..50).collect();
        mut_shuffle_indexes(&mut genome, 0.5, &mut rng);

        let mut sorted = genome.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
        assert_ne!(genome, sorted);
    }

    #[test]
    fn test_shuffle_zero_rate_is_identity() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut genome: Vec<u32> = (0..20).collect();
        mut_shuffle_indexes(&mut genome, 0.0, &mut rng);
        assert_eq!(genome, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_uniform_tree_mutation_uses_actions() {
        let mut rng = SmallRng::seed_from_u64(9);
        let config = MutationConfig::default();
        for _ in 0..100 {
            let mut tree = ActionTree::full(&[ActionId::BasicSynthesis], 3, &mut rng);
            mut_uniform_tree(&mut tree, &[ActionId::Observe], &config, &mut rng);
            // Replacement height is at most 2 below any node of a depth-3 tree.
            assert!(tree.depth() <= 3 + 2);
            assert!(
                tree.flatten()
                    .iter()
                    .all(|&id| id == ActionId::BasicSynthesis || id == ActionId::Observe)
            );
        }
    }

    #[test]
    fn test_uniform_tree_mutation_on_leaf() {
        let mut rng = SmallRng::seed_from_u64(2);
        let config = MutationConfig {
            indpb: 0.05,
            subtree_min_depth: 2,
            subtree_max_depth: 2,
        };
        let mut tree = ActionTree::Leaf(ActionId::Observe);
        mut_uniform_tree(&mut tree, &[ActionId::BasicTouch], &config, &mut rng);
        assert_eq!(tree.flatten(), vec![ActionId::BasicTouch; 4]);
    }
}
