//! Crossover operators.
//!
//! Both operators work in place on two genomes, swapping material between
//! them so that each pair of parents yields two children.

use crate::gp::genome::ActionTree;
use rand::Rng;

/// One-point crossover on two sequences.
///
/// A cut point is drawn in `1..min_len`; the tails after it are swapped.
/// Sequences shorter than two elements are left alone.
pub fn cx_one_point<T, R: Rng>(a: &mut [T], b: &mut [T], rng: &mut R) {
    let size = a.len().min(b.len());
    if size < 2 {
        return;
    }
    let point = rng.gen_range(1..size);
    a[point..size].swap_with_slice(&mut b[point..size]);
}

/// One-point subtree crossover on two trees.
///
/// A non-root node is picked in each tree and the subtrees rooted there
/// are exchanged. Trees consisting of a single leaf are left alone.
pub fn cx_one_point_tree<R: Rng>(a: &mut ActionTree, b: &mut ActionTree, rng: &mut R) {
    let count_a = a.node_count();
    let count_b = b.node_count();
    if count_a < 2 || count_b < 2 {
        return;
    }

    let index_a = rng.gen_range(1..count_a);
    let index_b = rng.gen_range(1..count_b);

    let (Some(donor_a), Some(donor_b)) = (a.subtree(index_a), b.subtree(index_b)) else {
        return;
    };
    let (donor_a, donor_b) = (donor_a.clone(), donor_b.clone());

    if let (Some(new_a), Some(new_b)) = (
        a.replace_subtree(index_a, &donor_b),
        b.replace_subtree(index_b, &donor_a),
    ) {
        *a = new_a;
        *b = new_b;
    }
}
