//! Property-based tests for the crafting simulators and sequence trees.
//!
//! Run with: cargo test --release prop_sim

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::sync::Arc;

use craftopt::craft::{
    ActionCatalog, ActionId, Crafter, Recipe, Simulation, Synth, TraceStep, simulate,
    simulate_sampled,
};
use craftopt::gp::ActionTree;

fn synth(difficulty: f64, durability: f64, max_tricks_uses: u32, use_conditions: bool) -> Synth {
    let crafter = Crafter {
        level: 25,
        craftsmanship: 136.0,
        control: 137.0,
        cp: 252.0,
        actions: ActionId::ALL.to_vec(),
    };
    let recipe = Recipe {
        level: 10,
        difficulty,
        durability,
        start_quality: 0.0,
        max_quality: 629.0,
    };
    Synth::new(crafter, recipe, max_tricks_uses, use_conditions, Arc::new(ActionCatalog::standard()))
        .unwrap()
}

fn action() -> impl Strategy<Value = ActionId> {
    prop::sample::select(ActionId::ALL.to_vec())
}

fn sequence(max_len: usize) -> impl Strategy<Value = Vec<ActionId>> {
    prop::collection::vec(action(), 0..max_len)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Restorations never lift durability or CP above their starting pools.
    #[test]
    fn prop_pools_capped_every_step(
        seq in sequence(40),
        difficulty in 20.0f64..400.0,
        durability in prop::sample::select(vec![35.0, 40.0, 60.0, 70.0, 80.0]),
        conditions in any::<bool>(),
    ) {
        let synth = synth(difficulty, durability, 3, conditions);
        let mut sim = Simulation::expected(&synth);
        for &id in &seq {
            let line = sim.step(id);
            prop_assert!(line.durability <= durability);
            prop_assert!(line.cp <= synth.crafter().cp);
        }
    }

    /// Quality and progress never decrease along a run.
    #[test]
    fn prop_quality_and_progress_monotone(seq in sequence(30), conditions in any::<bool>()) {
        let synth = synth(200.0, 80.0, 2, conditions);
        let mut trace: Vec<TraceStep> = Vec::new();
        craftopt::craft::simulate_traced(&seq, &synth, &mut trace);
        prop_assert_eq!(trace.len(), seq.len() + 1);
        for pair in trace.windows(2) {
            prop_assert!(pair[1].quality >= pair[0].quality);
            prop_assert!(pair[1].progress >= pair[0].progress);
        }
    }

    /// A run of dummy actions leaves the start state untouched.
    #[test]
    fn prop_dummy_sequence_is_inert(len in 1usize..30, conditions in any::<bool>()) {
        let synth = synth(45.0, 60.0, 0, conditions);
        let outcome = simulate(&vec![ActionId::Dummy; len], &synth);
        prop_assert_eq!(outcome.steps, len);
        prop_assert_eq!(outcome.wasted_actions, 0);
        prop_assert!((outcome.durability - 60.0).abs() < f64::EPSILON);
        prop_assert!((outcome.cp - 252.0).abs() < f64::EPSILON);
        prop_assert!(outcome.quality.abs() < f64::EPSILON);
        prop_assert!(outcome.progress.abs() < f64::EPSILON);
    }

    /// The expected-value simulation is a pure function of its inputs.
    #[test]
    fn prop_expected_value_deterministic(seq in sequence(25)) {
        let synth = synth(120.0, 70.0, 1, true);
        prop_assert_eq!(simulate(&seq, &synth), simulate(&seq, &synth));
    }

    /// A seeded sample is reproducible.
    #[test]
    fn prop_sampled_reproducible(seq in sequence(25), seed in any::<u64>()) {
        let synth = synth(120.0, 70.0, 1, true);
        let a = simulate_sampled(&seq, &synth, &mut SmallRng::seed_from_u64(seed), &mut ());
        let b = simulate_sampled(&seq, &synth, &mut SmallRng::seed_from_u64(seed), &mut ());
        prop_assert_eq!(a, b);
    }

    /// Folding a sequence into a tree and flattening it returns the sequence.
    #[test]
    fn prop_tree_flatten_inverts_fold(seq in prop::collection::vec(action(), 1..50)) {
        let tree = ActionTree::from_sequence(&seq).unwrap();
        prop_assert_eq!(tree.leaf_count(), seq.len());
        prop_assert_eq!(tree.flatten(), seq);
    }

    /// Random trees respect their requested height.
    #[test]
    fn prop_generated_tree_depth(min in 0usize..3, extra in 0usize..4, seed in any::<u64>()) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let actions = [ActionId::BasicSynthesis, ActionId::BasicTouch, ActionId::Observe];
        let max = min + extra;
        let tree = ActionTree::half_and_half(&actions, min, max, &mut rng);
        prop_assert!(tree.depth() <= max);
        prop_assert_eq!(tree.node_count(), 2 * tree.leaf_count() - 1);
    }
}
