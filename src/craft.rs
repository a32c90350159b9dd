//! Crafting model: actions, effects and the simulators.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │    Monte Carlo Estimator            │
//! ├─────────────────────────────────────┤
//! │  Simulation (expected | sampled)    │
//! ├─────────────────────────────────────┤
//! │  Effects │ Conditions │ Synth       │
//! ├─────────────────────────────────────┤
//! │         Action Catalog              │
//! └─────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use craftopt::craft::{ActionCatalog, ActionId, Crafter, Recipe, Synth, simulate};
//!
//! let crafter = Crafter {
//!     level: 25,
//!     craftsmanship: 136.0,
//!     control: 137.0,
//!     cp: 252.0,
//!     actions: vec![ActionId::BasicSynthesis],
//! };
//! let recipe = Recipe {
//!     level: 10,
//!     difficulty: 45.0,
//!     durability: 60.0,
//!     start_quality: 0.0,
//!     max_quality: 629.0,
//! };
//! let synth = Synth::new(crafter, recipe, 0, false, Arc::new(ActionCatalog::standard()))?;
//! let outcome = simulate(&[ActionId::BasicSynthesis; 2], &synth);
//! assert!(outcome.progress_ok);
//! # Ok::<(), craftopt::error::ConfigError>(())
//! ```

mod action;
mod condition;
mod effects;
mod montecarlo;
mod sim;
mod synth;

pub use action::{Action, ActionCatalog, ActionId, EffectKind, Special};
pub use condition::{
    ChanceModel, Condition, ConditionRoll, ExpectedConditions, P_EXCELLENT, P_GOOD,
    SampledConditions,
};
pub use effects::EffectTracker;
pub use montecarlo::{
    MonteCarloReport, Totals, estimate, hq_percent_from_quality, quality_from_hq_percent,
    quality_percent,
};
pub use sim::{
    LogTrace, Outcome, Simulation, TRACE_HEADER, TraceSink, TraceStep, simulate, simulate_sampled,
    simulate_traced,
};
pub use synth::{
    Crafter, INGENUITY_LEVEL_GAP, Recipe, Synth, base_progress_increase, base_quality_increase,
};
