//! Step-by-step crafting simulation.
//!
//! [`Simulation`] is a state machine over one synth. The same step rules
//! serve both the expected-value and the Monte Carlo variants; the only
//! difference is the [`ChanceModel`] plugged in.

use crate::craft::action::{Action, ActionId, EffectKind, Special};
use crate::craft::condition::{ChanceModel, ExpectedConditions, SampledConditions};
use crate::craft::effects::EffectTracker;
use crate::craft::synth::{INGENUITY_LEVEL_GAP, Synth, base_progress_increase, base_quality_increase};
use rand::Rng;
use serde::Serialize;
use std::fmt;

/// Column header matching [`TraceStep`]'s `Display` output.
pub const TRACE_HEADER: &str = " # Action                 DUR    CP   QUA   PRG   WAC";

/// Final state of one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    /// Number of actions stepped through.
    pub steps: usize,
    /// Last action taken.
    pub last_action: Option<ActionId>,
    /// Remaining durability.
    pub durability: f64,
    /// Remaining CP.
    pub cp: f64,
    /// Accumulated quality.
    pub quality: f64,
    /// Accumulated progress.
    pub progress: f64,
    /// Steps that could not affect the craft.
    pub wasted_actions: u32,
    /// Times CP was borrowed through Tricks of the Trade.
    pub tricks_used: u32,
    /// Progress reached the recipe difficulty.
    pub progress_ok: bool,
    /// CP never went negative by the end.
    pub cp_ok: bool,
    /// Durability stayed non-negative and the craft finished.
    pub durability_ok: bool,
    /// Tricks of the Trade stayed within its budget.
    pub tricks_ok: bool,
}

impl Outcome {
    /// Number of constraint flags that failed.
    #[must_use]
    pub fn violations(&self) -> u32 {
        [self.progress_ok, self.cp_ok, self.durability_ok, self.tricks_ok]
            .iter()
            .map(|&ok| u32::from(!ok))
            .sum()
    }
}

/// One line of a simulation trace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TraceStep {
    /// Step number (0 is the starting state).
    pub step: usize,
    /// Action taken on this step.
    pub action: Option<ActionId>,
    /// Durability after the step.
    pub durability: f64,
    /// CP after the step.
    pub cp: f64,
    /// Quality after the step.
    pub quality: f64,
    /// Progress after the step.
    pub progress: f64,
    /// Wasted actions so far.
    pub wasted: u32,
}

impl fmt::Display for TraceStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>2} {:<20} {:>5.0} {:>5.0} {:>5.1} {:>5.1} {:>5}",
            self.step,
            self.action.map_or("", ActionId::short_name),
            self.durability,
            self.cp,
            self.quality,
            self.progress,
            self.wasted
        )
    }
}

/// Receiver for per-step trace lines.
pub trait TraceSink {
    /// Record one step.
    fn record(&mut self, step: &TraceStep);
}

impl TraceSink for () {
    fn record(&mut self, _step: &TraceStep) {}
}

impl TraceSink for Vec<TraceStep> {
    fn record(&mut self, step: &TraceStep) {
        self.push(*step);
    }
}

/// Sink that forwards each line to the `log` facade at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTrace;

impl TraceSink for LogTrace {
    fn record(&mut self, step: &TraceStep) {
        log::debug!("{step}");
    }
}

/// A crafting run in progress.
#[derive(Debug)]
pub struct Simulation<'s, M> {
    synth: &'s Synth,
    chance: M,
    effects: EffectTracker,
    durability: f64,
    cp: f64,
    quality: f64,
    progress: f64,
    steps: usize,
    wasted: u32,
    tricks_used: u32,
    last_action: Option<ActionId>,
}

impl<'s> Simulation<'s, ExpectedConditions> {
    /// Deterministic expected-value simulation.
    #[must_use]
    pub fn expected(synth: &'s Synth) -> Self {
        Self::with_chance(synth, ExpectedConditions::new(synth.use_conditions()))
    }
}

impl<'s, 'r, R: Rng> Simulation<'s, SampledConditions<'r, R>> {
    /// Single-sample Monte Carlo simulation drawing from `rng`.
    pub fn sampled(synth: &'s Synth, rng: &'r mut R) -> Self {
        let use_conditions = synth.use_conditions();
        Self::with_chance(synth, SampledConditions::new(rng, use_conditions))
    }
}

impl<'s, M: ChanceModel> Simulation<'s, M> {
    /// Start a run at the recipe's initial state.
    pub fn with_chance(synth: &'s Synth, chance: M) -> Self {
        Self {
            synth,
            chance,
            effects: EffectTracker::new(),
            durability: synth.recipe().durability,
            cp: synth.crafter().cp,
            quality: synth.recipe().start_quality,
            progress: 0.0,
            steps: 0,
            wasted: 0,
            tricks_used: 0,
            last_action: None,
        }
    }

    /// Effects active after the last step.
    #[must_use]
    pub fn effects(&self) -> &EffectTracker {
        &self.effects
    }

    /// Current state as a trace line.
    #[must_use]
    pub fn snapshot(&self) -> TraceStep {
        TraceStep {
            step: self.steps,
            action: self.last_action,
            durability: self.durability,
            cp: self.cp,
            quality: self.quality,
            progress: self.progress,
            wasted: self.wasted,
        }
    }

    /// Apply one action.
    pub fn step(&mut self, id: ActionId) -> TraceStep {
        let synth = self.synth;
        let action = *synth.catalog().get(id);
        let difficulty = synth.recipe().difficulty;

        self.steps += 1;
        self.last_action = Some(id);

        let roll = self
            .chance
            .roll_condition(self.tricks_used < synth.max_tricks_uses());

        let mut control = synth.crafter().control;
        if let Some(inner_quiet) = self.effects.count_up(ActionId::InnerQuiet) {
            control *= 1.0 + 0.2 * inner_quiet;
        }
        if self.effects.is_active(ActionId::Innovation) {
            control *= 1.5;
        }

        let level_difference = if self.effects.is_active(ActionId::Ingenuity2) {
            0
        } else if self.effects.is_active(ActionId::Ingenuity) {
            INGENUITY_LEVEL_GAP
        } else {
            synth.level_difference()
        };

        // Steady Hand II overrides Steady Hand rather than stacking.
        let mut success_probability = action.success_probability;
        if self.effects.is_active(ActionId::SteadyHand2) {
            success_probability += 0.3;
        } else if self.effects.is_active(ActionId::SteadyHand) {
            success_probability += 0.2;
        }
        let success_probability = success_probability.min(1.0);

        let mut quality_multiplier = action.quality_multiplier;
        if self.effects.is_active(ActionId::GreatStrides) {
            quality_multiplier *= 2.0;
        }
        quality_multiplier *= roll.quality_factor;

        let base_progress = match action.special {
            Some(Special::FixedProgress(progress)) => progress,
            Some(Special::RemainingProgressThird) => (difficulty - self.progress) / 3.0,
            _ => {
                action.progress_multiplier
                    * base_progress_increase(level_difference, synth.crafter().craftsmanship)
            }
        };

        let mut base_quality = quality_multiplier * base_quality_increase(level_difference, control);
        if action.special == Some(Special::ConsumeInnerQuiet) {
            if let Some(inner_quiet) = self.effects.count_up(ActionId::InnerQuiet) {
                base_quality *= 1.0 + 0.2 * inner_quiet;
            }
        }

        let durability_cost = if self.effects.is_active(ActionId::WasteNot)
            || self.effects.is_active(ActionId::WasteNot2)
        {
            0.5 * action.durability_cost
        } else {
            action.durability_cost
        };

        let finished = self.progress >= difficulty || self.durability <= 0.0;
        if finished && id != ActionId::Dummy {
            self.wasted += 1;
            return self.snapshot();
        }

        let success = self.chance.success(success_probability);
        self.progress += success * base_progress;
        self.quality += success * base_quality;
        self.durability -= durability_cost;
        self.cp -= action.cp_cost;

        self.apply_specials(&action, roll.borrows_cp);

        self.chance.advance();

        // Existing timers tick before this action's own effect starts.
        self.effects.tick();
        if action.is_quality_action() {
            self.effects.bump_count_up(ActionId::InnerQuiet, success);
        }
        match action.kind {
            EffectKind::CountUp => self.effects.start_count_up(id),
            EffectKind::CountDown { turns } => self.effects.start_count_down(id, turns),
            EffectKind::Immediate => {}
        }

        self.durability = self.durability.min(synth.recipe().durability);
        self.cp = self.cp.min(synth.crafter().cp);

        self.snapshot()
    }

    fn apply_specials(&mut self, action: &Action, implicit_borrow: bool) {
        if let Some(Special::RestoreDurability(amount)) = action.special {
            self.durability += amount;
        }

        if self.effects.is_active(ActionId::Manipulation) && self.durability > 0.0 {
            self.durability += 10.0;
        }

        if self.effects.is_active(ActionId::ComfortZone) && self.cp > 0.0 {
            self.cp += 8.0;
        }

        match action.special {
            Some(Special::RefundInnerQuiet) => match self.effects.count_up(ActionId::InnerQuiet) {
                Some(iq) if iq > 0.0 => {
                    self.cp += (21.0 * iq - iq * iq + 10.0) / 2.0;
                    self.effects.take_count_up(ActionId::InnerQuiet);
                }
                _ => self.wasted += 1,
            },
            Some(Special::ConsumeInnerQuiet) => {
                if self.effects.take_count_up(ActionId::InnerQuiet).is_none() {
                    self.wasted += 1;
                }
            }
            _ => {}
        }

        if action.is_quality_action() {
            self.effects.clear_count_down(ActionId::GreatStrides);
        }

        if let Some(Special::BorrowCp(amount)) = action.special {
            self.borrow_cp(amount);
        }
        if implicit_borrow {
            self.borrow_cp(self.tricks_refund());
        }
    }

    fn borrow_cp(&mut self, amount: f64) {
        if self.cp > 0.0 {
            self.tricks_used += 1;
            self.cp += amount;
        }
    }

    fn tricks_refund(&self) -> f64 {
        match self.synth.catalog().get(ActionId::TricksOfTheTrade).special {
            Some(Special::BorrowCp(amount)) => amount,
            _ => 0.0,
        }
    }

    /// Close the run and evaluate the end-state constraints.
    #[must_use]
    pub fn finish(self) -> Outcome {
        let progress_ok = self.progress >= self.synth.recipe().difficulty;
        Outcome {
            steps: self.steps,
            last_action: self.last_action,
            durability: self.durability,
            cp: self.cp,
            quality: self.quality,
            progress: self.progress,
            wasted_actions: self.wasted,
            tricks_used: self.tricks_used,
            progress_ok,
            cp_ok: self.cp >= 0.0,
            durability_ok: self.durability >= 0.0 && progress_ok,
            tricks_ok: self.tricks_used <= self.synth.max_tricks_uses(),
        }
    }
}

/// Expected-value simulation of a whole sequence.
#[must_use]
pub fn simulate(sequence: &[ActionId], synth: &Synth) -> Outcome {
    simulate_traced(sequence, synth, &mut ())
}

/// Expected-value simulation, reporting every step to `sink`.
pub fn simulate_traced<T: TraceSink + ?Sized>(
    sequence: &[ActionId],
    synth: &Synth,
    sink: &mut T,
) -> Outcome {
    let mut sim = Simulation::expected(synth);
    sink.record(&sim.snapshot());
    for &id in sequence {
        let line = sim.step(id);
        sink.record(&line);
    }
    sim.finish()
}

/// One Monte Carlo sample of a sequence.
///
/// Tricks of the Trade is dropped from the sequence; the sampled model
/// borrows CP on Good conditions instead.
pub fn simulate_sampled<R: Rng, T: TraceSink + ?Sized>(
    sequence: &[ActionId],
    synth: &Synth,
    rng: &mut R,
    sink: &mut T,
) -> Outcome {
    let mut sim = Simulation::sampled(synth, rng);
    sink.record(&sim.snapshot());
    for &id in sequence.iter().filter(|&&id| id != ActionId::TricksOfTheTrade) {
        let line = sim.step(id);
        sink.record(&line);
    }
    sim.finish()
}
