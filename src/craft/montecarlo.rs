//! Monte Carlo estimation over many sampled runs of one sequence.

use crate::craft::action::ActionId;
use crate::craft::sim::{Outcome, simulate_sampled};
use crate::craft::synth::Synth;
use rand::Rng;
use serde::Serialize;

/// Resource totals reported per aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Totals {
    /// Durability remaining.
    pub durability: f64,
    /// CP remaining.
    pub cp: f64,
    /// Quality reached.
    pub quality: f64,
    /// Progress reached.
    pub progress: f64,
}

impl Totals {
    fn from_outcome(outcome: &Outcome) -> Self {
        Self {
            durability: outcome.durability,
            cp: outcome.cp,
            quality: outcome.quality,
            progress: outcome.progress,
        }
    }

    fn add(&mut self, other: &Self) {
        self.durability += other.durability;
        self.cp += other.cp;
        self.quality += other.quality;
        self.progress += other.progress;
    }

    fn min(&mut self, other: &Self) {
        self.durability = self.durability.min(other.durability);
        self.cp = self.cp.min(other.cp);
        self.quality = self.quality.min(other.quality);
        self.progress = self.progress.min(other.progress);
    }

    fn scaled(self, factor: f64) -> Self {
        Self {
            durability: self.durability * factor,
            cp: self.cp * factor,
            quality: self.quality * factor,
            progress: self.progress * factor,
        }
    }
}

/// Aggregate of many sampled runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonteCarloReport {
    /// Number of runs.
    pub runs: usize,
    /// Per-field mean.
    pub mean: Totals,
    /// Per-field minimum.
    pub min: Totals,
    /// Runs whose progress reached the difficulty.
    pub success_count: usize,
    /// HQ chance implied by the mean quality.
    pub mean_hq_percent: u32,
    /// HQ chance implied by the minimum quality.
    pub min_hq_percent: u32,
}

impl MonteCarloReport {
    /// Fraction of runs that finished the craft.
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        if self.runs == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let rate = self.success_count as f64 / self.runs as f64;
        rate
    }
}

/// Run `sequence` `n_runs` times against `synth`, drawing from `rng`.
///
/// `n_runs` of zero yields an all-zero report.
pub fn estimate<R: Rng>(
    sequence: &[ActionId],
    synth: &Synth,
    n_runs: usize,
    rng: &mut R,
) -> MonteCarloReport {
    let mut sum = Totals::default();
    let mut min: Option<Totals> = None;
    let mut success_count = 0;

    for _ in 0..n_runs {
        let outcome = simulate_sampled(sequence, synth, rng, &mut ());
        let totals = Totals::from_outcome(&outcome);
        sum.add(&totals);
        match min.as_mut() {
            Some(current) => current.min(&totals),
            None => min = Some(totals),
        }
        if outcome.progress_ok {
            success_count += 1;
        }
    }

    let min = min.unwrap_or_default();
    #[allow(clippy::cast_precision_loss)]
    let mean = if n_runs == 0 {
        Totals::default()
    } else {
        sum.scaled(1.0 / n_runs as f64)
    };

    let max_quality = synth.recipe().max_quality;
    log::debug!(
        "Monte Carlo: {n_runs} runs, mean quality {:.1}, {success_count} finished",
        mean.quality
    );

    MonteCarloReport {
        runs: n_runs,
        mean,
        min,
        success_count,
        mean_hq_percent: hq_percent_from_quality(quality_percent(mean.quality, max_quality)),
        min_hq_percent: hq_percent_from_quality(quality_percent(min.quality, max_quality)),
    }
}

/// Quality as a whole percentage of the recipe's maximum, capped at 100.
///
/// Partial percents are dropped, so 99.9% of max quality reads as 99.
#[must_use]
pub fn quality_percent(quality: f64, max_quality: f64) -> f64 {
    (quality / max_quality * 100.0).floor().min(100.0)
}

/// Quality percentage needed for a given HQ percentage.
///
/// Fitted quartic of the in-game HQ curve.
#[must_use]
pub fn quality_from_hq_percent(hq_percent: f64) -> f64 {
    let x = hq_percent;
    -5.6604e-6 * x.powi(4) + 0.001_536_970_5 * x.powi(3) - 0.142_646_957_3 * x.powi(2)
        + 5.612_272_295_9 * x
        - 5.595_038_456_5
}

/// Smallest HQ percentage in `1..=100` whose quality requirement is met.
#[must_use]
pub fn hq_percent_from_quality(quality_percent: f64) -> u32 {
    if quality_percent <= 0.0 {
        return 1;
    }
    if quality_percent >= 100.0 {
        return 100;
    }
    let mut hq_percent = 1;
    while hq_percent < 100 && quality_from_hq_percent(f64::from(hq_percent)) < quality_percent {
        hq_percent += 1;
    }
    hq_percent
}
