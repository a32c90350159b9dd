//! Crafting conditions and the chance models that drive a simulation.
//!
//! The expected-value simulator tracks a probability distribution over
//! conditions and applies success chances as multiplicative expectations.
//! The Monte Carlo simulator samples both from a random stream.

use rand::Rng;

/// Chance of rolling Good from Normal.
pub const P_GOOD: f64 = 0.23;

/// Chance of rolling Excellent from Normal.
pub const P_EXCELLENT: f64 = 0.01;

/// Condition of the material on a given step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// No modifier.
    Normal,
    /// Quality x1.5.
    Good,
    /// Quality x4. Always followed by Poor.
    Excellent,
    /// Quality x0.5.
    Poor,
}

impl Condition {
    /// Multiplier applied to quality gains under this condition.
    #[must_use]
    pub const fn quality_factor(self) -> f64 {
        match self {
            Self::Normal => 1.0,
            Self::Good => 1.5,
            Self::Excellent => 4.0,
            Self::Poor => 0.5,
        }
    }
}

/// What the condition means for the current step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConditionRoll {
    /// Multiplier on this step's quality gain.
    pub quality_factor: f64,
    /// The step recovers CP as if Tricks of the Trade had been used.
    pub borrows_cp: bool,
}

impl ConditionRoll {
    const NEUTRAL: Self = Self {
        quality_factor: 1.0,
        borrows_cp: false,
    };
}

/// Source of condition and success outcomes for a simulation.
pub trait ChanceModel {
    /// Condition for the step about to be taken.
    ///
    /// `can_borrow` reports whether the tricks budget still has room.
    fn roll_condition(&mut self, can_borrow: bool) -> ConditionRoll;

    /// Fraction of the nominal gain that lands, given the success chance.
    fn success(&mut self, probability: f64) -> f64;

    /// Called after every step that was not wasted.
    fn advance(&mut self);
}

/// Expected-value model: a Markov distribution over conditions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpectedConditions {
    enabled: bool,
    normal: f64,
    good: f64,
    excellent: f64,
    poor: f64,
}

impl ExpectedConditions {
    /// Start from a certain Normal condition.
    #[must_use]
    pub const fn new(enabled: bool) -> Self {
        Self {
            enabled,
            normal: 1.0,
            good: 0.0,
            excellent: 0.0,
            poor: 0.0,
        }
    }

    /// Current probabilities as `(normal, good, excellent, poor)`.
    #[must_use]
    pub const fn probabilities(&self) -> (f64, f64, f64, f64) {
        (self.normal, self.good, self.excellent, self.poor)
    }
}

impl ChanceModel for ExpectedConditions {
    fn roll_condition(&mut self, _can_borrow: bool) -> ConditionRoll {
        if !self.enabled {
            return ConditionRoll::NEUTRAL;
        }
        ConditionRoll {
            quality_factor: Condition::Normal.quality_factor() * self.normal
                + Condition::Good.quality_factor() * self.good
                + Condition::Excellent.quality_factor() * self.excellent
                + Condition::Poor.quality_factor() * self.poor,
            borrows_cp: false,
        }
    }

    fn success(&mut self, probability: f64) -> f64 {
        probability
    }

    fn advance(&mut self) {
        if !self.enabled {
            return;
        }
        let normal = self.normal;
        self.poor = self.excellent;
        self.good = P_GOOD * normal;
        self.excellent = P_EXCELLENT * normal;
        self.normal = 1.0 - (self.good + self.excellent + self.poor);
    }
}

/// Monte Carlo model: conditions and successes drawn from `rng`.
#[derive(Debug)]
pub struct SampledConditions<'r, R> {
    rng: &'r mut R,
    enabled: bool,
    current: Option<Condition>,
}

impl<'r, R: Rng> SampledConditions<'r, R> {
    /// Sample from `rng`; conditions stay Normal when `enabled` is false.
    pub fn new(rng: &'r mut R, enabled: bool) -> Self {
        Self {
            rng,
            enabled,
            current: None,
        }
    }

    /// Condition rolled for the most recent step.
    #[must_use]
    pub fn current(&self) -> Option<Condition> {
        self.current
    }

    fn next_condition(&mut self) -> Condition {
        match self.current {
            // The first step is always Normal.
            None => Condition::Normal,
            Some(Condition::Excellent) => Condition::Poor,
            Some(Condition::Good | Condition::Poor) => Condition::Normal,
            Some(Condition::Normal) => {
                let roll: f64 = self.rng.r#gen();
                if roll < P_EXCELLENT {
                    Condition::Excellent
                } else if roll < P_EXCELLENT + P_GOOD {
                    Condition::Good
                } else {
                    Condition::Normal
                }
            }
        }
    }
}

impl<R: Rng> ChanceModel for SampledConditions<'_, R> {
    fn roll_condition(&mut self, can_borrow: bool) -> ConditionRoll {
        if !self.enabled {
            return ConditionRoll::NEUTRAL;
        }
        let condition = self.next_condition();
        self.current = Some(condition);

        if condition == Condition::Good && can_borrow {
            ConditionRoll {
                quality_factor: 1.0,
                borrows_cp: true,
            }
        } else {
            ConditionRoll {
                quality_factor: condition.quality_factor(),
                borrows_cp: false,
            }
        }
    }

    fn success(&mut self, probability: f64) -> f64 {
        let roll: f64 = self.rng.r#gen();
        if roll < probability { 1.0 } else { 0.0 }
    }

    fn advance(&mut self) {}
}
