//! Per-run tracking of active count-up and count-down effects.

use crate::craft::action::ActionId;
use std::collections::BTreeMap;

/// Active effects for one simulation run.
///
/// Created fresh for each run and dropped at its end.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectTracker {
    count_ups: BTreeMap<ActionId, f64>,
    count_downs: BTreeMap<ActionId, u32>,
}

impl EffectTracker {
    /// Empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Magnitude of a count-up effect, if it is running.
    #[must_use]
    pub fn count_up(&self, id: ActionId) -> Option<f64> {
        self.count_ups.get(&id).copied()
    }

    /// Remaining turns of a count-down effect, if it is active.
    #[must_use]
    pub fn count_down(&self, id: ActionId) -> Option<u32> {
        self.count_downs.get(&id).copied()
    }

    /// Whether a count-down effect is active.
    #[must_use]
    pub fn is_active(&self, id: ActionId) -> bool {
        self.count_downs.contains_key(&id)
    }

    /// Start (or restart) a count-up effect at zero.
    pub fn start_count_up(&mut self, id: ActionId) {
        self.count_ups.insert(id, 0.0);
    }

    /// Start (or restart) a count-down effect.
    pub fn start_count_down(&mut self, id: ActionId, turns: u32) {
        if turns > 0 {
            self.count_downs.insert(id, turns);
        }
    }

    /// Add to a running count-up effect. Does nothing if it is not running.
    pub fn bump_count_up(&mut self, id: ActionId, amount: f64) {
        if let Some(value) = self.count_ups.get_mut(&id) {
            *value += amount;
        }
    }

    /// Remove a count-up effect, returning its magnitude.
    pub fn take_count_up(&mut self, id: ActionId) -> Option<f64> {
        self.count_ups.remove(&id)
    }

    /// Remove a count-down effect.
    pub fn clear_count_down(&mut self, id: ActionId) {
        self.count_downs.remove(&id);
    }

    /// Advance every count-down by one step, dropping expired ones.
    pub fn tick(&mut self) {
        self.count_downs.retain(|_, turns| {
            *turns -= 1;
            *turns > 0
        });
    }

    /// Iterate over active count-downs and their remaining turns.
    pub fn count_downs(&self) -> impl Iterator<Item = (ActionId, u32)> + '_ {
        self.count_downs.iter().map(|(&id, &turns)| (id, turns))
    }

    /// Iterate over running count-ups and their magnitudes.
    pub fn count_ups(&self) -> impl Iterator<Item = (ActionId, f64)> + '_ {
        self.count_ups.iter().map(|(&id, &value)| (id, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_expires_after_turns() {
        let mut effects = EffectTracker::new();
        effects.start_count_down(ActionId::Manipulation, 3);
        effects.start_count_down(ActionId::SteadyHand, 1);

        effects.tick();
        assert_eq!(effects.count_down(ActionId::Manipulation), Some(2));
        assert!(!effects.is_active(ActionId::SteadyHand));

        effects.tick();
        effects.tick();
        assert!(!effects.is_active(ActionId::Manipulation));
    }

    #[test]
    fn test_count_up_lifecycle() {
        let mut effects = EffectTracker::new();
        effects.bump_count_up(ActionId::InnerQuiet, 1.0);
        assert_eq!(effects.count_up(ActionId::InnerQuiet), None);

        effects.start_count_up(ActionId::InnerQuiet);
        effects.bump_count_up(ActionId::InnerQuiet, 0.7);
        effects.bump_count_up(ActionId::InnerQuiet, 0.5);
        let value = effects.take_count_up(ActionId::InnerQuiet).unwrap();
        assert!((value - 1.2).abs() < 1e-12);
        assert_eq!(effects.count_up(ActionId::InnerQuiet), None);
    }

    #[test]
    fn test_restart_resets_timer() {
        let mut effects = EffectTracker::new();
        effects.start_count_down(ActionId::GreatStrides, 3);
        effects.tick();
        effects.start_count_down(ActionId::GreatStrides, 3);
        assert_eq!(effects.count_down(ActionId::GreatStrides), Some(3));
    }
}
