//! Action definitions and the catalog that owns them.
//!
//! Every action has a stable [`ActionId`]. Behavior that only some actions
//! have (fixed progress, durability restoration, Inner Quiet consumption, ...)
//! is described by a [`Special`] rule stored on the action itself, so the
//! simulator dispatches on data instead of comparing names.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable identity of a crafting action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionId {
    /// No-op placeholder used to pad fixed-length sequences.
    #[serde(rename = "dummyAction")]
    Dummy,
    /// Observe.
    Observe,
    /// Basic Synthesis.
    #[serde(rename = "basicSynth")]
    BasicSynthesis,
    /// Standard Synthesis.
    StandardSynthesis,
    /// Flawless Synthesis.
    FlawlessSynthesis,
    /// Careful Synthesis.
    CarefulSynthesis,
    /// Careful Synthesis II.
    CarefulSynthesis2,
    /// Piece by Piece.
    PieceByPiece,
    /// Rapid Synthesis.
    RapidSynthesis,
    /// Brand of the Elements style synthesis.
    BrandSynthesis,
    /// Basic Touch.
    BasicTouch,
    /// Standard Touch.
    StandardTouch,
    /// Advanced Touch.
    AdvancedTouch,
    /// Hasty Touch.
    HastyTouch,
    /// Byregot's Blessing.
    ByregotsBlessing,
    /// Master's Mend.
    MastersMend,
    /// Master's Mend II.
    MastersMend2,
    /// Rumination.
    Rumination,
    /// Tricks of the Trade.
    TricksOfTheTrade,
    /// Inner Quiet.
    InnerQuiet,
    /// Manipulation.
    Manipulation,
    /// Comfort Zone.
    ComfortZone,
    /// Steady Hand.
    SteadyHand,
    /// Steady Hand II.
    SteadyHand2,
    /// Waste Not.
    WasteNot,
    /// Waste Not II.
    WasteNot2,
    /// Innovation.
    Innovation,
    /// Great Strides.
    GreatStrides,
    /// Ingenuity.
    Ingenuity,
    /// Ingenuity II.
    Ingenuity2,
}

impl ActionId {
    /// Number of actions in the catalog.
    pub const COUNT: usize = 30;

    /// Every action id, in catalog order.
    pub const ALL: [ActionId; Self::COUNT] = [
        Self::Dummy,
        Self::Observe,
        Self::BasicSynthesis,
        Self::StandardSynthesis,
        Self::FlawlessSynthesis,
        Self::CarefulSynthesis,
        Self::CarefulSynthesis2,
        Self::PieceByPiece,
        Self::RapidSynthesis,
        Self::BrandSynthesis,
        Self::BasicTouch,
        Self::StandardTouch,
        Self::AdvancedTouch,
        Self::HastyTouch,
        Self::ByregotsBlessing,
        Self::MastersMend,
        Self::MastersMend2,
        Self::Rumination,
        Self::TricksOfTheTrade,
        Self::InnerQuiet,
        Self::Manipulation,
        Self::ComfortZone,
        Self::SteadyHand,
        Self::SteadyHand2,
        Self::WasteNot,
        Self::WasteNot2,
        Self::Innovation,
        Self::GreatStrides,
        Self::Ingenuity,
        Self::Ingenuity2,
    ];

    /// Stable short key used in settings files and output.
    #[must_use]
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::Dummy => "dummyAction",
            Self::Observe => "observe",
            Self::BasicSynthesis => "basicSynth",
            Self::StandardSynthesis => "standardSynthesis",
            Self::FlawlessSynthesis => "flawlessSynthesis",
            Self::CarefulSynthesis => "carefulSynthesis",
            Self::CarefulSynthesis2 => "carefulSynthesis2",
            Self::PieceByPiece => "pieceByPiece",
            Self::RapidSynthesis => "rapidSynthesis",
            Self::BrandSynthesis => "brandSynthesis",
            Self::BasicTouch => "basicTouch",
            Self::StandardTouch => "standardTouch",
            Self::AdvancedTouch => "advancedTouch",
            Self::HastyTouch => "hastyTouch",
            Self::ByregotsBlessing => "byregotsBlessing",
            Self::MastersMend => "mastersMend",
            Self::MastersMend2 => "mastersMend2",
            Self::Rumination => "rumination",
            Self::TricksOfTheTrade => "tricksOfTheTrade",
            Self::InnerQuiet => "innerQuiet",
            Self::Manipulation => "manipulation",
            Self::ComfortZone => "comfortZone",
            Self::SteadyHand => "steadyHand",
            Self::SteadyHand2 => "steadyHand2",
            Self::WasteNot => "wasteNot",
            Self::WasteNot2 => "wasteNot2",
            Self::Innovation => "innovation",
            Self::GreatStrides => "greatStrides",
            Self::Ingenuity => "ingenuity",
            Self::Ingenuity2 => "ingenuity2",
        }
    }

    /// Catalog slot of this action.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for ActionId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.short_name() == s)
            .ok_or_else(|| ConfigError::UnknownAction(s.to_string()))
    }
}

/// How an action interacts with the effect tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    /// Takes effect on the step it is used and leaves nothing behind.
    Immediate,
    /// Starts a magnitude that grows with each quality action.
    CountUp,
    /// Starts a timer lasting the given number of steps.
    CountDown {
        /// Steps the effect stays active.
        turns: u32,
    },
}

/// Action-specific rule applied on top of the generic cost/gain model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Special {
    /// Base progress is this constant instead of the crafter's base.
    FixedProgress(f64),
    /// Base progress is one third of the progress still missing.
    RemainingProgressThird,
    /// Restore this much durability.
    RestoreDurability(f64),
    /// Trade accumulated Inner Quiet for CP.
    RefundInnerQuiet,
    /// Quality scales with Inner Quiet, which is then consumed.
    ConsumeInnerQuiet,
    /// Recover this much CP, counting against the tricks budget.
    BorrowCp(f64),
}

/// Immutable definition of a crafting action.
#[derive(Debug, Clone, Copy)]
pub struct Action {
    /// Identity of the action.
    pub id: ActionId,
    /// Display name.
    pub name: &'static str,
    /// Durability consumed.
    pub durability_cost: f64,
    /// CP consumed.
    pub cp_cost: f64,
    /// Chance that progress/quality gains land.
    pub success_probability: f64,
    /// Multiplier on base quality.
    pub quality_multiplier: f64,
    /// Multiplier on base progress.
    pub progress_multiplier: f64,
    /// Effect bookkeeping category.
    pub kind: EffectKind,
    /// Action-specific rule, if any.
    pub special: Option<Special>,
}

impl PartialEq for Action {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Action {}

impl Action {
    fn new(id: ActionId, name: &'static str) -> Self {
        Self {
            id,
            name,
            durability_cost: 0.0,
            cp_cost: 0.0,
            success_probability: 1.0,
            quality_multiplier: 0.0,
            progress_multiplier: 0.0,
            kind: EffectKind::Immediate,
            special: None,
        }
    }

    fn costs(mut self, durability: f64, cp: f64) -> Self {
        self.durability_cost = durability;
        self.cp_cost = cp;
        self
    }

    fn progress(mut self, probability: f64, multiplier: f64) -> Self {
        self.success_probability = probability;
        self.progress_multiplier = multiplier;
        self
    }

    fn quality(mut self, probability: f64, multiplier: f64) -> Self {
        self.success_probability = probability;
        self.quality_multiplier = multiplier;
        self
    }

    fn count_up(mut self) -> Self {
        self.kind = EffectKind::CountUp;
        self
    }

    fn count_down(mut self, turns: u32) -> Self {
        self.kind = EffectKind::CountDown { turns };
        self
    }

    fn special(mut self, special: Special) -> Self {
        self.special = Some(special);
        self
    }

    /// Whether the action adds quality (and so feeds Inner Quiet).
    #[must_use]
    pub fn is_quality_action(&self) -> bool {
        self.quality_multiplier > 0.0
    }
}

/// Registry of every action, indexed by [`ActionId`].
///
/// Built once and shared by reference through [`Synth`](crate::craft::Synth).
#[derive(Debug, Clone)]
pub struct ActionCatalog {
    actions: [Action; ActionId::COUNT],
}

impl Default for ActionCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl ActionCatalog {
    /// The standard action table.
    #[must_use]
    pub fn standard() -> Self {
        use ActionId as A;

        let actions = [
            Action::new(A::Dummy, "______________"),
            Action::new(A::Observe, "Observe").costs(0.0, 14.0),
            Action::new(A::BasicSynthesis, "Basic Synthesis")
                .costs(10.0, 0.0)
                .progress(0.9, 1.0),
            Action::new(A::StandardSynthesis, "Standard Synthesis")
                .costs(10.0, 15.0)
                .progress(0.9, 1.5),
            Action::new(A::FlawlessSynthesis, "Flawless Synthesis")
                .costs(10.0, 15.0)
                .progress(0.9, 1.0)
                .special(Special::FixedProgress(40.0)),
            Action::new(A::CarefulSynthesis, "Careful Synthesis")
                .costs(10.0, 0.0)
                .progress(1.0, 0.9),
            Action::new(A::CarefulSynthesis2, "Careful Synthesis II")
                .costs(10.0, 0.0)
                .progress(1.0, 1.2),
            Action::new(A::PieceByPiece, "Piece By Piece")
                .costs(10.0, 15.0)
                .progress(0.9, 1.0)
                .special(Special::RemainingProgressThird),
            Action::new(A::RapidSynthesis, "Rapid Synthesis")
                .costs(10.0, 0.0)
                .progress(0.5, 2.5),
            Action::new(A::BrandSynthesis, "Brand Synthesis")
                .costs(10.0, 15.0)
                .progress(0.9, 2.0),
            Action::new(A::BasicTouch, "Basic Touch")
                .costs(10.0, 18.0)
                .quality(0.7, 1.0),
            Action::new(A::StandardTouch, "Standard Touch")
                .costs(10.0, 32.0)
                .quality(0.8, 1.25),
            Action::new(A::AdvancedTouch, "Advanced Touch")
                .costs(10.0, 52.0)
                .quality(0.9, 1.5),
            Action::new(A::HastyTouch, "Hasty Touch")
                .costs(10.0, 0.0)
                .quality(0.5, 1.0),
            Action::new(A::ByregotsBlessing, "Byregot's Blessing")
                .costs(10.0, 24.0)
                .quality(0.9, 1.0)
                .special(Special::ConsumeInnerQuiet),
            Action::new(A::MastersMend, "Master's Mend")
                .costs(0.0, 92.0)
                .special(Special::RestoreDurability(30.0)),
            Action::new(A::MastersMend2, "Master's Mend II")
                .costs(0.0, 150.0)
                .special(Special::RestoreDurability(60.0)),
            Action::new(A::Rumination, "Rumination").special(Special::RefundInnerQuiet),
            Action::new(A::TricksOfTheTrade, "Tricks of the Trade")
                .special(Special::BorrowCp(20.0)),
            Action::new(A::InnerQuiet, "Inner Quiet").costs(0.0, 18.0).count_up(),
            Action::new(A::Manipulation, "Manipulation")
                .costs(0.0, 88.0)
                .count_down(3),
            Action::new(A::ComfortZone, "Comfort Zone")
                .costs(0.0, 58.0)
                .count_down(10),
            Action::new(A::SteadyHand, "Steady Hand")
                .costs(0.0, 22.0)
                .count_down(5),
            Action::new(A::SteadyHand2, "Steady Hand II")
                .costs(0.0, 25.0)
                .count_down(5),
            Action::new(A::WasteNot, "Waste Not").costs(0.0, 56.0).count_down(4),
            Action::new(A::WasteNot2, "Waste Not II")
                .costs(0.0, 95.0)
                .count_down(8),
            Action::new(A::Innovation, "Innovation")
                .costs(0.0, 18.0)
                .count_down(3),
            Action::new(A::GreatStrides, "Great Strides")
                .costs(0.0, 32.0)
                .count_down(3),
            Action::new(A::Ingenuity, "Ingenuity").costs(0.0, 24.0).count_down(5),
            Action::new(A::Ingenuity2, "Ingenuity II")
                .costs(0.0, 32.0)
                .count_down(5),
        ];

        Self { actions }
    }

    /// Look up an action definition.
    #[must_use]
    #[inline]
    pub fn get(&self, id: ActionId) -> &Action {
        &self.actions[id.index()]
    }

    /// Resolve a short key to its action id.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownAction`] if the key is not in the catalog.
    pub fn resolve(&self, key: &str) -> Result<ActionId, ConfigError> {
        key.parse()
    }

    /// Resolve a list of short keys, failing on the first unknown one.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownAction`] naming the first unresolved key.
    pub fn resolve_all<S: AsRef<str>>(&self, keys: &[S]) -> Result<Vec<ActionId>, ConfigError> {
        keys.iter().map(|k| self.resolve(k.as_ref())).collect()
    }

    /// Iterate over all actions in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_indexed_by_id() {
        let catalog = ActionCatalog::standard();
        for id in ActionId::ALL {
            assert_eq!(catalog.get(id).id, id);
        }
    }

    #[test]
    fn test_short_names_round_trip() {
        for id in ActionId::ALL {
            assert_eq!(id.short_name().parse::<ActionId>().unwrap(), id);
        }
    }

    #[test]
    fn test_serde_uses_short_names() {
        let json = serde_json::to_string(&ActionId::BasicSynthesis).unwrap();
        assert_eq!(json, "\"basicSynth\"");
        let parsed: ActionId = serde_json::from_str("\"steadyHand2\"").unwrap();
        assert_eq!(parsed, ActionId::SteadyHand2);
        let parsed: ActionId = serde_json::from_str("\"dummyAction\"").unwrap();
        assert_eq!(parsed, ActionId::Dummy);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let catalog = ActionCatalog::standard();
        assert_eq!(
            catalog.resolve("perfectTouch"),
            Err(ConfigError::UnknownAction("perfectTouch".into()))
        );
        assert!(catalog.resolve_all(&["basicSynth", "nope"]).is_err());
    }

    #[test]
    fn test_equality_is_by_identity() {
        let catalog = ActionCatalog::standard();
        let mut renamed = *catalog.get(ActionId::BasicTouch);
        renamed.name = "Something Else";
        renamed.cp_cost = 99.0;
        assert_eq!(&renamed, catalog.get(ActionId::BasicTouch));
        assert_ne!(catalog.get(ActionId::BasicTouch), catalog.get(ActionId::HastyTouch));
    }

    #[test]
    fn test_effect_kinds() {
        let catalog = ActionCatalog::standard();
        assert_eq!(catalog.get(ActionId::InnerQuiet).kind, EffectKind::CountUp);
        assert_eq!(
            catalog.get(ActionId::Manipulation).kind,
            EffectKind::CountDown { turns: 3 }
        );
        assert_eq!(catalog.get(ActionId::BasicSynthesis).kind, EffectKind::Immediate);
        assert!(catalog.get(ActionId::HastyTouch).is_quality_action());
        assert!(!catalog.get(ActionId::BasicSynthesis).is_quality_action());
    }
}
