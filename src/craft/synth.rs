//! Crafter, recipe and the synthesis context that binds them.

use crate::craft::action::{ActionCatalog, ActionId};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Level gap applied while Ingenuity is active.
pub const INGENUITY_LEVEL_GAP: i32 = -3;

/// The crafting character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crafter {
    /// Character level.
    pub level: i32,
    /// Drives progress gains.
    pub craftsmanship: f64,
    /// Drives quality gains.
    pub control: f64,
    /// CP pool capacity.
    pub cp: f64,
    /// Actions this crafter may use.
    pub actions: Vec<ActionId>,
}

/// The item being crafted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Recipe level.
    pub level: i32,
    /// Progress needed to finish.
    pub difficulty: f64,
    /// Starting (and maximum) durability.
    pub durability: f64,
    /// Quality at step zero.
    pub start_quality: f64,
    /// Quality cap, used for percentage reporting.
    pub max_quality: f64,
}

/// Immutable simulation context: a crafter working a recipe.
#[derive(Debug, Clone)]
pub struct Synth {
    crafter: Crafter,
    recipe: Recipe,
    max_tricks_uses: u32,
    use_conditions: bool,
    level_difference: i32,
    base_progress_increase: f64,
    catalog: Arc<ActionCatalog>,
}

impl Synth {
    /// Build a synth after validating the crafter and recipe.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidModel`] when difficulty, durability or
    /// max quality is not positive, or when crafter stats are negative.
    pub fn new(
        crafter: Crafter,
        recipe: Recipe,
        max_tricks_uses: u32,
        use_conditions: bool,
        catalog: Arc<ActionCatalog>,
    ) -> Result<Self, ConfigError> {
        positive("difficulty", recipe.difficulty)?;
        positive("durability", recipe.durability)?;
        positive("max quality", recipe.max_quality)?;
        non_negative("start quality", recipe.start_quality)?;
        non_negative("craftsmanship", crafter.craftsmanship)?;
        non_negative("control", crafter.control)?;
        non_negative("cp", crafter.cp)?;

        let level_difference = crafter.level.saturating_sub(recipe.level);
        let base_progress_increase =
            base_progress_increase(level_difference, crafter.craftsmanship);

        Ok(Self {
            crafter,
            recipe,
            max_tricks_uses,
            use_conditions,
            level_difference,
            base_progress_increase,
            catalog,
        })
    }

    /// The crafter.
    #[must_use]
    pub fn crafter(&self) -> &Crafter {
        &self.crafter
    }

    /// The recipe.
    #[must_use]
    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    /// Maximum allowed uses of Tricks of the Trade.
    #[must_use]
    pub fn max_tricks_uses(&self) -> u32 {
        self.max_tricks_uses
    }

    /// Whether quality is modeled under Good/Excellent/Poor conditions.
    #[must_use]
    pub fn use_conditions(&self) -> bool {
        self.use_conditions
    }

    /// Crafter level minus recipe level.
    #[must_use]
    pub fn level_difference(&self) -> i32 {
        self.level_difference
    }

    /// Base progress per 1.0 progress multiplier with no effects active.
    #[must_use]
    pub fn base_progress_increase(&self) -> f64 {
        self.base_progress_increase
    }

    /// The action catalog used by this synth.
    #[must_use]
    pub fn catalog(&self) -> &ActionCatalog {
        &self.catalog
    }

    /// Shared handle to the catalog.
    #[must_use]
    pub fn catalog_handle(&self) -> Arc<ActionCatalog> {
        Arc::clone(&self.catalog)
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidModel { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidModel { field, value })
    }
}

/// Base progress for one unit of progress multiplier.
///
/// `round_ties_even(base × (1 + correction))` where `base = 0.21 × craftsmanship + 1.6`
/// and the level correction is piecewise linear in the level difference.
#[must_use]
pub fn base_progress_increase(level_difference: i32, craftsmanship: f64) -> f64 {
    let ld = f64::from(level_difference);
    let correction = if (-5..=0).contains(&level_difference) {
        0.10 * ld
    } else if (1..=5).contains(&level_difference) {
        0.05 * ld
    } else {
        // Observed data fits the same line above 15 and below -5.
        0.022 * ld + 0.15
    };

    let base = 0.21 * craftsmanship + 1.6;
    (base * (1.0 + correction)).round_ties_even()
}

/// Base quality for one unit of quality multiplier.
///
/// Only a crafter below the recipe level is penalized; there is no bonus
/// for being above it.
#[must_use]
pub fn base_quality_increase(level_difference: i32, control: f64) -> f64 {
    let correction = if (-5..=0).contains(&level_difference) {
        0.05 * f64::from(level_difference)
    } else {
        0.0
    };

    let base = 0.36 * control + 34.0;
    (base * (1.0 + correction)).round_ties_even()
}
