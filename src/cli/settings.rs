//! Settings file loading.

use super::CliError;
use craftopt::craft::{ActionCatalog, ActionId, Crafter, Recipe, Synth};
use craftopt::gp::{DEFAULT_PENALTY_WEIGHT, FitnessConfig};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Crafter as written in a settings file, with actions still as keys.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct CrafterSettings {
    pub(super) level: i32,
    pub(super) craftsmanship: f64,
    pub(super) control: f64,
    pub(super) cp: f64,
    #[serde(default)]
    pub(super) actions: Vec<String>,
}

/// Solver knobs exposed by the settings file.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct SolverSettings {
    pub(super) penalty_weight: f64,
    pub(super) population: usize,
    pub(super) generations: usize,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            penalty_weight: DEFAULT_PENALTY_WEIGHT,
            population: 300,
            generations: 50,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_runs() -> usize {
    500
}

/// A whole settings file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct Settings {
    pub(super) crafter: CrafterSettings,
    pub(super) recipe: Recipe,
    #[serde(default)]
    pub(super) sequence: Vec<String>,
    #[serde(default)]
    pub(super) max_tricks_uses: u32,
    #[serde(default = "default_runs")]
    pub(super) max_montecarlo_runs: usize,
    #[serde(default)]
    pub(super) seed: Option<u64>,
    #[serde(default = "default_true")]
    pub(super) use_conditions: bool,
    #[serde(default)]
    pub(super) solver: SolverSettings,
}

impl Settings {
    /// Read and parse a settings file.
    pub(super) fn load(path: &Path) -> Result<Self, CliError> {
        let text = fs::read_to_string(path)
            .map_err(|e| CliError::new(format!("Failed to read {}: {e}", path.display())))?;
        Self::parse(&text)
    }

    /// Parse settings from JSON text.
    pub(super) fn parse(text: &str) -> Result<Self, CliError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Resolve action keys and build the simulation context.
    pub(super) fn synth(&self) -> Result<Synth, CliError> {
        let catalog = Arc::new(ActionCatalog::standard());
        let crafter = Crafter {
            level: self.crafter.level,
            craftsmanship: self.crafter.craftsmanship,
            control: self.crafter.control,
            cp: self.crafter.cp,
            actions: catalog.resolve_all(&self.crafter.actions)?,
        };
        Ok(Synth::new(
            crafter,
            self.recipe,
            self.max_tricks_uses,
            self.use_conditions,
            catalog,
        )?)
    }

    /// The configured sequence, resolved against `synth`'s catalog.
    pub(super) fn sequence(&self, synth: &Synth) -> Result<Vec<ActionId>, CliError> {
        Ok(synth.catalog().resolve_all(&self.sequence)?)
    }

    pub(super) fn fitness(&self) -> FitnessConfig {
        FitnessConfig {
            penalty_weight: self.solver.penalty_weight,
        }
    }
}
