//! CLI command implementations for craftopt.

pub(crate) mod actions;
pub(crate) mod ga;
pub(crate) mod simulate;
pub(crate) mod solve;

mod output;
mod settings;

use clap::ValueEnum;
use craftopt::error::ConfigError;
use indicatif::{ProgressBar, ProgressStyle};
use std::error::Error;
use std::fmt;

/// Output format for every command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("invalid settings: {e}"))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

/// Seed from the command line, then the settings file, then the clock.
fn resolve_seed(flag: Option<u64>, settings: Option<u64>) -> u64 {
    flag.or(settings).unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        #[allow(clippy::cast_possible_truncation)]
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(craftopt::solver::DEFAULT_SEED);
        seed
    })
}

/// Generation progress bar, or `None` when progress is off.
fn generation_bar(generations: usize, enabled: bool) -> Option<ProgressBar> {
    if !enabled {
        return None;
    }
    let pb = ProgressBar::new(generations as u64);
    let style = ProgressStyle::default_bar()
        .template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} generations ({per_sec})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-");
    pb.set_style(style);
    Some(pb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_precedence() {
        assert_eq!(resolve_seed(Some(1), Some(2)), 1);
        assert_eq!(resolve_seed(None, Some(2)), 2);
    }

    #[test]
    fn test_config_error_message_survives() {
        let err = CliError::from(ConfigError::NoActions);
        assert_eq!(err.to_string(), ConfigError::NoActions.to_string());
    }

    #[test]
    fn test_generation_bar_disabled() {
        assert!(generation_bar(10, false).is_none());
        assert!(generation_bar(10, true).is_some());
    }
}
