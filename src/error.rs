//! Error types for solver configuration.
//!
//! Only misconfiguration is an error. Failed crafts are reported through
//! [`Outcome`](crate::craft::Outcome) flags and fitness penalties, and an
//! early stop requested by a progress hook is a normal return.

use std::fmt;

/// Configuration rejected before any simulation or search starts.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// An action key did not resolve against the catalog.
    UnknownAction(String),
    /// The crafter has no usable actions to build individuals from.
    NoActions,
    /// A recipe or crafter attribute is outside its valid range.
    InvalidModel {
        /// Name of the offending attribute.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// A count parameter (population, generations, runs, ...) was zero.
    NonPositive(&'static str),
    /// A probability lies outside `[0, 1]`.
    Probability {
        /// Name of the offending parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// Crossover and mutation probabilities sum above one for an "or" variation.
    ProbabilitySum {
        /// Crossover probability.
        cxpb: f64,
        /// Mutation probability.
        mutpb: f64,
    },
    /// Offspring count is smaller than the parent count in a (μ, λ) run.
    LambdaBelowMu {
        /// Number of parents kept.
        mu: usize,
        /// Number of offspring produced.
        lambda: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownAction(key) => write!(f, "unknown action: {key}"),
            Self::NoActions => write!(f, "crafter has no usable actions"),
            Self::InvalidModel { field, value } => write!(f, "invalid {field}: {value}"),
            Self::NonPositive(name) => write!(f, "{name} must be greater than zero"),
            Self::Probability { name, value } => {
                write!(f, "{name} must be within [0, 1], got {value}")
            }
            Self::ProbabilitySum { cxpb, mutpb } => write!(
                f,
                "crossover and mutation probabilities must sum to at most 1.0 (got {cxpb} + {mutpb})"
            ),
            Self::LambdaBelowMu { mu, lambda } => {
                write!(f, "lambda ({lambda}) must be greater or equal to mu ({mu})")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Check that `value` is a usable probability.
///
/// # Errors
///
/// Returns [`ConfigError::Probability`] when `value` is outside `[0, 1]` or NaN.
pub fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Probability { name, value })
    }
}

/// Check that a count parameter is non-zero.
///
/// # Errors
///
/// Returns [`ConfigError::NonPositive`] when `value` is zero.
pub fn check_positive(name: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        Err(ConfigError::NonPositive(name))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            ConfigError::UnknownAction("fooTouch".into()).to_string(),
            "unknown action: fooTouch"
        );
        let sum = ConfigError::ProbabilitySum { cxpb: 0.7, mutpb: 0.5 };
        assert!(sum.to_string().contains("0.7 + 0.5"));
    }

    #[test]
    fn test_check_probability() {
        assert!(check_probability("cxpb", 0.0).is_ok());
        assert!(check_probability("cxpb", 1.0).is_ok());
        assert!(check_probability("cxpb", 1.5).is_err());
        assert!(check_probability("cxpb", f64::NAN).is_err());
    }

    #[test]
    fn test_check_positive() {
        assert_eq!(check_positive("generations", 0), Err(ConfigError::NonPositive("generations")));
        assert!(check_positive("generations", 1).is_ok());
    }
}
