use thiserror::Error;

/// Errors raised when simulation configuration invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be at least {min} (got {value})")]
    MinViolation {
        field: &'static str,
        min: f64,
        value: f64,
    },
    #[error("{field} must be between {min} and {max} (got {value})")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },
    #[error("capex interval must be at least one year")]
    ZeroCapexInterval,
    #[error("population must be greater than zero")]
    ZeroPopulation,
    #[error("failed to parse simulation config: {0}")]
    Parse(String),
}

/// Top-level error for scenario construction and statistics.
#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("cannot summarize an empty sample")]
    EmptySample,
}
