//! Error types for trajectory generation.

use thiserror::Error;

/// Errors encountered while integrating a model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Shape mismatch for {what}: expected {expected}, got {got}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Required step size {h:e} at t={t} is below float spacing; solve diverged")]
    StepTooSmall { t: f64, h: f64 },

    #[error("Exceeded {max_steps} steps before reaching t={t_end}")]
    MaxStepsExceeded { max_steps: usize, t_end: f64 },

    #[error("Core error: {0}")]
    Core(#[from] lf_core::LfError),
}

pub type SimResult<T> = Result<T, SimError>;
