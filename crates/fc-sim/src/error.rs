//! Error types for simulation operations.

use thiserror::Error;

/// Errors encountered while driving the steering simulation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("{what} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        what: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Unknown variable binding: {what}")]
    Binding { what: String },

    #[error("Engine error: {message}")]
    Backend { message: String },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<fc_engine::FuzzyError> for SimError {
    fn from(e: fc_engine::FuzzyError) -> Self {
        SimError::Backend {
            message: e.to_string(),
        }
    }
}

impl From<fc_core::FcError> for SimError {
    fn from(e: fc_core::FcError) -> Self {
        SimError::Backend {
            message: e.to_string(),
        }
    }
}
