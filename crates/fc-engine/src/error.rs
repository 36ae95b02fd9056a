//! Error types for fuzzy engine construction and inference.

use thiserror::Error;

/// Result type for fuzzy engine operations.
pub type FuzzyResult<T> = Result<T, FuzzyError>;

/// Errors that can occur while building or running a fuzzy engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FuzzyError {
    /// Invalid argument provided to a constructor.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// A term with the same name already exists on the variable.
    #[error("Duplicate term '{term}' on variable '{variable}'")]
    DuplicateTermName { variable: String, term: String },

    /// A variable with the same name is already registered on the engine.
    #[error("Duplicate variable '{name}'")]
    DuplicateVariableName { name: String },

    /// A rule block with the same name is already registered on the engine.
    #[error("Duplicate rule block '{name}'")]
    DuplicateRuleBlockName { name: String },

    /// Rule text does not follow `if <Var> is <Term> [and ...] then <Var> is <Term>`.
    #[error("Cannot parse rule '{text}': {reason}")]
    ParseError { text: String, reason: String },

    /// A rule or lookup names a variable or term the engine does not know.
    #[error("Unknown reference: {what}")]
    UnknownReference { what: String },

    /// Term set generator parameters are inconsistent.
    #[error("Invalid term set: {what}")]
    InvalidTermSet { what: String },

    /// Rule matrix generator parameters are inconsistent.
    #[error("Invalid rule matrix: {what}")]
    InvalidRuleMatrix { what: String },

    /// Operator name not recognised by `configure`.
    #[error("Unknown {kind} operator '{name}'")]
    UnknownOperator { kind: &'static str, name: String },

    /// `process()` was called on an engine that fails its readiness check.
    #[error("Engine not ready:\n{}", .deficiencies.join("\n"))]
    NotReady { deficiencies: Vec<String> },

    /// Numeric or index failure from the core crate.
    #[error(transparent)]
    Core(#[from] fc_core::FcError),
}

impl FuzzyError {
    pub(crate) fn unknown(what: impl Into<String>) -> Self {
        Self::UnknownReference { what: what.into() }
    }
}
