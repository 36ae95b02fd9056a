//! Fuzzy inference engine for the lane-keeping car controller.
//!
//! Two crisp inputs (lateral displacement and velocity) are fuzzified,
//! evaluated against a rule base and defuzzified into a crisp steering
//! command.
//!
//! # Architecture
//!
//! - [`MembershipFunction`]: closed set of shapes (triangle, ramp)
//! - [`Variable`]: named range of ordered [`Term`]s, wrapped as
//!   [`InputVariable`] or [`OutputVariable`]
//! - [`TermSetBuilder`]: symmetric term families over a range
//! - [`Rule`] / [`RuleBlock`]: rules parsed from text and bound to handles
//! - [`RuleMatrix`]: generated fuzzy associative map for two inputs
//! - [`Engine`]: owns everything and runs `process()`
//!
//! # Usage contract
//!
//! Rules resolve names when parsed, so register every variable with its
//! terms before parsing rules, and build rule blocks against the engine
//! before adding them.

pub mod engine;
pub mod error;
pub mod membership;
pub mod norm;
pub mod rule;
pub mod rule_block;
pub mod rule_matrix;
pub mod sweep;
pub mod term;
pub mod terms;
pub mod variable;

pub use engine::{Engine, ProcessReport};
pub use error::{FuzzyError, FuzzyResult};
pub use fc_core::{RuleBlockId, TermId, VariableId};
pub use membership::MembershipFunction;
pub use norm::{DEFAULT_RESOLUTION, Defuzzifier, SNorm, TNorm};
pub use rule::{Clause, Rule};
pub use rule_block::RuleBlock;
pub use rule_matrix::RuleMatrix;
pub use sweep::{DEFAULT_SAMPLES, SweepPoint, sweep};
pub use term::Term;
pub use terms::{TermNaming, TermSetBuilder};
pub use variable::{Activation, Fuzzified, InputVariable, OutputVariable, Variable};
