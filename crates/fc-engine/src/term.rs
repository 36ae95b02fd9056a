//! Named linguistic terms.

use serde::{Deserialize, Serialize};

use crate::membership::MembershipFunction;

/// A named membership function owned by exactly one variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    /// Name, unique within the owning variable.
    pub name: String,
    /// Shape of the term.
    pub mf: MembershipFunction,
}

impl Term {
    /// Create a new term.
    pub fn new(name: impl Into<String>, mf: MembershipFunction) -> Self {
        Self {
            name: name.into(),
            mf,
        }
    }

    /// Degree of membership of `x` in this term.
    pub fn degree(&self, x: f64) -> f64 {
        self.mf.degree(x)
    }
}
