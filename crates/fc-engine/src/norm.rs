//! Fuzzy operators: T-norms, S-norms and defuzzifiers.
//!
//! Operators are selected by the names used in `Engine::configure`
//! (`"Minimum"`, `"Maximum"`, `"Centroid"`, ...). Names are case-sensitive.

use std::fmt;
use std::str::FromStr;

use fc_core::{cell_width, sample_midpoints};
use serde::{Deserialize, Serialize};

use crate::error::FuzzyError;

/// Default number of integration cells for centroid defuzzification.
pub const DEFAULT_RESOLUTION: usize = 200;

/// Triangular norm, used for conjunction and implication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TNorm {
    Minimum,
    AlgebraicProduct,
}

impl TNorm {
    pub fn compute(self, a: f64, b: f64) -> f64 {
        match self {
            Self::Minimum => a.min(b),
            Self::AlgebraicProduct => a * b,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Minimum => "Minimum",
            Self::AlgebraicProduct => "AlgebraicProduct",
        }
    }
}

impl FromStr for TNorm {
    type Err = FuzzyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Minimum" => Ok(Self::Minimum),
            "AlgebraicProduct" => Ok(Self::AlgebraicProduct),
            _ => Err(FuzzyError::UnknownOperator {
                kind: "T-norm",
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for TNorm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Triangular conorm, used for disjunction and aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SNorm {
    Maximum,
    AlgebraicSum,
}

impl SNorm {
    pub fn compute(self, a: f64, b: f64) -> f64 {
        match self {
            Self::Maximum => a.max(b),
            Self::AlgebraicSum => a + b - a * b,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Maximum => "Maximum",
            Self::AlgebraicSum => "AlgebraicSum",
        }
    }
}

impl FromStr for SNorm {
    type Err = FuzzyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Maximum" => Ok(Self::Maximum),
            "AlgebraicSum" => Ok(Self::AlgebraicSum),
            _ => Err(FuzzyError::UnknownOperator {
                kind: "S-norm",
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for SNorm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Converts an aggregated fuzzy set back into a crisp value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Defuzzifier {
    /// Centre of mass, integrated with the midpoint rule over `resolution` cells.
    Centroid { resolution: usize },
}

impl Defuzzifier {
    pub fn centroid() -> Self {
        Self::Centroid {
            resolution: DEFAULT_RESOLUTION,
        }
    }

    pub fn with_resolution(self, resolution: usize) -> Self {
        match self {
            Self::Centroid { .. } => Self::Centroid { resolution },
        }
    }

    pub fn resolution(self) -> usize {
        match self {
            Self::Centroid { resolution } => resolution,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Centroid { .. } => "Centroid",
        }
    }

    /// Defuzzify `membership` over `[min, max]`.
    ///
    /// Returns `None` when the set has zero area at every sample point, where
    /// the centroid is undefined.
    pub fn defuzzify(self, min: f64, max: f64, membership: impl Fn(f64) -> f64) -> Option<f64> {
        match self {
            Self::Centroid { resolution } => {
                let dx = cell_width(min, max, resolution);
                let mut area = 0.0;
                let mut moment = 0.0;
                for x in sample_midpoints(min, max, resolution) {
                    let y = membership(x);
                    area += y * dx;
                    moment += y * x * dx;
                }
                if area > 0.0 { Some(moment / area) } else { None }
            }
        }
    }
}

impl Default for Defuzzifier {
    fn default() -> Self {
        Self::centroid()
    }
}

impl FromStr for Defuzzifier {
    type Err = FuzzyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Centroid" => Ok(Self::centroid()),
            _ => Err(FuzzyError::UnknownOperator {
                kind: "defuzzifier",
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Defuzzifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
