//! Symmetric term-set generation.
//!
//! Produces an evenly spaced family of terms over a variable's range:
//! falling/rising ramps at the two extremes (`FarLeft`, `FarRight`), triangles
//! in between and, for odd counts, a centre triangle.
//!
//! Layout for `n` terms over `[min, max]` with midpoint `m`:
//! - `s = n / 2` terms per side (rounded down), the outermost being the ramp
//! - `spacing = (max - min) / 2 / s`
//! - the side triangle `k` (1-based, counted outward) peaks at `m ± k * spacing`
//! - every triangle spans `[peak - half_width, peak, peak + half_width]`
//! - the ramps span `[min, min + half_width]` and `[max - half_width, max]`
//!
//! For even counts the two innermost triangles abut at the midpoint.

use serde::{Deserialize, Serialize};

use crate::error::{FuzzyError, FuzzyResult};
use crate::membership::MembershipFunction;
use crate::term::Term;
use crate::variable::Variable;

pub const FAR_LEFT: &str = "FarLeft";
pub const FAR_RIGHT: &str = "FarRight";
pub const DEFAULT_CENTRE: &str = "Centre";

/// How side triangles are named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermNaming {
    /// `Left1..LeftN` / `Right1..RightN`, numbered outward from the centre.
    /// Requires an odd term count.
    Numbered,
    /// A single `Left` / `Right` pair. Allows at most one triangle per side.
    Simplified,
}

/// Generator for a symmetric family of terms.
#[derive(Debug, Clone, PartialEq)]
pub struct TermSetBuilder {
    term_count: usize,
    naming: TermNaming,
    centre_name: String,
    half_width: Option<f64>,
}

impl TermSetBuilder {
    /// Create a builder for `term_count` terms with an explicit naming policy.
    pub fn new(term_count: usize, naming: TermNaming) -> Self {
        Self {
            term_count,
            naming,
            centre_name: DEFAULT_CENTRE.to_string(),
            half_width: None,
        }
    }

    /// Name of the centre triangle (odd counts only).
    pub fn with_centre_name(mut self, name: impl Into<String>) -> Self {
        self.centre_name = name.into();
        self
    }

    /// Override the half-width of every term; defaults to the spacing.
    ///
    /// A half-width below the spacing leaves gaps with zero membership.
    pub fn with_half_width(mut self, half_width: f64) -> Self {
        self.half_width = Some(half_width);
        self
    }

    pub fn term_count(&self) -> usize {
        self.term_count
    }

    pub fn naming(&self) -> TermNaming {
        self.naming
    }

    /// Terms on each side of the midpoint, the extreme ramp included.
    pub fn side_count(&self) -> usize {
        self.term_count / 2
    }

    /// Distance between neighbouring term peaks.
    pub fn spacing(&self, min: f64, max: f64) -> f64 {
        let half_range = (max - min) / 2.0;
        half_range / self.side_count().max(1) as f64
    }

    fn check(&self, min: f64, max: f64) -> FuzzyResult<f64> {
        if self.term_count < 3 {
            return Err(FuzzyError::InvalidTermSet {
                what: format!("term count must be at least 3, got {}", self.term_count),
            });
        }
        if !(min.is_finite() && max.is_finite()) || min >= max {
            return Err(FuzzyError::InvalidTermSet {
                what: format!("range [{min}, {max}] is empty"),
            });
        }
        let side_triangles = self.side_count() - 1;
        match self.naming {
            TermNaming::Numbered if self.term_count % 2 == 0 => {
                return Err(FuzzyError::InvalidTermSet {
                    what: format!(
                        "numbered naming needs an odd term count, got {}",
                        self.term_count
                    ),
                });
            }
            TermNaming::Simplified if side_triangles > 1 => {
                return Err(FuzzyError::InvalidTermSet {
                    what: format!(
                        "simplified naming allows one triangle per side, {} terms need {}",
                        self.term_count, side_triangles
                    ),
                });
            }
            _ => {}
        }
        let half_width = self.half_width.unwrap_or_else(|| self.spacing(min, max));
        if !half_width.is_finite() || half_width <= 0.0 || half_width > max - min {
            return Err(FuzzyError::InvalidTermSet {
                what: format!("half-width {half_width} must lie in (0, {}]", max - min),
            });
        }
        Ok(half_width)
    }

    fn side_name(&self, side: &str, k: usize) -> String {
        match self.naming {
            TermNaming::Numbered => format!("{side}{k}"),
            TermNaming::Simplified => side.to_string(),
        }
    }

    /// Generate the ordered terms, leftmost first.
    pub fn build(&self, min: f64, max: f64) -> FuzzyResult<Vec<Term>> {
        let hw = self.check(min, max)?;
        let mid = (min + max) / 2.0;
        let spacing = self.spacing(min, max);
        let side_triangles = self.side_count() - 1;

        let triangle = |peak: f64| MembershipFunction::triangle(peak - hw, peak, peak + hw);

        let mut terms = Vec::with_capacity(self.term_count);
        terms.push(Term::new(FAR_LEFT, MembershipFunction::ramp(min + hw, min)?));
        for k in (1..=side_triangles).rev() {
            let peak = mid - k as f64 * spacing;
            terms.push(Term::new(self.side_name("Left", k), triangle(peak)?));
        }
        if self.term_count % 2 == 1 {
            terms.push(Term::new(self.centre_name.clone(), triangle(mid)?));
        }
        for k in 1..=side_triangles {
            let peak = mid + k as f64 * spacing;
            terms.push(Term::new(self.side_name("Right", k), triangle(peak)?));
        }
        terms.push(Term::new(FAR_RIGHT, MembershipFunction::ramp(max - hw, max)?));
        Ok(terms)
    }

    /// Generate terms over `variable`'s range and append them to it.
    pub fn apply(&self, variable: &mut Variable) -> FuzzyResult<()> {
        for term in self.build(variable.min(), variable.max())? {
            variable.add_term(term.name, term.mf)?;
        }
        Ok(())
    }

    /// Create a variable and populate it.
    pub fn variable(&self, name: impl Into<String>, min: f64, max: f64) -> FuzzyResult<Variable> {
        let mut variable = Variable::new(name, min, max)?;
        self.apply(&mut variable)?;
        Ok(variable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(terms: &[Term]) -> Vec<&str> {
        terms.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn five_simplified_terms() {
        let terms = TermSetBuilder::new(5, TermNaming::Simplified)
            .build(-1.0, 1.0)
            .unwrap();
        assert_eq!(
            names(&terms),
            ["FarLeft", "Left", "Centre", "Right", "FarRight"]
        );
        assert_eq!(terms[0].mf, MembershipFunction::Ramp { start: -0.5, end: -1.0 });
        assert_eq!(
            terms[1].mf,
            MembershipFunction::Triangle { a: -1.0, b: -0.5, c: 0.0 }
        );
        assert_eq!(
            terms[2].mf,
            MembershipFunction::Triangle { a: -0.5, b: 0.0, c: 0.5 }
        );
        assert_eq!(terms[4].mf, MembershipFunction::Ramp { start: 0.5, end: 1.0 });
    }

    #[test]
    fn seven_numbered_terms() {
        let terms = TermSetBuilder::new(7, TermNaming::Numbered)
            .with_centre_name("Zero")
            .build(-3.0, 3.0)
            .unwrap();
        assert_eq!(
            names(&terms),
            ["FarLeft", "Left2", "Left1", "Zero", "Right1", "Right2", "FarRight"]
        );
        assert_eq!(terms[1].mf.peak(), -2.0);
        assert_eq!(terms[5].mf.peak(), 2.0);
    }

    #[test]
    fn even_count_has_no_centre() {
        let terms = TermSetBuilder::new(4, TermNaming::Simplified)
            .build(-1.0, 1.0)
            .unwrap();
        assert_eq!(names(&terms), ["FarLeft", "Left", "Right", "FarRight"]);
        assert_eq!(terms[1].mf.support().1, 0.0);
        assert_eq!(terms[2].mf.support().0, 0.0);
    }

    #[test]
    fn three_terms_are_ramps_around_centre() {
        let terms = TermSetBuilder::new(3, TermNaming::Numbered)
            .build(-1.0, 1.0)
            .unwrap();
        assert_eq!(names(&terms), ["FarLeft", "Centre", "FarRight"]);
        assert_eq!(terms[1].mf, MembershipFunction::Triangle { a: -1.0, b: 0.0, c: 1.0 });
    }

    #[test]
    fn invalid_combinations_are_rejected() {
        let err = TermSetBuilder::new(6, TermNaming::Numbered)
            .build(-1.0, 1.0)
            .unwrap_err();
        assert!(matches!(err, FuzzyError::InvalidTermSet { .. }));
        assert!(TermSetBuilder::new(7, TermNaming::Simplified)
            .build(-1.0, 1.0)
            .is_err());
        assert!(TermSetBuilder::new(2, TermNaming::Simplified)
            .build(-1.0, 1.0)
            .is_err());
        assert!(TermSetBuilder::new(5, TermNaming::Simplified)
            .with_half_width(0.0)
            .build(-1.0, 1.0)
            .is_err());
    }

    #[test]
    fn narrow_half_width_leaves_gaps() {
        let var = TermSetBuilder::new(5, TermNaming::Simplified)
            .with_half_width(0.2)
            .variable("Displacement", -1.0, 1.0)
            .unwrap();
        let total: f64 = var.fuzzify(0.25).0.iter().map(|(_, d)| d).sum();
        assert_eq!(total, 0.0);
    }

    #[test]
    fn apply_rejects_existing_names() {
        let mut var = Variable::new("Velocity", -1.0, 1.0).unwrap();
        var.add_term("Centre", MembershipFunction::triangle(-0.1, 0.0, 0.1).unwrap())
            .unwrap();
        let err = TermSetBuilder::new(3, TermNaming::Simplified)
            .apply(&mut var)
            .unwrap_err();
        assert!(matches!(err, FuzzyError::DuplicateTermName { .. }));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn terms_are_symmetric_about_zero(side in 1_usize..6, max in 0.1_f64..50.0, x in 0.0_f64..1.0) {
            let count = 2 * side + 1;
            let terms = TermSetBuilder::new(count, TermNaming::Numbered).build(-max, max).unwrap();
            prop_assert_eq!(terms.len(), count);
            let x = x * max;
            for (i, term) in terms.iter().enumerate() {
                let mirror = &terms[count - 1 - i];
                prop_assert!((term.degree(x) - mirror.degree(-x)).abs() < 1e-9);
            }
        }

        #[test]
        fn extremes_touch_the_range(side in 1_usize..6, max in 0.1_f64..50.0) {
            let terms = TermSetBuilder::new(2 * side + 1, TermNaming::Numbered).build(-max, max).unwrap();
            let first = terms.first().unwrap();
            let last = terms.last().unwrap();
            prop_assert_eq!(first.mf.support().0, -max);
            prop_assert_eq!(last.mf.support().1, max);
            prop_assert_eq!(first.degree(-max), 1.0);
            prop_assert_eq!(last.degree(max), 1.0);
        }
    }
}
