//! Membership functions.
//!
//! The function set is small and closed, so it is a tagged enum rather than a
//! trait object:
//! - **Triangle**: zero outside `[a, c]`, peak of 1 at `b`
//! - **Ramp**: open-ended shoulder used for the extreme terms of a variable

use fc_core::ensure_finite;
use serde::{Deserialize, Serialize};

use crate::error::{FuzzyError, FuzzyResult};

/// Degree-of-membership evaluator for a crisp value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MembershipFunction {
    /// Triangle with vertices `a <= b <= c`.
    Triangle { a: f64, b: f64, c: f64 },

    /// Linear shoulder from `start` (degree 0) to `end` (degree 1).
    ///
    /// Rising when `start < end`, falling when `start > end`.
    Ramp { start: f64, end: f64 },
}

impl MembershipFunction {
    /// Create a triangle, checking `a <= b <= c`.
    pub fn triangle(a: f64, b: f64, c: f64) -> FuzzyResult<Self> {
        let mf = Self::Triangle { a, b, c };
        mf.validate()?;
        Ok(mf)
    }

    /// Create a ramp, checking `start != end`.
    pub fn ramp(start: f64, end: f64) -> FuzzyResult<Self> {
        let mf = Self::Ramp { start, end };
        mf.validate()?;
        Ok(mf)
    }

    /// Check the parameter invariants.
    ///
    /// Deserialized functions bypass the constructors, so callers that accept
    /// external definitions should run this before use.
    pub fn validate(&self) -> FuzzyResult<()> {
        match *self {
            Self::Triangle { a, b, c } => {
                ensure_finite(a, "triangle vertex a")?;
                ensure_finite(b, "triangle vertex b")?;
                ensure_finite(c, "triangle vertex c")?;
                if a > b || b > c {
                    return Err(FuzzyError::InvalidArg {
                        what: "triangle vertices must satisfy a <= b <= c",
                    });
                }
            }
            Self::Ramp { start, end } => {
                ensure_finite(start, "ramp start")?;
                ensure_finite(end, "ramp end")?;
                if start == end {
                    return Err(FuzzyError::InvalidArg {
                        what: "ramp start and end must differ",
                    });
                }
            }
        }
        Ok(())
    }

    /// Degree of membership of `x`, always within `[0, 1]`.
    pub fn degree(&self, x: f64) -> f64 {
        if x.is_nan() {
            return 0.0;
        }
        match *self {
            Self::Triangle { a, b, c } => {
                if x < a || x > c {
                    0.0
                } else if x == b {
                    1.0
                } else if x < b {
                    // a == b cannot reach here: x >= a and x < b.
                    (x - a) / (b - a)
                } else {
                    (c - x) / (c - b)
                }
            }
            Self::Ramp { start, end } => {
                if start < end {
                    if x <= start {
                        0.0
                    } else if x >= end {
                        1.0
                    } else {
                        (x - start) / (end - start)
                    }
                } else if x >= start {
                    0.0
                } else if x <= end {
                    1.0
                } else {
                    (start - x) / (start - end)
                }
            }
        }
    }

    /// Interval outside which the degree is constant.
    pub fn support(&self) -> (f64, f64) {
        match *self {
            Self::Triangle { a, c, .. } => (a, c),
            Self::Ramp { start, end } => (start.min(end), start.max(end)),
        }
    }

    /// Point (or first point) where the degree reaches 1.
    pub fn peak(&self) -> f64 {
        match *self {
            Self::Triangle { b, .. } => b,
            Self::Ramp { end, .. } => end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_shape() {
        let tri = MembershipFunction::triangle(-1.0, 0.0, 1.0).unwrap();
        assert_eq!(tri.degree(-1.5), 0.0);
        assert_eq!(tri.degree(-1.0), 0.0);
        assert_eq!(tri.degree(-0.5), 0.5);
        assert_eq!(tri.degree(0.0), 1.0);
        assert_eq!(tri.degree(0.25), 0.75);
        assert_eq!(tri.degree(1.0), 0.0);
        assert_eq!(tri.degree(3.0), 0.0);
    }

    #[test]
    fn triangle_with_vertical_left_edge() {
        let tri = MembershipFunction::triangle(0.0, 0.0, 1.0).unwrap();
        assert_eq!(tri.degree(-0.01), 0.0);
        assert_eq!(tri.degree(0.0), 1.0);
        assert_eq!(tri.degree(0.5), 0.5);
    }

    #[test]
    fn triangle_with_vertical_right_edge() {
        let tri = MembershipFunction::triangle(-1.0, 0.0, 0.0).unwrap();
        assert_eq!(tri.degree(-0.5), 0.5);
        assert_eq!(tri.degree(0.0), 1.0);
        assert_eq!(tri.degree(0.01), 0.0);
    }

    #[test]
    fn singleton_triangle() {
        let tri = MembershipFunction::triangle(0.5, 0.5, 0.5).unwrap();
        assert_eq!(tri.degree(0.5), 1.0);
        assert_eq!(tri.degree(0.4), 0.0);
    }

    #[test]
    fn rising_and_falling_ramps() {
        let rising = MembershipFunction::ramp(0.5, 1.0).unwrap();
        assert_eq!(rising.degree(0.0), 0.0);
        assert_eq!(rising.degree(0.75), 0.5);
        assert_eq!(rising.degree(1.0), 1.0);
        assert_eq!(rising.degree(4.0), 1.0);

        let falling = MembershipFunction::ramp(-0.5, -1.0).unwrap();
        assert_eq!(falling.degree(0.0), 0.0);
        assert_eq!(falling.degree(-0.75), 0.5);
        assert_eq!(falling.degree(-1.0), 1.0);
        assert_eq!(falling.degree(-7.0), 1.0);
        assert_eq!(falling.support(), (-1.0, -0.5));
    }

    #[test]
    fn invalid_parameters() {
        assert!(MembershipFunction::triangle(1.0, 0.0, 2.0).is_err());
        assert!(MembershipFunction::triangle(0.0, 2.0, 1.0).is_err());
        assert!(MembershipFunction::triangle(f64::NAN, 0.0, 1.0).is_err());
        assert!(MembershipFunction::ramp(0.3, 0.3).is_err());
    }

    #[test]
    fn nan_input_has_no_membership() {
        let tri = MembershipFunction::triangle(-1.0, 0.0, 1.0).unwrap();
        assert_eq!(tri.degree(f64::NAN), 0.0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn ordered_triple() -> impl Strategy<Value = (f64, f64, f64)> {
        (-10.0_f64..10.0, 0.0_f64..5.0, 0.0_f64..5.0).prop_map(|(a, d1, d2)| (a, a + d1, a + d1 + d2))
    }

    proptest! {
        #[test]
        fn triangle_is_zero_outside_support((a, b, c) in ordered_triple(), off in 1e-6_f64..100.0) {
            let tri = MembershipFunction::triangle(a, b, c).unwrap();
            prop_assert_eq!(tri.degree(a - off), 0.0);
            prop_assert_eq!(tri.degree(c + off), 0.0);
            prop_assert_eq!(tri.degree(b), 1.0);
        }

        #[test]
        fn triangle_degree_is_bounded((a, b, c) in ordered_triple(), x in -20.0_f64..20.0) {
            let d = MembershipFunction::triangle(a, b, c).unwrap().degree(x);
            prop_assert!((0.0..=1.0).contains(&d));
        }

        #[test]
        fn triangle_is_lipschitz_on_its_support(a in -10.0_f64..10.0, left in 0.01_f64..5.0, right in 0.01_f64..5.0,
                                                 at in 0.0_f64..1.0, eps in 1e-6_f64..0.1) {
            let (b, c) = (a + left, a + left + right);
            let tri = MembershipFunction::triangle(a, b, c).unwrap();
            let x = a + at * (c - a);
            let slope = 1.0 / (b - a).min(c - b);
            let jump = (tri.degree(x + eps) - tri.degree(x)).abs();
            prop_assert!(jump <= eps * slope + 1e-9, "jump {} at x = {} for ({}, {}, {})", jump, x, a, b, c);
        }

        #[test]
        fn ramp_is_monotonic(start in -5.0_f64..5.0, len in 1e-3_f64..5.0, rising in any::<bool>(),
                             x1 in -12.0_f64..12.0, x2 in -12.0_f64..12.0) {
            let (s, e) = if rising { (start, start + len) } else { (start + len, start) };
            let ramp = MembershipFunction::ramp(s, e).unwrap();
            let (lo, hi) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
            if rising {
                prop_assert!(ramp.degree(lo) <= ramp.degree(hi));
            } else {
                prop_assert!(ramp.degree(lo) >= ramp.degree(hi));
            }
            prop_assert!((0.0..=1.0).contains(&ramp.degree(x1)));
        }
    }
}
