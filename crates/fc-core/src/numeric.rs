use crate::FcError;

/// Floating point type used throughout system
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, FcError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(FcError::NonFinite { what, value: v })
    }
}

/// Midpoints of `count` equal-width cells covering `[min, max]`.
///
/// Yields nothing when `count` is zero.
pub fn sample_midpoints(min: Real, max: Real, count: usize) -> impl Iterator<Item = Real> {
    let dx = if count == 0 {
        0.0
    } else {
        (max - min) / count as Real
    };
    (0..count).map(move |i| min + (i as Real + 0.5) * dx)
}

/// Width of one cell when `[min, max]` is split into `count` cells.
pub fn cell_width(min: Real, max: Real, count: usize) -> Real {
    if count == 0 {
        0.0
    } else {
        (max - min) / count as Real
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn midpoints_cover_the_interval() {
        let pts: Vec<Real> = sample_midpoints(-1.0, 1.0, 4).collect();
        assert_eq!(pts, vec![-0.75, -0.25, 0.25, 0.75]);
        assert_eq!(cell_width(-1.0, 1.0, 4), 0.5);
        assert_eq!(sample_midpoints(0.0, 1.0, 0).count(), 0);
    }
}
