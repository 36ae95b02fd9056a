//! Response sweeps: sample one input across its range with the others held.

use serde::{Deserialize, Serialize};

use crate::engine::Engine;
use crate::error::{FuzzyError, FuzzyResult};

/// Default number of samples per sweep.
pub const DEFAULT_SAMPLES: usize = 50;

/// One sampled point of a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub input: f64,
    pub output: f64,
    /// True when no rule fired and the output kept its previous value.
    pub held: bool,
}

/// Sample `input` at `min + i * range / samples` for `i in 0..samples`,
/// processing the engine at each point and reading `output`.
///
/// Other inputs keep whatever value they currently hold. The engine is left
/// at the last sample.
pub fn sweep(
    engine: &mut Engine,
    input: &str,
    output: &str,
    samples: usize,
) -> FuzzyResult<Vec<SweepPoint>> {
    if samples == 0 {
        return Err(FuzzyError::InvalidArg {
            what: "sweep needs at least one sample",
        });
    }
    let input_id = engine
        .input_id(input)
        .ok_or_else(|| FuzzyError::unknown(format!("input variable '{input}'")))?;
    let output_id = engine
        .output_id(output)
        .ok_or_else(|| FuzzyError::unknown(format!("output variable '{output}'")))?;
    let (min, range) = engine
        .input(input_id)
        .map(|v| (v.variable().min(), v.variable().range()))
        .ok_or_else(|| FuzzyError::unknown(format!("input variable '{input}'")))?;

    let mut points = Vec::with_capacity(samples);
    for i in 0..samples {
        let x = min + i as f64 * (range / samples as f64);
        engine.set_input_value(input_id, x)?;
        let report = engine.process()?;
        let held = engine
            .output(output_id)
            .is_some_and(|o| report.held.iter().any(|h| h == o.name()));
        points.push(SweepPoint {
            input: x,
            output: engine.output_value(output_id)?,
            held,
        });
    }
    Ok(points)
}
