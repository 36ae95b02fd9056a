//! Physical state of the simulated car.

/// Default discrete timestep (seconds).
pub const DEFAULT_TIMESTEP: f64 = 0.1;

/// Granularity of user timestep adjustments (seconds).
pub const TIMESTEP_INCREMENT: f64 = 0.1;

/// How time advances.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SimulationMode {
    /// Every tick advances by the measured frame time.
    Continuous,
    /// Only an explicit step trigger advances, by the fixed timestep.
    #[default]
    Discrete,
}

/// Lateral state of the car plus the time-advance settings.
///
/// A simulation keeps two independent copies: `initial` and `current`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationState {
    /// Lateral offset from the lane centre.
    pub displacement: f64,
    /// Lateral velocity.
    pub velocity: f64,
    /// Steering command last produced by the controller.
    pub steering: f64,
    pub paused: bool,
    /// Step size used in discrete mode (seconds).
    pub timestep: f64,
    pub mode: SimulationMode,
}

impl SimulationState {
    /// State at rest-relative values `displacement`/`velocity`, steering not yet computed.
    pub fn new(displacement: f64, velocity: f64, mode: SimulationMode) -> Self {
        Self {
            displacement,
            velocity,
            steering: 0.0,
            paused: false,
            timestep: DEFAULT_TIMESTEP,
            mode,
        }
    }
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::new(0.0, 0.0, SimulationMode::default())
    }
}

/// Snap `timestep + delta_tenths * 0.1` to whole tenths, never below one tenth.
pub(crate) fn adjust_timestep(timestep: f64, delta_tenths: i32) -> f64 {
    let tenths = (timestep / TIMESTEP_INCREMENT).round() + f64::from(delta_tenths);
    tenths.max(1.0) / 10.0
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn timestep_stays_on_tenths(start in 1_u32..50, moves in proptest::collection::vec(-3_i32..=3, 0..20)) {
            let mut timestep = f64::from(start) / 10.0;
            for delta in moves {
                timestep = adjust_timestep(timestep, delta);
                prop_assert!(timestep >= 0.1);
                let tenths = timestep * 10.0;
                prop_assert!((tenths - tenths.round()).abs() < 1e-9);
            }
        }
    }
}
