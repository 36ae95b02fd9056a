//! Batch runner and result recording.

use crate::error::{SimError, SimResult};
use crate::session::Simulation;
use crate::state::{SimulationMode, SimulationState};

/// Options for batch runs.
#[derive(Clone, Debug)]
pub struct SimOptions {
    /// Number of steps to take
    pub steps: usize,
    /// Frame time for continuous mode (seconds); discrete mode uses the session timestep
    pub dt: f64,
    /// Record every N-th step (decimation)
    pub record_every: usize,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            steps: 100,
            dt: 0.1,
            record_every: 1,
        }
    }
}

/// Record of simulation results.
#[derive(Clone, Debug, Default)]
pub struct SimRecord {
    /// Time points (seconds)
    pub t: Vec<f64>,
    /// State snapshots
    pub x: Vec<SimulationState>,
}

impl SimRecord {
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// Last recorded snapshot.
    pub fn last(&self) -> Option<(f64, &SimulationState)> {
        self.t.last().copied().zip(self.x.last())
    }
}

/// Advance `sim` by `opts.steps` steps in its current mode.
///
/// The starting state is always recorded, as is the final one.
pub fn run_sim(sim: &mut Simulation, opts: &SimOptions) -> SimResult<SimRecord> {
    if opts.record_every == 0 {
        return Err(SimError::InvalidArg {
            what: "record_every must be positive",
        });
    }
    if sim.mode() == SimulationMode::Continuous && !(opts.dt > 0.0 && opts.dt.is_finite()) {
        return Err(SimError::InvalidArg {
            what: "dt must be positive",
        });
    }
    if sim.paused() {
        return Err(SimError::InvalidArg {
            what: "simulation is paused",
        });
    }

    let mut record = SimRecord {
        t: vec![sim.time()],
        x: vec![*sim.current()],
    };

    let mut step = 0;
    while step < opts.steps {
        match sim.mode() {
            SimulationMode::Continuous => sim.tick(opts.dt)?,
            SimulationMode::Discrete => sim.step()?,
        };
        step += 1;

        if step % opts.record_every == 0 {
            record.t.push(sim.time());
            record.x.push(*sim.current());
        }
    }

    // Always record final state
    if step % opts.record_every != 0 {
        record.t.push(sim.time());
        record.x.push(*sim.current());
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_options_defaults() {
        let opts = SimOptions::default();
        assert_eq!(opts.steps, 100);
        assert_eq!(opts.dt, 0.1);
        assert_eq!(opts.record_every, 1);
    }

    #[test]
    fn empty_record() {
        let record = SimRecord::default();
        assert!(record.is_empty());
        assert!(record.last().is_none());
    }
}
