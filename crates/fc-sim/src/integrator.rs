//! Fixed-step integrators for the lateral kinematics.
//!
//! The car obeys `velocity' = steering` and `displacement' = velocity`, with
//! steering held constant across one step.

use crate::state::SimulationState;

/// Trait for time integrators.
pub trait Integrator {
    /// Advance `state` by `dt` seconds under its current steering command.
    fn step(&self, state: &SimulationState, dt: f64) -> SimulationState;
}

/// Explicit Euler: displacement advances with the velocity from before the step.
#[derive(Clone, Copy, Debug)]
pub struct ForwardEuler;

impl Integrator for ForwardEuler {
    fn step(&self, state: &SimulationState, dt: f64) -> SimulationState {
        SimulationState {
            displacement: state.displacement + state.velocity * dt,
            velocity: state.velocity + state.steering * dt,
            ..*state
        }
    }
}

/// Semi-implicit Euler: velocity first, then displacement with the new velocity.
#[derive(Clone, Copy, Debug)]
pub struct SemiImplicitEuler;

impl Integrator for SemiImplicitEuler {
    fn step(&self, state: &SimulationState, dt: f64) -> SimulationState {
        let velocity = state.velocity + state.steering * dt;
        SimulationState {
            displacement: state.displacement + velocity * dt,
            velocity,
            ..*state
        }
    }
}

/// Integrator selection for a simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IntegratorType {
    /// Explicit Euler (default).
    #[default]
    ForwardEuler,
    SemiImplicitEuler,
}

impl Integrator for IntegratorType {
    fn step(&self, state: &SimulationState, dt: f64) -> SimulationState {
        match self {
            IntegratorType::ForwardEuler => ForwardEuler.step(state, dt),
            IntegratorType::SemiImplicitEuler => SemiImplicitEuler.step(state, dt),
        }
    }
}
