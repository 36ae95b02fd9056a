//! Simulation session: couples the engine with the car state.

use fc_core::VariableId;
use fc_engine::{Engine, ProcessReport};
use tracing::{debug, info};

use crate::error::{SimError, SimResult};
use crate::integrator::{Integrator, IntegratorType};
use crate::state::{SimulationMode, SimulationState, adjust_timestep};

/// Names of the engine variables the car is wired to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bindings {
    pub displacement: String,
    pub velocity: String,
    pub steering: String,
}

impl Default for Bindings {
    fn default() -> Self {
        Self {
            displacement: "Displacement".into(),
            velocity: "Velocity".into(),
            steering: "Steering".into(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Resolved {
    displacement: VariableId,
    velocity: VariableId,
    steering: VariableId,
}

/// Car driven by a fuzzy steering controller.
///
/// `initial` is fixed when the session starts (or restarts); `current`
/// evolves with every step and can be reset back to `initial` at any time.
#[derive(Debug, Clone)]
pub struct Simulation {
    engine: Engine,
    ids: Resolved,
    integrator: IntegratorType,
    initial: SimulationState,
    current: SimulationState,
    time: f64,
    last_report: ProcessReport,
    initial_report: ProcessReport,
}

impl Simulation {
    /// Start a session from `initial`.
    ///
    /// The engine must be ready. Its outputs are restarted, then its steering
    /// for the initial displacement and velocity is computed once here and
    /// stored in `initial.steering`.
    pub fn new(
        engine: Engine,
        bindings: &Bindings,
        initial: SimulationState,
        integrator: IntegratorType,
    ) -> SimResult<Self> {
        if !(initial.timestep > 0.0 && initial.timestep.is_finite()) {
            return Err(SimError::InvalidArg {
                what: "timestep must be positive and finite",
            });
        }
        let ids = Resolved {
            displacement: input_id(&engine, &bindings.displacement)?,
            velocity: input_id(&engine, &bindings.velocity)?,
            steering: engine
                .output_id(&bindings.steering)
                .ok_or_else(|| SimError::Binding {
                    what: format!("output variable '{}'", bindings.steering),
                })?,
        };

        let mut sim = Self {
            engine,
            ids,
            integrator,
            initial,
            current: initial,
            time: 0.0,
            last_report: ProcessReport::default(),
            initial_report: ProcessReport::default(),
        };
        sim.check_initial(initial.displacement, initial.velocity)?;
        sim.engine.restart();
        sim.initial.steering = sim.control(initial.displacement, initial.velocity)?;
        sim.initial_report = sim.last_report.clone();
        sim.current = sim.initial;
        info!(
            displacement = sim.initial.displacement,
            velocity = sim.initial.velocity,
            steering = sim.initial.steering,
            mode = ?sim.initial.mode,
            "simulation started"
        );
        Ok(sim)
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn integrator(&self) -> IntegratorType {
        self.integrator
    }

    pub fn initial(&self) -> &SimulationState {
        &self.initial
    }

    pub fn current(&self) -> &SimulationState {
        &self.current
    }

    /// Simulated seconds since the last reset or restart.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Diagnostics of the most recent `process()` call.
    pub fn last_report(&self) -> &ProcessReport {
        &self.last_report
    }

    pub fn displacement(&self) -> f64 {
        self.current.displacement
    }

    pub fn velocity(&self) -> f64 {
        self.current.velocity
    }

    pub fn steering(&self) -> f64 {
        self.current.steering
    }

    pub fn timestep(&self) -> f64 {
        self.current.timestep
    }

    pub fn paused(&self) -> bool {
        self.current.paused
    }

    pub fn mode(&self) -> SimulationMode {
        self.current.mode
    }

    /// Continuous-mode frame update by the measured `dt`.
    ///
    /// Returns whether the state advanced; nothing happens while paused or in
    /// discrete mode.
    pub fn tick(&mut self, dt: f64) -> SimResult<bool> {
        if !(dt >= 0.0 && dt.is_finite()) {
            return Err(SimError::InvalidArg {
                what: "dt must be non-negative and finite",
            });
        }
        if self.current.paused || self.current.mode != SimulationMode::Continuous {
            return Ok(false);
        }
        self.advance(dt)?;
        Ok(true)
    }

    /// Discrete-mode step by the current timestep.
    ///
    /// Returns whether the state advanced; nothing happens while paused or in
    /// continuous mode.
    pub fn step(&mut self) -> SimResult<bool> {
        if self.current.paused || self.current.mode != SimulationMode::Discrete {
            return Ok(false);
        }
        self.advance(self.current.timestep)?;
        Ok(true)
    }

    /// Flip the pause flag without touching the car state.
    pub fn toggle_pause(&mut self) -> bool {
        self.set_paused(!self.current.paused);
        self.current.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.current.paused != paused {
            debug!(paused, "pause toggled");
        }
        self.current.paused = paused;
    }

    /// Grow the discrete timestep by one increment. Takes effect on the next step.
    pub fn increase_timestep(&mut self) -> f64 {
        self.current.timestep = adjust_timestep(self.current.timestep, 1);
        self.current.timestep
    }

    /// Shrink the discrete timestep by one increment, never below the increment.
    pub fn decrease_timestep(&mut self) -> f64 {
        self.current.timestep = adjust_timestep(self.current.timestep, -1);
        self.current.timestep
    }

    pub fn set_mode(&mut self, mode: SimulationMode) {
        if self.current.mode != mode {
            info!(from = ?self.current.mode, to = ?mode, "simulation mode changed");
        }
        self.current.mode = mode;
    }

    /// Restore `current` to `initial` exactly. The engine is not re-run, but
    /// the steering it holds when no rule fires goes back to
    /// `initial.steering`, so a reset run replays the first run.
    pub fn reset(&mut self) -> SimResult<()> {
        self.engine
            .hold_output(self.ids.steering, self.initial.steering)?;
        self.last_report = self.initial_report.clone();
        self.current = self.initial;
        self.time = 0.0;
        info!(
            displacement = self.current.displacement,
            velocity = self.current.velocity,
            "simulation reset"
        );
        Ok(())
    }

    /// Replace the initial displacement and velocity, recompute the initial
    /// steering and restart from there.
    ///
    /// The engine's outputs are restarted first, as in [`Simulation::new`].
    /// Values outside the bound input variables' ranges are rejected and leave
    /// the session untouched.
    pub fn restart(&mut self, displacement: f64, velocity: f64) -> SimResult<()> {
        self.check_initial(displacement, velocity)?;
        self.engine.restart();
        let steering = self.control(displacement, velocity)?;
        self.initial_report = self.last_report.clone();
        self.initial.displacement = displacement;
        self.initial.velocity = velocity;
        self.initial.steering = steering;
        self.current = self.initial;
        self.time = 0.0;
        info!(displacement, velocity, steering, "simulation restarted");
        Ok(())
    }

    fn advance(&mut self, dt: f64) -> SimResult<()> {
        let next = self.integrator.step(&self.current, dt);
        let steering = self.control(next.displacement, next.velocity)?;
        self.current = SimulationState { steering, ..next };
        self.time += dt;
        Ok(())
    }

    /// Feed the car state to the engine and read back the steering command.
    fn control(&mut self, displacement: f64, velocity: f64) -> SimResult<f64> {
        self.engine
            .set_input_value(self.ids.displacement, displacement)?;
        self.engine.set_input_value(self.ids.velocity, velocity)?;
        self.last_report = self.engine.process()?;
        Ok(self.engine.output_value(self.ids.steering)?)
    }

    fn check_initial(&self, displacement: f64, velocity: f64) -> SimResult<()> {
        check_range(&self.engine, self.ids.displacement, "displacement", displacement)?;
        check_range(&self.engine, self.ids.velocity, "velocity", velocity)
    }
}

fn input_id(engine: &Engine, name: &str) -> SimResult<VariableId> {
    engine.input_id(name).ok_or_else(|| SimError::Binding {
        what: format!("input variable '{name}'"),
    })
}

fn check_range(engine: &Engine, id: VariableId, what: &'static str, value: f64) -> SimResult<()> {
    let var = engine
        .input(id)
        .map(|input| input.variable())
        .ok_or_else(|| SimError::Binding {
            what: format!("input variable #{id}"),
        })?;
    if var.contains(value) {
        Ok(())
    } else {
        Err(SimError::OutOfRange {
            what,
            value,
            min: var.min(),
            max: var.max(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fc_engine::{MembershipFunction, RuleBlock, Variable};

    /// Steering follows a single rule: any displacement steers at 0.5.
    fn constant_engine() -> Engine {
        let mut engine = Engine::new("constant");
        for name in ["Displacement", "Velocity"] {
            let mut var = Variable::new(name, -1.0, 1.0).unwrap();
            var.add_term("Any", MembershipFunction::triangle(-3.0, 0.0, 3.0).unwrap())
                .unwrap();
            engine.add_input_variable(var).unwrap();
        }
        let mut steering = Variable::new("Steering", -1.0, 1.0).unwrap();
        steering
            .add_term("Half", MembershipFunction::triangle(0.0, 0.5, 1.0).unwrap())
            .unwrap();
        engine.add_output_variable(steering).unwrap();

        let mut block = RuleBlock::new("rules");
        block
            .add_rule_text(
                "if Displacement is Any and Velocity is Any then Steering is Half",
                &engine,
            )
            .unwrap();
        engine.add_rule_block(block).unwrap();
        engine
            .configure("Minimum", "", "Minimum", "Maximum", "Centroid")
            .unwrap();
        engine
    }

    fn session(mode: SimulationMode, integrator: IntegratorType) -> Simulation {
        Simulation::new(
            constant_engine(),
            &Bindings::default(),
            SimulationState::new(0.0, 0.0, mode),
            integrator,
        )
        .unwrap()
    }

    #[test]
    fn initial_steering_is_computed_once() {
        let sim = session(SimulationMode::Continuous, IntegratorType::default());
        assert!((sim.initial().steering - 0.5).abs() < 1e-9);
        assert_eq!(sim.current(), sim.initial());
        assert_eq!(sim.time(), 0.0);
    }

    #[test]
    fn forward_euler_tick_uses_pre_update_velocity() {
        let mut sim = session(SimulationMode::Continuous, IntegratorType::ForwardEuler);
        assert!(sim.tick(1.0).unwrap());
        assert!((sim.velocity() - 0.5).abs() < 1e-9);
        assert_eq!(sim.displacement(), 0.0);
    }

    #[test]
    fn semi_implicit_tick_uses_new_velocity() {
        let mut sim = session(SimulationMode::Continuous, IntegratorType::SemiImplicitEuler);
        assert!(sim.tick(1.0).unwrap());
        assert!((sim.velocity() - 0.5).abs() < 1e-9);
        assert!((sim.displacement() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn pause_freezes_state() {
        let mut sim = session(SimulationMode::Continuous, IntegratorType::default());
        sim.tick(0.1).unwrap();
        let before = *sim.current();
        assert!(sim.toggle_pause());
        assert!(!sim.tick(0.1).unwrap());
        assert_eq!(sim.displacement(), before.displacement);
        assert_eq!(sim.velocity(), before.velocity);
        assert!(!sim.toggle_pause());
        assert!(sim.tick(0.1).unwrap());
        assert!(sim.velocity() > before.velocity);
    }

    #[test]
    fn modes_gate_their_triggers() {
        let mut sim = session(SimulationMode::Discrete, IntegratorType::default());
        assert!(!sim.tick(0.1).unwrap());
        assert!(sim.step().unwrap());
        sim.set_mode(SimulationMode::Continuous);
        assert!(!sim.step().unwrap());
        assert!(sim.tick(0.1).unwrap());
    }

    #[test]
    fn timestep_change_applies_to_next_step() {
        let mut sim = session(SimulationMode::Discrete, IntegratorType::default());
        assert_eq!(sim.timestep(), 0.1);
        assert_eq!(sim.increase_timestep(), 0.2);
        sim.step().unwrap();
        assert!((sim.time() - 0.2).abs() < 1e-12);
        assert!((sim.velocity() - 0.1).abs() < 1e-9);

        assert_eq!(sim.decrease_timestep(), 0.1);
        assert_eq!(sim.decrease_timestep(), 0.1);
    }

    #[test]
    fn reset_restores_initial_bit_for_bit() {
        let mut sim = session(SimulationMode::Discrete, IntegratorType::default());
        sim.increase_timestep();
        for _ in 0..7 {
            sim.step().unwrap();
        }
        sim.toggle_pause();
        assert_ne!(sim.current(), sim.initial());

        sim.reset().unwrap();
        let (c, i) = (sim.current(), sim.initial());
        assert_eq!(c.displacement.to_bits(), i.displacement.to_bits());
        assert_eq!(c.velocity.to_bits(), i.velocity.to_bits());
        assert_eq!(c.steering.to_bits(), i.steering.to_bits());
        assert_eq!(c, i);
        assert_eq!(sim.time(), 0.0);
    }

    #[test]
    fn restart_validates_range() {
        let mut sim = session(SimulationMode::Discrete, IntegratorType::default());
        let err = sim.restart(1.5, 0.0).unwrap_err();
        assert!(matches!(err, SimError::OutOfRange { what: "displacement", .. }));
        assert_eq!(sim.initial().displacement, 0.0);

        sim.restart(0.25, -0.5).unwrap();
        assert_eq!(sim.initial().displacement, 0.25);
        assert_eq!(sim.current(), sim.initial());
    }

    #[test]
    fn bad_bindings_and_initial_values_are_rejected() {
        let bindings = Bindings {
            steering: "Throttle".into(),
            ..Bindings::default()
        };
        let err = Simulation::new(
            constant_engine(),
            &bindings,
            SimulationState::default(),
            IntegratorType::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SimError::Binding { .. }));

        let err = Simulation::new(
            constant_engine(),
            &Bindings::default(),
            SimulationState::new(0.0, -2.0, SimulationMode::Discrete),
            IntegratorType::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SimError::OutOfRange { what: "velocity", .. }));
    }

    #[test]
    fn unready_engine_is_a_backend_error() {
        let err = Simulation::new(
            Engine::new("empty"),
            &Bindings::default(),
            SimulationState::default(),
            IntegratorType::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SimError::Binding { .. }));

        let mut engine = constant_engine();
        engine.add_rule_block(RuleBlock::new("empty")).unwrap();
        let err = Simulation::new(
            engine,
            &Bindings::default(),
            SimulationState::default(),
            IntegratorType::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SimError::Backend { .. }));
    }
}
