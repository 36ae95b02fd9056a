//! Lane-keeping simulation driven by the fuzzy steering engine.
//!
//! - [`SimulationState`]: displacement, velocity, steering plus time settings
//! - [`Integrator`]: one kinematic step under a held steering command
//! - [`Simulation`]: owns the engine and the `initial`/`current` states
//! - [`run_sim`]: fixed-count batch runs with decimated recording

pub mod error;
pub mod integrator;
pub mod session;
pub mod sim;
pub mod state;

pub use error::{SimError, SimResult};
pub use integrator::{ForwardEuler, Integrator, IntegratorType, SemiImplicitEuler};
pub use session::{Bindings, Simulation};
pub use sim::{SimOptions, SimRecord, run_sim};
pub use state::{DEFAULT_TIMESTEP, SimulationMode, SimulationState, TIMESTEP_INCREMENT};
