//! Build runtime objects from a validated project.

use fc_engine::{Engine, RuleMatrix, TermSetBuilder, Variable};
use fc_sim::{Bindings, IntegratorType, Simulation, SimulationMode, SimulationState};
use tracing::debug;

use crate::ProjectResult;
use crate::schema::{IntegratorDef, ModeDef, Project, TermSetDef, VariableDef};
use crate::validate::validate_project;

/// Name of the rule block holding the generated matrix.
pub const RULE_BLOCK_NAME: &str = "fam";

/// Assemble and configure the inference engine described by `project`.
pub fn compile_engine(project: &Project) -> ProjectResult<Engine> {
    validate_project(project)?;

    let mut engine = Engine::new(project.name.clone());
    for def in &project.inputs {
        engine.add_input_variable(build_variable(def)?)?;
    }
    for def in &project.outputs {
        engine.add_output_variable(build_variable(def)?)?;
    }

    let rules = &project.rules;
    let size = |name: &str| {
        project
            .variable(name)
            .map_or(0, |v| v.terms.term_count())
    };
    let matrix = RuleMatrix::generate(
        size(&rules.displacement),
        size(&rules.velocity),
        size(&rules.steering),
    )?;
    let block = matrix.rule_block(
        RULE_BLOCK_NAME,
        &engine,
        &rules.displacement,
        &rules.velocity,
        &rules.steering,
    )?;
    engine.add_rule_block(block)?;

    let ops = &project.operators;
    engine.configure(
        &ops.conjunction,
        &ops.disjunction,
        &ops.implication,
        &ops.aggregation,
        &ops.defuzzifier,
    )?;
    engine.set_resolution(ops.resolution)?;

    debug!(
        engine = %project.name,
        inputs = project.inputs.len(),
        outputs = project.outputs.len(),
        rules = size(&rules.displacement) * size(&rules.velocity),
        "compiled engine"
    );
    Ok(engine)
}

/// Compile the engine and start a simulation session from the project's
/// initial state.
pub fn compile_simulation(project: &Project) -> ProjectResult<Simulation> {
    let engine = compile_engine(project)?;
    let sim = &project.simulation;
    let mode = match sim.mode {
        ModeDef::Continuous => SimulationMode::Continuous,
        ModeDef::Discrete => SimulationMode::Discrete,
    };
    let integrator = match sim.integrator {
        IntegratorDef::ForwardEuler => IntegratorType::ForwardEuler,
        IntegratorDef::SemiImplicitEuler => IntegratorType::SemiImplicitEuler,
    };
    let initial = SimulationState {
        timestep: sim.timestep,
        ..SimulationState::new(sim.initial.displacement, sim.initial.velocity, mode)
    };
    let bindings = Bindings {
        displacement: project.rules.displacement.clone(),
        velocity: project.rules.velocity.clone(),
        steering: project.rules.steering.clone(),
    };
    Ok(Simulation::new(engine, &bindings, initial, integrator)?)
}

fn build_variable(def: &VariableDef) -> ProjectResult<Variable> {
    match &def.terms {
        TermSetDef::Generated {
            count,
            naming,
            centre_name,
            half_width,
        } => {
            let mut builder = TermSetBuilder::new(*count, *naming);
            if let Some(name) = centre_name {
                builder = builder.with_centre_name(name.clone());
            }
            if let Some(hw) = half_width {
                builder = builder.with_half_width(*hw);
            }
            Ok(builder.variable(def.name.clone(), def.min, def.max)?)
        }
        TermSetDef::Explicit { terms } => {
            let mut variable = Variable::new(def.name.clone(), def.min, def.max)?;
            for term in terms {
                variable.add_term(term.name.clone(), term.shape)?;
            }
            Ok(variable)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_project_compiles_to_ready_engine() {
        let engine = compile_engine(&Project::steering_default()).unwrap();
        assert_eq!(engine.is_ready(), Ok(()));
        assert_eq!(engine.inputs().len(), 2);
        let id = engine.rule_block_id(RULE_BLOCK_NAME).unwrap();
        assert_eq!(engine.rule_block(id).unwrap().rules().len(), 25);
    }

    #[test]
    fn resolution_reaches_the_defuzzifier() {
        let mut project = Project::steering_default();
        project.operators.resolution = 50;
        let engine = compile_engine(&project).unwrap();
        let defuzzifier = engine.outputs()[0].defuzzifier().unwrap();
        assert_eq!(defuzzifier.resolution(), 50);
    }

    #[test]
    fn simulation_uses_project_settings() {
        let mut project = Project::steering_default();
        project.simulation.mode = ModeDef::Continuous;
        project.simulation.timestep = 0.3;
        project.simulation.integrator = IntegratorDef::SemiImplicitEuler;
        project.simulation.initial.displacement = -0.5;

        let sim = compile_simulation(&project).unwrap();
        assert_eq!(sim.mode(), SimulationMode::Continuous);
        assert_eq!(sim.timestep(), 0.3);
        assert_eq!(sim.integrator(), IntegratorType::SemiImplicitEuler);
        assert_eq!(sim.displacement(), -0.5);
        assert!(sim.steering() > 0.0);
    }

    #[test]
    fn invalid_project_does_not_compile() {
        let mut project = Project::steering_default();
        project.rules.displacement = "Heading".to_string();
        assert!(matches!(
            compile_engine(&project),
            Err(crate::ProjectError::Validation(_))
        ));
    }
}
