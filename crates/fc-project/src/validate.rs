//! Project validation logic.

use std::collections::HashSet;

use fc_engine::{Defuzzifier, RuleMatrix, SNorm, TNorm, TermSetBuilder};

use crate::schema::{LATEST_VERSION, OperatorsDef, Project, TermSetDef, VariableDef};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate name: {name} in {context}")]
    DuplicateName { name: String, context: String },

    #[error("Missing reference: {name} in {context}")]
    MissingReference { name: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    if project.version == 0 || project.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }

    let mut names = HashSet::new();
    for variable in project.inputs.iter().chain(&project.outputs) {
        if !names.insert(variable.name.as_str()) {
            return Err(ValidationError::DuplicateName {
                name: variable.name.clone(),
                context: "variables".to_string(),
            });
        }
        validate_variable(variable)?;
    }

    validate_operators(&project.operators)?;
    validate_rules(project)?;
    validate_simulation(project)?;
    Ok(())
}

fn validate_variable(variable: &VariableDef) -> Result<(), ValidationError> {
    let field = |what: &str| format!("variable '{}' {what}", variable.name);

    if !variable.min.is_finite() || !variable.max.is_finite() || variable.min >= variable.max {
        return Err(ValidationError::InvalidValue {
            field: field("range"),
            value: format!("[{}, {}]", variable.min, variable.max),
            reason: "min must be less than max and both finite".to_string(),
        });
    }

    match &variable.terms {
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
            builder
                .build(variable.min, variable.max)
                .map_err(|e| ValidationError::InvalidValue {
                    field: field("terms"),
                    value: format!("{count} {naming:?}"),
                    reason: e.to_string(),
                })?;
        }
        TermSetDef::Explicit { terms } => {
            if terms.is_empty() {
                return Err(ValidationError::InvalidValue {
                    field: field("terms"),
                    value: "[]".to_string(),
                    reason: "at least one term is required".to_string(),
                });
            }
            let mut term_names = HashSet::new();
            for term in terms {
                if !term_names.insert(term.name.as_str()) {
                    return Err(ValidationError::DuplicateName {
                        name: term.name.clone(),
                        context: field("terms"),
                    });
                }
                term.shape
                    .validate()
                    .map_err(|e| ValidationError::InvalidValue {
                        field: field(&format!("term '{}'", term.name)),
                        value: format!("{:?}", term.shape),
                        reason: e.to_string(),
                    })?;
            }
        }
    }
    Ok(())
}

fn validate_operators(operators: &OperatorsDef) -> Result<(), ValidationError> {
    let invalid = |field: &str, value: &str, e: fc_engine::FuzzyError| ValidationError::InvalidValue {
        field: format!("operators.{field}"),
        value: value.to_string(),
        reason: e.to_string(),
    };

    operators
        .conjunction
        .parse::<TNorm>()
        .map_err(|e| invalid("conjunction", &operators.conjunction, e))?;
    if !operators.disjunction.is_empty() {
        operators
            .disjunction
            .parse::<SNorm>()
            .map_err(|e| invalid("disjunction", &operators.disjunction, e))?;
    }
    operators
        .implication
        .parse::<TNorm>()
        .map_err(|e| invalid("implication", &operators.implication, e))?;
    operators
        .aggregation
        .parse::<SNorm>()
        .map_err(|e| invalid("aggregation", &operators.aggregation, e))?;
    operators
        .defuzzifier
        .parse::<Defuzzifier>()
        .map_err(|e| invalid("defuzzifier", &operators.defuzzifier, e))?;

    if operators.resolution == 0 {
        return Err(ValidationError::InvalidValue {
            field: "operators.resolution".to_string(),
            value: "0".to_string(),
            reason: "must be positive".to_string(),
        });
    }
    Ok(())
}

fn find<'a>(
    variables: &'a [VariableDef],
    name: &str,
    context: &str,
) -> Result<&'a VariableDef, ValidationError> {
    variables
        .iter()
        .find(|v| v.name == name)
        .ok_or_else(|| ValidationError::MissingReference {
            name: name.to_string(),
            context: context.to_string(),
        })
}

fn validate_rules(project: &Project) -> Result<(), ValidationError> {
    let rules = &project.rules;
    let displacement = find(&project.inputs, &rules.displacement, "rules.displacement")?;
    let velocity = find(&project.inputs, &rules.velocity, "rules.velocity")?;
    let steering = find(&project.outputs, &rules.steering, "rules.steering")?;

    if displacement.name == velocity.name {
        return Err(ValidationError::InvalidValue {
            field: "rules.velocity".to_string(),
            value: velocity.name.clone(),
            reason: "must differ from rules.displacement".to_string(),
        });
    }

    RuleMatrix::generate(
        displacement.terms.term_count(),
        velocity.terms.term_count(),
        steering.terms.term_count(),
    )
    .map_err(|e| ValidationError::InvalidValue {
        field: "rules".to_string(),
        value: format!(
            "{} x {} -> {}",
            displacement.terms.term_count(),
            velocity.terms.term_count(),
            steering.terms.term_count()
        ),
        reason: e.to_string(),
    })?;
    Ok(())
}

fn validate_simulation(project: &Project) -> Result<(), ValidationError> {
    let sim = &project.simulation;
    if !(sim.timestep > 0.0 && sim.timestep.is_finite()) {
        return Err(ValidationError::InvalidValue {
            field: "simulation.timestep".to_string(),
            value: sim.timestep.to_string(),
            reason: "must be positive".to_string(),
        });
    }

    for (field, name, value) in [
        (
            "simulation.initial.displacement",
            &project.rules.displacement,
            sim.initial.displacement,
        ),
        (
            "simulation.initial.velocity",
            &project.rules.velocity,
            sim.initial.velocity,
        ),
    ] {
        let variable = find(&project.inputs, name, field)?;
        if !(value >= variable.min && value <= variable.max) {
            return Err(ValidationError::InvalidValue {
                field: field.to_string(),
                value: value.to_string(),
                reason: format!("outside [{}, {}]", variable.min, variable.max),
            });
        }
    }
    Ok(())
}
