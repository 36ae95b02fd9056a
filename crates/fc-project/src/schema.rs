//! Project schema definitions.

use fc_engine::{DEFAULT_RESOLUTION, MembershipFunction, TermNaming};
use serde::{Deserialize, Serialize};

/// Newest schema version this crate reads and writes.
pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<VariableDef>,
    #[serde(default)]
    pub outputs: Vec<VariableDef>,
    #[serde(default)]
    pub operators: OperatorsDef,
    pub rules: RulesDef,
    #[serde(default)]
    pub simulation: SimulationDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VariableDef {
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub terms: TermSetDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum TermSetDef {
    /// Symmetric family produced by the term-set builder.
    Generated {
        count: usize,
        naming: TermNaming,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        centre_name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        half_width: Option<f64>,
    },
    /// Hand-authored terms, kept in the order given.
    Explicit { terms: Vec<TermDef> },
}

impl TermSetDef {
    pub fn term_count(&self) -> usize {
        match self {
            TermSetDef::Generated { count, .. } => *count,
            TermSetDef::Explicit { terms } => terms.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TermDef {
    pub name: String,
    pub shape: MembershipFunction,
}

/// Operator names as accepted by `Engine::configure`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OperatorsDef {
    #[serde(default = "default_conjunction")]
    pub conjunction: String,
    /// Empty means no disjunction operator.
    #[serde(default)]
    pub disjunction: String,
    #[serde(default = "default_implication")]
    pub implication: String,
    #[serde(default = "default_aggregation")]
    pub aggregation: String,
    #[serde(default = "default_defuzzifier")]
    pub defuzzifier: String,
    #[serde(default = "default_resolution")]
    pub resolution: usize,
}

impl Default for OperatorsDef {
    fn default() -> Self {
        Self {
            conjunction: default_conjunction(),
            disjunction: String::new(),
            implication: default_implication(),
            aggregation: default_aggregation(),
            defuzzifier: default_defuzzifier(),
            resolution: default_resolution(),
        }
    }
}

fn default_conjunction() -> String {
    "Minimum".to_string()
}

fn default_implication() -> String {
    "Minimum".to_string()
}

fn default_aggregation() -> String {
    "Maximum".to_string()
}

fn default_defuzzifier() -> String {
    "Centroid".to_string()
}

fn default_resolution() -> usize {
    DEFAULT_RESOLUTION
}

/// Variables the generated rule matrix binds: two inputs and one output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RulesDef {
    pub displacement: String,
    pub velocity: String,
    pub steering: String,
}

impl Default for RulesDef {
    fn default() -> Self {
        Self {
            displacement: "Displacement".to_string(),
            velocity: "Velocity".to_string(),
            steering: "Steering".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ModeDef {
    Continuous,
    #[default]
    Discrete,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IntegratorDef {
    #[default]
    ForwardEuler,
    SemiImplicitEuler,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct InitialDef {
    #[serde(default)]
    pub displacement: f64,
    #[serde(default)]
    pub velocity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationDef {
    #[serde(default)]
    pub mode: ModeDef,
    #[serde(default = "default_timestep")]
    pub timestep: f64,
    #[serde(default)]
    pub integrator: IntegratorDef,
    #[serde(default)]
    pub initial: InitialDef,
}

impl Default for SimulationDef {
    fn default() -> Self {
        Self {
            mode: ModeDef::default(),
            timestep: default_timestep(),
            integrator: IntegratorDef::default(),
            initial: InitialDef::default(),
        }
    }
}

fn default_timestep() -> f64 {
    fc_sim::DEFAULT_TIMESTEP
}

impl Project {
    /// Lane-keeping controller: five terms on each variable over `[-1, 1]`
    /// and the generated 5x5 rule matrix.
    pub fn steering_default() -> Self {
        let variable = |name: &str| VariableDef {
            name: name.to_string(),
            min: -1.0,
            max: 1.0,
            terms: TermSetDef::Generated {
                count: 5,
                naming: TermNaming::Simplified,
                centre_name: None,
                half_width: None,
            },
        };
        let rules = RulesDef::default();
        Self {
            version: LATEST_VERSION,
            name: "Fuzzy lane keeping".to_string(),
            inputs: vec![variable(&rules.displacement), variable(&rules.velocity)],
            outputs: vec![variable(&rules.steering)],
            operators: OperatorsDef::default(),
            rules,
            simulation: SimulationDef::default(),
        }
    }

    /// Input or output definition with the given name.
    pub fn variable(&self, name: &str) -> Option<&VariableDef> {
        self.inputs
            .iter()
            .chain(&self.outputs)
            .find(|v| v.name == name)
    }
}
