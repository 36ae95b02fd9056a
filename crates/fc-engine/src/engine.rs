//! Fuzzy inference engine.
//!
//! The engine owns its variables and rule blocks. Its lifecycle is
//! `Unconfigured -> Ready -> process()*`: variables and rule blocks are
//! registered, operators are set with [`Engine::configure`], and
//! [`Engine::is_ready`] reports anything still missing. `process()` refuses to
//! run until the readiness check passes.

use fc_core::{RuleBlockId, VariableId, ensure_finite};
use tracing::{debug, warn};

use crate::error::{FuzzyError, FuzzyResult};
use crate::norm::{Defuzzifier, SNorm, TNorm};
use crate::rule::Rule;
use crate::rule_block::RuleBlock;
use crate::variable::{Fuzzified, InputVariable, OutputVariable};

/// Outcome of one `process()` call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessReport {
    /// Rules that fired with nonzero strength, over all blocks.
    pub fired: usize,
    /// Outputs whose aggregated set was empty and kept their previous value.
    pub held: Vec<String>,
}

impl ProcessReport {
    pub fn is_complete(&self) -> bool {
        self.held.is_empty()
    }
}

/// Fuzzy inference engine with named input/output variables and rule blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct Engine {
    name: String,
    inputs: Vec<InputVariable>,
    outputs: Vec<OutputVariable>,
    rule_blocks: Vec<RuleBlock>,
}

impl Engine {
    /// Create an empty engine.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            rule_blocks: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn check_unique_variable(&self, name: &str) -> FuzzyResult<()> {
        if self.input_id(name).is_some() || self.output_id(name).is_some() {
            return Err(FuzzyError::DuplicateVariableName {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Register an input variable. Names are unique across inputs and outputs.
    pub fn add_input_variable(&mut self, variable: impl Into<InputVariable>) -> FuzzyResult<VariableId> {
        let variable = variable.into();
        self.check_unique_variable(variable.name())?;
        let id = VariableId::try_from_index(self.inputs.len())?;
        self.inputs.push(variable);
        Ok(id)
    }

    /// Register an output variable. Names are unique across inputs and outputs.
    pub fn add_output_variable(&mut self, variable: impl Into<OutputVariable>) -> FuzzyResult<VariableId> {
        let variable = variable.into();
        self.check_unique_variable(variable.name())?;
        let id = VariableId::try_from_index(self.outputs.len())?;
        self.outputs.push(variable);
        Ok(id)
    }

    /// Register a rule block.
    ///
    /// Every rule is bound again by name against this engine, so a block built
    /// against another engine either resolves here or fails with
    /// [`FuzzyError::UnknownReference`].
    pub fn add_rule_block(&mut self, mut block: RuleBlock) -> FuzzyResult<RuleBlockId> {
        if self.rule_block_id(block.name()).is_some() {
            return Err(FuzzyError::DuplicateRuleBlockName {
                name: block.name().to_string(),
            });
        }
        block.rebind(self)?;
        let id = RuleBlockId::try_from_index(self.rule_blocks.len())?;
        self.rule_blocks.push(block);
        Ok(id)
    }

    /// Parse `text` and append it to a registered rule block.
    pub fn add_rule(&mut self, block: RuleBlockId, text: &str) -> FuzzyResult<()> {
        let rule = Rule::parse(text, self)?;
        let target = self
            .rule_blocks
            .get_mut(block.index())
            .ok_or_else(|| FuzzyError::unknown(format!("rule block #{block}")))?;
        target.add_rule(rule);
        Ok(())
    }

    pub fn input_id(&self, name: &str) -> Option<VariableId> {
        self.inputs
            .iter()
            .position(|v| v.name() == name)
            .and_then(|i| VariableId::try_from_index(i).ok())
    }

    pub fn output_id(&self, name: &str) -> Option<VariableId> {
        self.outputs
            .iter()
            .position(|v| v.name() == name)
            .and_then(|i| VariableId::try_from_index(i).ok())
    }

    pub fn rule_block_id(&self, name: &str) -> Option<RuleBlockId> {
        self.rule_blocks
            .iter()
            .position(|b| b.name() == name)
            .and_then(|i| RuleBlockId::try_from_index(i).ok())
    }

    pub fn input(&self, id: VariableId) -> Option<&InputVariable> {
        self.inputs.get(id.index())
    }

    pub fn output(&self, id: VariableId) -> Option<&OutputVariable> {
        self.outputs.get(id.index())
    }

    pub fn rule_block(&self, id: RuleBlockId) -> Option<&RuleBlock> {
        self.rule_blocks.get(id.index())
    }

    pub fn inputs(&self) -> &[InputVariable] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[OutputVariable] {
        &self.outputs
    }

    pub fn rule_blocks(&self) -> &[RuleBlock] {
        &self.rule_blocks
    }

    /// Set operators on every rule block and output variable by name.
    ///
    /// Accepted names: T-norms `Minimum`, `AlgebraicProduct`; S-norms
    /// `Maximum`, `AlgebraicSum`; defuzzifier `Centroid`. An empty
    /// `disjunction` means none. Nothing changes if any name is unknown.
    pub fn configure(
        &mut self,
        conjunction: &str,
        disjunction: &str,
        implication: &str,
        aggregation: &str,
        defuzzifier: &str,
    ) -> FuzzyResult<()> {
        let conjunction: TNorm = conjunction.parse()?;
        let disjunction: Option<SNorm> = if disjunction.is_empty() {
            None
        } else {
            Some(disjunction.parse()?)
        };
        let implication: TNorm = implication.parse()?;
        let aggregation: SNorm = aggregation.parse()?;
        let defuzzifier: Defuzzifier = defuzzifier.parse()?;

        for block in &mut self.rule_blocks {
            block.set_conjunction(Some(conjunction));
            block.set_disjunction(disjunction);
            block.set_implication(Some(implication));
        }
        for output in &mut self.outputs {
            // Keep a resolution chosen earlier.
            let defuzzifier = match output.defuzzifier() {
                Some(previous) => defuzzifier.with_resolution(previous.resolution()),
                None => defuzzifier,
            };
            output.set_aggregation(Some(aggregation));
            output.set_defuzzifier(Some(defuzzifier));
        }
        Ok(())
    }

    /// Set the integration resolution of every output's defuzzifier.
    pub fn set_resolution(&mut self, resolution: usize) -> FuzzyResult<()> {
        if resolution == 0 {
            return Err(FuzzyError::InvalidArg {
                what: "defuzzifier resolution must be positive",
            });
        }
        for output in &mut self.outputs {
            let defuzzifier = output.defuzzifier().unwrap_or_default();
            output.set_defuzzifier(Some(defuzzifier.with_resolution(resolution)));
        }
        Ok(())
    }

    /// Check whether the engine can run; lists every deficiency otherwise.
    ///
    /// Pure: nothing is corrected or mutated.
    pub fn is_ready(&self) -> Result<(), Vec<String>> {
        let mut found = Vec::new();

        if self.inputs.is_empty() {
            found.push(format!("Engine '{}' has no input variables", self.name));
        }
        for input in &self.inputs {
            if input.variable().terms().is_empty() {
                found.push(format!("Input variable '{}' has no terms", input.name()));
            }
        }

        if self.outputs.is_empty() {
            found.push(format!("Engine '{}' has no output variables", self.name));
        }
        for output in &self.outputs {
            if output.variable().terms().is_empty() {
                found.push(format!("Output variable '{}' has no terms", output.name()));
            }
            if output.aggregation().is_none() {
                found.push(format!(
                    "Output variable '{}' has no aggregation operator",
                    output.name()
                ));
            }
            match output.defuzzifier() {
                None => found.push(format!(
                    "Output variable '{}' has no defuzzifier",
                    output.name()
                )),
                Some(d) if d.resolution() == 0 => found.push(format!(
                    "Output variable '{}' has a defuzzifier with zero resolution",
                    output.name()
                )),
                Some(_) => {}
            }
        }

        if self.rule_blocks.is_empty() {
            found.push(format!("Engine '{}' has no rule blocks", self.name));
        }
        for block in &self.rule_blocks {
            found.extend(block.deficiencies(&self.inputs, &self.outputs));
        }

        if found.is_empty() { Ok(()) } else { Err(found) }
    }

    /// Store a crisp value on the named input. No range check is applied.
    pub fn set_input(&mut self, name: &str, value: f64) -> FuzzyResult<()> {
        let id = self
            .input_id(name)
            .ok_or_else(|| FuzzyError::unknown(format!("input variable '{name}'")))?;
        self.set_input_value(id, value)
    }

    pub fn set_input_value(&mut self, id: VariableId, value: f64) -> FuzzyResult<()> {
        ensure_finite(value, "input value")?;
        let input = self
            .inputs
            .get_mut(id.index())
            .ok_or_else(|| FuzzyError::unknown(format!("input variable #{id}")))?;
        input.set_input_value(value);
        Ok(())
    }

    /// Set the value an output keeps if the next `process()` fires nothing.
    pub fn hold_output(&mut self, id: VariableId, value: f64) -> FuzzyResult<()> {
        self.outputs
            .get_mut(id.index())
            .ok_or_else(|| FuzzyError::unknown(format!("output variable #{id}")))?
            .hold(value)
    }

    /// Crisp value of the named output after the last `process()`.
    pub fn get_output(&self, name: &str) -> FuzzyResult<f64> {
        let id = self
            .output_id(name)
            .ok_or_else(|| FuzzyError::unknown(format!("output variable '{name}'")))?;
        self.output_value(id)
    }

    pub fn output_value(&self, id: VariableId) -> FuzzyResult<f64> {
        self.output(id)
            .map(OutputVariable::value)
            .ok_or_else(|| FuzzyError::unknown(format!("output variable #{id}")))
    }

    /// Membership degrees of the named input's current value.
    pub fn fuzzify(&self, name: &str) -> FuzzyResult<Fuzzified> {
        let id = self
            .input_id(name)
            .ok_or_else(|| FuzzyError::unknown(format!("input variable '{name}'")))?;
        self.input(id)
            .map(InputVariable::fuzzify)
            .ok_or_else(|| FuzzyError::unknown(format!("input variable #{id}")))
    }

    /// Fuzzify, fire every rule, aggregate and defuzzify.
    ///
    /// Working sets are cleared first, so repeated calls with unchanged inputs
    /// give identical outputs. An output whose aggregated set is empty keeps
    /// its previous value and is listed in [`ProcessReport::held`].
    pub fn process(&mut self) -> FuzzyResult<ProcessReport> {
        self.is_ready()
            .map_err(|deficiencies| FuzzyError::NotReady { deficiencies })?;

        for output in &mut self.outputs {
            output.begin_aggregation();
        }

        let mut report = ProcessReport::default();
        for block in &self.rule_blocks {
            report.fired += block.activate(&self.inputs, &mut self.outputs);
        }

        for output in &mut self.outputs {
            if !output.defuzzify() {
                warn!(
                    engine = %self.name,
                    output = output.name(),
                    held = output.value(),
                    "no rule fired; holding previous output"
                );
                report.held.push(output.name().to_string());
            }
        }

        debug!(
            engine = %self.name,
            fired = report.fired,
            held = report.held.len(),
            "processed"
        );
        Ok(report)
    }

    /// Reset every output to its default value and clear working sets.
    pub fn restart(&mut self) {
        for output in &mut self.outputs {
            output.clear();
        }
    }
}
