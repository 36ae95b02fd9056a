//! Rule blocks: ordered rules sharing one set of operators.

use crate::error::FuzzyResult;
use crate::norm::{SNorm, TNorm};
use crate::rule::Rule;
use crate::variable::{InputVariable, OutputVariable};

/// Ordered collection of rules with their conjunction/implication operators.
///
/// Rule order does not affect the aggregated result; it is kept for
/// diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleBlock {
    name: String,
    rules: Vec<Rule>,
    conjunction: Option<TNorm>,
    disjunction: Option<SNorm>,
    implication: Option<TNorm>,
}

impl RuleBlock {
    /// Create an empty, unconfigured rule block.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
            conjunction: None,
            disjunction: None,
            implication: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_rule(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Append every rule from `rules`.
    pub fn extend_rules(&mut self, rules: impl IntoIterator<Item = Rule>) {
        self.rules.extend(rules);
    }

    /// Parse `text` against `engine` and append it.
    pub fn add_rule_text(&mut self, text: &str, engine: &crate::Engine) -> FuzzyResult<()> {
        self.rules.push(Rule::parse(text, engine)?);
        Ok(())
    }

    /// Re-resolve every rule's names against `engine`.
    ///
    /// Leaves the block unchanged if any rule fails to resolve.
    pub(crate) fn rebind(&mut self, engine: &crate::Engine) -> FuzzyResult<()> {
        let rules = self
            .rules
            .iter()
            .map(|rule| Rule::parse(rule.text(), engine))
            .collect::<FuzzyResult<Vec<_>>>()?;
        self.rules = rules;
        Ok(())
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn conjunction(&self) -> Option<TNorm> {
        self.conjunction
    }

    pub fn set_conjunction(&mut self, conjunction: Option<TNorm>) {
        self.conjunction = conjunction;
    }

    /// Stored for completeness; the rule grammar has no disjunction.
    pub fn disjunction(&self) -> Option<SNorm> {
        self.disjunction
    }

    pub fn set_disjunction(&mut self, disjunction: Option<SNorm>) {
        self.disjunction = disjunction;
    }

    pub fn implication(&self) -> Option<TNorm> {
        self.implication
    }

    pub fn set_implication(&mut self, implication: Option<TNorm>) {
        self.implication = implication;
    }

    /// Readiness problems of this block, empty when it can be evaluated.
    pub(crate) fn deficiencies(
        &self,
        inputs: &[InputVariable],
        outputs: &[OutputVariable],
    ) -> Vec<String> {
        let mut found = Vec::new();
        if self.rules.is_empty() {
            found.push(format!("Rule block '{}' has no rules", self.name));
        }
        if self.conjunction.is_none() {
            found.push(format!(
                "Rule block '{}' has no conjunction operator",
                self.name
            ));
        }
        if self.implication.is_none() {
            found.push(format!(
                "Rule block '{}' has no implication operator",
                self.name
            ));
        }
        for rule in &self.rules {
            found.extend(rule.deficiencies(inputs, outputs));
        }
        found
    }

    /// Fire every rule and fold its clipped consequent into the outputs.
    ///
    /// Returns the number of rules that fired with nonzero strength.
    pub(crate) fn activate(&self, inputs: &[InputVariable], outputs: &mut [OutputVariable]) -> usize {
        let conjunction = self.conjunction.unwrap_or(TNorm::Minimum);
        let implication = self.implication.unwrap_or(TNorm::Minimum);
        let mut fired = 0;
        for rule in &self.rules {
            let strength = rule.activation_degree(inputs, conjunction);
            if strength <= 0.0 {
                continue;
            }
            let consequent = rule.consequent();
            if let Some(output) = outputs.get_mut(consequent.variable.index()) {
                output.accumulate(consequent.term, strength, implication);
                fired += 1;
            }
        }
        fired
    }
}
