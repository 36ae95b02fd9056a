//! Linguistic variables.
//!
//! A [`Variable`] is a named, ranged, ordered collection of terms. Inputs wrap
//! it with the last crisp value assigned; outputs additionally carry the
//! working fuzzy set that one `process()` call aggregates and defuzzifies.

use std::fmt;

use fc_core::{TermId, ensure_finite};

use crate::error::{FuzzyError, FuzzyResult};
use crate::membership::MembershipFunction;
use crate::norm::{Defuzzifier, SNorm, TNorm};
use crate::term::Term;

/// Named range with an ordered list of terms.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: String,
    min: f64,
    max: f64,
    terms: Vec<Term>,
}

impl Variable {
    /// Create an empty variable over `[min, max]`.
    pub fn new(name: impl Into<String>, min: f64, max: f64) -> FuzzyResult<Self> {
        ensure_finite(min, "variable minimum")?;
        ensure_finite(max, "variable maximum")?;
        if min >= max {
            return Err(FuzzyError::InvalidArg {
                what: "variable minimum must be less than maximum",
            });
        }
        Ok(Self {
            name: name.into(),
            min,
            max,
            terms: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Whether `x` lies within `[min, max]`.
    pub fn contains(&self, x: f64) -> bool {
        x >= self.min && x <= self.max
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Append a term; names must be unique within the variable.
    pub fn add_term(&mut self, name: impl Into<String>, mf: MembershipFunction) -> FuzzyResult<TermId> {
        let name = name.into();
        if self.terms.iter().any(|t| t.name == name) {
            return Err(FuzzyError::DuplicateTermName {
                variable: self.name.clone(),
                term: name,
            });
        }
        mf.validate()?;
        let id = TermId::try_from_index(self.terms.len())?;
        self.terms.push(Term::new(name, mf));
        Ok(id)
    }

    /// Look up a term handle by name.
    pub fn term_id(&self, name: &str) -> Option<TermId> {
        self.terms
            .iter()
            .position(|t| t.name == name)
            .and_then(|i| TermId::try_from_index(i).ok())
    }

    pub fn term(&self, id: TermId) -> Option<&Term> {
        self.terms.get(id.index())
    }

    /// Degree of every term for the crisp value `x`.
    pub fn fuzzify(&self, x: f64) -> Fuzzified {
        Fuzzified(
            self.terms
                .iter()
                .map(|t| (t.name.clone(), t.degree(x)))
                .collect(),
        )
    }
}

/// Per-term membership degrees of one crisp value.
#[derive(Debug, Clone, PartialEq)]
pub struct Fuzzified(pub Vec<(String, f64)>);

impl Fuzzified {
    /// Term with the highest degree, first one on ties.
    pub fn highest(&self) -> Option<(&str, f64)> {
        self.0
            .iter()
            .fold(None, |best: Option<(&str, f64)>, (name, d)| match best {
                Some((_, bd)) if bd >= *d => best,
                _ => Some((name.as_str(), *d)),
            })
    }
}

impl fmt::Display for Fuzzified {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, degree)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" + ")?;
            }
            write!(f, "{degree:.3}/{name}")?;
        }
        Ok(())
    }
}

/// Variable fed with a crisp value by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct InputVariable {
    variable: Variable,
    value: f64,
}

impl InputVariable {
    pub fn new(variable: Variable) -> Self {
        Self {
            variable,
            value: 0.0,
        }
    }

    pub fn variable(&self) -> &Variable {
        &self.variable
    }

    pub fn name(&self) -> &str {
        self.variable.name()
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Store a crisp value. Out-of-range values are accepted as-is.
    pub fn set_input_value(&mut self, value: f64) {
        self.value = value;
    }

    /// Degree of the given term at the current value.
    pub fn degree(&self, term: TermId) -> f64 {
        self.variable
            .term(term)
            .map_or(0.0, |t| t.degree(self.value))
    }

    pub fn fuzzify(&self) -> Fuzzified {
        self.variable.fuzzify(self.value)
    }
}

impl From<Variable> for InputVariable {
    fn from(variable: Variable) -> Self {
        Self::new(variable)
    }
}

/// One rule's clipped consequent held in an output's working set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Activation {
    pub term: TermId,
    pub degree: f64,
    pub implication: TNorm,
}

/// Variable whose crisp value is produced by defuzzification.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputVariable {
    variable: Variable,
    value: f64,
    default_value: f64,
    aggregation: Option<SNorm>,
    defuzzifier: Option<Defuzzifier>,
    activations: Vec<Activation>,
}

impl OutputVariable {
    pub fn new(variable: Variable) -> Self {
        Self {
            variable,
            value: 0.0,
            default_value: 0.0,
            aggregation: None,
            defuzzifier: None,
            activations: Vec::new(),
        }
    }

    /// Value reported until the first successful defuzzification.
    pub fn with_default_value(mut self, value: f64) -> Self {
        self.default_value = value;
        self.value = value;
        self
    }

    pub fn variable(&self) -> &Variable {
        &self.variable
    }

    pub fn name(&self) -> &str {
        self.variable.name()
    }

    /// Last crisp value produced (or held) by `defuzzify`.
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn default_value(&self) -> f64 {
        self.default_value
    }

    pub fn aggregation(&self) -> Option<SNorm> {
        self.aggregation
    }

    pub fn set_aggregation(&mut self, aggregation: Option<SNorm>) {
        self.aggregation = aggregation;
    }

    pub fn defuzzifier(&self) -> Option<Defuzzifier> {
        self.defuzzifier
    }

    pub fn set_defuzzifier(&mut self, defuzzifier: Option<Defuzzifier>) {
        self.defuzzifier = defuzzifier;
    }

    /// Clear the working set before a new inference pass.
    pub fn begin_aggregation(&mut self) {
        self.activations.clear();
    }

    /// Fold a term clipped at `degree` into the working set.
    pub fn accumulate(&mut self, term: TermId, degree: f64, implication: TNorm) {
        if degree > 0.0 {
            self.activations.push(Activation {
                term,
                degree,
                implication,
            });
        }
    }

    pub fn activations(&self) -> &[Activation] {
        &self.activations
    }

    /// Degree of the aggregated working set at `x`.
    pub fn membership(&self, x: f64) -> f64 {
        let aggregation = self.aggregation.unwrap_or(SNorm::Maximum);
        self.activations.iter().fold(0.0, |acc, a| {
            let mu = self
                .variable
                .term(a.term)
                .map_or(0.0, |t| a.implication.compute(a.degree, t.degree(x)));
            aggregation.compute(acc, mu)
        })
    }

    /// Defuzzify the working set into the crisp value.
    ///
    /// Returns `false` when the set is empty everywhere; the previous value is
    /// then kept unchanged.
    pub fn defuzzify(&mut self) -> bool {
        let defuzzifier = self.defuzzifier.unwrap_or_default();
        let crisp = defuzzifier.defuzzify(self.variable.min(), self.variable.max(), |x| {
            self.membership(x)
        });
        match crisp {
            Some(v) => {
                self.value = v;
                true
            }
            None => false,
        }
    }

    /// Replace the value kept when the next defuzzification finds nothing.
    pub fn hold(&mut self, value: f64) -> FuzzyResult<()> {
        self.value = ensure_finite(value, "held output value")?;
        Ok(())
    }

    /// Restore the default value and drop the working set.
    pub fn clear(&mut self) {
        self.activations.clear();
        self.value = self.default_value;
    }
}

impl From<Variable> for OutputVariable {
    fn from(variable: Variable) -> Self {
        Self::new(variable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steering() -> OutputVariable {
        let mut var = Variable::new("Steering", -1.0, 1.0).unwrap();
        var.add_term("Left", MembershipFunction::triangle(-1.0, -0.5, 0.0).unwrap())
            .unwrap();
        var.add_term("Right", MembershipFunction::triangle(0.0, 0.5, 1.0).unwrap())
            .unwrap();
        OutputVariable::new(var)
    }

    #[test]
    fn duplicate_term_names_are_rejected() {
        let mut var = Variable::new("Displacement", -1.0, 1.0).unwrap();
        var.add_term("Centre", MembershipFunction::triangle(-0.5, 0.0, 0.5).unwrap())
            .unwrap();
        let err = var
            .add_term("Centre", MembershipFunction::triangle(-0.2, 0.0, 0.2).unwrap())
            .unwrap_err();
        assert!(matches!(err, FuzzyError::DuplicateTermName { .. }));
        assert_eq!(var.terms().len(), 1);
    }

    #[test]
    fn invalid_range_is_rejected() {
        assert!(Variable::new("x", 1.0, 1.0).is_err());
        assert!(Variable::new("x", 2.0, 1.0).is_err());
    }

    #[test]
    fn input_value_is_not_range_checked() {
        let mut input = InputVariable::new(Variable::new("Velocity", -1.0, 1.0).unwrap());
        input.set_input_value(4.0);
        assert_eq!(input.value(), 4.0);
    }

    #[test]
    fn fuzzify_lists_every_term() {
        let out = steering();
        let f = out.variable().fuzzify(-0.25);
        assert_eq!(f.0.len(), 2);
        assert_eq!(f.highest(), Some(("Left", 0.5)));
        assert_eq!(f.to_string(), "0.500/Left + 0.000/Right");
    }

    #[test]
    fn accumulate_clips_and_aggregates() {
        let mut out = steering();
        let left = out.variable().term_id("Left").unwrap();
        let right = out.variable().term_id("Right").unwrap();
        out.accumulate(left, 0.4, TNorm::Minimum);
        out.accumulate(right, 0.8, TNorm::Minimum);
        assert!((out.membership(-0.5) - 0.4).abs() < 1e-12);
        assert!((out.membership(0.5) - 0.8).abs() < 1e-12);
        assert!(out.defuzzify());
        assert!(out.value() > 0.0);

        out.begin_aggregation();
        assert!(out.activations().is_empty());
        assert_eq!(out.membership(0.5), 0.0);
    }

    #[test]
    fn empty_set_holds_previous_value() {
        let mut out = steering().with_default_value(0.25);
        out.begin_aggregation();
        assert!(!out.defuzzify());
        assert_eq!(out.value(), 0.25);
    }

    #[test]
    fn hold_replaces_the_kept_value() {
        let mut out = steering();
        out.hold(-0.75).unwrap();
        out.begin_aggregation();
        assert!(!out.defuzzify());
        assert_eq!(out.value(), -0.75);
        assert!(out.hold(f64::INFINITY).is_err());
        assert_eq!(out.value(), -0.75);

        out.clear();
        assert_eq!(out.value(), 0.0);
    }
}
