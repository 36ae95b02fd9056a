//! Rule parsing and evaluation.
//!
//! Grammar (keywords are lowercase, tokens are whitespace separated):
//!
//! ```text
//! if <Var> is <Term> [and <Var> is <Term>]* then <Var> is <Term>
//! ```
//!
//! Rules are bound eagerly: every variable and term is resolved against the
//! engine when the rule is parsed, so the variables must be registered
//! (with their terms) before any rule that mentions them.

use std::fmt;

use fc_core::{TermId, VariableId};

use crate::engine::Engine;
use crate::error::{FuzzyError, FuzzyResult};
use crate::norm::TNorm;
use crate::variable::{InputVariable, OutputVariable};

const KEYWORDS: [&str; 6] = ["if", "is", "and", "or", "then", "not"];

/// One `<Var> is <Term>` proposition, resolved to handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clause {
    pub variable: VariableId,
    pub term: TermId,
}

/// Conjunctive rule over input variables with one output consequent.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    antecedent: Vec<Clause>,
    consequent: Clause,
    text: String,
}

struct Tokens<'a> {
    text: &'a str,
    iter: std::str::SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn error(&self, reason: impl Into<String>) -> FuzzyError {
        FuzzyError::ParseError {
            text: self.text.to_string(),
            reason: reason.into(),
        }
    }

    fn next(&mut self, expected: &str) -> FuzzyResult<&'a str> {
        self.iter
            .next()
            .ok_or_else(|| self.error(format!("expected {expected}, found end of rule")))
    }

    fn keyword(&mut self, keyword: &str) -> FuzzyResult<()> {
        let token = self.next(&format!("'{keyword}'"))?;
        if token == keyword {
            Ok(())
        } else {
            Err(self.error(format!("expected '{keyword}', found '{token}'")))
        }
    }

    fn identifier(&mut self, what: &str) -> FuzzyResult<&'a str> {
        let token = self.next(what)?;
        if token == "not" {
            return Err(self.error("negation is not supported"));
        }
        if KEYWORDS.contains(&token) {
            return Err(self.error(format!("expected {what}, found keyword '{token}'")));
        }
        Ok(token)
    }

    fn proposition(&mut self) -> FuzzyResult<(&'a str, &'a str)> {
        let variable = self.identifier("variable name")?;
        self.keyword("is")?;
        let term = self.identifier("term name")?;
        Ok((variable, term))
    }
}

impl Rule {
    /// Parse `text` and resolve it against the variables registered on `engine`.
    ///
    /// Fails with [`FuzzyError::ParseError`] on malformed text and with
    /// [`FuzzyError::UnknownReference`] when a variable or term is missing.
    pub fn parse(text: &str, engine: &Engine) -> FuzzyResult<Self> {
        let mut tokens = Tokens {
            text,
            iter: text.split_whitespace(),
        };

        tokens.keyword("if")?;
        let mut premises = Vec::new();
        loop {
            premises.push(tokens.proposition()?);
            match tokens.next("'and' or 'then'")? {
                "and" => continue,
                "then" => break,
                "or" => return Err(tokens.error("disjunction is not supported")),
                other => {
                    return Err(tokens.error(format!("expected 'and' or 'then', found '{other}'")));
                }
            }
        }
        let (out_var, out_term) = tokens.proposition()?;
        if let Some(extra) = tokens.iter.next() {
            return Err(tokens.error(format!("unexpected '{extra}' after consequent")));
        }

        let antecedent = premises
            .iter()
            .map(|&(var, term)| resolve_input(engine, var, term))
            .collect::<FuzzyResult<Vec<_>>>()?;
        let consequent = resolve_output(engine, out_var, out_term)?;

        Ok(Self {
            antecedent,
            consequent,
            text: text.split_whitespace().collect::<Vec<_>>().join(" "),
        })
    }

    pub fn antecedent(&self) -> &[Clause] {
        &self.antecedent
    }

    pub fn consequent(&self) -> Clause {
        self.consequent
    }

    /// Normalised rule text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Firing strength: `conjunction` over every antecedent degree.
    pub fn activation_degree(&self, inputs: &[InputVariable], conjunction: TNorm) -> f64 {
        self.antecedent.iter().fold(1.0, |acc, clause| {
            let degree = inputs
                .get(clause.variable.index())
                .map_or(0.0, |input| input.degree(clause.term));
            conjunction.compute(acc, degree)
        })
    }

    /// Describe every handle that does not resolve in the given arenas.
    pub(crate) fn deficiencies(
        &self,
        inputs: &[InputVariable],
        outputs: &[OutputVariable],
    ) -> Vec<String> {
        let mut found = Vec::new();
        for clause in &self.antecedent {
            match inputs.get(clause.variable.index()) {
                None => found.push(format!(
                    "Rule '{}' references missing input variable #{}",
                    self.text, clause.variable
                )),
                Some(input) if input.variable().term(clause.term).is_none() => {
                    found.push(format!(
                        "Rule '{}' references missing term #{} of input '{}'",
                        self.text,
                        clause.term,
                        input.name()
                    ))
                }
                Some(_) => {}
            }
        }
        match outputs.get(self.consequent.variable.index()) {
            None => found.push(format!(
                "Rule '{}' references missing output variable #{}",
                self.text, self.consequent.variable
            )),
            Some(output) if output.variable().term(self.consequent.term).is_none() => {
                found.push(format!(
                    "Rule '{}' references missing term #{} of output '{}'",
                    self.text,
                    self.consequent.term,
                    output.name()
                ))
            }
            Some(_) => {}
        }
        found
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn resolve_input(engine: &Engine, var: &str, term: &str) -> FuzzyResult<Clause> {
    let variable = engine
        .input_id(var)
        .ok_or_else(|| FuzzyError::unknown(format!("input variable '{var}'")))?;
    let term = engine
        .input(variable)
        .and_then(|input| input.variable().term_id(term))
        .ok_or_else(|| FuzzyError::unknown(format!("term '{term}' of input variable '{var}'")))?;
    Ok(Clause { variable, term })
}

fn resolve_output(engine: &Engine, var: &str, term: &str) -> FuzzyResult<Clause> {
    let variable = engine
        .output_id(var)
        .ok_or_else(|| FuzzyError::unknown(format!("output variable '{var}'")))?;
    let term = engine
        .output(variable)
        .and_then(|output| output.variable().term_id(term))
        .ok_or_else(|| FuzzyError::unknown(format!("term '{term}' of output variable '{var}'")))?;
    Ok(Clause { variable, term })
}
