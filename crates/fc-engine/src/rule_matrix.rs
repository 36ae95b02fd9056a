//! Fuzzy associative map (FAM) generation.
//!
//! Builds the rule grid for two inputs with `n` terms each (rows: first input,
//! columns: second input, both ordered leftmost first) and one output with an
//! odd number `m` of terms.
//!
//! For the cell `(i, j)` the diagonal offset is `d = (n - 1) - i - j`:
//! - the trailing diagonal (`i + j = n - 1`, `d = 0`) maps to the centre output
//! - the top-left corner (`d = n - 1`) maps to the rightmost output term
//! - the bottom-right corner (`d = -(n - 1)`) maps to the leftmost output term
//!
//! In between, steering changes by one output level per diagonal step,
//! clamped at the extremes. When the output has more levels per side than
//! there are diagonal steps, the step is stretched to `c / (n - 1)` levels
//! (rounded) so the corners still reach the extremes.

use std::fmt;

use crate::engine::Engine;
use crate::error::{FuzzyError, FuzzyResult};
use crate::rule::Rule;
use crate::rule_block::RuleBlock;

/// Output term index for every `(first, second)` input term pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatrix {
    size: usize,
    output_terms: usize,
    cells: Vec<usize>,
}

impl RuleMatrix {
    /// Generate the map for `first_terms x second_terms` inputs and
    /// `output_terms` outputs.
    ///
    /// Both inputs must have the same term count (at least 2) and the output
    /// count must be odd and at least 3 so a centre term exists.
    pub fn generate(first_terms: usize, second_terms: usize, output_terms: usize) -> FuzzyResult<Self> {
        if first_terms != second_terms {
            return Err(FuzzyError::InvalidRuleMatrix {
                what: format!(
                    "input term counts differ ({first_terms} vs {second_terms}); the map must be square"
                ),
            });
        }
        if first_terms < 2 {
            return Err(FuzzyError::InvalidRuleMatrix {
                what: format!("inputs need at least 2 terms, got {first_terms}"),
            });
        }
        if output_terms < 3 || output_terms % 2 == 0 {
            return Err(FuzzyError::InvalidRuleMatrix {
                what: format!("output needs an odd term count of at least 3, got {output_terms}"),
            });
        }

        let n = first_terms;
        let centre = (output_terms - 1) / 2;
        let steps = (n - 1) as f64;
        let level_per_step = (centre as f64 / steps).max(1.0);
        let limit = centre as i64;

        let mut cells = Vec::with_capacity(n * n);
        for i in 0..n {
            for j in 0..n {
                let offset = (n - 1) as i64 - i as i64 - j as i64;
                let level = ((offset as f64 * level_per_step).round() as i64).clamp(-limit, limit);
                cells.push((limit + level) as usize);
            }
        }

        Ok(Self {
            size: n,
            output_terms,
            cells,
        })
    }

    /// Term count of each input.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn output_terms(&self) -> usize {
        self.output_terms
    }

    /// Output term index for `(row, col)`.
    pub fn cell(&self, row: usize, col: usize) -> Option<usize> {
        if row < self.size && col < self.size {
            self.cells.get(row * self.size + col).copied()
        } else {
            None
        }
    }

    /// Rule texts using the term names registered on `engine`.
    pub fn rule_texts(
        &self,
        engine: &Engine,
        first: &str,
        second: &str,
        output: &str,
    ) -> FuzzyResult<Vec<String>> {
        let first_terms = input_term_names(engine, first)?;
        let second_terms = input_term_names(engine, second)?;
        let output_terms = output_term_names(engine, output)?;

        if first_terms.len() != self.size || second_terms.len() != self.size {
            return Err(FuzzyError::InvalidRuleMatrix {
                what: format!(
                    "map is {n}x{n} but '{first}' has {} terms and '{second}' has {}",
                    first_terms.len(),
                    second_terms.len(),
                    n = self.size
                ),
            });
        }
        if output_terms.len() != self.output_terms {
            return Err(FuzzyError::InvalidRuleMatrix {
                what: format!(
                    "map targets {} output terms but '{output}' has {}",
                    self.output_terms,
                    output_terms.len()
                ),
            });
        }

        let mut texts = Vec::with_capacity(self.cells.len());
        for (i, first_term) in first_terms.iter().enumerate() {
            for (j, second_term) in second_terms.iter().enumerate() {
                let k = self.cells[i * self.size + j];
                texts.push(format!(
                    "if {first} is {first_term} and {second} is {second_term} then {output} is {}",
                    output_terms[k]
                ));
            }
        }
        Ok(texts)
    }

    /// Parse every generated rule against `engine`.
    pub fn to_rules(
        &self,
        engine: &Engine,
        first: &str,
        second: &str,
        output: &str,
    ) -> FuzzyResult<Vec<Rule>> {
        self.rule_texts(engine, first, second, output)?
            .iter()
            .map(|text| Rule::parse(text, engine))
            .collect()
    }

    /// Build an unconfigured rule block holding the whole map.
    pub fn rule_block(
        &self,
        name: impl Into<String>,
        engine: &Engine,
        first: &str,
        second: &str,
        output: &str,
    ) -> FuzzyResult<RuleBlock> {
        let mut block = RuleBlock::new(name);
        block.extend_rules(self.to_rules(engine, first, second, output)?);
        Ok(block)
    }
}

impl fmt::Display for RuleMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.size.max(1)) {
            let line: Vec<String> = row.iter().map(|k| format!("{k:>2}")).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

fn input_term_names(engine: &Engine, name: &str) -> FuzzyResult<Vec<String>> {
    engine
        .input_id(name)
        .and_then(|id| engine.input(id))
        .map(|v| v.variable().terms().iter().map(|t| t.name.clone()).collect())
        .ok_or_else(|| FuzzyError::unknown(format!("input variable '{name}'")))
}

fn output_term_names(engine: &Engine, name: &str) -> FuzzyResult<Vec<String>> {
    engine
        .output_id(name)
        .and_then(|id| engine.output(id))
        .map(|v| v.variable().terms().iter().map(|t| t.name.clone()).collect())
        .ok_or_else(|| FuzzyError::unknown(format!("output variable '{name}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_by_five_matches_hand_written_table() {
        let m = RuleMatrix::generate(5, 5, 5).unwrap();
        let expected = [
            [4, 4, 4, 3, 2],
            [4, 4, 3, 2, 1],
            [4, 3, 2, 1, 0],
            [3, 2, 1, 0, 0],
            [2, 1, 0, 0, 0],
        ];
        for (i, row) in expected.iter().enumerate() {
            for (j, &k) in row.iter().enumerate() {
                assert_eq!(m.cell(i, j), Some(k), "cell ({i}, {j})");
            }
        }
        assert_eq!(m.cell(5, 0), None);
    }

    #[test]
    fn corners_and_trailing_diagonal() {
        for (n, out) in [(2, 3), (3, 3), (3, 7), (4, 5), (5, 9), (7, 5), (9, 3)] {
            let m = RuleMatrix::generate(n, n, out).unwrap();
            let centre = (out - 1) / 2;
            assert_eq!(m.cell(0, 0), Some(out - 1), "top-left of {n}x{n}->{out}");
            assert_eq!(m.cell(n - 1, n - 1), Some(0), "bottom-right of {n}x{n}->{out}");
            for i in 0..n {
                assert_eq!(m.cell(i, n - 1 - i), Some(centre));
            }
        }
    }

    #[test]
    fn steering_weakens_away_from_corners() {
        let m = RuleMatrix::generate(5, 5, 9).unwrap();
        for i in 0..5 {
            for j in 1..5 {
                assert!(m.cell(i, j) <= m.cell(i, j - 1));
            }
        }
    }

    #[test]
    fn invalid_shapes_are_rejected() {
        assert!(matches!(
            RuleMatrix::generate(5, 3, 5),
            Err(FuzzyError::InvalidRuleMatrix { .. })
        ));
        assert!(RuleMatrix::generate(1, 1, 3).is_err());
        assert!(RuleMatrix::generate(5, 5, 4).is_err());
        assert!(RuleMatrix::generate(5, 5, 1).is_err());
    }

    #[test]
    fn display_prints_rows() {
        let m = RuleMatrix::generate(2, 2, 3).unwrap();
        assert_eq!(m.to_string(), " 2  1\n 1  0\n");
    }
}
