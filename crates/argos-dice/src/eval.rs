// ABOUTME: Whole-expression evaluation: dice reduction followed by arithmetic.
// ABOUTME: Enforces the dice budget and collects the per-term roll log.

use crate::arith;
use crate::ast::{DiceSpec, DiceTerm, Keep, KeepMarker, Sides, Token};
use crate::error::{Error, Result};
use crate::format::group_thousands;
use crate::lexer;
use crate::roller::{roll_term, DieResult, Rng};
use std::fmt;
use tracing::debug;

/// Maximum number of dice one expression may roll, across all of its terms.
pub const DEFAULT_DICE_LIMIT: u32 = 1_000_000;

/// Terms with more dice than this show only their total.
pub const DEFAULT_BREAKDOWN_LIMIT: usize = 20;

/// Resource and output limits for an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Total dice budget for one expression.
    pub dice: u32,
    /// Largest roll whose dice are listed individually.
    pub breakdown: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            dice: DEFAULT_DICE_LIMIT,
            breakdown: DEFAULT_BREAKDOWN_LIMIT,
        }
    }
}

/// One rolled dice term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermRoll {
    /// The term as written in the normalized input, e.g. `4d6H3`.
    pub term: String,
    /// Individual dice in roll order; empty for zero dice or one-sided dice.
    pub dice: Vec<DieResult>,
    pub total: i64,
    /// Formatted breakdown shown after the term.
    pub breakdown: String,
}

/// A successfully evaluated expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// The normalized input.
    pub input: String,
    /// Dice terms in the order they were rolled.
    pub rolls: Vec<TermRoll>,
    pub total: i64,
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for roll in &self.rolls {
            writeln!(f, "`{}`: {}", roll.term, roll.breakdown)?;
        }
        write!(f, "Result: **{}**", group_thousands(self.total))
    }
}

/// Evaluate an already normalized expression.
pub fn evaluate_canonical(
    canonical: &str,
    limits: &Limits,
    rng: &mut impl Rng,
) -> Result<Evaluation> {
    let mut evaluator = Evaluator {
        rng,
        limits,
        rolled: 0,
    };
    evaluator.evaluate(canonical)
}

struct Evaluator<'a, R: Rng> {
    rng: &'a mut R,
    limits: &'a Limits,
    /// Dice committed so far; never exceeds `limits.dice`.
    rolled: u32,
}

impl<R: Rng> Evaluator<'_, R> {
    fn evaluate(&mut self, canonical: &str) -> Result<Evaluation> {
        let mut tokens = lexer::tokenize(canonical)?;

        // Resolve every term before rolling any, so a bad or oversized
        // expression fails without drawing a single die.
        let mut terms = Vec::new();
        for (index, token) in tokens.iter().enumerate() {
            if let Token::Dice(spec) = token {
                terms.push((index, self.resolve(spec)?));
            }
        }

        let mut rolls = Vec::with_capacity(terms.len());
        for (index, term) in terms {
            let outcome = roll_term(&term, &mut *self.rng);
            debug!(
                term = %term.text,
                count = term.count,
                total = outcome.total,
                "rolled dice term"
            );

            tokens[index] = Token::Value(outcome.total);
            rolls.push(TermRoll {
                breakdown: outcome.breakdown(self.limits.breakdown),
                term: term.text,
                dice: outcome.dice,
                total: outcome.total,
            });
        }

        let total = arith::reduce(&tokens)?;
        Ok(Evaluation {
            input: canonical.to_string(),
            rolls,
            total,
        })
    }

    /// Interpret the numbers in a dice term and charge it against the budget.
    fn resolve(&mut self, spec: &DiceSpec) -> Result<DiceTerm> {
        let count = if spec.count.is_empty() {
            1
        } else {
            match spec.count.parse::<u32>() {
                Ok(n) if n <= self.limits.dice => n,
                _ => return Err(Error::TooManyDiceInTerm(spec.text.clone())),
            }
        };

        if count > self.limits.dice.saturating_sub(self.rolled) {
            return Err(Error::TooManyDice);
        }
        self.rolled += count;

        let keep = match &spec.keep {
            None => Keep::All,
            Some((marker, digits)) => {
                let n = if digits.is_empty() {
                    Some(1)
                } else {
                    digits.parse::<u32>().ok()
                };
                // Unreadable keep counts fall back to keeping every die.
                match (marker, n) {
                    (_, None) => Keep::All,
                    (KeepMarker::High, Some(n)) => Keep::Highest(n),
                    (KeepMarker::Low, Some(n)) => Keep::Lowest(n),
                }
            }
        };

        let sides = match spec.sides.as_str() {
            "%" => Sides::Percent,
            "F" => Sides::Fudge,
            // Face counts are 32-bit signed; anything wider cannot be parsed.
            digits => match digits.parse::<i32>() {
                Ok(0) => return Err(Error::ZeroSidedDie),
                Ok(n) => Sides::Number(n.unsigned_abs()),
                Err(_) => return Err(Error::UnparseableFaces(digits.to_string())),
            },
        };

        debug!(term = %spec.text, count, ?sides, ?keep, "resolved dice term");
        Ok(DiceTerm {
            text: spec.text.clone(),
            count,
            sides,
            keep,
        })
    }
}
