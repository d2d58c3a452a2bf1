// ABOUTME: Core library for evaluating chat dice-roll commands.
// ABOUTME: Normalizes, validates, rolls and reduces expressions into reply text.

//! # Argos Dice
//!
//! Evaluates dice expressions typed into a chat roll command and produces the
//! reply text: the normalized input, one breakdown line per dice term, and the
//! result.
//!
//! ## Quick Start
//!
//! ```
//! let reply = argos_dice::evaluate("2d6 + 1d8k1 - 3*2");
//! assert!(reply.starts_with("Input: `2d6+1d8H1-3*2`"));
//!
//! let evaluation = argos_dice::roll("4d6 kh3").unwrap();
//! assert!((3..=18).contains(&evaluation.total));
//! ```
//!
//! ## Supported Notation
//!
//! - Basic rolls: `2d6`, `d20`, `d%`, `4dF`
//! - Keep highest/lowest: `4d6k3`, `4d6kh3`, `2d20kl`, `4d6H3`, `2d20L1`
//! - Arithmetic: `+`, `-`, `*`, with unary minus (`2*-1d4`)
//!
//! Dice are drawn from the operating system's secure random source, and one
//! expression may roll at most [`DEFAULT_DICE_LIMIT`] dice.

pub mod arith;
pub mod ast;
pub mod error;
pub mod eval;
pub mod format;
pub mod keep;
pub mod lexer;
pub mod normalize;
pub mod roller;

pub use ast::{DiceTerm, Keep, Op, Sides, Token};
pub use error::{Error, Result};
pub use eval::{
    evaluate_canonical, Evaluation, Limits, TermRoll, DEFAULT_BREAKDOWN_LIMIT, DEFAULT_DICE_LIMIT,
};
pub use lexer::validate;
pub use normalize::normalize;
pub use roller::{DieResult, FastRng, RollOutcome, Rng, SecureRng};

use tracing::debug;

/// Evaluate raw user input into the reply text, using the secure RNG and
/// default limits.
///
/// # Examples
///
/// ```
/// assert_eq!(argos_dice::evaluate("2 + 3*4"), "Input: `2+3*4`\nResult: **14**");
/// assert_eq!(argos_dice::evaluate("abc"), "Input: `abc`\nError: Invalid input.");
/// ```
pub fn evaluate(input: &str) -> String {
    evaluate_with(input, &Limits::default(), &mut SecureRng)
}

/// Evaluate raw user input into the reply text with custom limits and RNG.
pub fn evaluate_with(input: &str, limits: &Limits, rng: &mut impl Rng) -> String {
    let canonical = normalize(input);
    let result = evaluate_canonical(&canonical, limits, rng);
    report(&canonical, &result)
}

/// Parse and roll raw user input, returning the structured evaluation.
///
/// # Examples
///
/// ```
/// let evaluation = argos_dice::roll("3d1 + 2").unwrap();
/// assert_eq!(evaluation.input, "3d1+2");
/// assert_eq!(evaluation.total, 5);
/// ```
pub fn roll(input: &str) -> Result<Evaluation> {
    roll_with(input, &Limits::default(), &mut SecureRng)
}

/// Parse and roll with custom limits and RNG.
///
/// Useful for testing or when you need reproducible results.
///
/// # Examples
///
/// ```
/// use argos_dice::{roll_with, FastRng, Limits};
///
/// let mut rng = FastRng::with_seed(42);
/// let evaluation = roll_with("2d6", &Limits::default(), &mut rng).unwrap();
/// assert!((2..=12).contains(&evaluation.total));
/// ```
pub fn roll_with(input: &str, limits: &Limits, rng: &mut impl Rng) -> Result<Evaluation> {
    evaluate_canonical(&normalize(input), limits, rng)
}

/// Render an evaluation outcome as reply text.
///
/// The reply always opens with the normalized input. A failure replaces the
/// whole roll log with a single `Error:` line.
pub fn report(canonical: &str, result: &Result<Evaluation>) -> String {
    match result {
        Ok(evaluation) => format!("Input: `{}`\n{}", canonical, evaluation),
        Err(e) => {
            debug!(input = canonical, error = %e, "evaluation failed");
            format!("Input: `{}`\nError: {}", canonical, e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_evaluate_number() {
        assert_eq!(evaluate("1234567"), "Input: `1234567`\nResult: **1,234,567**");
    }

    #[test]
    fn test_evaluate_roll() {
        let reply = evaluate("2d6");
        let lines: Vec<&str> = reply.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Input: `2d6`");
        assert!(lines[1].starts_with("`2d6`: **"));
        assert!(lines[2].starts_with("Result: **"));
    }

    #[test]
    fn test_evaluate_invalid() {
        assert_eq!(evaluate("2d"), "Input: `2d`\nError: Invalid input.");
        assert_eq!(evaluate(""), "Input: ``\nError: Invalid input.");
    }

    #[test]
    fn test_evaluate_zero_faces() {
        assert_eq!(
            evaluate("1d6 + 2d0"),
            "Input: `1d6+2d0`\nError: Cannot roll a die with zero faces."
        );
    }

    #[test]
    fn test_evaluate_too_many_dice() {
        assert_eq!(
            evaluate("1000001d6"),
            "Input: `1000001d6`\nError: Cannot evaluate \n`1000001d6`\n(Too many dice.)"
        );
        assert_eq!(
            evaluate("999999d6+2d6"),
            "Input: `999999d6+2d6`\nError: Cannot evaluate expression.\n(Too many dice.)"
        );
    }

    #[test]
    fn test_roll_seeded() {
        let mut rng = FastRng::with_seed(42);
        let first = roll_with("4d6kh3", &Limits::default(), &mut rng).unwrap();

        let mut rng = FastRng::with_seed(42);
        let second = roll_with("4d6kh3", &Limits::default(), &mut rng).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_roll_reports_terms() {
        let evaluation = roll("2d6 + 1d8 k1").unwrap();
        assert_eq!(evaluation.input, "2d6+1d8H1");
        let terms: Vec<&str> = evaluation.rolls.iter().map(|r| r.term.as_str()).collect();
        assert_eq!(terms, ["2d6", "1d8H1"]);
        let sum: i64 = evaluation.rolls.iter().map(|r| r.total).sum();
        assert_eq!(evaluation.total, sum);
    }

    proptest! {
        #[test]
        fn test_literals_echo(n in 0i64..=i64::MAX) {
            let expected = format!("Input: `{}`\nResult: **{}**", n, format::group_thousands(n));
            prop_assert_eq!(evaluate(&n.to_string()), expected);
        }

        #[test]
        fn test_roll_within_bounds(count in 1u32..40, sides in 2u32..100) {
            let evaluation = roll(&format!("{}d{}", count, sides)).unwrap();
            let count = count as i64;
            prop_assert!(evaluation.total >= count);
            prop_assert!(evaluation.total <= count * sides as i64);
        }

        #[test]
        fn test_one_sided_total(count in 0u32..1000) {
            prop_assert_eq!(roll(&format!("{}d1", count)).unwrap().total, count as i64);
        }

        #[test]
        fn test_fudge_faces(count in 1u32..20) {
            let evaluation = roll(&format!("{}dF", count)).unwrap();
            prop_assert!(evaluation.rolls[0].dice.iter().all(|d| (-1..=1).contains(&d.value)));
        }

        #[test]
        fn test_keep_totals(count in 1u32..12, keep in 0u32..14, lowest in any::<bool>()) {
            let marker = if lowest { 'L' } else { 'H' };
            let evaluation = roll(&format!("{}d6{}{}", count, marker, keep)).unwrap();

            let mut values: Vec<i64> = evaluation.rolls[0].dice.iter().map(|d| d.value).collect();
            values.sort_unstable();
            if !lowest {
                values.reverse();
            }
            let expected: i64 = values.iter().take(keep as usize).sum();
            prop_assert_eq!(evaluation.total, expected);
        }
    }
}
