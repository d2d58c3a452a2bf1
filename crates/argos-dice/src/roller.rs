// ABOUTME: Die generation and per-term rolling.
// ABOUTME: Rolls resolved dice terms and formats their breakdowns.

use crate::ast::{DiceTerm, Sides};
use crate::format::group_thousands;
use crate::keep;
use rand::rngs::OsRng;
use rand::Rng as _;

/// Trait for random number generation, allowing for testing with fixed values.
pub trait Rng {
    /// Generate a random number in the range [1, max].
    fn roll(&mut self, max: u32) -> u32;
}

/// Default RNG backed by the operating system's CSPRNG.
///
/// Every draw goes to the OS, so results cannot be predicted from earlier
/// rolls and nothing is shared between evaluations.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecureRng;

impl Rng for SecureRng {
    fn roll(&mut self, max: u32) -> u32 {
        OsRng.gen_range(1..=max)
    }
}

/// Seedable RNG using fastrand, for reproducible runs only.
pub struct FastRng(fastrand::Rng);

impl FastRng {
    pub fn with_seed(seed: u64) -> Self {
        Self(fastrand::Rng::with_seed(seed))
    }
}

impl Rng for FastRng {
    fn roll(&mut self, max: u32) -> u32 {
        self.0.u32(1..=max)
    }
}

/// Result of a single die roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DieResult {
    pub value: i64,
    /// Whether this die counts toward the total.
    pub kept: bool,
}

/// Result of rolling one dice term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollOutcome {
    /// Individual dice in roll order. Empty when no randomness was needed.
    pub dice: Vec<DieResult>,
    /// Sum of the kept dice.
    pub total: i64,
}

impl RollOutcome {
    fn fixed(total: i64) -> Self {
        Self {
            dice: vec![],
            total,
        }
    }

    /// Format the per-die breakdown: kept dice in `**bold**`, dropped dice in
    /// `*italics*`. Rolls with no individual dice, or more than `limit` of
    /// them, show only the grouped total.
    pub fn breakdown(&self, limit: usize) -> String {
        if self.dice.is_empty() || self.dice.len() > limit {
            return group_thousands(self.total);
        }

        self.dice
            .iter()
            .map(|d| {
                if d.kept {
                    format!("**{}**", d.value)
                } else {
                    format!("*{}*", d.value)
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Roll a single die.
pub fn roll_die(sides: &Sides, rng: &mut impl Rng) -> i64 {
    let face = rng.roll(sides.count()) as i64;
    match sides {
        Sides::Number(_) | Sides::Percent => face,
        Sides::Fudge => face - 2, // -1, 0, 1
    }
}

/// Roll a resolved dice term and apply its keep modifier.
///
/// Zero dice total zero, and one-sided dice are counted without drawing from
/// `rng`. Zero-sided dice never get here; they are rejected while resolving.
pub fn roll_term(term: &DiceTerm, rng: &mut impl Rng) -> RollOutcome {
    if term.count == 0 {
        return RollOutcome::fixed(0);
    }
    if term.sides == Sides::Number(1) {
        let kept = term.count.min(term.keep.count(term.count));
        return RollOutcome::fixed(kept as i64);
    }

    let values: Vec<i64> = (0..term.count).map(|_| roll_die(&term.sides, rng)).collect();
    let kept = keep::select(&values, term.keep);

    let dice: Vec<DieResult> = values
        .into_iter()
        .zip(kept)
        .map(|(value, kept)| DieResult { value, kept })
        .collect();
    let total = dice.iter().filter(|d| d.kept).map(|d| d.value).sum();

    RollOutcome { dice, total }
}
