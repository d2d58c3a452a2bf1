// ABOUTME: Token and dice-term types for canonical dice expressions.
// ABOUTME: Represents lexed expressions like "4d6H3+5" and resolved dice terms.

use std::fmt;

/// A binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
    Mul,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Add => write!(f, "+"),
            Op::Sub => write!(f, "-"),
            Op::Mul => write!(f, "*"),
        }
    }
}

/// The type of dice to roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sides {
    /// A die with N sides (d6, d20, etc.).
    Number(u32),
    /// A percentile die (d% = d100).
    Percent,
    /// A fudge die (dF = {-1, 0, 1}).
    Fudge,
}

impl Sides {
    /// Returns the number of faces for this die type.
    pub fn count(&self) -> u32 {
        match self {
            Sides::Number(n) => *n,
            Sides::Percent => 100,
            Sides::Fudge => 3, // -1, 0, 1
        }
    }
}

/// Which marker introduced a keep modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepMarker {
    High,
    Low,
}

/// How many dice of a roll count toward its total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keep {
    /// Every die counts.
    All,
    /// The N highest dice count. Zero keeps nothing.
    Highest(u32),
    /// The N lowest dice count. Zero keeps nothing.
    Lowest(u32),
}

impl Keep {
    /// Magnitude of the keep count for a roll of `quantity` dice.
    pub fn count(&self, quantity: u32) -> u32 {
        match self {
            Keep::All => quantity,
            Keep::Highest(n) | Keep::Lowest(n) => *n,
        }
    }
}

/// A dice term as it appears in the canonical text, before any number in it
/// has been interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceSpec {
    /// The full term text, e.g. `4d6H3`.
    pub text: String,
    /// Quantity digits; empty means one die.
    pub count: String,
    /// Face spec: digits, `%` or `F`.
    pub sides: String,
    /// Keep marker and its (possibly empty) digits.
    pub keep: Option<(KeepMarker, String)>,
}

/// A fully resolved dice term, ready to roll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceTerm {
    pub text: String,
    pub count: u32,
    pub sides: Sides,
    pub keep: Keep,
}

/// One element of a lexed expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// An integer literal, kept as text until arithmetic needs it.
    Number(String),
    /// The total of an already rolled dice term.
    Value(i64),
    /// A dice term still to be rolled.
    Dice(DiceSpec),
    Op(Op),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(digits) => f.write_str(digits),
            Token::Value(n) => write!(f, "{}", n),
            Token::Dice(spec) => f.write_str(&spec.text),
            Token::Op(op) => write!(f, "{}", op),
        }
    }
}

/// Render a token sequence back into expression text.
pub fn render(tokens: &[Token]) -> String {
    tokens.iter().map(Token::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sides_count() {
        assert_eq!(Sides::Number(6).count(), 6);
        assert_eq!(Sides::Percent.count(), 100);
        assert_eq!(Sides::Fudge.count(), 3);
    }

    #[test]
    fn test_keep_count() {
        assert_eq!(Keep::All.count(4), 4);
        assert_eq!(Keep::Highest(3).count(4), 3);
        assert_eq!(Keep::Lowest(0).count(4), 0);
    }

    #[test]
    fn test_render_substituted_values() {
        let tokens = vec![
            Token::Number("2".to_string()),
            Token::Op(Op::Add),
            Token::Value(-3),
            Token::Op(Op::Mul),
            Token::Number("4".to_string()),
        ];
        assert_eq!(render(&tokens), "2+-3*4");
    }
}
