// ABOUTME: Error types for the argos-dice library.
// ABOUTME: Each variant renders as the message shown after "Error: " in a reply.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Invalid input.")]
    InvalidInput,

    /// A single term asks for more dice than the whole expression may roll.
    #[error("Cannot evaluate \n`{0}`\n(Too many dice.)")]
    TooManyDiceInTerm(String),

    /// The running dice count across terms would exceed the limit.
    #[error("Cannot evaluate expression.\n(Too many dice.)")]
    TooManyDice,

    #[error("Cannot roll a die with zero faces.")]
    ZeroSidedDie,

    #[error("Cannot parse `{0}` number of faces.")]
    UnparseableFaces(String),

    /// Arithmetic could not be reduced to a single integer.
    #[error("Unable to parse and evaluate \n`{0}`")]
    ArithmeticStuck(String),
}

pub type Result<T> = std::result::Result<T, Error>;
