// ABOUTME: Grammar check and lexer for canonical dice expressions.
// ABOUTME: Validates strings like "4d6H3+5" and splits them into tokens.

use crate::ast::{DiceSpec, KeepMarker, Op, Token};
use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::iter::Peekable;
use std::str::CharIndices;

/// One operand: an integer literal or a dice term `[n]d(n|%|F)[(H|L)[n]]`.
const TERM: &str = r"(?:[0-9]+|[0-9]*d(?:[0-9]+|%|F)(?:[HL][0-9]*)?)";

static VALID_EXPRESSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^-?{TERM}(?:[+\-*]-?{TERM})*$")).unwrap()
});

/// Check a canonical expression against the dice grammar.
///
/// An optional leading `-`, then terms joined by `+`, `-` or `*`, where each
/// operator may be followed by one unary `-`.
pub fn validate(canonical: &str) -> Result<()> {
    if VALID_EXPRESSION.is_match(canonical) {
        Ok(())
    } else {
        Err(Error::InvalidInput)
    }
}

/// Validate and lex a canonical expression into tokens.
pub fn tokenize(canonical: &str) -> Result<Vec<Token>> {
    validate(canonical)?;

    let mut lexer = Lexer::new(canonical);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}

/// A lexer for canonical dice notation.
pub struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    /// Get the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        let Some(&(_, ch)) = self.chars.peek() else {
            return Ok(None);
        };

        let token = match ch {
            '+' => self.op(Op::Add),
            '-' => self.op(Op::Sub),
            '*' => self.op(Op::Mul),
            '0'..='9' | 'd' => self.operand()?,
            _ => return Err(Error::InvalidInput),
        };
        Ok(Some(token))
    }

    fn op(&mut self, op: Op) -> Token {
        self.chars.next();
        Token::Op(op)
    }

    /// Byte offset of the next unread character.
    fn offset(&mut self) -> usize {
        self.chars.peek().map_or(self.input.len(), |&(i, _)| i)
    }

    fn eat(&mut self, expected: char) -> bool {
        if matches!(self.chars.peek(), Some(&(_, ch)) if ch == expected) {
            self.chars.next();
            true
        } else {
            false
        }
    }

    fn digits(&mut self) -> &'a str {
        let start = self.offset();
        while matches!(self.chars.peek(), Some(&(_, ch)) if ch.is_ascii_digit()) {
            self.chars.next();
        }
        let end = self.offset();
        let input = self.input;
        &input[start..end]
    }

    fn operand(&mut self) -> Result<Token> {
        let start = self.offset();
        let count = self.digits();

        if !self.eat('d') {
            return Ok(Token::Number(count.to_string()));
        }

        let sides = match self.chars.peek() {
            Some(&(_, ch @ ('%' | 'F'))) => {
                self.chars.next();
                ch.to_string()
            }
            _ => {
                let digits = self.digits();
                if digits.is_empty() {
                    return Err(Error::InvalidInput);
                }
                digits.to_string()
            }
        };

        let keep = if self.eat('H') {
            Some((KeepMarker::High, self.digits().to_string()))
        } else if self.eat('L') {
            Some((KeepMarker::Low, self.digits().to_string()))
        } else {
            None
        };

        let end = self.offset();
        let input = self.input;
        Ok(Token::Dice(DiceSpec {
            text: input[start..end].to_string(),
            count: count.to_string(),
            sides,
            keep,
        }))
    }
}
