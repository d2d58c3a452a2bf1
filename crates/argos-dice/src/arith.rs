// ABOUTME: Integer arithmetic over a dice-free token sequence.
// ABOUTME: Merges unary signs and applies * before + and -, left to right.

use crate::ast::{render, Op, Token};
use crate::error::{Error, Result};
use tracing::trace;

/// Reduce a token sequence with no dice left in it to a single integer.
///
/// Runs of unary signs in front of an operand collapse to one sign, which is
/// how negative roll totals such as `2--1` are handled. Arithmetic is checked;
/// an oversized literal, an overflow, or a malformed sequence fails with
/// [`Error::ArithmeticStuck`] carrying the expression text.
pub fn reduce(tokens: &[Token]) -> Result<i64> {
    let text = render(tokens);
    if let Ok(n) = text.parse::<i64>() {
        return Ok(n);
    }

    let mut reducer = Reducer { tokens, pos: 0 };
    match reducer.expression() {
        Some(value) if reducer.pos == tokens.len() => {
            trace!(expression = %text, value, "reduced arithmetic");
            Ok(value)
        }
        _ => Err(Error::ArithmeticStuck(text)),
    }
}

struct Reducer<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl Reducer<'_> {
    fn peek_op(&self) -> Option<Op> {
        match self.tokens.get(self.pos) {
            Some(Token::Op(op)) => Some(*op),
            _ => None,
        }
    }

    /// Sums and differences of products.
    fn expression(&mut self) -> Option<i64> {
        let mut acc = self.product()?;

        while let Some(op @ (Op::Add | Op::Sub)) = self.peek_op() {
            self.pos += 1;
            let rhs = self.product()?;
            acc = match op {
                Op::Add => acc.checked_add(rhs)?,
                _ => acc.checked_sub(rhs)?,
            };
        }

        Some(acc)
    }

    /// Products of signed operands.
    fn product(&mut self) -> Option<i64> {
        let mut acc = self.signed()?;

        while self.peek_op() == Some(Op::Mul) {
            self.pos += 1;
            acc = acc.checked_mul(self.signed()?)?;
        }

        Some(acc)
    }

    /// An operand with any number of leading unary signs.
    fn signed(&mut self) -> Option<i64> {
        let mut negative = false;
        while let Some(op) = self.peek_op() {
            match op {
                Op::Add => {}
                Op::Sub => negative = !negative,
                Op::Mul => return None,
            }
            self.pos += 1;
        }

        let value = match self.tokens.get(self.pos)? {
            Token::Number(digits) => digits.parse::<i64>().ok()?,
            Token::Value(n) => *n,
            Token::Dice(_) | Token::Op(_) => return None,
        };
        self.pos += 1;

        if negative {
            value.checked_neg()
        } else {
            Some(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn eval(canonical: &str) -> Result<i64> {
        reduce(&tokenize(canonical).unwrap())
    }

    #[test]
    fn test_single_literal() {
        assert_eq!(eval("42"), Ok(42));
        assert_eq!(eval("-42"), Ok(-42));
        assert_eq!(eval("-9223372036854775808"), Ok(i64::MIN));
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("2+3*4"), Ok(14));
        assert_eq!(eval("2*3+4"), Ok(10));
        assert_eq!(eval("2-3*4"), Ok(-10));
        assert_eq!(eval("2*3*4-1"), Ok(23));
    }

    #[test]
    fn test_left_to_right() {
        assert_eq!(eval("10-3-2"), Ok(5));
        assert_eq!(eval("1-2+3"), Ok(2));
    }

    #[test]
    fn test_unary_signs() {
        assert_eq!(eval("2*-3"), Ok(-6));
        assert_eq!(eval("-2*-3"), Ok(6));
        assert_eq!(eval("1--2"), Ok(3));
        assert_eq!(eval("-5+-5"), Ok(-10));
    }

    #[test]
    fn test_negative_substituted_values() {
        let tokens = vec![
            Token::Number("2".to_string()),
            Token::Op(Op::Sub),
            Token::Value(-1),
            Token::Op(Op::Mul),
            Token::Op(Op::Sub),
            Token::Value(-3),
        ];
        assert_eq!(reduce(&tokens), Ok(5));
    }

    #[test]
    fn test_oversized_literal() {
        assert_eq!(
            eval("99999999999999999999+1"),
            Err(Error::ArithmeticStuck("99999999999999999999+1".to_string()))
        );
        assert_eq!(
            eval("99999999999999999999"),
            Err(Error::ArithmeticStuck("99999999999999999999".to_string()))
        );
    }

    #[test]
    fn test_overflow() {
        assert_eq!(
            eval("9223372036854775807+1"),
            Err(Error::ArithmeticStuck("9223372036854775807+1".to_string()))
        );
        assert_eq!(
            eval("4294967296*4294967296"),
            Err(Error::ArithmeticStuck("4294967296*4294967296".to_string()))
        );
    }

    #[test]
    fn test_malformed_sequences() {
        let dangling = vec![Token::Number("2".to_string()), Token::Op(Op::Add)];
        assert_eq!(reduce(&dangling), Err(Error::ArithmeticStuck("2+".to_string())));

        let leading_star = vec![Token::Op(Op::Mul), Token::Value(3)];
        assert_eq!(reduce(&leading_star), Err(Error::ArithmeticStuck("*3".to_string())));

        let unrolled = tokenize("d6").unwrap();
        assert_eq!(reduce(&unrolled), Err(Error::ArithmeticStuck("d6".to_string())));

        assert_eq!(reduce(&[]), Err(Error::ArithmeticStuck(String::new())));
    }
}
