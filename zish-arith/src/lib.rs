// This file is part of zish, a POSIX-compatible shell.
// Copyright (C) 2026 zish developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Arithmetic expansion for the shell
//!
//! This crate evaluates the C-like integer expressions that appear in
//! `$((…))`. All arithmetic is over 64-bit signed integers. Supported are
//! the unary operators `+ - ! ~` and `++`/`--` (prefix and postfix), the
//! binary operators
//! `* / % + - << >> < <= > >= == != & ^ | && ||`,
//! the conditional operator `?:`, and the assignment operators
//! `= *= /= %= += -= <<= >>= &= ^= |=`.
//! Integer constants may be decimal, octal (leading `0`), or hexadecimal
//! (leading `0x`).
//!
//! Variables are accessed through the [`Env`] trait; an unset variable
//! evaluates to zero, and assignments write their result back through the
//! environment.
//!
//! ```
//! # use std::collections::HashMap;
//! # use zish_arith::{eval, Value};
//! let mut env = HashMap::new();
//! env.insert("x".to_string(), "5".to_string());
//! assert_eq!(eval("x + 3", &mut env), Ok(Value::Integer(8)));
//! assert_eq!(eval("x++", &mut env), Ok(Value::Integer(5)));
//! assert_eq!(env["x"], "6");
//! ```

mod env;
mod eval;
mod token;

pub use env::Env;
pub use token::{TokenError, Value};

use std::fmt::Display;
use std::ops::Range;

/// Cause of an arithmetic expansion error
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum ErrorCause<E> {
    /// Error in tokenization
    TokenError(TokenError),
    /// A variable value that is not a valid number
    InvalidVariableValue(String),
    /// Result out of bounds
    Overflow,
    /// Division by zero
    DivisionByZero,
    /// Left bit-shifting of a negative value
    LeftShiftingNegative,
    /// Bit-shifting with a negative right-hand-side operand
    ReverseShifting,
    /// Assignment with a left-hand-side operand that is not a variable
    AssignmentToValue,
    /// Expression that ends in the middle of a construct
    IncompleteExpression,
    /// Token that cannot continue the expression
    UnexpectedToken,
    /// `?` without a matching `:`
    MissingColon,
    /// `(` without a matching `)`
    UnmatchedParenthesis,
    /// Error assigning a variable value
    AssignVariableError(E),
}

impl<E: Display> Display for ErrorCause<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use ErrorCause::*;
        match self {
            TokenError(e) => e.fmt(f),
            InvalidVariableValue(v) => {
                write!(f, "variable value {v:?} cannot be parsed as a number")
            }
            Overflow => "overflow".fmt(f),
            DivisionByZero => "division by zero".fmt(f),
            LeftShiftingNegative => "left-shifting a negative integer".fmt(f),
            ReverseShifting => "negative shift width".fmt(f),
            AssignmentToValue => "assignment target is not a variable".fmt(f),
            IncompleteExpression => "incomplete expression".fmt(f),
            UnexpectedToken => "unexpected token".fmt(f),
            MissingColon => "`?` without matching `:`".fmt(f),
            UnmatchedParenthesis => "unmatched parenthesis".fmt(f),
            AssignVariableError(e) => e.fmt(f),
        }
    }
}

/// Description of an error that occurred during expansion
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Error<E> {
    /// Cause of the error
    pub cause: ErrorCause<E>,
    /// Range of the substring in the evaluated expression where the error
    /// occurred
    pub location: Range<usize>,
}

impl<E: Display> Display for Error<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.cause.fmt(f)
    }
}

impl<E: std::fmt::Debug + Display> std::error::Error for Error<E> {}

impl<E> From<token::Error> for Error<E> {
    fn from(e: token::Error) -> Self {
        Error {
            cause: ErrorCause::TokenError(e.cause),
            location: e.location,
        }
    }
}

/// Parses and evaluates an arithmetic expression.
pub fn eval<E: Env>(
    expression: &str,
    env: &mut E,
) -> Result<Value, Error<E::AssignVariableError>> {
    eval::Parser::new(expression).eval_expression(env)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::HashMap;

    fn env_with(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|&(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn eval_ok(expression: &str, env: &mut HashMap<String, String>) -> i64 {
        let Value::Integer(i) = eval(expression, env).unwrap();
        i
    }

    #[test]
    fn constants() {
        let mut env = HashMap::new();
        assert_eq!(eval_ok("42", &mut env), 42);
        assert_eq!(eval_ok("0755", &mut env), 0o755);
        assert_eq!(eval_ok("0xff", &mut env), 0xff);
    }

    #[test]
    fn additive_and_multiplicative_precedence() {
        let mut env = HashMap::new();
        assert_eq!(eval_ok("1 + 2 * 3", &mut env), 7);
        assert_eq!(eval_ok("(1 + 2) * 3", &mut env), 9);
        assert_eq!(eval_ok("10 - 4 - 3", &mut env), 3);
    }

    #[test]
    fn division_and_remainder() {
        let mut env = HashMap::new();
        assert_eq!(eval_ok("7 / 2", &mut env), 3);
        assert_eq!(eval_ok("-7 % 3", &mut env), -1);
    }

    #[test]
    fn division_by_zero() {
        let mut env = HashMap::new();
        assert_matches!(
            eval("1 / 0", &mut env),
            Err(Error {
                cause: ErrorCause::DivisionByZero,
                ..
            })
        );
        assert_matches!(
            eval("1 % 0", &mut env),
            Err(Error {
                cause: ErrorCause::DivisionByZero,
                ..
            })
        );
    }

    #[test]
    fn unary_operators() {
        let mut env = HashMap::new();
        assert_eq!(eval_ok("-5", &mut env), -5);
        assert_eq!(eval_ok("+5", &mut env), 5);
        assert_eq!(eval_ok("!5", &mut env), 0);
        assert_eq!(eval_ok("!0", &mut env), 1);
        assert_eq!(eval_ok("~0", &mut env), -1);
    }

    #[test]
    fn shifts() {
        let mut env = HashMap::new();
        assert_eq!(eval_ok("1 << 10", &mut env), 1024);
        assert_eq!(eval_ok("1024 >> 3", &mut env), 128);
        assert_matches!(
            eval("1 << -1", &mut env),
            Err(Error {
                cause: ErrorCause::ReverseShifting,
                ..
            })
        );
    }

    #[test]
    fn comparisons_and_equality() {
        let mut env = HashMap::new();
        assert_eq!(eval_ok("1 < 2", &mut env), 1);
        assert_eq!(eval_ok("2 <= 1", &mut env), 0);
        assert_eq!(eval_ok("3 == 3", &mut env), 1);
        assert_eq!(eval_ok("3 != 3", &mut env), 0);
    }

    #[test]
    fn bitwise_operators() {
        let mut env = HashMap::new();
        assert_eq!(eval_ok("6 & 3", &mut env), 2);
        assert_eq!(eval_ok("6 ^ 3", &mut env), 5);
        assert_eq!(eval_ok("6 | 3", &mut env), 7);
    }

    #[test]
    fn unset_variable_is_zero() {
        let mut env = HashMap::new();
        assert_eq!(eval_ok("unset_var + 1", &mut env), 1);
    }

    #[test]
    fn variable_resolution() {
        let mut env = env_with(&[("x", "5")]);
        assert_eq!(eval_ok("x * x", &mut env), 25);
    }

    #[test]
    fn invalid_variable_value() {
        let mut env = env_with(&[("x", "five")]);
        assert_matches!(
            eval("x + 1", &mut env),
            Err(Error {
                cause: ErrorCause::InvalidVariableValue(v),
                ..
            }) => assert_eq!(v, "five")
        );
    }

    #[test]
    fn simple_assignment() {
        let mut env = HashMap::new();
        assert_eq!(eval_ok("x = 42", &mut env), 42);
        assert_eq!(env["x"], "42");
    }

    #[test]
    fn compound_assignment() {
        let mut env = env_with(&[("x", "5")]);
        assert_eq!(eval_ok("x += 3", &mut env), 8);
        assert_eq!(env["x"], "8");
        assert_eq!(eval_ok("x <<= 2", &mut env), 32);
        assert_eq!(env["x"], "32");
    }

    #[test]
    fn assignment_is_right_associative() {
        let mut env = HashMap::new();
        assert_eq!(eval_ok("x = y = 3", &mut env), 3);
        assert_eq!(env["x"], "3");
        assert_eq!(env["y"], "3");
    }

    #[test]
    fn assignment_to_constant_is_an_error() {
        let mut env = HashMap::new();
        assert_matches!(
            eval("1 = 2", &mut env),
            Err(Error {
                cause: ErrorCause::AssignmentToValue,
                ..
            })
        );
    }

    #[test]
    fn postfix_increment() {
        let mut env = env_with(&[("x", "5")]);
        assert_eq!(eval_ok("x++", &mut env), 5);
        assert_eq!(env["x"], "6");
        assert_eq!(eval_ok("x--", &mut env), 6);
        assert_eq!(env["x"], "5");
    }

    #[test]
    fn prefix_increment() {
        let mut env = env_with(&[("x", "5")]);
        assert_eq!(eval_ok("++x", &mut env), 6);
        assert_eq!(env["x"], "6");
        assert_eq!(eval_ok("--x", &mut env), 5);
        assert_eq!(env["x"], "5");
    }

    #[test]
    fn short_circuit_suppresses_side_effects() {
        let mut env = env_with(&[("x", "5")]);
        assert_eq!(eval_ok("0 && (x = 9)", &mut env), 0);
        assert_eq!(env["x"], "5");
        assert_eq!(eval_ok("1 || (x = 9)", &mut env), 1);
        assert_eq!(env["x"], "5");
        assert_eq!(eval_ok("1 && (x = 9)", &mut env), 1);
        assert_eq!(env["x"], "9");
    }

    #[test]
    fn short_circuit_skips_division_by_zero() {
        let mut env = HashMap::new();
        assert_eq!(eval_ok("0 && 1 / 0", &mut env), 0);
        assert_eq!(eval_ok("1 || 1 / 0", &mut env), 1);
    }

    #[test]
    fn conditional_operator() {
        let mut env = env_with(&[("x", "5")]);
        assert_eq!(eval_ok("x > 3 ? 10 : 20", &mut env), 10);
        assert_eq!(eval_ok("x < 3 ? 10 : 20", &mut env), 20);
    }

    #[test]
    fn conditional_evaluates_one_branch() {
        let mut env = env_with(&[("x", "1")]);
        assert_eq!(eval_ok("1 ? 5 : (x = 9)", &mut env), 5);
        assert_eq!(env["x"], "1");
        assert_eq!(eval_ok("0 ? (x = 9) : 7", &mut env), 7);
        assert_eq!(env["x"], "1");
    }

    #[test]
    fn incomplete_expression() {
        let mut env = HashMap::new();
        assert_matches!(
            eval("1 +", &mut env),
            Err(Error {
                cause: ErrorCause::IncompleteExpression,
                ..
            })
        );
        assert_matches!(
            eval("(1", &mut env),
            Err(Error {
                cause: ErrorCause::IncompleteExpression,
                ..
            })
        );
    }

    #[test]
    fn double_star_is_not_an_operator() {
        let mut env = HashMap::new();
        assert_matches!(
            eval("2 ** 3", &mut env),
            Err(Error {
                cause: ErrorCause::UnexpectedToken,
                ..
            })
        );
    }

    #[test]
    fn overflow_is_reported() {
        let mut env = HashMap::new();
        assert_matches!(
            eval("9223372036854775807 + 1", &mut env),
            Err(Error {
                cause: ErrorCause::Overflow,
                ..
            })
        );
    }

    #[test]
    fn empty_variable_value_is_zero() {
        let mut env = env_with(&[("x", "")]);
        assert_eq!(eval_ok("x + 1", &mut env), 1);
    }
}
