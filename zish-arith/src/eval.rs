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

//! Combined parsing and evaluation
//!
//! The expression is evaluated in a single pass over the token stream with
//! precedence climbing. Short-circuit operands and unselected conditional
//! branches are still parsed, but in [`Mode::Skip`], which suppresses value
//! computation and side effects.

use crate::env::Env;
use crate::token::{Operator, Term, Token, TokenValue, Tokens, Value};
use crate::{Error, ErrorCause};
use std::iter::Peekable;
use std::ops::Range;

/// Whether evaluation is being performed
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mode {
    /// Computes values and performs side effects
    Eval,
    /// Parses without evaluating
    Skip,
}

/// Parser state over the token stream
pub struct Parser<'a> {
    tokens: Peekable<Tokens<'a>>,
    /// Length of the source expression, for end-of-input error locations
    end: usize,
}

fn expand_variable<E: Env>(
    name: &str,
    location: &Range<usize>,
    env: &E,
) -> Result<Value, Error<E::AssignVariableError>> {
    let Some(value) = env.get_variable(name) else {
        return Ok(Value::Integer(0));
    };
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(Value::Integer(0));
    }
    match trimmed.parse() {
        Ok(number) => Ok(Value::Integer(number)),
        Err(_) => Err(Error {
            cause: ErrorCause::InvalidVariableValue(value.to_string()),
            location: location.clone(),
        }),
    }
}

fn into_value<E: Env>(
    term: &Term,
    mode: Mode,
    env: &E,
) -> Result<i64, Error<E::AssignVariableError>> {
    if mode == Mode::Skip {
        return Ok(0);
    }
    let Value::Integer(i) = match term {
        Term::Value(value) => *value,
        Term::Variable { name, location } => expand_variable(name, location, env)?,
    };
    Ok(i)
}

fn require_variable<'a, E>(
    term: Term<'a>,
    op_location: &Range<usize>,
) -> Result<(&'a str, Range<usize>), Error<E>> {
    match term {
        Term::Variable { name, location } => Ok((name, location)),
        Term::Value(_) => Err(Error {
            cause: ErrorCause::AssignmentToValue,
            location: op_location.clone(),
        }),
    }
}

fn assign<E: Env>(
    name: &str,
    value: i64,
    location: Range<usize>,
    env: &mut E,
) -> Result<(), Error<E::AssignVariableError>> {
    env.assign_variable(name, value.to_string())
        .map_err(|e| Error {
            cause: ErrorCause::AssignVariableError(e),
            location,
        })
}

fn overflow<T, E>(result: Option<T>, location: &Range<usize>) -> Result<T, Error<E>> {
    result.ok_or_else(|| Error {
        cause: ErrorCause::Overflow,
        location: location.clone(),
    })
}

fn error<T, E>(cause: ErrorCause<E>, location: &Range<usize>) -> Result<T, Error<E>> {
    Err(Error {
        cause,
        location: location.clone(),
    })
}

/// Applies a binary operator to two evaluated operands.
fn apply_binary<E>(
    op: Operator,
    lhs: i64,
    rhs: i64,
    location: &Range<usize>,
) -> Result<i64, Error<E>> {
    use Operator::*;
    match op {
        Plus => overflow(lhs.checked_add(rhs), location),
        Minus => overflow(lhs.checked_sub(rhs), location),
        Star => overflow(lhs.checked_mul(rhs), location),
        Slash => {
            if rhs == 0 {
                error(ErrorCause::DivisionByZero, location)
            } else {
                overflow(lhs.checked_div(rhs), location)
            }
        }
        Percent => {
            if rhs == 0 {
                error(ErrorCause::DivisionByZero, location)
            } else {
                overflow(lhs.checked_rem(rhs), location)
            }
        }
        LessLess => {
            if rhs < 0 {
                error(ErrorCause::ReverseShifting, location)
            } else if rhs >= 64 {
                error(ErrorCause::Overflow, location)
            } else if lhs < 0 {
                error(ErrorCause::LeftShiftingNegative, location)
            } else {
                let result = ((lhs as u64) << rhs) as i64;
                if result >> rhs == lhs && result >= 0 {
                    Ok(result)
                } else {
                    error(ErrorCause::Overflow, location)
                }
            }
        }
        GreaterGreater => {
            if rhs < 0 {
                error(ErrorCause::ReverseShifting, location)
            } else if rhs >= 64 {
                error(ErrorCause::Overflow, location)
            } else {
                Ok(lhs >> rhs)
            }
        }
        Less => Ok((lhs < rhs) as i64),
        LessEqual => Ok((lhs <= rhs) as i64),
        Greater => Ok((lhs > rhs) as i64),
        GreaterEqual => Ok((lhs >= rhs) as i64),
        EqualEqual => Ok((lhs == rhs) as i64),
        BangEqual => Ok((lhs != rhs) as i64),
        And => Ok(lhs & rhs),
        Caret => Ok(lhs ^ rhs),
        Bar => Ok(lhs | rhs),
        _ => unreachable!("not a binary operator: {op:?}"),
    }
}

/// Maps a compound assignment operator to its underlying binary operator.
fn assignment_operand(op: Operator) -> Option<Option<Operator>> {
    use Operator::*;
    match op {
        Equal => Some(None),
        PlusEqual => Some(Some(Plus)),
        MinusEqual => Some(Some(Minus)),
        StarEqual => Some(Some(Star)),
        SlashEqual => Some(Some(Slash)),
        PercentEqual => Some(Some(Percent)),
        LessLessEqual => Some(Some(LessLess)),
        GreaterGreaterEqual => Some(Some(GreaterGreater)),
        AndEqual => Some(Some(And)),
        BarEqual => Some(Some(Bar)),
        CaretEqual => Some(Some(Caret)),
        _ => None,
    }
}

fn binary_precedence(op: Operator) -> Option<u8> {
    use Operator::*;
    match op {
        Star | Slash | Percent => Some(13),
        Plus | Minus => Some(12),
        LessLess | GreaterGreater => Some(11),
        Less | LessEqual | Greater | GreaterEqual => Some(10),
        EqualEqual | BangEqual => Some(9),
        And => Some(8),
        Caret => Some(7),
        Bar => Some(6),
        AndAnd => Some(5),
        BarBar => Some(4),
        Question => Some(3),
        _ => assignment_operand(op).map(|_| 2),
    }
}

/// Lowest precedence at which [`Parser::parse_binary`] accepts an operator.
pub const MIN_PRECEDENCE: u8 = 2;

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Parser {
            tokens: Tokens::new(source).peekable(),
            end: source.len(),
        }
    }

    /// Returns the next token without consuming it.
    fn peek<E>(&mut self) -> Result<Option<&Token<'a>>, Error<E>> {
        match self.tokens.peek() {
            None => Ok(None),
            Some(Ok(token)) => Ok(Some(token)),
            Some(Err(error)) => Err(error.clone().into()),
        }
    }

    fn next_token<E>(&mut self) -> Result<Option<Token<'a>>, Error<E>> {
        match self.tokens.next() {
            None => Ok(None),
            Some(Ok(token)) => Ok(Some(token)),
            Some(Err(error)) => Err(error.into()),
        }
    }

    fn end_location(&self) -> Range<usize> {
        self.end..self.end
    }

    /// Reports an unexpected end of the expression.
    fn incomplete<T, E>(&self) -> Result<T, Error<E>> {
        Err(Error {
            cause: ErrorCause::IncompleteExpression,
            location: self.end_location(),
        })
    }

    /// Parses a term: a constant, variable, or parenthesized expression,
    /// with any postfix operators applied.
    fn parse_postfix<E: Env>(
        &mut self,
        mode: Mode,
        env: &mut E,
    ) -> Result<Term<'a>, Error<E::AssignVariableError>> {
        let Some(token) = self.next_token()? else {
            return self.incomplete();
        };
        let mut term = match token.value {
            TokenValue::Term(term) => term,
            TokenValue::Operator(Operator::OpenParen) => {
                let inner = self.parse_binary(MIN_PRECEDENCE, mode, env)?;
                match self.next_token()? {
                    Some(Token {
                        value: TokenValue::Operator(Operator::CloseParen),
                        ..
                    }) => inner,
                    Some(token) => {
                        return error(ErrorCause::UnmatchedParenthesis, &token.location);
                    }
                    None => return self.incomplete(),
                }
            }
            _ => return error(ErrorCause::UnexpectedToken, &token.location),
        };

        loop {
            let step = match self.peek::<E::AssignVariableError>()? {
                Some(Token {
                    value: TokenValue::Operator(Operator::PlusPlus),
                    ..
                }) => 1,
                Some(Token {
                    value: TokenValue::Operator(Operator::MinusMinus),
                    ..
                }) => -1,
                _ => break,
            };
            let op_token = self.next_token()?.unwrap();
            if mode == Mode::Skip {
                term = Term::Value(Value::Integer(0));
                continue;
            }
            let (name, location) = require_variable(term, &op_token.location)?;
            let old = into_value(
                &Term::Variable {
                    name,
                    location: location.clone(),
                },
                mode,
                env,
            )?;
            let new = overflow(old.checked_add(step), &op_token.location)?;
            assign(name, new, location, env)?;
            term = Term::Value(Value::Integer(old));
        }
        Ok(term)
    }

    /// Parses a unary expression.
    fn parse_unary<E: Env>(
        &mut self,
        mode: Mode,
        env: &mut E,
    ) -> Result<Term<'a>, Error<E::AssignVariableError>> {
        use Operator::*;
        let prefix = match self.peek()? {
            Some(Token {
                value: TokenValue::Operator(op @ (Plus | Minus | Bang | Tilde | PlusPlus | MinusMinus)),
                ..
            }) => Some(*op),
            _ => None,
        };
        let Some(op) = prefix else {
            return self.parse_postfix(mode, env);
        };
        let op_token = self.next_token()?.unwrap();
        let operand = self.parse_unary(mode, env)?;
        if mode == Mode::Skip {
            return Ok(Term::Value(Value::Integer(0)));
        }
        let result = match op {
            Plus => into_value(&operand, mode, env)?,
            Minus => overflow(
                into_value(&operand, mode, env)?.checked_neg(),
                &op_token.location,
            )?,
            Bang => (into_value(&operand, mode, env)? == 0) as i64,
            Tilde => !into_value(&operand, mode, env)?,
            PlusPlus | MinusMinus => {
                let step = if op == PlusPlus { 1 } else { -1 };
                let (name, location) = require_variable(operand, &op_token.location)?;
                let old = into_value(
                    &Term::Variable {
                        name,
                        location: location.clone(),
                    },
                    mode,
                    env,
                )?;
                let new = overflow(old.checked_add(step), &op_token.location)?;
                assign(name, new, location, env)?;
                new
            }
            _ => unreachable!(),
        };
        Ok(Term::Value(Value::Integer(result)))
    }

    /// Parses a binary expression with precedence climbing.
    pub fn parse_binary<E: Env>(
        &mut self,
        min_precedence: u8,
        mode: Mode,
        env: &mut E,
    ) -> Result<Term<'a>, Error<E::AssignVariableError>> {
        use Operator::*;
        let mut lhs = self.parse_unary(mode, env)?;

        loop {
            let (op, precedence) = match self.peek()? {
                Some(Token {
                    value: TokenValue::Operator(op),
                    ..
                }) => match binary_precedence(*op) {
                    Some(precedence) if precedence >= min_precedence => (*op, precedence),
                    _ => break,
                },
                _ => break,
            };
            let op_token = self.next_token()?.unwrap();
            let op_location = op_token.location;

            lhs = match op {
                AndAnd | BarBar => {
                    let left = into_value(&lhs, mode, env)? != 0;
                    let right_decides = if op == AndAnd { left } else { !left };
                    let rhs_mode = if mode == Mode::Eval && right_decides {
                        Mode::Eval
                    } else {
                        Mode::Skip
                    };
                    let rhs = self.parse_binary(precedence + 1, rhs_mode, env)?;
                    let result = if right_decides {
                        (into_value(&rhs, rhs_mode, env)? != 0) as i64
                    } else {
                        left as i64
                    };
                    Term::Value(Value::Integer(result))
                }
                Question => {
                    let condition = into_value(&lhs, mode, env)? != 0;
                    let then_mode = if mode == Mode::Eval && condition {
                        Mode::Eval
                    } else {
                        Mode::Skip
                    };
                    let else_mode = if mode == Mode::Eval && !condition {
                        Mode::Eval
                    } else {
                        Mode::Skip
                    };
                    let then_term = self.parse_binary(MIN_PRECEDENCE, then_mode, env)?;
                    match self.next_token()? {
                        Some(Token {
                            value: TokenValue::Operator(Colon),
                            ..
                        }) => {}
                        Some(token) => return error(ErrorCause::MissingColon, &token.location),
                        None => return self.incomplete(),
                    }
                    // Right-associative, like assignment
                    let else_term = self.parse_binary(precedence, else_mode, env)?;
                    let then_value = into_value(&then_term, then_mode, env)?;
                    let else_value = into_value(&else_term, else_mode, env)?;
                    let result = if condition { then_value } else { else_value };
                    Term::Value(Value::Integer(result))
                }
                op if assignment_operand(op).is_some() => {
                    // Right-associative
                    let rhs = self.parse_binary(precedence, mode, env)?;
                    if mode == Mode::Skip {
                        Term::Value(Value::Integer(0))
                    } else {
                        let rhs_value = into_value(&rhs, mode, env)?;
                        let (name, location) = require_variable(lhs, &op_location)?;
                        let new = match assignment_operand(op).unwrap() {
                            None => rhs_value,
                            Some(binary) => {
                                let old = into_value(
                                    &Term::Variable {
                                        name,
                                        location: location.clone(),
                                    },
                                    mode,
                                    env,
                                )?;
                                apply_binary(binary, old, rhs_value, &op_location)?
                            }
                        };
                        assign(name, new, location, env)?;
                        Term::Value(Value::Integer(new))
                    }
                }
                op => {
                    let rhs = self.parse_binary(precedence + 1, mode, env)?;
                    if mode == Mode::Skip {
                        Term::Value(Value::Integer(0))
                    } else {
                        let left = into_value(&lhs, mode, env)?;
                        let right = into_value(&rhs, mode, env)?;
                        Term::Value(Value::Integer(apply_binary(
                            op,
                            left,
                            right,
                            &op_location,
                        )?))
                    }
                }
            };
        }
        Ok(lhs)
    }

    /// Parses and evaluates a whole expression.
    pub fn eval_expression<E: Env>(
        &mut self,
        env: &mut E,
    ) -> Result<Value, Error<E::AssignVariableError>> {
        let term = self.parse_binary(MIN_PRECEDENCE, Mode::Eval, env)?;
        if let Some(token) = self.peek()? {
            let location = token.location.clone();
            return error(ErrorCause::UnexpectedToken, &location);
        }
        let value = into_value(&term, Mode::Eval, env)?;
        Ok(Value::Integer(value))
    }
}
