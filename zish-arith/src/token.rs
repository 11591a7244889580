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

//! Tokenization of arithmetic expressions

use std::fmt::Display;
use std::iter::Peekable;
use std::ops::Range;
use std::str::CharIndices;
use thiserror::Error as ThisError;

/// Cause of a tokenization error
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, ThisError)]
pub enum TokenError {
    /// Numeric constant that cannot be parsed as an integer
    #[error("invalid numeric constant")]
    InvalidNumericConstant,

    /// Character that is not part of any token
    #[error("unrecognized character {0:?}")]
    UnrecognizedChar(char),
}

/// Tokenization error with its position
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Error {
    /// Cause of the error
    pub cause: TokenError,
    /// Range of the offending substring in the expression
    pub location: Range<usize>,
}

/// Result of evaluation
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Value {
    /// 64-bit signed integer
    Integer(i64),
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(i) => i.fmt(f),
        }
    }
}

/// Operand that may be an unresolved variable
///
/// Variables are kept unresolved until their value is needed so that they
/// can serve as assignment targets.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Term<'a> {
    /// Constant value
    Value(Value),
    /// Variable reference
    Variable {
        /// Name of the variable
        name: &'a str,
        /// Range of the name in the expression
        location: Range<usize>,
    },
}

/// Operator token
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[allow(clippy::enum_variant_names)]
pub enum Operator {
    OpenParen,
    CloseParen,
    Question,
    Colon,
    BarBar,
    AndAnd,
    Bar,
    Caret,
    And,
    EqualEqual,
    BangEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    LessLess,
    GreaterGreater,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    Tilde,
    PlusPlus,
    MinusMinus,
    Equal,
    PlusEqual,
    MinusEqual,
    StarEqual,
    SlashEqual,
    PercentEqual,
    LessLessEqual,
    GreaterGreaterEqual,
    AndEqual,
    CaretEqual,
    BarEqual,
}

/// Operator spellings; the longest spelling that matches is chosen.
const OPERATORS: &[(&str, Operator)] = &[
    ("(", Operator::OpenParen),
    (")", Operator::CloseParen),
    ("?", Operator::Question),
    (":", Operator::Colon),
    ("||", Operator::BarBar),
    ("|=", Operator::BarEqual),
    ("|", Operator::Bar),
    ("&&", Operator::AndAnd),
    ("&=", Operator::AndEqual),
    ("&", Operator::And),
    ("^=", Operator::CaretEqual),
    ("^", Operator::Caret),
    ("==", Operator::EqualEqual),
    ("=", Operator::Equal),
    ("!=", Operator::BangEqual),
    ("!", Operator::Bang),
    ("<<=", Operator::LessLessEqual),
    ("<<", Operator::LessLess),
    ("<=", Operator::LessEqual),
    ("<", Operator::Less),
    (">>=", Operator::GreaterGreaterEqual),
    (">>", Operator::GreaterGreater),
    (">=", Operator::GreaterEqual),
    (">", Operator::Greater),
    ("++", Operator::PlusPlus),
    ("+=", Operator::PlusEqual),
    ("+", Operator::Plus),
    ("--", Operator::MinusMinus),
    ("-=", Operator::MinusEqual),
    ("-", Operator::Minus),
    ("*=", Operator::StarEqual),
    ("*", Operator::Star),
    ("/=", Operator::SlashEqual),
    ("/", Operator::Slash),
    ("%=", Operator::PercentEqual),
    ("%", Operator::Percent),
    ("~", Operator::Tilde),
];

/// Value of a token
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TokenValue<'a> {
    /// Operand
    Term(Term<'a>),
    /// Operator
    Operator(Operator),
}

/// Token with its position in the expression
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token<'a> {
    /// Token value
    pub value: TokenValue<'a>,
    /// Range of the token in the expression
    pub location: Range<usize>,
}

/// Iterator over tokens in an expression
#[derive(Clone, Debug)]
pub struct Tokens<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Tokens<'a> {
    /// Creates a tokenizer for the given expression.
    pub fn new(source: &'a str) -> Self {
        Tokens {
            source,
            chars: source.char_indices().peekable(),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(&(_, c)) = self.chars.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.chars.next();
        }
    }

    fn next_index(&mut self) -> usize {
        match self.chars.peek() {
            Some(&(i, _)) => i,
            None => self.source.len(),
        }
    }

    fn numeric_constant(&mut self, start: usize) -> Result<Token<'a>, Error> {
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_ascii_alphanumeric() {
                self.chars.next();
            } else {
                break;
            }
        }
        let end = self.next_index();
        let location = start..end;
        let text = &self.source[location.clone()];

        let parsed = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X"))
        {
            i64::from_str_radix(hex, 16)
        } else if text != "0" && text.starts_with('0') {
            i64::from_str_radix(&text[1..], 8)
        } else {
            text.parse()
        };
        match parsed {
            Ok(i) => Ok(Token {
                value: TokenValue::Term(Term::Value(Value::Integer(i))),
                location,
            }),
            Err(_) => Err(Error {
                cause: TokenError::InvalidNumericConstant,
                location,
            }),
        }
    }

    fn identifier(&mut self, start: usize) -> Token<'a> {
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.chars.next();
            } else {
                break;
            }
        }
        let end = self.next_index();
        let location = start..end;
        Token {
            value: TokenValue::Term(Term::Variable {
                name: &self.source[location.clone()],
                location: location.clone(),
            }),
            location,
        }
    }

    fn operator(&mut self, start: usize) -> Result<Token<'a>, Error> {
        let rest = &self.source[start..];
        let longest = OPERATORS
            .iter()
            .filter(|(spelling, _)| rest.starts_with(spelling))
            .max_by_key(|(spelling, _)| spelling.len());
        match longest {
            Some(&(spelling, operator)) => {
                for _ in 0..spelling.chars().count() {
                    self.chars.next();
                }
                Ok(Token {
                    value: TokenValue::Operator(operator),
                    location: start..start + spelling.len(),
                })
            }
            None => {
                let (_, c) = self.chars.next().unwrap();
                Err(Error {
                    cause: TokenError::UnrecognizedChar(c),
                    location: start..start + c.len_utf8(),
                })
            }
        }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Result<Token<'a>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_whitespace();
        let &(start, c) = self.chars.peek()?;
        if c.is_ascii_digit() {
            Some(self.numeric_constant(start))
        } else if c.is_ascii_alphabetic() || c == '_' {
            Some(Ok(self.identifier(start)))
        } else {
            Some(self.operator(start))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<TokenValue<'_>> {
        Tokens::new(source).map(|t| t.unwrap().value).collect()
    }

    #[test]
    fn decimal_constant() {
        assert_eq!(
            tokens("42"),
            [TokenValue::Term(Term::Value(Value::Integer(42)))]
        );
    }

    #[test]
    fn octal_constant() {
        assert_eq!(
            tokens("0755"),
            [TokenValue::Term(Term::Value(Value::Integer(0o755)))]
        );
        assert_eq!(
            tokens("0"),
            [TokenValue::Term(Term::Value(Value::Integer(0)))]
        );
    }

    #[test]
    fn hexadecimal_constant() {
        assert_eq!(
            tokens("0x1F"),
            [TokenValue::Term(Term::Value(Value::Integer(0x1F)))]
        );
    }

    #[test]
    fn malformed_constant() {
        let result = Tokens::new("08").next().unwrap();
        assert_eq!(result.unwrap_err().cause, TokenError::InvalidNumericConstant);
        let result = Tokens::new("1x").next().unwrap();
        assert_eq!(result.unwrap_err().cause, TokenError::InvalidNumericConstant);
    }

    #[test]
    fn identifier_token() {
        assert_eq!(
            tokens("foo_1"),
            [TokenValue::Term(Term::Variable {
                name: "foo_1",
                location: 0..5,
            })]
        );
    }

    #[test]
    fn longest_operator_match() {
        assert_eq!(
            tokens("<<= << <= <"),
            [
                TokenValue::Operator(Operator::LessLessEqual),
                TokenValue::Operator(Operator::LessLess),
                TokenValue::Operator(Operator::LessEqual),
                TokenValue::Operator(Operator::Less),
            ]
        );
    }

    #[test]
    fn increment_is_not_two_pluses() {
        assert_eq!(
            tokens("a+++b"),
            [
                TokenValue::Term(Term::Variable {
                    name: "a",
                    location: 0..1,
                }),
                TokenValue::Operator(Operator::PlusPlus),
                TokenValue::Operator(Operator::Plus),
                TokenValue::Term(Term::Variable {
                    name: "b",
                    location: 4..5,
                }),
            ]
        );
    }

    #[test]
    fn unrecognized_character() {
        let result = Tokens::new("@").next().unwrap();
        assert_eq!(result.unwrap_err().cause, TokenError::UnrecognizedChar('@'));
    }
}
