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

//! Syntax parsing
//!
//! The [`Parser`] reads tokens from the lexer and produces one complete
//! command at a time via [`next_command`](Parser::next_command). The shell
//! driver executes each command before parsing the next, so that commands
//! like `exit` take effect at the right time.
//!
//! Errors carry a [`SyntaxError`] cause and a location.
//! [`SyntaxError::is_incomplete`] distinguishes input that ended in the
//! middle of a construct from outright syntax errors; an interactive shell
//! responds to the former with a continuation prompt.

mod lex;

use self::lex::{Lexer, Operator, Token};
use crate::source::Location;
use crate::syntax::*;
use std::cell::OnceCell;
use std::rc::Rc;
use thiserror::Error as ThisError;

/// Cause of a syntax error
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum SyntaxError {
    /// Single quote without a closing quote
    #[error("unclosed single quote")]
    UnclosedSingleQuote,
    /// Double quote without a closing quote
    #[error("unclosed double quote")]
    UnclosedDoubleQuote,
    /// Backquote without a closing backquote
    #[error("unclosed backquote")]
    UnclosedBackquote,
    /// `$(` without a matching `)`
    #[error("unclosed command substitution")]
    UnclosedCommandSubst,
    /// `$((` without a matching `))`
    #[error("unclosed arithmetic expansion")]
    UnclosedArith,
    /// `${` without a matching `}`
    #[error("unclosed parameter expansion")]
    UnclosedBracedParam,
    /// Invalid character in a braced parameter expansion
    #[error("invalid parameter expansion")]
    InvalidModifier,
    /// Here-document content not terminated by its delimiter
    #[error("here-document delimited by end of input (wanted `{0}`)")]
    UnclosedHereDocContent(String),
    /// End of input where a token was required
    #[error("unexpected end of input (expected {0})")]
    UnexpectedEof(&'static str),
    /// Token that cannot appear where it did
    #[error("unexpected token `{0}`")]
    UnexpectedToken(String),
    /// Function body that is not a compound command
    #[error("invalid function body")]
    InvalidFunctionBody,
}

impl SyntaxError {
    /// Returns true if the error resulted from input ending in the middle
    /// of a construct.
    ///
    /// An interactive shell keeps reading continuation lines for an
    /// incomplete command instead of reporting the error.
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        use SyntaxError::*;
        matches!(
            self,
            UnclosedSingleQuote
                | UnclosedDoubleQuote
                | UnclosedBackquote
                | UnclosedCommandSubst
                | UnclosedArith
                | UnclosedBracedParam
                | UnclosedHereDocContent(_)
                | UnexpectedEof(_)
        )
    }
}

/// Syntax error with its location
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{cause}")]
pub struct Error {
    /// Cause of the error
    pub cause: SyntaxError,
    /// Location of the error
    pub location: Location,
}

impl Error {
    /// See [`SyntaxError::is_incomplete`].
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        self.cause.is_incomplete()
    }
}

/// Reserved words of the shell language
const RESERVED_WORDS: &[&str] = &[
    "!", "{", "}", "case", "do", "done", "elif", "else", "esac", "fi", "for", "if", "in", "then",
    "until", "while",
];

fn describe_token(token: &Token) -> String {
    match token {
        Token::Word(word) => word.to_string(),
        Token::IoNumber(n) => n.to_string(),
        Token::Operator(operator) => operator.as_str().to_string(),
        Token::Newline => "newline".to_string(),
        Token::EndOfInput => "end of input".to_string(),
    }
}

const fn is_redir_operator(operator: Operator) -> bool {
    use Operator::*;
    matches!(
        operator,
        Less | Greater
            | GreaterGreater
            | LessLess
            | LessLessDash
            | LessLessLess
            | LessAnd
            | GreaterAnd
            | LessGreater
            | Clobber
    )
}

/// Shell language parser
///
/// The parser produces one complete command per call to
/// [`next_command`](Self::next_command), reading tokens lazily so that
/// here-document contents and command boundaries line up with the source.
pub struct Parser {
    lexer: Lexer,
    peeked: Option<(Token, Location)>,
}

impl Parser {
    /// Creates a parser for the given source.
    #[must_use]
    pub fn new(source: &str) -> Self {
        Parser {
            lexer: Lexer::new(source),
            peeked: None,
        }
    }

    /// Parses the next complete command.
    ///
    /// Returns `None` when the input is exhausted.
    pub fn next_command(&mut self) -> Result<Option<List>, Error> {
        loop {
            match self.peek()? {
                Token::Newline => {
                    self.take()?;
                }
                Token::EndOfInput => return Ok(None),
                _ => break,
            }
        }
        let list = self.parse_complete_command()?;
        if matches!(self.peek()?, Token::Newline) {
            self.take()?;
        }
        Ok(Some(list))
    }

    /// Returns the source text not yet consumed.
    ///
    /// This is meaningful right after [`next_command`](Self::next_command)
    /// returns a command: the parser never reads past the newline that
    /// terminates a complete command, except to peek the end of input,
    /// which consumes no characters. The shell driver uses this to
    /// execute a command before parsing the rest of the input.
    #[must_use]
    pub fn remaining_source(&self) -> String {
        self.lexer.remaining_source()
    }

    /// Parses the entire input into a single list.
    pub fn parse_program(&mut self) -> Result<List, Error> {
        let mut items = Vec::new();
        while let Some(list) = self.next_command()? {
            items.extend(list.0);
        }
        Ok(List(items))
    }

    fn peek(&mut self) -> Result<&Token, Error> {
        if self.peeked.is_none() {
            self.peeked = Some(self.lexer.next_token()?);
        }
        Ok(&self.peeked.as_ref().unwrap().0)
    }

    fn peek_location(&mut self) -> Result<Location, Error> {
        self.peek()?;
        Ok(self.peeked.as_ref().unwrap().1)
    }

    fn take(&mut self) -> Result<(Token, Location), Error> {
        self.peek()?;
        Ok(self.peeked.take().unwrap())
    }

    fn unexpected<T>(&mut self) -> Result<T, Error> {
        let location = self.peek_location()?;
        let cause = match self.peek()? {
            Token::EndOfInput => SyntaxError::UnexpectedEof("a command"),
            token => SyntaxError::UnexpectedToken(describe_token(token)),
        };
        Err(Error { cause, location })
    }

    /// Returns the reserved word the next token spells, if any.
    fn peek_reserved(&mut self) -> Result<Option<&'static str>, Error> {
        if let Token::Word(word) = self.peek()? {
            if let Some(literal) = word.to_string_if_literal() {
                return Ok(RESERVED_WORDS
                    .iter()
                    .find(|&&reserved| reserved == literal)
                    .copied());
            }
        }
        Ok(None)
    }

    fn consume_reserved(&mut self, keyword: &str) -> Result<bool, Error> {
        if self.peek_reserved()? == Some(keyword) {
            self.take()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect_reserved(&mut self, keyword: &'static str) -> Result<(), Error> {
        if self.consume_reserved(keyword)? {
            return Ok(());
        }
        let location = self.peek_location()?;
        let cause = match self.peek()? {
            Token::EndOfInput => SyntaxError::UnexpectedEof(keyword),
            token => SyntaxError::UnexpectedToken(describe_token(token)),
        };
        Err(Error { cause, location })
    }

    fn consume_operator(&mut self, operator: Operator) -> Result<bool, Error> {
        if matches!(self.peek()?, Token::Operator(op) if *op == operator) {
            self.take()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect_operator(&mut self, operator: Operator) -> Result<(), Error> {
        if self.consume_operator(operator)? {
            return Ok(());
        }
        let location = self.peek_location()?;
        let cause = match self.peek()? {
            Token::EndOfInput => SyntaxError::UnexpectedEof(operator.as_str()),
            token => SyntaxError::UnexpectedToken(describe_token(token)),
        };
        Err(Error { cause, location })
    }

    fn expect_word(&mut self) -> Result<Word, Error> {
        if matches!(self.peek()?, Token::Word(_)) {
            let (Token::Word(word), _) = self.take()? else {
                unreachable!()
            };
            return Ok(word);
        }
        let location = self.peek_location()?;
        let cause = match self.peek()? {
            Token::EndOfInput => SyntaxError::UnexpectedEof("a word"),
            token => SyntaxError::UnexpectedToken(describe_token(token)),
        };
        Err(Error { cause, location })
    }

    fn skip_newlines(&mut self) -> Result<(), Error> {
        while matches!(self.peek()?, Token::Newline) {
            self.take()?;
        }
        Ok(())
    }

    /// Parses a list terminated by a newline or the end of input.
    fn parse_complete_command(&mut self) -> Result<List, Error> {
        let mut items = Vec::new();
        loop {
            let and_or = Rc::new(self.parse_and_or()?);
            let mut async_flag = None;
            match self.peek()? {
                Token::Operator(Operator::And) => {
                    async_flag = Some(self.take()?.1);
                }
                Token::Operator(Operator::Semicolon) => {
                    self.take()?;
                }
                _ => {}
            }
            items.push(Item {
                and_or,
                async_flag,
            });
            match self.peek()? {
                Token::Newline | Token::EndOfInput => break,
                _ => {}
            }
        }
        Ok(List(items))
    }

    /// Parses a list inside a compound command, where newlines separate
    /// items and a closing token ends the list.
    fn parse_compound_list(&mut self) -> Result<List, Error> {
        let mut items = Vec::new();
        loop {
            self.skip_newlines()?;
            if self.at_compound_list_end()? {
                break;
            }
            let and_or = Rc::new(self.parse_and_or()?);
            let mut async_flag = None;
            match self.peek()? {
                Token::Operator(Operator::And) => {
                    async_flag = Some(self.take()?.1);
                }
                Token::Operator(Operator::Semicolon) => {
                    self.take()?;
                }
                _ => {}
            }
            items.push(Item {
                and_or,
                async_flag,
            });
        }
        Ok(List(items))
    }

    fn at_compound_list_end(&mut self) -> Result<bool, Error> {
        Ok(match self.peek()? {
            Token::EndOfInput => true,
            Token::Operator(Operator::CloseParen | Operator::DoubleSemicolon) => true,
            _ => matches!(
                self.peek_reserved()?,
                Some("then" | "do" | "done" | "fi" | "else" | "elif" | "esac" | "}")
            ),
        })
    }

    fn parse_and_or(&mut self) -> Result<AndOrList, Error> {
        let first = self.parse_pipeline()?;
        let mut rest = Vec::new();
        loop {
            let condition = match self.peek()? {
                Token::Operator(Operator::AndAnd) => AndOr::AndThen,
                Token::Operator(Operator::BarBar) => AndOr::OrElse,
                _ => break,
            };
            self.take()?;
            self.skip_newlines()?;
            rest.push((condition, self.parse_pipeline()?));
        }
        Ok(AndOrList { first, rest })
    }

    fn parse_pipeline(&mut self) -> Result<Pipeline, Error> {
        let negation = self.consume_reserved("!")?;
        let mut commands = vec![Rc::new(self.parse_command()?)];
        while self.consume_operator(Operator::Bar)? {
            self.skip_newlines()?;
            commands.push(Rc::new(self.parse_command()?));
        }
        Ok(Pipeline { commands, negation })
    }

    fn parse_command(&mut self) -> Result<Command, Error> {
        match self.peek()? {
            Token::Operator(Operator::OpenParen) => return self.parse_full_compound(),
            Token::Operator(op) if is_redir_operator(*op) => {
                return self.parse_simple_command();
            }
            Token::IoNumber(_) => return self.parse_simple_command(),
            Token::Word(_) => {}
            _ => return self.unexpected(),
        }
        match self.peek_reserved()? {
            Some("{" | "if" | "while" | "until" | "for" | "case") => self.parse_full_compound(),
            Some(_) => self.unexpected(),
            None => self.parse_simple_command(),
        }
    }

    fn parse_full_compound(&mut self) -> Result<Command, Error> {
        let command = self.parse_compound_command()?;
        let mut redirs = Vec::new();
        loop {
            match self.peek()? {
                Token::IoNumber(_) => {
                    let (Token::IoNumber(n), _) = self.take()? else {
                        unreachable!()
                    };
                    redirs.push(self.parse_redir(Some(Fd(n)))?);
                }
                Token::Operator(op) if is_redir_operator(*op) => {
                    redirs.push(self.parse_redir(None)?);
                }
                _ => break,
            }
        }
        Ok(Command::Compound(FullCompoundCommand { command, redirs }))
    }

    fn parse_compound_command(&mut self) -> Result<CompoundCommand, Error> {
        if matches!(self.peek()?, Token::Operator(Operator::OpenParen)) {
            let location = self.take()?.1;
            let body = self.parse_compound_list()?;
            self.expect_operator(Operator::CloseParen)?;
            return Ok(CompoundCommand::Subshell {
                body: Rc::new(body),
                location,
            });
        }

        if self.consume_reserved("{")? {
            let body = self.parse_compound_list()?;
            self.expect_reserved("}")?;
            return Ok(CompoundCommand::Grouping(body));
        }

        if self.consume_reserved("if")? {
            let condition = self.parse_compound_list()?;
            self.expect_reserved("then")?;
            let body = self.parse_compound_list()?;
            let mut elifs = Vec::new();
            while self.consume_reserved("elif")? {
                let condition = self.parse_compound_list()?;
                self.expect_reserved("then")?;
                let body = self.parse_compound_list()?;
                elifs.push(ElifThen { condition, body });
            }
            let r#else = if self.consume_reserved("else")? {
                Some(self.parse_compound_list()?)
            } else {
                None
            };
            self.expect_reserved("fi")?;
            return Ok(CompoundCommand::If {
                condition,
                body,
                elifs,
                r#else,
            });
        }

        if self.consume_reserved("while")? {
            let condition = self.parse_compound_list()?;
            self.expect_reserved("do")?;
            let body = self.parse_compound_list()?;
            self.expect_reserved("done")?;
            return Ok(CompoundCommand::While { condition, body });
        }

        if self.consume_reserved("until")? {
            let condition = self.parse_compound_list()?;
            self.expect_reserved("do")?;
            let body = self.parse_compound_list()?;
            self.expect_reserved("done")?;
            return Ok(CompoundCommand::Until { condition, body });
        }

        if self.consume_reserved("for")? {
            return self.parse_for();
        }

        if self.consume_reserved("case")? {
            return self.parse_case();
        }

        self.unexpected()
    }

    fn parse_for(&mut self) -> Result<CompoundCommand, Error> {
        let name = self.expect_word()?;
        self.skip_newlines()?;
        let values = if self.consume_reserved("in")? {
            let mut values = Vec::new();
            while matches!(self.peek()?, Token::Word(_)) {
                values.push(self.expect_word()?);
            }
            self.consume_operator(Operator::Semicolon)?;
            self.skip_newlines()?;
            Some(values)
        } else {
            self.consume_operator(Operator::Semicolon)?;
            self.skip_newlines()?;
            None
        };
        self.expect_reserved("do")?;
        let body = self.parse_compound_list()?;
        self.expect_reserved("done")?;
        Ok(CompoundCommand::For { name, values, body })
    }

    fn parse_case(&mut self) -> Result<CompoundCommand, Error> {
        let subject = self.expect_word()?;
        self.skip_newlines()?;
        self.expect_reserved("in")?;
        let mut items = Vec::new();
        loop {
            self.skip_newlines()?;
            if self.consume_reserved("esac")? {
                break;
            }
            self.consume_operator(Operator::OpenParen)?;
            let mut patterns = vec![self.expect_word()?];
            while self.consume_operator(Operator::Bar)? {
                patterns.push(self.expect_word()?);
            }
            self.expect_operator(Operator::CloseParen)?;
            let body = self.parse_compound_list()?;
            let terminated = self.consume_operator(Operator::DoubleSemicolon)?;
            items.push(CaseItem { patterns, body });
            if !terminated {
                self.skip_newlines()?;
                self.expect_reserved("esac")?;
                break;
            }
        }
        Ok(CompoundCommand::Case { subject, items })
    }

    fn parse_simple_command(&mut self) -> Result<Command, Error> {
        let mut assigns = Vec::new();
        let mut words: Vec<Word> = Vec::new();
        let mut redirs = Vec::new();
        loop {
            match self.peek()? {
                Token::IoNumber(_) => {
                    let (Token::IoNumber(n), _) = self.take()? else {
                        unreachable!()
                    };
                    redirs.push(self.parse_redir(Some(Fd(n)))?);
                }
                Token::Operator(op) if is_redir_operator(*op) => {
                    redirs.push(self.parse_redir(None)?);
                }
                Token::Word(_) => {
                    let (Token::Word(word), location) = self.take()? else {
                        unreachable!()
                    };

                    // A literal name followed by `()` begins a function
                    // definition.
                    if assigns.is_empty() && redirs.is_empty() && words.is_empty() {
                        if let Some(name) = word.to_string_if_literal() {
                            if is_name(&name)
                                && matches!(self.peek()?, Token::Operator(Operator::OpenParen))
                            {
                                self.take()?;
                                self.expect_operator(Operator::CloseParen)?;
                                self.skip_newlines()?;
                                let body = self.parse_function_body()?;
                                return Ok(Command::Function(FunctionDefinition {
                                    name,
                                    body: Rc::new(body),
                                    location,
                                }));
                            }
                        }
                    }

                    if words.is_empty() {
                        match Assign::try_from(word) {
                            Ok(assign) => assigns.push(assign),
                            Err(word) => words.push(word),
                        }
                    } else {
                        words.push(word);
                    }
                }
                _ => break,
            }
        }
        Ok(Command::Simple(SimpleCommand {
            assigns,
            words,
            redirs: Rc::new(redirs),
        }))
    }

    fn parse_function_body(&mut self) -> Result<FullCompoundCommand, Error> {
        let location = self.peek_location()?;
        match self.parse_command()? {
            Command::Compound(full) => Ok(full),
            _ => Err(Error {
                cause: SyntaxError::InvalidFunctionBody,
                location,
            }),
        }
    }

    fn parse_redir(&mut self, fd: Option<Fd>) -> Result<Redir, Error> {
        let (token, _) = self.take()?;
        let Token::Operator(operator) = token else {
            unreachable!("parse_redir called on a non-operator token")
        };
        use Operator::*;
        let operator = match operator {
            LessLess | LessLessDash => {
                let delimiter = self.expect_word()?;
                let here_doc = Rc::new(HereDoc {
                    delimiter,
                    remove_tabs: operator == LessLessDash,
                    content: OnceCell::new(),
                });
                self.lexer.register_heredoc(Rc::clone(&here_doc));
                return Ok(Redir {
                    fd,
                    body: RedirBody::HereDoc(here_doc),
                });
            }
            Less => RedirOp::FileIn,
            Greater => RedirOp::FileOut,
            GreaterGreater => RedirOp::FileAppend,
            LessGreater => RedirOp::FileInOut,
            Clobber => RedirOp::FileClobber,
            LessAnd => RedirOp::FdIn,
            GreaterAnd => RedirOp::FdOut,
            LessLessLess => RedirOp::String,
            _ => unreachable!("not a redirection operator: {operator:?}"),
        };
        let operand = self.expect_word()?;
        Ok(Redir {
            fd,
            body: RedirBody::Normal { operator, operand },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn parse_one(source: &str) -> List {
        Parser::new(source)
            .next_command()
            .expect("parse error")
            .expect("no command")
    }

    #[test]
    fn empty_input() {
        assert_eq!(Parser::new("").next_command().unwrap(), None);
        assert_eq!(Parser::new("\n\n").next_command().unwrap(), None);
        assert_eq!(Parser::new("# only a comment\n").next_command().unwrap(), None);
    }

    #[test]
    fn simple_command_round_trip() {
        assert_eq!(parse_one("echo hello world").to_string(), "echo hello world");
    }

    #[test]
    fn assignments_and_words() {
        let list = parse_one("x=1 y=2 cmd arg");
        assert_eq!(list.to_string(), "x=1 y=2 cmd arg");
        let item = &list.0[0];
        assert_matches!(&*item.and_or.first.commands[0], Command::Simple(sc) => {
            assert_eq!(sc.assigns.len(), 2);
            assert_eq!(sc.words.len(), 2);
        });
    }

    #[test]
    fn assignment_after_command_word_is_a_word() {
        let list = parse_one("cmd x=1");
        assert_matches!(&*list.0[0].and_or.first.commands[0], Command::Simple(sc) => {
            assert_eq!(sc.assigns.len(), 0);
            assert_eq!(sc.words.len(), 2);
        });
    }

    #[test]
    fn pipeline_and_negation() {
        let list = parse_one("! cat file | grep x | wc -l");
        let pipeline = &list.0[0].and_or.first;
        assert!(pipeline.negation);
        assert_eq!(pipeline.commands.len(), 3);
    }

    #[test]
    fn and_or_list() {
        let list = parse_one("false && echo a || echo b");
        let and_or = &list.0[0].and_or;
        assert_eq!(and_or.rest.len(), 2);
        assert_eq!(and_or.rest[0].0, AndOr::AndThen);
        assert_eq!(and_or.rest[1].0, AndOr::OrElse);
    }

    #[test]
    fn newline_allowed_after_and_or_operator() {
        let list = parse_one("true &&\nfalse");
        assert_eq!(list.0[0].and_or.rest.len(), 1);
    }

    #[test]
    fn async_item() {
        let list = parse_one("sleep 10 & echo done");
        assert!(list.0[0].async_flag.is_some());
        assert!(list.0[1].async_flag.is_none());
    }

    #[test]
    fn semicolon_separates_items() {
        let list = parse_one("a; b; c");
        assert_eq!(list.0.len(), 3);
    }

    #[test]
    fn subshell() {
        let list = parse_one("(echo a; echo b)");
        assert_matches!(&*list.0[0].and_or.first.commands[0], Command::Compound(full) => {
            assert_matches!(&full.command, CompoundCommand::Subshell { body, .. } => {
                assert_eq!(body.0.len(), 2);
            });
        });
    }

    #[test]
    fn brace_group() {
        let list = parse_one("{ echo a; }");
        assert_matches!(&*list.0[0].and_or.first.commands[0], Command::Compound(full) => {
            assert_matches!(&full.command, CompoundCommand::Grouping(body) => {
                assert_eq!(body.0.len(), 1);
            });
        });
    }

    #[test]
    fn if_command() {
        let list = parse_one("if true; then echo a; elif false; then echo b; else echo c; fi");
        assert_matches!(&*list.0[0].and_or.first.commands[0], Command::Compound(full) => {
            assert_matches!(&full.command, CompoundCommand::If { elifs, r#else, .. } => {
                assert_eq!(elifs.len(), 1);
                assert!(r#else.is_some());
            });
        });
    }

    #[test]
    fn while_loop() {
        let list = parse_one("while test -f x; do sleep 1; done");
        assert_matches!(&*list.0[0].and_or.first.commands[0], Command::Compound(full) => {
            assert_matches!(&full.command, CompoundCommand::While { .. });
        });
    }

    #[test]
    fn for_loop_with_values() {
        let list = parse_one("for f in a b c; do echo \"<$f>\"; done");
        assert_matches!(&*list.0[0].and_or.first.commands[0], Command::Compound(full) => {
            assert_matches!(&full.command, CompoundCommand::For { values, .. } => {
                assert_eq!(values.as_ref().unwrap().len(), 3);
            });
        });
    }

    #[test]
    fn for_loop_without_values() {
        let list = parse_one("for arg do echo \"$arg\"; done");
        assert_matches!(&*list.0[0].and_or.first.commands[0], Command::Compound(full) => {
            assert_matches!(&full.command, CompoundCommand::For { values, .. } => {
                assert_eq!(values, &None);
            });
        });
    }

    #[test]
    fn case_command() {
        let list = parse_one("case $x in a|b) echo ab;; (*) echo other;; esac");
        assert_matches!(&*list.0[0].and_or.first.commands[0], Command::Compound(full) => {
            assert_matches!(&full.command, CompoundCommand::Case { items, .. } => {
                assert_eq!(items.len(), 2);
                assert_eq!(items[0].patterns.len(), 2);
            });
        });
    }

    #[test]
    fn case_with_last_item_unterminated() {
        let list = parse_one("case x in y) echo y; esac");
        assert_matches!(&*list.0[0].and_or.first.commands[0], Command::Compound(full) => {
            assert_matches!(&full.command, CompoundCommand::Case { items, .. } => {
                assert_eq!(items.len(), 1);
            });
        });
    }

    #[test]
    fn function_definition() {
        let list = parse_one("greet() { echo hi; }");
        assert_matches!(&*list.0[0].and_or.first.commands[0], Command::Function(def) => {
            assert_eq!(def.name, "greet");
        });
    }

    #[test]
    fn redirections_on_simple_command() {
        let list = parse_one("cmd <in >out 2>>log");
        assert_matches!(&*list.0[0].and_or.first.commands[0], Command::Simple(sc) => {
            assert_eq!(sc.redirs.len(), 3);
            assert_eq!(sc.redirs[2].fd, Some(Fd(2)));
        });
    }

    #[test]
    fn redirection_on_compound_command() {
        let list = parse_one("{ echo a; } >out");
        assert_matches!(&*list.0[0].and_or.first.commands[0], Command::Compound(full) => {
            assert_eq!(full.redirs.len(), 1);
        });
    }

    #[test]
    fn here_document() {
        let mut parser = Parser::new("cat <<EOF\nhello $x\nEOF\necho after\n");
        let list = parser.next_command().unwrap().unwrap();
        assert_matches!(&*list.0[0].and_or.first.commands[0], Command::Simple(sc) => {
            assert_matches!(&sc.redirs[0].body, RedirBody::HereDoc(here_doc) => {
                let content = here_doc.content.get().unwrap();
                assert_eq!(content.to_string(), "hello $x\n");
                assert_matches!(&content.0[6], RawParam { param, .. } => {
                    assert_eq!(param.id, "x");
                });
            });
        });
        let next = parser.next_command().unwrap().unwrap();
        assert_eq!(next.to_string(), "echo after");
    }

    #[test]
    fn two_here_documents_on_one_line() {
        let mut parser = Parser::new("cat <<ONE; cat <<TWO\n1\nONE\n2\nTWO\n");
        let list = parser.next_command().unwrap().unwrap();
        assert_eq!(list.0.len(), 2);
    }

    #[test]
    fn incomplete_inputs() {
        for source in [
            "if true; then",
            "while true; do",
            "for f in a b",
            "case x in",
            "( echo a",
            "{ echo a;",
            "echo 'unclosed",
            "echo \"unclosed",
            "echo $(cmd",
            "echo ${x",
            "cat <<EOF\nbody",
            "echo a &&",
            "echo a |",
        ] {
            let error = Parser::new(source).next_command().unwrap_err();
            assert!(error.is_incomplete(), "{source}: {error:?}");
        }
    }

    #[test]
    fn syntax_errors_are_not_incomplete() {
        for source in ["echo )", ";;", "fi", "if; then :; fi"] {
            let error = Parser::new(source).next_command().unwrap_err();
            assert!(!error.is_incomplete(), "{source}: {error:?}");
        }
    }

    #[test]
    fn parse_program_concatenates_commands() {
        let list = Parser::new("echo a\necho b\n")
            .parse_program()
            .unwrap();
        assert_eq!(list.0.len(), 2);
    }

    #[test]
    fn reserved_word_only_in_command_position() {
        let list = parse_one("echo if then fi");
        assert_eq!(list.to_string(), "echo if then fi");
    }
}
