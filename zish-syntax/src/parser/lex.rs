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

//! Lexical analysis
//!
//! The lexer turns source characters into the tokens consumed by the
//! parser: words (with their quoting and expansion structure already
//! resolved), operators, newlines, and io-numbers. Here-document bodies
//! are not part of the token stream; the parser registers pending
//! here-documents with the lexer, which fills their contents upon
//! consuming the next newline.

use crate::parser::{Error, SyntaxError};
use crate::source::Location;
use crate::syntax::*;
use std::rc::Rc;

/// Operator token
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Operator {
    /// `;`
    Semicolon,
    /// `;;`
    DoubleSemicolon,
    /// `&`
    And,
    /// `&&`
    AndAnd,
    /// `|`
    Bar,
    /// `||`
    BarBar,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `>>`
    GreaterGreater,
    /// `<<`
    LessLess,
    /// `<<-`
    LessLessDash,
    /// `<<<`
    LessLessLess,
    /// `<&`
    LessAnd,
    /// `>&`
    GreaterAnd,
    /// `<>`
    LessGreater,
    /// `>|`
    Clobber,
}

impl Operator {
    pub(crate) const fn as_str(self) -> &'static str {
        use Operator::*;
        match self {
            Semicolon => ";",
            DoubleSemicolon => ";;",
            And => "&",
            AndAnd => "&&",
            Bar => "|",
            BarBar => "||",
            OpenParen => "(",
            CloseParen => ")",
            Less => "<",
            Greater => ">",
            GreaterGreater => ">>",
            LessLess => "<<",
            LessLessDash => "<<-",
            LessLessLess => "<<<",
            LessAnd => "<&",
            GreaterAnd => ">&",
            LessGreater => "<>",
            Clobber => ">|",
        }
    }
}

/// Token produced by the lexer
#[derive(Clone, Debug)]
pub(crate) enum Token {
    /// Word token
    Word(Word),
    /// Digit sequence immediately preceding a redirection operator
    IoNumber(i32),
    /// Operator token
    Operator(Operator),
    /// Newline
    Newline,
    /// End of input
    EndOfInput,
}

/// Characters that delimit an unquoted word
fn is_word_delimiter(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | ';' | '&' | '|' | '(' | ')' | '<' | '>')
}

/// Lexer over a source string
pub(crate) struct Lexer {
    chars: Vec<char>,
    index: usize,
    /// Indices into `chars` where each line begins
    line_starts: Vec<usize>,
    /// Here-documents whose contents are read at the next newline
    pending_heredocs: Vec<Rc<HereDoc>>,
}

impl Lexer {
    pub(crate) fn new(source: &str) -> Self {
        let chars: Vec<char> = source.chars().collect();
        let mut line_starts = vec![0];
        for (i, &c) in chars.iter().enumerate() {
            if c == '\n' {
                line_starts.push(i + 1);
            }
        }
        Lexer {
            chars,
            index: 0,
            line_starts,
            pending_heredocs: Vec::new(),
        }
    }

    /// Returns the location of the current position.
    pub(crate) fn location(&self) -> Location {
        self.location_at(self.index)
    }

    fn location_at(&self, index: usize) -> Location {
        let line = self.line_starts.partition_point(|&start| start <= index);
        let column = index - self.line_starts[line - 1] + 1;
        Location::new(line as u64, column as u64)
    }

    fn error<T>(&self, cause: SyntaxError) -> Result<T, Error> {
        Err(Error {
            cause,
            location: self.location(),
        })
    }

    fn peek_char(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.index + offset).copied()
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.peek_char();
        if c.is_some() {
            self.index += 1;
        }
        c
    }

    /// Consumes the given string if it is next in the input.
    fn consume(&mut self, s: &str) -> bool {
        let mut offset = 0;
        for c in s.chars() {
            if self.peek_char_at(offset) != Some(c) {
                return false;
            }
            offset += 1;
        }
        self.index += offset;
        true
    }

    /// Skips blanks, line continuations, and comments.
    fn skip_blanks_and_comment(&mut self) {
        loop {
            match self.peek_char() {
                Some(' ' | '\t') => {
                    self.index += 1;
                }
                Some('\\') if self.peek_char_at(1) == Some('\n') => {
                    self.index += 2;
                }
                Some('#') => {
                    while !matches!(self.peek_char(), None | Some('\n')) {
                        self.index += 1;
                    }
                }
                _ => return,
            }
        }
    }

    /// Registers a here-document whose content is read at the next
    /// newline.
    pub(crate) fn register_heredoc(&mut self, heredoc: Rc<HereDoc>) {
        self.pending_heredocs.push(heredoc);
    }

    /// Returns the source text after the current position.
    pub(crate) fn remaining_source(&self) -> String {
        self.chars[self.index..].iter().collect()
    }

    /// Reads the next token.
    pub(crate) fn next_token(&mut self) -> Result<(Token, Location), Error> {
        self.skip_blanks_and_comment();
        let location = self.location();
        let Some(c) = self.peek_char() else {
            if let Some(heredoc) = self.pending_heredocs.first() {
                let (delimiter, _) = heredoc.delimiter.unquote();
                return self.error(SyntaxError::UnclosedHereDocContent(delimiter));
            }
            return Ok((Token::EndOfInput, location));
        };

        if c == '\n' {
            self.index += 1;
            for heredoc in std::mem::take(&mut self.pending_heredocs) {
                self.read_heredoc_body(&heredoc)?;
            }
            return Ok((Token::Newline, location));
        }

        if let Some(operator) = self.operator_token() {
            return Ok((Token::Operator(operator), location));
        }

        let word = self.read_word(is_word_delimiter)?;
        if let Some(literal) = word.to_string_if_literal() {
            if !literal.is_empty()
                && literal.chars().all(|c| c.is_ascii_digit())
                && matches!(self.peek_char(), Some('<' | '>'))
            {
                if let Ok(fd) = literal.parse() {
                    return Ok((Token::IoNumber(fd), location));
                }
            }
        }
        Ok((Token::Word(word), location))
    }

    fn operator_token(&mut self) -> Option<Operator> {
        use Operator::*;
        const OPERATORS: &[(&str, Operator)] = &[
            ("<<<", LessLessLess),
            ("<<-", LessLessDash),
            ("<<", LessLess),
            ("<&", LessAnd),
            ("<>", LessGreater),
            ("<", Less),
            (">>", GreaterGreater),
            (">&", GreaterAnd),
            (">|", Clobber),
            (">", Greater),
            ("&&", AndAnd),
            ("&", And),
            ("||", BarBar),
            ("|", Bar),
            (";;", DoubleSemicolon),
            (";", Semicolon),
            ("(", OpenParen),
            (")", CloseParen),
        ];
        OPERATORS
            .iter()
            .find(|&&(spelling, _)| self.consume(spelling))
            .map(|&(_, operator)| operator)
    }

    /// Reads a word, stopping at the first unquoted character for which
    /// `is_delimiter` returns true.
    ///
    /// A leading tilde prefix is converted to a [`Tilde`] unit.
    pub(crate) fn read_word(
        &mut self,
        is_delimiter: fn(char) -> bool,
    ) -> Result<Word, Error> {
        let location = self.location();
        let mut units = Vec::new();
        while let Some(c) = self.peek_char() {
            if is_delimiter(c) {
                break;
            }
            self.index += 1;
            match c {
                '\\' => match self.next_char() {
                    None => units.push(Unquoted(Literal('\\'))),
                    Some('\n') => {}
                    Some(c) => units.push(Unquoted(Backslashed(c))),
                },
                '\'' => units.push(SingleQuote(self.single_quote_body()?)),
                '"' => units.push(DoubleQuote(self.double_quote_body()?)),
                '$' => units.push(Unquoted(self.dollar_unit()?)),
                '`' => units.push(Unquoted(self.backquote_unit()?)),
                c => units.push(Unquoted(Literal(c))),
            }
        }
        let mut word = Word { units, location };
        word.parse_tilde_front();
        Ok(word)
    }

    /// Reads the body of a single-quoted string, after the opening quote.
    fn single_quote_body(&mut self) -> Result<String, Error> {
        let mut body = String::new();
        loop {
            match self.next_char() {
                Some('\'') => return Ok(body),
                Some(c) => body.push(c),
                None => return self.error(SyntaxError::UnclosedSingleQuote),
            }
        }
    }

    /// Reads the body of a double-quoted string, after the opening quote.
    fn double_quote_body(&mut self) -> Result<Text, Error> {
        let mut units = Vec::new();
        loop {
            match self.next_char() {
                Some('"') => return Ok(Text(units)),
                Some('\\') => match self.peek_char() {
                    Some(c @ ('$' | '`' | '"' | '\\')) => {
                        self.index += 1;
                        units.push(Backslashed(c));
                    }
                    Some('\n') => {
                        self.index += 1;
                    }
                    _ => units.push(Literal('\\')),
                },
                Some('$') => units.push(self.dollar_unit()?),
                Some('`') => units.push(self.backquote_unit()?),
                Some(c) => units.push(Literal(c)),
                None => return self.error(SyntaxError::UnclosedDoubleQuote),
            }
        }
    }

    /// Reads a text unit starting with `$`, after the dollar sign.
    fn dollar_unit(&mut self) -> Result<TextUnit, Error> {
        let location = self.location();
        match self.peek_char() {
            Some('{') => {
                self.index += 1;
                self.braced_param(location).map(TextUnit::BracedParam)
            }
            Some('(') => {
                self.index += 1;
                if self.peek_char() == Some('(') {
                    self.index += 1;
                    if let Some(content) = self.try_scan_arith() {
                        let content = parse_text_content(&content);
                        return Ok(Arith { content, location });
                    }
                    // Not arithmetic after all; rescan as a command
                    // substitution from the second parenthesis.
                    self.index -= 1;
                }
                let content = self.scan_command_subst()?;
                Ok(CommandSubst {
                    content: Rc::from(content),
                    location,
                })
            }
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                let mut id = String::new();
                while let Some(c) = self.peek_char() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        id.push(c);
                        self.index += 1;
                    } else {
                        break;
                    }
                }
                Ok(RawParam {
                    param: Param::from_id(id),
                    location,
                })
            }
            Some(c) if c.is_ascii_digit() => {
                self.index += 1;
                Ok(RawParam {
                    param: Param::from_id(c.to_string()),
                    location,
                })
            }
            Some(c) if SpecialParam::from_char(c).is_some() => {
                self.index += 1;
                Ok(RawParam {
                    param: Param::from_id(c.to_string()),
                    location,
                })
            }
            _ => Ok(Literal('$')),
        }
    }

    /// Parses a braced parameter expansion, after the `${`.
    fn braced_param(&mut self, location: Location) -> Result<BracedParam, Error> {
        let mut modifier_is_length = false;
        if self.peek_char() == Some('#') {
            // `${#}` is the special parameter; `${#x}` is a length.
            match self.peek_char_at(1) {
                Some('}') | None => {}
                _ => {
                    modifier_is_length = true;
                    self.index += 1;
                }
            }
        }

        let param = self.braced_param_id()?;

        if modifier_is_length {
            return match self.next_char() {
                Some('}') => Ok(BracedParam {
                    param,
                    modifier: Modifier::Length,
                    location,
                }),
                Some(_) => self.error(SyntaxError::InvalidModifier),
                None => self.error(SyntaxError::UnclosedBracedParam),
            };
        }

        let modifier = match self.peek_char() {
            Some('}') => {
                self.index += 1;
                return Ok(BracedParam {
                    param,
                    modifier: Modifier::None,
                    location,
                });
            }
            Some(':') => {
                self.index += 1;
                let r#type = match self.next_char() {
                    Some('-') => SwitchType::Default,
                    Some('=') => SwitchType::Assign,
                    Some('?') => SwitchType::Error,
                    Some('+') => SwitchType::Alter,
                    Some(_) => return self.error(SyntaxError::InvalidModifier),
                    None => return self.error(SyntaxError::UnclosedBracedParam),
                };
                let word = self.braced_param_word()?;
                Modifier::Switch(Switch {
                    r#type,
                    condition: SwitchCondition::UnsetOrEmpty,
                    word,
                })
            }
            Some(c @ ('-' | '=' | '?' | '+')) => {
                self.index += 1;
                let r#type = match c {
                    '-' => SwitchType::Default,
                    '=' => SwitchType::Assign,
                    '?' => SwitchType::Error,
                    _ => SwitchType::Alter,
                };
                let word = self.braced_param_word()?;
                Modifier::Switch(Switch {
                    r#type,
                    condition: SwitchCondition::Unset,
                    word,
                })
            }
            Some(side @ ('#' | '%')) => {
                self.index += 1;
                let length = if self.peek_char() == Some(side) {
                    self.index += 1;
                    TrimLength::Longest
                } else {
                    TrimLength::Shortest
                };
                let side = if side == '#' {
                    TrimSide::Prefix
                } else {
                    TrimSide::Suffix
                };
                let pattern = self.braced_param_word()?;
                Modifier::Trim(Trim {
                    side,
                    length,
                    pattern,
                })
            }
            Some(_) => return self.error(SyntaxError::InvalidModifier),
            None => return self.error(SyntaxError::UnclosedBracedParam),
        };

        Ok(BracedParam {
            param,
            modifier,
            location,
        })
    }

    /// Reads the parameter identifier inside `${…}`.
    fn braced_param_id(&mut self) -> Result<Param, Error> {
        let mut id = String::new();
        match self.peek_char() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                while let Some(c) = self.peek_char() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        id.push(c);
                        self.index += 1;
                    } else {
                        break;
                    }
                }
            }
            Some(c) if c.is_ascii_digit() => {
                while let Some(c) = self.peek_char() {
                    if c.is_ascii_digit() {
                        id.push(c);
                        self.index += 1;
                    } else {
                        break;
                    }
                }
            }
            Some(c) if SpecialParam::from_char(c).is_some() => {
                id.push(c);
                self.index += 1;
            }
            Some(_) => return self.error(SyntaxError::InvalidModifier),
            None => return self.error(SyntaxError::UnclosedBracedParam),
        }
        Ok(Param::from_id(id))
    }

    /// Reads the word of a switch or trim modifier, up to the closing
    /// brace.
    fn braced_param_word(&mut self) -> Result<Word, Error> {
        let word = self.read_word(|c| c == '}')?;
        match self.next_char() {
            Some('}') => Ok(word),
            _ => self.error(SyntaxError::UnclosedBracedParam),
        }
    }

    /// Scans a command substitution up to the matching `)`, after the
    /// opening parenthesis. Returns the raw content.
    fn scan_command_subst(&mut self) -> Result<String, Error> {
        let start = self.index;
        let mut depth = 1_usize;
        while let Some(c) = self.next_char() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(self.chars[start..self.index - 1].iter().collect());
                    }
                }
                '\\' => {
                    self.index += 1;
                }
                '\'' => {
                    while let Some(c) = self.next_char() {
                        if c == '\'' {
                            break;
                        }
                    }
                }
                '"' => {
                    while let Some(c) = self.next_char() {
                        match c {
                            '"' => break,
                            '\\' => self.index += 1,
                            _ => {}
                        }
                    }
                }
                _ => {}
            }
        }
        self.error(SyntaxError::UnclosedCommandSubst)
    }

    /// Attempts to scan an arithmetic expansion, after the `$((`.
    ///
    /// Returns the content between the double parentheses, or `None` with
    /// the position unchanged if the construct turns out not to be an
    /// arithmetic expansion.
    fn try_scan_arith(&mut self) -> Option<String> {
        let start = self.index;
        let mut depth = 1_usize;
        let mut i = self.index;
        while i < self.chars.len() {
            match self.chars[i] {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        if self.chars.get(i + 1) == Some(&')') {
                            let content = self.chars[start..i].iter().collect();
                            self.index = i + 2;
                            return Some(content);
                        }
                        return None;
                    }
                }
                '\\' => i += 1,
                '\'' => {
                    i += 1;
                    while i < self.chars.len() && self.chars[i] != '\'' {
                        i += 1;
                    }
                }
                '"' => {
                    i += 1;
                    while i < self.chars.len() && self.chars[i] != '"' {
                        if self.chars[i] == '\\' {
                            i += 1;
                        }
                        i += 1;
                    }
                }
                _ => {}
            }
            i += 1;
        }
        None
    }

    /// Reads a backquoted command substitution, after the opening
    /// backquote.
    fn backquote_unit(&mut self) -> Result<TextUnit, Error> {
        let location = self.location();
        let mut content = Vec::new();
        loop {
            match self.next_char() {
                Some('`') => return Ok(Backquote { content, location }),
                Some('\\') => match self.next_char() {
                    Some(c @ ('$' | '`' | '\\')) => {
                        content.push(BackquoteUnit::Backslashed(c));
                    }
                    Some(c) => {
                        content.push(BackquoteUnit::Literal('\\'));
                        content.push(BackquoteUnit::Literal(c));
                    }
                    None => return self.error(SyntaxError::UnclosedBackquote),
                },
                Some(c) => content.push(BackquoteUnit::Literal(c)),
                None => return self.error(SyntaxError::UnclosedBackquote),
            }
        }
    }

    /// Reads the body of a here-document, with the current position at the
    /// beginning of the first content line.
    fn read_heredoc_body(&mut self, heredoc: &HereDoc) -> Result<(), Error> {
        let (delimiter, quoted) = heredoc.delimiter.unquote();
        let delimiter_chars: Vec<char> = delimiter.chars().collect();
        let mut units = Vec::new();

        loop {
            if self.index >= self.chars.len() {
                return self.error(SyntaxError::UnclosedHereDocContent(delimiter));
            }

            // Test whether this line is the delimiter.
            let mut line_start = self.index;
            if heredoc.remove_tabs {
                while self.chars.get(line_start) == Some(&'\t') {
                    line_start += 1;
                }
            }
            let mut line_end = line_start;
            while line_end < self.chars.len() && self.chars[line_end] != '\n' {
                line_end += 1;
            }
            if self.chars[line_start..line_end] == delimiter_chars[..] {
                self.index = (line_end + 1).min(self.chars.len());
                break;
            }

            if heredoc.remove_tabs {
                self.index = line_start;
            }
            if quoted {
                while let Some(c) = self.next_char() {
                    units.push(Literal(c));
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                self.read_heredoc_line(&mut units)?;
            }
        }

        let content = Text(units);
        heredoc
            .content
            .set(content)
            .expect("here-document content must be filled only once");
        Ok(())
    }

    /// Reads one line of an unexpanded here-document body, processing
    /// expansions and escapes.
    fn read_heredoc_line(&mut self, units: &mut Vec<TextUnit>) -> Result<(), Error> {
        loop {
            match self.next_char() {
                None => return Ok(()),
                Some('\n') => {
                    units.push(Literal('\n'));
                    return Ok(());
                }
                Some('\\') => match self.peek_char() {
                    Some(c @ ('$' | '`' | '\\')) => {
                        self.index += 1;
                        units.push(Backslashed(c));
                    }
                    Some('\n') => {
                        // Line continuation: the joined line is not
                        // checked against the delimiter.
                        self.index += 1;
                    }
                    _ => units.push(Literal('\\')),
                },
                Some('$') => units.push(self.dollar_unit()?),
                Some('`') => units.push(self.backquote_unit()?),
                Some(c) => units.push(Literal(c)),
            }
        }
    }
}

/// Parses a string into a text, recognizing expansions and backslash
/// escapes. Used for the content of arithmetic expansions.
fn parse_text_content(content: &str) -> Text {
    let mut lexer = Lexer::new(content);
    let mut units = Vec::new();
    while let Some(c) = lexer.next_char() {
        let unit = match c {
            '\\' => match lexer.next_char() {
                None => Literal('\\'),
                Some('\n') => continue,
                Some(c) => Backslashed(c),
            },
            '$' => match lexer.dollar_unit() {
                Ok(unit) => unit,
                Err(_) => Literal('$'),
            },
            '`' => match lexer.backquote_unit() {
                Ok(unit) => unit,
                Err(_) => Literal('`'),
            },
            c => Literal(c),
        };
        units.push(unit);
    }
    Text(units)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn word_from(source: &str) -> Word {
        let mut lexer = Lexer::new(source);
        lexer.read_word(is_word_delimiter).unwrap()
    }

    #[test]
    fn plain_word() {
        let word = word_from("hello");
        assert_eq!(word.to_string_if_literal().as_deref(), Some("hello"));
    }

    #[test]
    fn word_stops_at_delimiter() {
        let word = word_from("hello world");
        assert_eq!(word.to_string_if_literal().as_deref(), Some("hello"));
    }

    #[test]
    fn single_quoted_word() {
        let word = word_from("'a b'");
        assert_eq!(word.units, [SingleQuote("a b".to_string())]);
    }

    #[test]
    fn unclosed_single_quote() {
        let mut lexer = Lexer::new("'abc");
        let error = lexer.read_word(is_word_delimiter).unwrap_err();
        assert_eq!(error.cause, SyntaxError::UnclosedSingleQuote);
        assert!(error.cause.is_incomplete());
    }

    #[test]
    fn double_quoted_word_with_expansion() {
        let word = word_from(r#""a $x b""#);
        assert_matches!(&word.units[0], DoubleQuote(Text(units)) => {
            assert_eq!(units[0], Literal('a'));
            assert_eq!(units[1], Literal(' '));
            assert_matches!(&units[2], RawParam { param, .. } => {
                assert_eq!(param.id, "x");
            });
        });
    }

    #[test]
    fn backslash_in_double_quotes() {
        let word = word_from(r#""\$\a""#);
        assert_matches!(&word.units[0], DoubleQuote(Text(units)) => {
            assert_eq!(units[0], Backslashed('$'));
            assert_eq!(units[1], Literal('\\'));
            assert_eq!(units[2], Literal('a'));
        });
    }

    #[test]
    fn raw_parameter() {
        let word = word_from("$foo-bar");
        assert_matches!(&word.units[0], Unquoted(RawParam { param, .. }) => {
            assert_eq!(param.id, "foo");
        });
        assert_eq!(word.units[1], Unquoted(Literal('-')));
    }

    #[test]
    fn special_parameters() {
        for (source, expected) in [
            ("$?", SpecialParam::Question),
            ("$#", SpecialParam::Number),
            ("$$", SpecialParam::Dollar),
            ("$!", SpecialParam::Exclamation),
            ("$@", SpecialParam::At),
            ("$*", SpecialParam::Asterisk),
            ("$-", SpecialParam::Hyphen),
            ("$0", SpecialParam::Zero),
        ] {
            let word = word_from(source);
            assert_matches!(&word.units[0], Unquoted(RawParam { param, .. }) => {
                assert_eq!(param.r#type, ParamType::Special(expected), "{source}");
            });
        }
    }

    #[test]
    fn positional_parameter_is_single_digit() {
        let word = word_from("$12");
        assert_matches!(&word.units[0], Unquoted(RawParam { param, .. }) => {
            assert_eq!(param.r#type, ParamType::Positional(1));
        });
        assert_eq!(word.units[1], Unquoted(Literal('2')));
    }

    #[test]
    fn braced_param_plain() {
        let word = word_from("${foo}");
        assert_matches!(&word.units[0], Unquoted(BracedParam(param)) => {
            assert_eq!(param.param.id, "foo");
            assert_eq!(param.modifier, Modifier::None);
        });
    }

    #[test]
    fn braced_param_length() {
        let word = word_from("${#foo}");
        assert_matches!(&word.units[0], Unquoted(BracedParam(param)) => {
            assert_eq!(param.param.id, "foo");
            assert_eq!(param.modifier, Modifier::Length);
        });
    }

    #[test]
    fn braced_param_number_sign() {
        let word = word_from("${#}");
        assert_matches!(&word.units[0], Unquoted(BracedParam(param)) => {
            assert_eq!(param.param.r#type, ParamType::Special(SpecialParam::Number));
            assert_eq!(param.modifier, Modifier::None);
        });
    }

    #[test]
    fn braced_param_switch() {
        let word = word_from("${foo:-a b}");
        assert_matches!(&word.units[0], Unquoted(BracedParam(param)) => {
            assert_matches!(&param.modifier, Modifier::Switch(switch) => {
                assert_eq!(switch.r#type, SwitchType::Default);
                assert_eq!(switch.condition, SwitchCondition::UnsetOrEmpty);
                assert_eq!(switch.word.to_string_if_literal().as_deref(), Some("a b"));
            });
        });
    }

    #[test]
    fn braced_param_switch_without_colon() {
        let word = word_from("${foo+x}");
        assert_matches!(&word.units[0], Unquoted(BracedParam(param)) => {
            assert_matches!(&param.modifier, Modifier::Switch(switch) => {
                assert_eq!(switch.r#type, SwitchType::Alter);
                assert_eq!(switch.condition, SwitchCondition::Unset);
            });
        });
    }

    #[test]
    fn braced_param_trim() {
        let word = word_from("${foo##*/}");
        assert_matches!(&word.units[0], Unquoted(BracedParam(param)) => {
            assert_matches!(&param.modifier, Modifier::Trim(trim) => {
                assert_eq!(trim.side, TrimSide::Prefix);
                assert_eq!(trim.length, TrimLength::Longest);
            });
        });
    }

    #[test]
    fn unclosed_braced_param() {
        let mut lexer = Lexer::new("${foo");
        let error = lexer.read_word(is_word_delimiter).unwrap_err();
        assert!(error.cause.is_incomplete());
    }

    #[test]
    fn command_substitution() {
        let word = word_from("$(echo hi)");
        assert_matches!(&word.units[0], Unquoted(CommandSubst { content, .. }) => {
            assert_eq!(&**content, "echo hi");
        });
    }

    #[test]
    fn nested_command_substitution() {
        let word = word_from("$(echo $(pwd))");
        assert_matches!(&word.units[0], Unquoted(CommandSubst { content, .. }) => {
            assert_eq!(&**content, "echo $(pwd)");
        });
    }

    #[test]
    fn arithmetic_expansion() {
        let word = word_from("$((1 + 2))");
        assert_matches!(&word.units[0], Unquoted(Arith { content, .. }) => {
            assert_eq!(content.to_string(), "1 + 2");
        });
    }

    #[test]
    fn arithmetic_with_nested_parens() {
        let word = word_from("$(( (1+2) * 3 ))");
        assert_matches!(&word.units[0], Unquoted(Arith { .. }));
    }

    #[test]
    fn subshell_in_command_substitution_is_not_arithmetic() {
        let word = word_from("$((echo x); echo y)");
        assert_matches!(&word.units[0], Unquoted(CommandSubst { content, .. }) => {
            assert_eq!(&**content, "(echo x); echo y");
        });
    }

    #[test]
    fn backquotes() {
        let word = word_from(r"`echo \$x`");
        assert_matches!(&word.units[0], Unquoted(Backquote { content, .. }) => {
            assert_eq!(content[0], BackquoteUnit::Literal('e'));
            assert!(content.contains(&BackquoteUnit::Backslashed('$')));
        });
    }

    #[test]
    fn line_continuation_in_word() {
        let word = word_from("ab\\\ncd");
        assert_eq!(word.to_string_if_literal().as_deref(), Some("abcd"));
    }

    #[test]
    fn tilde_in_word() {
        let word = word_from("~user/dir");
        assert_eq!(word.units[0], Tilde("user".to_string()));
    }

    #[test]
    fn operators_and_io_numbers() {
        let mut lexer = Lexer::new("2>&1");
        assert_matches!(lexer.next_token().unwrap().0, Token::IoNumber(2));
        assert_matches!(
            lexer.next_token().unwrap().0,
            Token::Operator(Operator::GreaterAnd)
        );
        assert_matches!(lexer.next_token().unwrap().0, Token::Word(_));
    }

    #[test]
    fn comment_is_skipped() {
        let mut lexer = Lexer::new("# comment\nfoo");
        assert_matches!(lexer.next_token().unwrap().0, Token::Newline);
        assert_matches!(lexer.next_token().unwrap().0, Token::Word(_));
    }

    #[test]
    fn locations_are_tracked() {
        let mut lexer = Lexer::new("a\n bc");
        let (_, location) = lexer.next_token().unwrap();
        assert_eq!(location, Location::new(1, 1));
        let (_, location) = lexer.next_token().unwrap();
        assert_eq!(location, Location::new(1, 2));
        let (_, location) = lexer.next_token().unwrap();
        assert_eq!(location, Location::new(2, 2));
    }

    #[test]
    fn heredoc_body_reading() {
        let mut lexer = Lexer::new("\nhello\nworld\nEOF\nnext");
        let heredoc = Rc::new(HereDoc {
            delimiter: word_from_str("EOF"),
            remove_tabs: false,
            content: std::cell::OnceCell::new(),
        });
        lexer.register_heredoc(Rc::clone(&heredoc));
        assert_matches!(lexer.next_token().unwrap().0, Token::Newline);
        assert_eq!(heredoc.content.get().unwrap().to_string(), "hello\nworld\n");
        assert_matches!(lexer.next_token().unwrap().0, Token::Word(_));
    }

    #[test]
    fn heredoc_with_tab_removal() {
        let mut lexer = Lexer::new("\n\thello\n\tEOF\n");
        let heredoc = Rc::new(HereDoc {
            delimiter: word_from_str("EOF"),
            remove_tabs: true,
            content: std::cell::OnceCell::new(),
        });
        lexer.register_heredoc(Rc::clone(&heredoc));
        lexer.next_token().unwrap();
        assert_eq!(heredoc.content.get().unwrap().to_string(), "hello\n");
    }

    #[test]
    fn quoted_heredoc_delimiter_disables_expansion() {
        let mut lexer = Lexer::new("\n$x\nEOF\n");
        let delimiter = {
            let mut lexer = Lexer::new("'EOF'");
            lexer.read_word(is_word_delimiter).unwrap()
        };
        let heredoc = Rc::new(HereDoc {
            delimiter,
            remove_tabs: false,
            content: std::cell::OnceCell::new(),
        });
        lexer.register_heredoc(Rc::clone(&heredoc));
        lexer.next_token().unwrap();
        let content = heredoc.content.get().unwrap();
        assert!(content.0.iter().all(|unit| matches!(unit, Literal(_))));
    }

    #[test]
    fn unterminated_heredoc_is_incomplete() {
        let mut lexer = Lexer::new("\nbody");
        let heredoc = Rc::new(HereDoc {
            delimiter: word_from_str("EOF"),
            remove_tabs: false,
            content: std::cell::OnceCell::new(),
        });
        lexer.register_heredoc(heredoc);
        let error = lexer.next_token().unwrap_err();
        assert!(error.cause.is_incomplete());
    }

    fn word_from_str(s: &str) -> Word {
        let mut lexer = Lexer::new(s);
        lexer.read_word(is_word_delimiter).unwrap()
    }
}
