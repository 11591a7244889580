// This file is part of zish, a POSIX-compatible shell.
// Copyright (C) 2026 zish developers

//! POSIX pattern matching for globbing, `case`, and parameter trims.
//!
//! A [`Pattern`] is compiled from a sequence of [`PatternChar`]s by
//! translating the parsed pattern [AST](ast) to an anchored regular
//! expression. The supported syntax is:
//!
//! - Any single character (`?`)
//! - Any character sequence (`*`)
//! - Bracket expressions (`[...]`) with character literals, ranges
//!   (`a-z`), complements (`[!...]`, `[^...]`), and ASCII character
//!   classes (`[:alpha:]` and friends)
//!
//! The [`Config`] passed to [`Pattern::parse_with_config`] selects
//! anchoring and shortest-match behavior. Shortest and longest matches are
//! resolved exactly, by probing prefixes or suffixes of the subject
//! against the fully anchored expression, which is what the
//! `${name#pattern}` family of expansions requires.

pub mod ast;

use ast::{Ast, Atom, Bracket, BracketItem};
use regex::Regex;
use regex_syntax::ast::ClassAsciiKind;
use std::ops::Range;
use thiserror::Error;

/// Character appearing in patterns
///
/// Characters that were quoted in the shell source are `Literal` and never
/// act as wildcards. All other characters are `Normal`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PatternChar {
    /// Character that may have special meaning (`?`, `*`, `[`, `]`)
    Normal(char),
    /// Character that always matches itself
    Literal(char),
}

impl PatternChar {
    /// Returns the character value, ignoring the distinction.
    #[inline]
    #[must_use]
    pub const fn char_value(self) -> char {
        match self {
            PatternChar::Normal(c) | PatternChar::Literal(c) => c,
        }
    }
}

/// Iterator returned by [`with_escape`]
#[derive(Clone, Debug)]
pub struct WithEscape<'a> {
    chars: std::str::Chars<'a>,
}

impl Iterator for WithEscape<'_> {
    type Item = PatternChar;
    fn next(&mut self) -> Option<PatternChar> {
        match self.chars.next() {
            None => None,
            Some('\\') => self.chars.next().map(PatternChar::Literal),
            Some(c) => Some(PatternChar::Normal(c)),
        }
    }
}

/// Adapts a string for parsing, treating backslashes as escapes.
#[must_use]
pub fn with_escape(pattern: &str) -> WithEscape<'_> {
    WithEscape {
        chars: pattern.chars(),
    }
}

/// Iterator returned by [`without_escape`]
#[derive(Clone, Debug)]
pub struct WithoutEscape<'a> {
    chars: std::str::Chars<'a>,
}

impl Iterator for WithoutEscape<'_> {
    type Item = PatternChar;
    fn next(&mut self) -> Option<PatternChar> {
        self.chars.next().map(PatternChar::Normal)
    }
}

/// Adapts a string for parsing, with no escape processing.
#[must_use]
pub fn without_escape(pattern: &str) -> WithoutEscape<'_> {
    WithoutEscape {
        chars: pattern.chars(),
    }
}

/// Error in pattern compilation
#[derive(Clone, Debug, Error)]
pub enum Error {
    /// Unsupported character class name in a bracket expression
    #[error("undefined character class `[:{0}:]`")]
    UndefinedCharClass(String),

    /// Character range whose start sorts after its end
    #[error("reversed character range `{0}-{1}`")]
    ReversedRange(char, char),

    /// Error in the underlying regular expression engine
    #[error(transparent)]
    RustRegex(#[from] regex::Error),
}

/// Configuration for pattern compilation
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub struct Config {
    /// Whether a match must start at the beginning of the subject
    pub anchor_begin: bool,
    /// Whether a match must end at the end of the subject
    pub anchor_end: bool,
    /// Whether an initial period must be matched by a literal period
    ///
    /// This implements the globbing rule that `*`, `?`, and bracket
    /// expressions do not match a leading `.` in a filename.
    pub literal_period: bool,
    /// Whether [`Pattern::find`] prefers the shortest match
    pub shortest_match: bool,
    /// Whether matching ignores ASCII case
    pub case_insensitive: bool,
}

/// Compiled pattern
#[derive(Clone, Debug)]
pub struct Pattern {
    /// Fully anchored expression matching the whole subject
    regex: Regex,
    config: Config,
    literal: Option<String>,
    starts_with_literal_period: bool,
}

impl Pattern {
    /// Compiles a pattern with the default configuration.
    pub fn parse<I>(pattern: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = PatternChar>,
        <I as IntoIterator>::IntoIter: Clone,
    {
        Self::parse_with_config(pattern, Config::default())
    }

    /// Compiles a pattern with the given configuration.
    pub fn parse_with_config<I>(pattern: I, config: Config) -> Result<Self, Error>
    where
        I: IntoIterator<Item = PatternChar>,
        <I as IntoIterator>::IntoIter: Clone,
    {
        let ast = Ast::new(pattern)?;
        let regex = Regex::new(&to_regex(&ast, config)?)?;
        let literal = ast.to_literal();
        let starts_with_literal_period = matches!(ast.atoms.first(), Some(Atom::Char('.')));
        Ok(Pattern {
            regex,
            config,
            literal,
            starts_with_literal_period,
        })
    }

    /// Returns the pattern as a literal string if it has no wildcards.
    #[must_use]
    pub fn as_literal(&self) -> Option<&str> {
        self.literal.as_deref()
    }

    /// Tests whether the pattern matches the whole subject.
    ///
    /// With `literal_period` configured, a subject starting with a period
    /// matches only if the pattern starts with a literal period.
    #[must_use]
    pub fn is_match(&self, subject: &str) -> bool {
        if self.config.literal_period
            && subject.starts_with('.')
            && !self.starts_with_literal_period
        {
            return false;
        }
        self.regex.is_match(subject)
    }

    /// Locates a match according to the configured anchors.
    ///
    /// - With both anchors, the result is the whole subject or nothing.
    /// - With `anchor_begin` only, the result is the shortest or longest
    ///   matching prefix.
    /// - With `anchor_end` only, the result is the shortest or longest
    ///   matching suffix.
    /// - With no anchor, the result is the leftmost match, shortest or
    ///   longest at that position.
    #[must_use]
    pub fn find(&self, subject: &str) -> Option<Range<usize>> {
        let len = subject.len();
        let bounds = || (0..=len).filter(|&i| subject.is_char_boundary(i));
        let matches = |range: Range<usize>| self.regex.is_match(&subject[range]);

        match (self.config.anchor_begin, self.config.anchor_end) {
            (true, true) => matches(0..len).then_some(0..len),
            (true, false) => {
                let ends: Vec<usize> = bounds().collect();
                let pick = |&end: &usize| matches(0..end).then_some(0..end);
                if self.config.shortest_match {
                    ends.iter().find_map(pick)
                } else {
                    ends.iter().rev().find_map(pick)
                }
            }
            (false, true) => {
                let starts: Vec<usize> = bounds().collect();
                let pick = |&start: &usize| matches(start..len).then_some(start..len);
                if self.config.shortest_match {
                    starts.iter().rev().find_map(pick)
                } else {
                    starts.iter().find_map(pick)
                }
            }
            (false, false) => {
                let starts: Vec<usize> = bounds().collect();
                for &start in &starts {
                    let ends: Vec<usize> = (start..=len)
                        .filter(|&i| subject.is_char_boundary(i))
                        .collect();
                    let found = if self.config.shortest_match {
                        ends.iter().find(|&&end| matches(start..end))
                    } else {
                        ends.iter().rev().find(|&&end| matches(start..end))
                    };
                    if let Some(&end) = found {
                        return Some(start..end);
                    }
                }
                None
            }
        }
    }
}

const SPECIAL_CHARS: &str = r"\.+*?()|[]{}^$#&-~";
const BRACKET_SPECIAL_CHARS: &str = r"\^]&~-[";

fn push_char(regex: &mut String, c: char) {
    if SPECIAL_CHARS.contains(c) {
        regex.push('\\');
    }
    regex.push(c);
}

fn push_bracket_char(regex: &mut String, c: char) {
    if BRACKET_SPECIAL_CHARS.contains(c) {
        regex.push('\\');
    }
    regex.push(c);
}

fn push_bracket(regex: &mut String, bracket: &Bracket) -> Result<(), Error> {
    regex.push('[');
    if bracket.complement {
        regex.push('^');
    }
    for item in &bracket.items {
        match item {
            BracketItem::Atom(ast::BracketAtom::Char(c)) => push_bracket_char(regex, *c),
            BracketItem::Atom(ast::BracketAtom::CharClass(name)) => {
                if ClassAsciiKind::from_name(name).is_none() {
                    return Err(Error::UndefinedCharClass(name.clone()));
                }
                regex.push_str("[:");
                regex.push_str(name);
                regex.push_str(":]");
            }
            BracketItem::Range(range) => {
                push_bracket_char(regex, *range.start());
                regex.push('-');
                push_bracket_char(regex, *range.end());
            }
        }
    }
    regex.push(']');
    Ok(())
}

/// Translates a pattern AST to an anchored regular expression.
fn to_regex(ast: &Ast, config: Config) -> Result<String, Error> {
    let mut regex = String::new();
    regex.push_str("(?s)");
    if config.case_insensitive {
        regex.push_str("(?i)");
    }
    regex.push_str(r"\A(?:");
    for atom in &ast.atoms {
        match atom {
            Atom::Char(c) => push_char(&mut regex, *c),
            Atom::AnyChar => regex.push('.'),
            Atom::AnyString => regex.push_str(".*"),
            Atom::Bracket(bracket) => push_bracket(&mut regex, bracket)?,
        }
    }
    regex.push_str(r")\z");
    Ok(regex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn pattern(s: &str) -> Pattern {
        Pattern::parse(without_escape(s)).unwrap()
    }

    fn pattern_with(s: &str, config: Config) -> Pattern {
        Pattern::parse_with_config(without_escape(s), config).unwrap()
    }

    #[test]
    fn literal_match() {
        let p = pattern("abc");
        assert!(p.is_match("abc"));
        assert!(!p.is_match("abd"));
        assert!(!p.is_match("xabc"));
        assert_eq!(p.as_literal(), Some("abc"));
    }

    #[test]
    fn any_char() {
        let p = pattern("a?c");
        assert!(p.is_match("abc"));
        assert!(p.is_match("a.c"));
        assert!(!p.is_match("ac"));
        assert!(!p.is_match("abbc"));
    }

    #[test]
    fn any_string() {
        let p = pattern("a*c");
        assert!(p.is_match("ac"));
        assert!(p.is_match("abc"));
        assert!(p.is_match("a//c"));
        assert!(!p.is_match("ab"));
    }

    #[test]
    fn newline_is_matched_by_wildcards() {
        assert!(pattern("a*c").is_match("a\nc"));
        assert!(pattern("a?c").is_match("a\nc"));
    }

    #[test]
    fn bracket_range() {
        let p = pattern("[a-cx]");
        assert!(p.is_match("a"));
        assert!(p.is_match("b"));
        assert!(p.is_match("x"));
        assert!(!p.is_match("d"));
    }

    #[test]
    fn character_classes() {
        let upper = pattern("[[:upper:]]");
        assert!(upper.is_match("A"));
        assert!(!upper.is_match("a"));

        let non_alpha = pattern("[![:alpha:]]");
        assert!(non_alpha.is_match("5"));
        assert!(!non_alpha.is_match("x"));
    }

    #[test]
    fn undefined_character_class() {
        let result = Pattern::parse(without_escape("[[:bogus:]]"));
        assert_matches!(result, Err(Error::UndefinedCharClass(name)) => {
            assert_eq!(name, "bogus");
        });
    }

    #[test]
    fn quoted_wildcards_do_not_match() {
        let p = Pattern::parse(with_escape(r"a\*c")).unwrap();
        assert!(p.is_match("a*c"));
        assert!(!p.is_match("abc"));
    }

    #[test]
    fn literal_period_rule() {
        let config = Config {
            literal_period: true,
            ..Config::default()
        };
        let p = pattern_with("*", config);
        assert!(p.is_match("file"));
        assert!(!p.is_match(".hidden"));

        let q = pattern_with(".*", config);
        assert!(q.is_match(".hidden"));
    }

    #[test]
    fn find_prefix_shortest_and_longest() {
        let shortest = Config {
            anchor_begin: true,
            shortest_match: true,
            ..Config::default()
        };
        let longest = Config {
            anchor_begin: true,
            ..Config::default()
        };
        assert_eq!(pattern_with("*.", shortest).find("a.b.c"), Some(0..2));
        assert_eq!(pattern_with("*.", longest).find("a.b.c"), Some(0..4));
    }

    #[test]
    fn find_suffix_shortest_and_longest() {
        let shortest = Config {
            anchor_end: true,
            shortest_match: true,
            ..Config::default()
        };
        let longest = Config {
            anchor_end: true,
            ..Config::default()
        };
        assert_eq!(pattern_with(".*", shortest).find("a.b.c"), Some(3..5));
        assert_eq!(pattern_with(".*", longest).find("a.b.c"), Some(1..5));
    }

    #[test]
    fn find_rejects_non_prefix() {
        let config = Config {
            anchor_begin: true,
            ..Config::default()
        };
        assert_eq!(pattern_with("b", config).find("abc"), None);
    }

    #[test]
    fn multibyte_subjects() {
        let p = pattern("?");
        assert!(p.is_match("é"));
        let config = Config {
            anchor_begin: true,
            shortest_match: true,
            ..Config::default()
        };
        assert_eq!(pattern_with("é", config).find("és"), Some(0..2));
    }
}
