// This file is part of zish, a POSIX-compatible shell.
// Copyright (C) 2026 zish developers

//! This crate provides the [`quote`] function, which wraps a string in
//! quotes as necessary so that the result re-parses as a single shell word
//! having the original value.
//!
//! The result is chosen among three forms, in order of preference:
//!
//! 1. the string itself, if it needs no quoting at all,
//! 2. the string enclosed in single quotes, if it contains no single quote,
//! 3. the string enclosed in double quotes, with `"`, `` ` ``, `$` and `\`
//!    backslash-escaped.
//!
//! The shell uses this when printing values that must survive re-parsing:
//! the `trap` listing, `set` output, and execution traces.
//!
//! ```
//! # use zish_quote::quote;
//! assert_eq!(quote("word"), "word");
//! assert_eq!(quote("two words"), "'two words'");
//! assert_eq!(quote("don't"), r#""don't""#);
//! ```

use std::borrow::Cow::{self, Borrowed, Owned};

/// Quotes a string so that it re-parses as a single word with the original
/// value.
///
/// An empty string yields `''`.
#[must_use]
pub fn quote(s: &str) -> Cow<'_, str> {
    if !s.is_empty() && !needs_quoting(s) {
        return Borrowed(s);
    }

    if !s.contains('\'') {
        return Owned(format!("'{s}'"));
    }

    let mut result = String::with_capacity(s.len() + 8);
    result.push('"');
    for c in s.chars() {
        if matches!(c, '"' | '`' | '$' | '\\') {
            result.push('\\');
        }
        result.push(c);
    }
    result.push('"');
    Owned(result)
}

fn needs_quoting(s: &str) -> bool {
    if s.chars().any(char_needs_quoting) {
        return true;
    }

    // A `#` or `~` is special only at the start of a word.
    if s.starts_with(['#', '~']) {
        return true;
    }

    // `[` followed by `]` could be a bracket pattern.
    if let Some(i) = s.find('[') {
        if s[i + 1..].contains(']') {
            return true;
        }
    }

    false
}

fn char_needs_quoting(c: char) -> bool {
    match c {
        ';' | '&' | '|' | '(' | ')' | '<' | '>' => true,
        '$' | '`' | '\\' | '"' | '\'' | '=' | '*' | '?' => true,
        _ => c.is_whitespace(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_quoting_needed() {
        assert_eq!(quote("word"), "word");
        assert_eq!(quote("/usr/bin/env"), "/usr/bin/env");
        assert_eq!(quote("a,b.c:d-e_f"), "a,b.c:d-e_f");
        assert_eq!(quote("a#b~c"), "a#b~c");
    }

    #[test]
    fn empty_string_is_single_quoted() {
        assert_eq!(quote(""), "''");
    }

    #[test]
    fn single_quoting() {
        assert_eq!(quote("two words"), "'two words'");
        assert_eq!(quote("a;b"), "'a;b'");
        assert_eq!(quote("$var"), "'$var'");
        assert_eq!(quote("*?"), "'*?'");
        assert_eq!(quote("#comment"), "'#comment'");
        assert_eq!(quote("~user"), "'~user'");
        assert_eq!(quote("a[b]"), "'a[b]'");
        assert_eq!(quote("line\nbreak"), "'line\nbreak'");
    }

    #[test]
    fn double_quoting() {
        assert_eq!(quote("don't"), r#""don't""#);
        assert_eq!(quote("isn't it?"), r#""isn't it?""#);
    }

    #[test]
    fn double_quoting_escapes() {
        assert_eq!(quote(r#"it's "here""#), r#""it's \"here\"""#);
        assert_eq!(quote("'`$\\"), "\"'\\`\\$\\\\\"");
    }
}
