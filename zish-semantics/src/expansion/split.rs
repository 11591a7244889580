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

//! Field splitting
//!
//! Only unquoted characters that resulted from an expansion
//! ([`Origin::SoftExpansion`]) are subject to splitting. A delimiter is a
//! run of IFS whitespace, or a non-whitespace IFS character with adjacent
//! IFS whitespace absorbed. Leading and trailing whitespace delimiters
//! produce no fields; a trailing non-whitespace delimiter does not
//! produce an empty last field. An empty `IFS` disables splitting.

use super::attr::{AttrChar, Origin};
use super::Phrase;

fn is_splitter(c: &AttrChar, ifs: &str) -> bool {
    c.origin == Origin::SoftExpansion && !c.is_quoted && !c.is_quoting && ifs.contains(c.value)
}

fn is_ifs_whitespace(c: char) -> bool {
    c.is_whitespace()
}

/// Splits the fields of a phrase on the given separators.
///
/// Fields that end up empty (from an unquoted expansion of an empty
/// value) are dropped.
pub fn split_fields(phrase: Phrase, ifs: &str) -> Phrase {
    let mut result = Vec::new();
    for field in phrase {
        split_one(field, ifs, &mut result);
    }
    result
}

fn split_one(field: Vec<AttrChar>, ifs: &str, result: &mut Phrase) {
    if ifs.is_empty() {
        if !field.is_empty() {
            result.push(field);
        }
        return;
    }

    let ws_splitter =
        |c: &AttrChar| is_splitter(c, ifs) && is_ifs_whitespace(c.value);
    let non_ws_splitter =
        |c: &AttrChar| is_splitter(c, ifs) && !is_ifs_whitespace(c.value);

    let mut i = 0;
    // Leading whitespace separators produce no field.
    while i < field.len() && ws_splitter(&field[i]) {
        i += 1;
    }

    let mut current = Vec::new();
    while i < field.len() {
        if is_splitter(&field[i], ifs) {
            // One delimiter: ws* [non-ws ws*]
            while i < field.len() && ws_splitter(&field[i]) {
                i += 1;
            }
            if i < field.len() && non_ws_splitter(&field[i]) {
                i += 1;
                while i < field.len() && ws_splitter(&field[i]) {
                    i += 1;
                }
            }
            result.push(std::mem::take(&mut current));
        } else {
            current.push(field[i]);
            i += 1;
        }
    }
    // A trailing delimiter produces no empty last field, and a field
    // that was nothing but separators produces no field at all.
    if !current.is_empty() {
        result.push(current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn soft(s: &str) -> Vec<AttrChar> {
        s.chars()
            .map(|value| AttrChar {
                value,
                origin: Origin::SoftExpansion,
                is_quoted: false,
                is_quoting: false,
            })
            .collect()
    }

    fn literal(s: &str) -> Vec<AttrChar> {
        s.chars().map(AttrChar::literal).collect()
    }

    fn values(phrase: Phrase) -> Vec<String> {
        phrase
            .into_iter()
            .map(|field| field.into_iter().map(|c| c.value).collect())
            .collect()
    }

    #[test]
    fn whitespace_splitting() {
        let result = split_fields(vec![soft("  one  two  ")], " \t\n");
        assert_eq!(values(result), ["one", "two"]);
    }

    #[test]
    fn non_whitespace_separator_keeps_empty_fields() {
        let result = split_fields(vec![soft("a::b")], ":");
        assert_eq!(values(result), ["a", "", "b"]);
    }

    #[test]
    fn trailing_non_whitespace_separator() {
        let result = split_fields(vec![soft("a:")], ":");
        assert_eq!(values(result), ["a"]);
    }

    #[test]
    fn leading_non_whitespace_separator() {
        let result = split_fields(vec![soft(":a")], ":");
        assert_eq!(values(result), ["", "a"]);
    }

    #[test]
    fn mixed_whitespace_and_separator() {
        let result = split_fields(vec![soft(" a : b ")], ": \t");
        assert_eq!(values(result), ["a", "b"]);
    }

    #[test]
    fn literal_characters_are_not_split() {
        let result = split_fields(vec![literal("a b")], " \t\n");
        assert_eq!(values(result), ["a b"]);
    }

    #[test]
    fn empty_expansion_vanishes() {
        let result = split_fields(vec![soft("")], " \t\n");
        assert_eq!(values(result), Vec::<String>::new());
    }

    #[test]
    fn empty_ifs_disables_splitting() {
        let result = split_fields(vec![soft("a b")], "");
        assert_eq!(values(result), ["a b"]);
    }

    #[test]
    fn quoted_soft_chars_are_not_split() {
        let mut field = soft("a b");
        for c in &mut field {
            c.is_quoted = true;
        }
        let result = split_fields(vec![field], " ");
        assert_eq!(values(result), ["a b"]);
    }

    #[test]
    fn ifs_colon_splits_read_style() {
        let result = split_fields(vec![soft("one:two:three")], ":");
        assert_eq!(values(result), ["one", "two", "three"]);
    }
}
