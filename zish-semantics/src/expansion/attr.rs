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

//! Intermediate expansion results
//!
//! The initial expansion turns a word into [`AttrChar`]s: characters
//! annotated with how they came to be. The attributes decide the fate of
//! each character in the later phases: only unquoted characters that
//! resulted from an expansion are subject to field splitting, quoted
//! characters never act as pattern characters in pathname expansion, and
//! quoting characters themselves disappear in quote removal.

use zish_env::semantics::Field;
use zish_syntax::source::Location;

/// Origin of a character
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Origin {
    /// The character appeared in the original word.
    Literal,

    /// The character resulted from a parameter expansion, command
    /// substitution, or arithmetic expansion.
    ///
    /// Unquoted soft characters are subject to field splitting and act
    /// as pattern characters in pathname expansion.
    SoftExpansion,

    /// The character resulted from an expansion that is exempt from
    /// field splitting and pathname expansion, such as a tilde
    /// expansion.
    HardExpansion,
}

/// Character with attributes describing its provenance
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AttrChar {
    /// Character value
    pub value: char,
    /// Origin of the character
    pub origin: Origin,
    /// Whether the character is quoted by another character
    pub is_quoted: bool,
    /// Whether the character is a quotation mark that quotes others
    pub is_quoting: bool,
}

/// String of `AttrChar`s with the location of the originating word
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AttrField {
    /// Characters of the field
    pub chars: Vec<AttrChar>,
    /// Location of the word this field resulted from
    pub origin: Location,
}

impl AttrField {
    /// Performs quote removal and attribute stripping at once.
    #[must_use]
    pub fn remove_quotes_and_strip(self) -> Field {
        let value = self
            .chars
            .iter()
            .filter(|c| !c.is_quoting)
            .map(|c| c.value)
            .collect();
        Field {
            value,
            origin: self.origin,
        }
    }
}

/// Convenience constructors used by the expansion phases
impl AttrChar {
    /// Creates an unquoted literal character.
    #[must_use]
    pub fn literal(value: char) -> AttrChar {
        AttrChar {
            value,
            origin: Origin::Literal,
            is_quoted: false,
            is_quoting: false,
        }
    }

    /// Creates a quoting character (a quote mark).
    #[must_use]
    pub fn quoting(value: char) -> AttrChar {
        AttrChar {
            value,
            origin: Origin::Literal,
            is_quoted: false,
            is_quoting: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_removal_drops_quoting_chars() {
        let field = AttrField {
            chars: vec![
                AttrChar::quoting('\''),
                AttrChar {
                    value: 'a',
                    origin: Origin::Literal,
                    is_quoted: true,
                    is_quoting: false,
                },
                AttrChar::quoting('\''),
            ],
            origin: Location::dummy(),
        };
        assert_eq!(field.remove_quotes_and_strip().value, "a");
    }
}
