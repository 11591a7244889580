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

//! Source code locations
//!
//! A [`Location`] names the line and column a syntactic element started at.
//! Lines and columns are counted from 1. Locations travel with words
//! through expansion so that diagnostics can point back into the source.

use std::fmt::Display;
use std::num::NonZeroU64;

/// Position of a syntactic element in the source code
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Location {
    /// Line number, counted from 1
    pub line: NonZeroU64,
    /// Column number in characters, counted from 1
    pub column: NonZeroU64,
}

impl Location {
    /// Location of the first character of the source.
    pub const START: Location = Location {
        line: NonZeroU64::MIN,
        column: NonZeroU64::MIN,
    };

    /// Creates a placeholder location for values that do not originate in
    /// source code, e.g. fields synthesized by built-ins.
    #[must_use]
    pub const fn dummy() -> Location {
        Location::START
    }

    /// Creates a location from 1-based line and column numbers.
    ///
    /// # Panics
    ///
    /// Panics if either number is zero.
    #[must_use]
    pub fn new(line: u64, column: u64) -> Location {
        Location {
            line: NonZeroU64::new(line).expect("line numbers are counted from 1"),
            column: NonZeroU64::new(column).expect("column numbers are counted from 1"),
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Location::START
    }
}

/// Formats the location as `line N column M`.
impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {} column {}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_is_one_one() {
        assert_eq!(Location::START.line.get(), 1);
        assert_eq!(Location::START.column.get(), 1);
    }

    #[test]
    fn display() {
        assert_eq!(Location::new(3, 14).to_string(), "line 3 column 14");
    }
}
