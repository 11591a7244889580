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

//! Type definitions for command execution

use crate::signal;
use std::ops::ControlFlow;
use std::process::{ExitCode, Termination};
use zish_syntax::source::Location;

/// Resultant string of word expansion
///
/// A field is a string accompanied by the location of the word it resulted
/// from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Field {
    /// String value of the field
    pub value: String,
    /// Location of the originating word
    pub origin: Location,
}

impl Field {
    /// Creates a field with a placeholder origin.
    #[inline]
    pub fn dummy<S: Into<String>>(value: S) -> Field {
        Field {
            value: value.into(),
            origin: Location::dummy(),
        }
    }

    /// Creates fields with placeholder origins.
    pub fn dummies<I, S>(values: I) -> Vec<Field>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        values.into_iter().map(Self::dummy).collect()
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.value.fmt(f)
    }
}

/// Number that summarizes the result of command execution
///
/// In the shell language, the special parameter `$?` expands to the exit
/// status of the last executed command.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ExitStatus(pub i32);

impl std::fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i32> for ExitStatus {
    fn from(value: i32) -> ExitStatus {
        ExitStatus(value)
    }
}

impl From<ExitStatus> for i32 {
    fn from(exit_status: ExitStatus) -> i32 {
        exit_status.0
    }
}

/// Converts a signal number to the exit status of a process killed by that
/// signal, which is 128 plus the signal number.
impl From<signal::Number> for ExitStatus {
    fn from(number: signal::Number) -> Self {
        ExitStatus(0x80 + number.as_raw())
    }
}

impl ExitStatus {
    /// Exit status of 0: success
    pub const SUCCESS: ExitStatus = ExitStatus(0);

    /// Exit status of 1: failure
    pub const FAILURE: ExitStatus = ExitStatus(1);

    /// Exit status of 2: error severer than failure
    pub const ERROR: ExitStatus = ExitStatus(2);

    /// Exit status of 126: command found but not executable
    pub const NOEXEC: ExitStatus = ExitStatus(126);

    /// Exit status of 127: command not found
    pub const NOT_FOUND: ExitStatus = ExitStatus(127);

    /// Returns true if and only if `self` is zero.
    #[must_use]
    pub const fn is_successful(&self) -> bool {
        self.0 == 0
    }
}

/// Converts the exit status to `ExitCode`, keeping the lowest 8 bits.
impl Termination for ExitStatus {
    fn report(self) -> ExitCode {
        (self.0 as u8).into()
    }
}

/// Result of interrupted command execution
///
/// A `Divert` value carries a non-local control effect through the
/// recursive executor: loop control, function return, and the several ways
/// the shell winds down.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Divert {
    /// Continue the current loop.
    Continue {
        /// Number of loop frames to unwind before continuing
        ///
        /// `0` continues the innermost loop.
        count: usize,
    },

    /// Break the current loop.
    Break {
        /// Number of loop frames to unwind
        ///
        /// `0` breaks the innermost loop.
        count: usize,
    },

    /// Return from the current function or sourced script.
    Return(Option<ExitStatus>),

    /// Interrupt the current shell execution environment.
    ///
    /// In a non-interactive shell this behaves like `Exit`. An interactive
    /// shell aborts the current command and prompts for the next line.
    Interrupt(Option<ExitStatus>),

    /// Exit from the current shell execution environment.
    ///
    /// The shell exits after running the EXIT trap, if any.
    Exit(Option<ExitStatus>),

    /// Exit immediately, without running the EXIT trap.
    Abort(Option<ExitStatus>),
}

impl Divert {
    /// Returns the exit status associated with the `Divert`, if any.
    #[must_use]
    pub fn exit_status(&self) -> Option<ExitStatus> {
        use Divert::*;
        match self {
            Continue { .. } | Break { .. } => None,
            Return(exit_status)
            | Interrupt(exit_status)
            | Exit(exit_status)
            | Abort(exit_status) => *exit_status,
        }
    }
}

/// Result of command execution
///
/// `Break(divert)` means execution was interrupted by the contained
/// [`Divert`].
pub type Result<T = ()> = ControlFlow<Divert, T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_status_from_signal_number() {
        let number = signal::Number::from_raw(2).unwrap();
        assert_eq!(ExitStatus::from(number), ExitStatus(130));
    }

    #[test]
    fn divert_exit_status() {
        assert_eq!(Divert::Break { count: 0 }.exit_status(), None);
        assert_eq!(
            Divert::Exit(Some(ExitStatus(42))).exit_status(),
            Some(ExitStatus(42))
        );
    }
}
