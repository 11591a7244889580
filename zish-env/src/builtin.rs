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

//! Type definitions for built-in utilities
//!
//! Concrete implementations live in the `zish-builtin` crate; this module
//! only defines the types through which the executor invokes them.

use crate::semantics::{Divert, ExitStatus, Field};
use crate::Env;
use std::ops::ControlFlow;

/// Types of built-in utilities
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Type {
    /// Special built-in
    ///
    /// Special built-ins are found before functions in command search and
    /// their failures are fatal to a non-interactive shell: assignment,
    /// redirection, and option errors make the shell exit rather than
    /// just fail the command.
    Special,

    /// Standard utility implemented in the shell
    ///
    /// Mandatory built-ins are found regardless of `$PATH` but can be
    /// overridden by functions.
    Mandatory,
}

/// Result of a built-in execution
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Result {
    /// Exit status of the built-in
    pub exit_status: ExitStatus,

    /// Control-flow effect the built-in has on the caller
    ///
    /// Built-ins like `break`, `return`, and `exit` do their work by
    /// diverting execution.
    pub divert: ControlFlow<Divert>,

    /// Whether redirections applied to the built-in survive it
    ///
    /// Only the `exec` built-in sets this: `exec 3<file` leaves
    /// descriptor 3 open in the shell.
    pub preserve_redirs: bool,
}

impl Result {
    /// Creates a result with the given exit status and no divert.
    #[must_use]
    pub fn new(exit_status: ExitStatus) -> Result {
        Result {
            exit_status,
            divert: ControlFlow::Continue(()),
            preserve_redirs: false,
        }
    }

    /// Creates a result carrying a divert.
    #[must_use]
    pub fn with_divert(exit_status: ExitStatus, divert: Divert) -> Result {
        Result {
            exit_status,
            divert: ControlFlow::Break(divert),
            preserve_redirs: false,
        }
    }
}

impl From<ExitStatus> for Result {
    fn from(exit_status: ExitStatus) -> Result {
        Result::new(exit_status)
    }
}

/// Type of functions implementing built-ins
///
/// The arguments do not include the command name.
pub type Main = fn(&mut Env, Vec<Field>) -> Result;

/// Definition of a built-in utility
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Builtin {
    /// Classification of the built-in
    pub r#type: Type,
    /// Function implementing the built-in
    pub execute: Main,
}

impl Builtin {
    /// Returns true if the built-in is a special built-in.
    #[must_use]
    pub fn is_special(&self) -> bool {
        self.r#type == Type::Special
    }
}
