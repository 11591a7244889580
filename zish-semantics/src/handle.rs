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

//! Error handling during execution
//!
//! The [`Handle`] trait turns an error into its effect on the shell: a
//! diagnostic on standard error, an exit status, and possibly a divert.
//! Expansion and assignment errors interrupt the shell, which makes a
//! non-interactive shell exit; redirection errors merely fail the current
//! command and let the surrounding list continue.

use std::ops::ControlFlow::{Break, Continue};
use zish_env::semantics::{Divert, ExitStatus, Result};
use zish_env::Env;

/// Trait for handling errors
pub trait Handle {
    /// Prints a diagnostic and returns the execution result of the
    /// failed operation.
    fn handle(&self, env: &mut Env) -> Result;
}

impl Handle for crate::expansion::Error {
    fn handle(&self, env: &mut Env) -> Result {
        let message = format!("{} ({})", self.cause, self.location);
        env.print_error(&message);
        env.exit_status = ExitStatus::FAILURE;
        Break(Divert::Interrupt(Some(ExitStatus::FAILURE)))
    }
}

impl Handle for crate::assign::Error {
    fn handle(&self, env: &mut Env) -> Result {
        let message = format!("{} ({})", self.cause, self.location);
        env.print_error(&message);
        env.exit_status = ExitStatus::FAILURE;
        Break(Divert::Interrupt(Some(ExitStatus::FAILURE)))
    }
}

impl Handle for crate::redir::Error {
    fn handle(&self, env: &mut Env) -> Result {
        let message = format!("{} ({})", self.cause, self.location);
        env.print_error(&message);
        env.exit_status = ExitStatus::FAILURE;
        Continue(())
    }
}

impl Handle for zish_syntax::parser::Error {
    fn handle(&self, env: &mut Env) -> Result {
        let message = format!("syntax error: {} ({})", self.cause, self.location);
        env.print_error(&message);
        env.exit_status = ExitStatus::ERROR;
        if env.is_interactive() {
            Continue(())
        } else {
            Break(Divert::Exit(Some(ExitStatus::ERROR)))
        }
    }
}
