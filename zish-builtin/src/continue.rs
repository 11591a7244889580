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

//! Continue built-in
//!
//! # Syntax
//!
//! ```sh
//! continue [n]
//! ```
//!
//! Resumes the next iteration of the *n*th innermost enclosing loop.
//! The operand handling is shared with the break built-in.

use crate::common::report_error;
use crate::r#break::resolve_count;
use zish_env::builtin::Result;
use zish_env::semantics::{Divert, ExitStatus, Field};
use zish_env::Env;

/// Entry point for executing the `continue` built-in
pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    match resolve_count(env, &args, "continue") {
        Ok(count) => Result::with_divert(
            ExitStatus::SUCCESS,
            Divert::Continue { count: count - 1 },
        ),
        Err(message) => report_error(env, "continue", &message),
    }
}
