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

//! Return built-in
//!
//! # Syntax
//!
//! ```sh
//! return [n]
//! ```
//!
//! Returns from the current function or sourced script with status *n*,
//! defaulting to the current `$?`. Outside both, the shell driver treats
//! the return like `exit`.

use crate::common::{parse_numeric_operand, report_hard_error};
use zish_env::builtin::Result;
use zish_env::semantics::{Divert, ExitStatus, Field};
use zish_env::Env;

/// Entry point for executing the `return` built-in
pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    match parse_numeric_operand(&args) {
        Some(operand) => {
            let exit_status = operand.map(|n| ExitStatus(n as i32));
            Result::with_divert(
                exit_status.unwrap_or(env.exit_status),
                Divert::Return(exit_status),
            )
        }
        None => report_hard_error(env, "return", "invalid operand"),
    }
}
