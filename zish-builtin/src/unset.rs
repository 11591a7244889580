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

//! Unset built-in
//!
//! # Syntax
//!
//! ```sh
//! unset [-v|-f] name…
//! ```
//!
//! Removes variables (`-v`, the default) or functions (`-f`). Unsetting
//! a readonly variable fails; unsetting a name that is not set is not an
//! error.

use crate::common::report_hard_error;
use zish_env::builtin::Result;
use zish_env::semantics::{ExitStatus, Field};
use zish_env::Env;

/// Entry point for executing the `unset` built-in
pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    let mut functions = false;
    let mut operands = &args[..];
    while let Some(first) = operands.first() {
        match first.value.as_str() {
            "-v" => functions = false,
            "-f" => functions = true,
            "--" => {
                operands = &operands[1..];
                break;
            }
            _ => break,
        }
        operands = &operands[1..];
    }

    for operand in operands {
        if functions {
            env.functions.undefine(&operand.value);
        } else if let Err(error) = env.variables.unset(&operand.value) {
            return report_hard_error(env, "unset", &error.to_string());
        }
    }
    Result::new(ExitStatus::SUCCESS)
}
