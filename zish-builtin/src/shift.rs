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

//! Shift built-in
//!
//! # Syntax
//!
//! ```sh
//! shift [n]
//! ```
//!
//! Removes the first *n* positional parameters (default 1). Shifting
//! more parameters than there are is an error.

use crate::common::{parse_numeric_operand, report_hard_error};
use zish_env::builtin::Result;
use zish_env::semantics::{ExitStatus, Field};
use zish_env::Env;

/// Entry point for executing the `shift` built-in
pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    let Some(operand) = parse_numeric_operand(&args) else {
        return report_hard_error(env, "shift", "invalid operand");
    };
    let count = operand.unwrap_or(1);
    if count < 0 {
        return report_hard_error(env, "shift", "operand must not be negative");
    }
    let count = count as usize;
    let params = env.variables.positional_params();
    if count > params.len() {
        let message = format!("cannot shift {} parameters, only {} present", count, params.len());
        return report_hard_error(env, "shift", &message);
    }
    let remaining = params[count..].to_vec();
    env.variables.set_positional_params(remaining);
    Result::new(ExitStatus::SUCCESS)
}
