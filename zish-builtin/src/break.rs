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

//! Break built-in
//!
//! # Syntax
//!
//! ```sh
//! break [n]
//! ```
//!
//! Quits the execution of the *n*th innermost enclosing loop. If *n*
//! exceeds the number of enclosing loops, the outermost one is exited.
//!
//! A successful invocation returns a result carrying
//! `Divert::Break { count: n - 1 }`; enclosing loops decrement the count
//! until the target loop consumes it.

use crate::common::{parse_numeric_operand, report_error};
use zish_env::builtin::Result;
use zish_env::semantics::{Divert, ExitStatus, Field};
use zish_env::Env;

/// Resolves the operand against the number of enclosing loops.
pub(crate) fn resolve_count(env: &Env, args: &[Field], name: &str) -> std::result::Result<usize, String> {
    let operand = parse_numeric_operand(args)
        .ok_or_else(|| format!("invalid operand to `{name}`"))?;
    let count = operand.unwrap_or(1);
    if count < 1 {
        return Err(format!("operand to `{name}` must be positive"));
    }
    let loops = env.stack.loop_count();
    if loops == 0 {
        return Err(format!("`{name}` used outside a loop"));
    }
    Ok((count as usize).min(loops))
}

/// Entry point for executing the `break` built-in
pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    match resolve_count(env, &args, "break") {
        Ok(count) => Result::with_divert(
            ExitStatus::SUCCESS,
            Divert::Break { count: count - 1 },
        ),
        Err(message) => report_error(env, "break", &message),
    }
}
