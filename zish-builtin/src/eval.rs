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

//! Eval built-in
//!
//! # Syntax
//!
//! ```sh
//! eval [word…]
//! ```
//!
//! Concatenates the operands with spaces and executes the result as
//! shell commands in the current execution environment.

use std::ops::ControlFlow::{Break, Continue};
use zish_env::builtin::Result;
use zish_env::semantics::{ExitStatus, Field};
use zish_env::Env;
use zish_semantics::run_source;

/// Entry point for executing the `eval` built-in
pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    let source = args
        .iter()
        .map(|field| field.value.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    if source.is_empty() {
        return Result::new(ExitStatus::SUCCESS);
    }
    match run_source(env, &source) {
        Continue(()) => Result::new(env.exit_status),
        Break(divert) => Result::with_divert(env.exit_status, divert),
    }
}
