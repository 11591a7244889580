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

//! Dot (source) built-in
//!
//! # Syntax
//!
//! ```sh
//! . file [argument…]
//! ```
//!
//! Reads and executes commands from the file in the current shell
//! environment. A file name without a slash is searched for in `$PATH`
//! (it need not be executable). A `return` in the sourced file resumes
//! after the dot command.

use crate::common::report_hard_error;
use std::ops::ControlFlow::{Break, Continue};
use zish_env::builtin::Result;
use zish_env::semantics::{Divert, ExitStatus, Field};
use zish_env::stack::Frame;
use zish_env::Env;
use zish_semantics::run_source;

/// Locates the file to source.
fn find_file(env: &mut Env, name: &str) -> Option<String> {
    if name.contains('/') {
        return Some(name.to_string());
    }
    let dirs = env
        .variables
        .get_scalar("PATH")
        .unwrap_or_default()
        .to_string();
    for dir in dirs.split(':') {
        let candidate = if dir.is_empty() {
            format!("./{name}")
        } else {
            format!("{dir}/{name}")
        };
        if std::fs::metadata(&candidate).is_ok_and(|m| m.is_file()) {
            return Some(candidate);
        }
    }
    None
}

/// Entry point for executing the `.` built-in
pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    let args = crate::common::skip_option_terminator(&args);
    let Some(operand) = args.first() else {
        return report_hard_error(env, ".", "missing file operand");
    };

    let Some(path) = find_file(env, &operand.value) else {
        let message = format!("{}: not found", operand.value);
        return report_hard_error(env, ".", &message);
    };

    let source = match std::fs::read_to_string(&path) {
        Ok(source) => source,
        Err(error) => {
            let message = format!("cannot read `{path}`: {error}");
            return report_hard_error(env, ".", &message);
        }
    };

    env.stack.push(Frame::DotScript);
    let result = run_source(env, &source);
    env.stack.pop(Frame::DotScript);

    match result {
        Continue(()) => Result::new(env.exit_status),
        Break(Divert::Return(exit_status)) => {
            Result::new(exit_status.unwrap_or(env.exit_status))
        }
        Break(divert) => Result::with_divert(env.exit_status, divert),
    }
}
