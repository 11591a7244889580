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

//! Exec built-in
//!
//! # Syntax
//!
//! ```sh
//! exec [utility [argument…]]
//! ```
//!
//! Without operands, the redirections applied to the built-in become
//! permanent in the shell. With operands, the named utility replaces the
//! shell process without a fork. If the utility cannot be executed, a
//! non-interactive shell exits with 126 (or 127 if it was not found).

use std::ffi::CString;
use zish_env::builtin::Result;
use zish_env::semantics::{Divert, ExitStatus, Field};
use zish_env::system::Errno;
use zish_env::Env;
use zish_semantics::command_search::search_path;

/// Entry point for executing the `exec` built-in
pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    let args = crate::common::skip_option_terminator(&args);
    let Some(utility) = args.first() else {
        let mut result = Result::new(ExitStatus::SUCCESS);
        result.preserve_redirs = true;
        return result;
    };

    let Some(path) = search_path(env, &utility.value) else {
        let message = format!("{}: not found", utility.value);
        env.print_named_error("exec", &message);
        return exec_failure(env, ExitStatus::NOT_FOUND);
    };

    let arguments: Vec<CString> = args
        .iter()
        .filter_map(|field| CString::new(field.value.as_str()).ok())
        .collect();
    let envs = env.variables.env_c_strings();
    let error = env
        .system
        .execve(&path, &arguments, &envs)
        .expect_err("execve cannot return on success");
    let exit_status = match error {
        Errno::ENOENT | Errno::ENOTDIR => ExitStatus::NOT_FOUND,
        _ => ExitStatus::NOEXEC,
    };
    let message = format!("cannot execute `{}`: {}", utility.value, error);
    env.print_named_error("exec", &message);
    exec_failure(env, exit_status)
}

/// A failed `exec` terminates a non-interactive shell.
fn exec_failure(env: &mut Env, exit_status: ExitStatus) -> Result {
    if env.is_interactive() {
        Result::new(exit_status)
    } else {
        Result::with_divert(exit_status, Divert::Exit(Some(exit_status)))
    }
}
