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

//! Pwd built-in
//!
//! Prints the working directory. `-L` (the default) prints `$PWD` if it
//! is an absolute path naming the current directory; `-P` always asks
//! the system.

use crate::common::{output, report_error};
use zish_env::builtin::Result;
use zish_env::semantics::Field;
use zish_env::Env;

/// Entry point for executing the `pwd` built-in
pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    let mut logical = true;
    for arg in &args {
        match arg.value.as_str() {
            "-L" => logical = true,
            "-P" => logical = false,
            "--" => break,
            _ => break,
        }
    }

    if logical {
        if let Some(pwd) = env.variables.get_scalar("PWD") {
            if pwd.starts_with('/') {
                let line = format!("{pwd}\n");
                return output(env, &line);
            }
        }
    }
    match env.system.getcwd() {
        Ok(path) => {
            let line = format!("{}\n", path.to_string_lossy());
            output(env, &line)
        }
        Err(errno) => report_error(env, "pwd", &errno.to_string()),
    }
}
