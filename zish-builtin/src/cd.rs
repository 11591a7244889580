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

//! Cd built-in
//!
//! # Syntax
//!
//! ```sh
//! cd [-L|-P] [directory]
//! ```
//!
//! Changes the working directory. Without an operand, `$HOME` is the
//! target; the operand `-` goes to `$OLDPWD` and prints the new
//! directory. `-L` (the default) keeps the logical path, resolving `.`
//! and `..` components textually in `$PWD`; `-P` uses the physical path
//! reported by the system. `PWD` and `OLDPWD` are updated.

use crate::common::{output, report_error};
use std::ffi::CString;
use zish_env::builtin::Result;
use zish_env::semantics::{ExitStatus, Field};
use zish_env::Env;

/// Resolves `.` and `..` components of a path textually.
fn canonicalize_logical(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|&p| p != "..") {
                    parts.pop();
                } else if !absolute {
                    parts.push("..");
                }
            }
            part => parts.push(part),
        }
    }
    let mut result = if absolute {
        String::from("/")
    } else {
        String::new()
    };
    result.push_str(&parts.join("/"));
    if result.is_empty() {
        result.push('.');
    }
    result
}

/// Entry point for executing the `cd` built-in
pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    let mut logical = true;
    let mut operands = &args[..];
    while let Some(first) = operands.first() {
        match first.value.as_str() {
            "-L" => logical = true,
            "-P" => logical = false,
            "--" => {
                operands = &operands[1..];
                break;
            }
            _ => break,
        }
        operands = &operands[1..];
    }

    let (target, print_new) = match operands {
        [] => match env.variables.get_scalar("HOME") {
            Some(home) if !home.is_empty() => (home.to_string(), false),
            _ => return report_error(env, "cd", "HOME not set"),
        },
        [operand] if operand.value == "-" => match env.variables.get_scalar("OLDPWD") {
            Some(oldpwd) if !oldpwd.is_empty() => (oldpwd.to_string(), true),
            _ => return report_error(env, "cd", "OLDPWD not set"),
        },
        [operand] => (operand.value.clone(), false),
        _ => return report_error(env, "cd", "too many operands"),
    };

    let old_pwd = env
        .variables
        .get_scalar("PWD")
        .map(str::to_string)
        .or_else(|| {
            env.system
                .getcwd()
                .ok()
                .map(|p| p.to_string_lossy().into_owned())
        })
        .unwrap_or_default();

    // The path handed to the system: for a logical walk, a relative
    // operand is interpreted against $PWD first.
    let new_logical = if target.starts_with('/') {
        canonicalize_logical(&target)
    } else {
        canonicalize_logical(&format!("{old_pwd}/{target}"))
    };
    let chdir_target = if logical { &new_logical } else { &target };

    let Ok(c_path) = CString::new(chdir_target.as_str()) else {
        return report_error(env, "cd", "invalid directory name");
    };
    if let Err(errno) = env.system.chdir(&c_path) {
        let message = format!("{}: {}", chdir_target, errno);
        return report_error(env, "cd", &message);
    }

    let new_pwd = if logical {
        new_logical
    } else {
        env.system
            .getcwd()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|_| target.clone())
    };

    _ = env.assign_variable("OLDPWD", old_pwd);
    _ = env.assign_variable("PWD", new_pwd.clone());

    if print_new {
        let mut line = new_pwd;
        line.push('\n');
        return output(env, &line);
    }
    Result::new(ExitStatus::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logical_canonicalization() {
        assert_eq!(canonicalize_logical("/a/b/../c"), "/a/c");
        assert_eq!(canonicalize_logical("/a/./b"), "/a/b");
        assert_eq!(canonicalize_logical("/a/b/.."), "/a");
        assert_eq!(canonicalize_logical("/.."), "/");
        assert_eq!(canonicalize_logical("a/../.."), "..");
    }
}
