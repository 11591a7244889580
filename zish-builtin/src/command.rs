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

//! Command built-in
//!
//! # Syntax
//!
//! ```sh
//! command [-p] utility [argument…]
//! command -v utility
//! command -V utility
//! ```
//!
//! Executes the utility while bypassing function lookup. With `-v`, the
//! resolved name or path is printed instead; `-V` prints a fuller
//! description, like `type`.

use crate::common::{output, report_error};
use std::ops::ControlFlow::{Break, Continue};
use zish_env::builtin::Result;
use zish_env::semantics::{ExitStatus, Field};
use zish_env::Env;
use zish_semantics::command::execute_external_utility;
use zish_semantics::command_search::search_path;

/// Entry point for executing the `command` built-in
pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    let mut identify = None;
    let mut operands = &args[..];
    while let Some(first) = operands.first() {
        match first.value.as_str() {
            "-v" => identify = Some(false),
            "-V" => identify = Some(true),
            // `-p` would use a standard PATH; the regular search is used.
            "-p" => {}
            "--" => {
                operands = &operands[1..];
                break;
            }
            _ => break,
        }
        operands = &operands[1..];
    }

    let Some(utility) = operands.first() else {
        return Result::new(ExitStatus::SUCCESS);
    };

    match identify {
        Some(verbose) => {
            if verbose {
                match crate::r#type::classify(env, &utility.value) {
                    Some(line) => output(env, &format!("{line}\n")),
                    None => {
                        let message = format!("{}: not found", utility.value);
                        report_error(env, "command", &message)
                    }
                }
            } else {
                let known_builtin = env.builtins.contains_key(utility.value.as_str())
                    || env.functions.get(&utility.value).is_some();
                if known_builtin {
                    output(env, &format!("{}\n", utility.value))
                } else {
                    match search_path(env, &utility.value) {
                        Some(path) => {
                            output(env, &format!("{}\n", path.to_string_lossy()))
                        }
                        None => Result::new(ExitStatus::FAILURE),
                    }
                }
            }
        }
        None => {
            // Execute, skipping functions.
            if let Some(builtin) = env.builtins.get(utility.value.as_str()).copied() {
                return (builtin.execute)(env, operands[1..].to_vec());
            }
            match search_path(env, &utility.value) {
                Some(path) => {
                    let fields = operands.to_vec();
                    match execute_external_utility(env, path, fields) {
                        Continue(()) => Result::new(env.exit_status),
                        Break(divert) => Result::with_divert(env.exit_status, divert),
                    }
                }
                None => {
                    let message = format!("{}: not found", utility.value);
                    env.print_named_error("command", &message);
                    Result::new(ExitStatus::NOT_FOUND)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zish_env::system::RealSystem;

    #[test]
    fn no_operands_is_success() {
        let mut env = Env::new(RealSystem);
        let result = main(&mut env, Vec::new());
        assert_eq!(result.exit_status, ExitStatus::SUCCESS);
    }

    #[test]
    fn identify_unknown_fails() {
        let mut env = Env::new(RealSystem);
        env.variables.assign("PATH", "/nonexistent".to_string()).unwrap();
        let result = main(&mut env, Field::dummies(["-v", "no-such-utility"]));
        assert_eq!(result.exit_status, ExitStatus::FAILURE);
    }
}
