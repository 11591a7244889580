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

//! Type built-in
//!
//! Identifies what each operand would name if used as a command:
//! a reserved word, a function, a built-in, or an external utility.

use crate::common::{output, report_error};
use zish_env::builtin::Result;
use zish_env::semantics::{ExitStatus, Field};
use zish_env::Env;
use zish_semantics::command_search::{search, Target};

const RESERVED_WORDS: &[&str] = &[
    "!", "{", "}", "case", "do", "done", "elif", "else", "esac", "fi", "for", "if", "in", "then",
    "until", "while",
];

/// Describes one command name, or returns `None` if it is unknown.
pub(crate) fn classify(env: &mut Env, name: &str) -> Option<String> {
    if RESERVED_WORDS.contains(&name) {
        return Some(format!("{name} is a shell keyword"));
    }
    match search(env, name)? {
        Target::Builtin(builtin) => {
            if builtin.is_special() {
                Some(format!("{name} is a special shell builtin"))
            } else {
                Some(format!("{name} is a shell builtin"))
            }
        }
        Target::Function(function) => Some(format!("{} is a function", function.name)),
        Target::External { path } => {
            Some(format!("{} is {}", name, path.to_string_lossy()))
        }
    }
}

/// Entry point for executing the `type` built-in
pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    let mut lines = String::new();
    let mut exit_status = ExitStatus::SUCCESS;
    for operand in &args {
        match classify(env, &operand.value) {
            Some(line) => {
                lines.push_str(&line);
                lines.push('\n');
            }
            None => {
                let message = format!("{}: not found", operand.value);
                report_error(env, "type", &message);
                exit_status = ExitStatus::FAILURE;
            }
        }
    }
    let result = output(env, &lines);
    if result.exit_status.is_successful() {
        Result::new(exit_status)
    } else {
        result
    }
}
