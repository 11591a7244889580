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

//! Common items for implementing built-ins

use zish_env::builtin::Result;
use zish_env::io::Fd;
use zish_env::semantics::{Divert, ExitStatus, Field};
use zish_env::Env;

/// Writes the given text to the standard output.
///
/// On a write error, a diagnostic goes to standard error and the result
/// is a failure.
pub fn output(env: &mut Env, content: &str) -> Result {
    match env.system.write_all(Fd::STDOUT, content.as_bytes()) {
        Ok(()) => Result::new(ExitStatus::SUCCESS),
        Err(errno) => {
            let message = format!("error writing output: {errno}");
            env.print_error(&message);
            Result::new(ExitStatus::FAILURE)
        }
    }
}

/// Prints a diagnostic from a named built-in and fails.
pub fn report_error(env: &mut Env, name: &str, message: &str) -> Result {
    env.print_named_error(name, message);
    Result::new(ExitStatus::FAILURE)
}

/// Prints a diagnostic and interrupts the shell.
///
/// Used for the hard errors of special built-ins, which make a
/// non-interactive shell exit.
pub fn report_hard_error(env: &mut Env, name: &str, message: &str) -> Result {
    env.print_named_error(name, message);
    Result::with_divert(ExitStatus::ERROR, Divert::Interrupt(Some(ExitStatus::ERROR)))
}

/// Splits off a leading `--` separator.
pub fn skip_option_terminator(args: &[Field]) -> &[Field] {
    match args.first() {
        Some(first) if first.value == "--" => &args[1..],
        _ => args,
    }
}

/// Parses an optional single numeric operand, as used by `break`,
/// `continue`, `exit`, `return`, and `shift`.
pub fn parse_numeric_operand(args: &[Field]) -> Option<Option<i64>> {
    let args = skip_option_terminator(args);
    match args {
        [] => Some(None),
        [operand] => operand.value.parse().ok().map(Some),
        _ => None,
    }
}
