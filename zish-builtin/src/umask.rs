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

//! Umask built-in
//!
//! Without an operand, prints the current file mode creation mask in
//! octal (or symbolically with `-S`). With an octal operand, sets the
//! mask.

use crate::common::{output, report_error};
use zish_env::builtin::Result;
use zish_env::semantics::{ExitStatus, Field};
use zish_env::Env;

fn symbolic(mask: libc::mode_t) -> String {
    let class = |shift: u32| {
        let bits = (!mask >> shift) & 0o7;
        let mut s = String::new();
        if bits & 0o4 != 0 {
            s.push('r');
        }
        if bits & 0o2 != 0 {
            s.push('w');
        }
        if bits & 0o1 != 0 {
            s.push('x');
        }
        s
    };
    format!("u={},g={},o={}", class(6), class(3), class(0))
}

/// Entry point for executing the `umask` built-in
pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    let mut symbolic_output = false;
    let mut operands = &args[..];
    while let Some(first) = operands.first() {
        match first.value.as_str() {
            "-S" => symbolic_output = true,
            "--" => {
                operands = &operands[1..];
                break;
            }
            _ => break,
        }
        operands = &operands[1..];
    }

    match operands {
        [] => {
            // Reading the mask means setting it twice.
            let mask = env.system.umask(0);
            env.system.umask(mask);
            let line = if symbolic_output {
                format!("{}\n", symbolic(mask))
            } else {
                format!("{:04o}\n", mask)
            };
            output(env, &line)
        }
        [operand] => match libc::mode_t::from_str_radix(&operand.value, 8) {
            Ok(mask) if mask <= 0o777 => {
                env.system.umask(mask);
                Result::new(ExitStatus::SUCCESS)
            }
            _ => report_error(env, "umask", "invalid mask"),
        },
        _ => report_error(env, "umask", "too many operands"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbolic_rendering() {
        assert_eq!(symbolic(0o022), "u=rwx,g=rx,o=rx");
        assert_eq!(symbolic(0o077), "u=rwx,g=,o=");
    }
}
