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

//! Readonly built-in
//!
//! # Syntax
//!
//! ```sh
//! readonly name[=value]…
//! readonly -p
//! ```
//!
//! Makes variables readonly, optionally assigning a final value first.
//! Further assignments to a readonly variable are diagnosed, and in a
//! non-interactive shell they terminate execution.

use crate::common::output;
use crate::export::assign_with_attribute;
use zish_env::builtin::Result;
use zish_env::semantics::Field;
use zish_env::Env;
use zish_quote::quote;

/// Prints readonly variables as `readonly name=value` lines.
fn print_readonly(env: &mut Env) -> Result {
    let mut lines: Vec<String> = env
        .variables
        .iter()
        .filter(|(_, variable)| variable.is_read_only())
        .map(|(name, variable)| match &variable.value {
            Some(value) => format!("readonly {}={}\n", name, quote(value)),
            None => format!("readonly {name}\n"),
        })
        .collect();
    lines.sort_unstable();
    output(env, &lines.concat())
}

/// Entry point for executing the `readonly` built-in
pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    let operands = match args.first() {
        None => return print_readonly(env),
        Some(first) if first.value == "-p" => {
            if args.len() == 1 {
                return print_readonly(env);
            }
            &args[1..]
        }
        Some(first) if first.value == "--" => &args[1..],
        _ => &args[..],
    };
    assign_with_attribute(env, operands, "readonly", |env, name, location| {
        env.variables.make_read_only(name, location);
    })
}
