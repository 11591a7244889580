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

//! Export built-in
//!
//! # Syntax
//!
//! ```sh
//! export name[=value]…
//! export -p
//! ```
//!
//! Marks variables for export, optionally assigning values. With `-p`
//! (or no operands) the exported variables are printed in re-parsable
//! form.

use crate::common::{output, report_hard_error};
use zish_env::builtin::Result;
use zish_env::semantics::{ExitStatus, Field};
use zish_env::Env;
use zish_quote::quote;
use zish_syntax::syntax::is_name;

/// Prints exported variables as `export name=value` lines.
fn print_exported(env: &mut Env) -> Result {
    let mut lines: Vec<String> = env
        .variables
        .iter()
        .filter(|(_, variable)| variable.is_exported)
        .map(|(name, variable)| match &variable.value {
            Some(value) => format!("export {}={}\n", name, quote(value)),
            None => format!("export {name}\n"),
        })
        .collect();
    lines.sort_unstable();
    output(env, &lines.concat())
}

/// Shared implementation of `export` and `readonly`.
pub(crate) fn assign_with_attribute(
    env: &mut Env,
    args: &[Field],
    builtin_name: &str,
    apply: fn(&mut Env, &str, zish_syntax::source::Location),
) -> Result {
    for arg in args {
        let (name, value) = match arg.value.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (arg.value.as_str(), None),
        };
        if !is_name(name) {
            let message = format!("`{name}` is not a valid variable name");
            return report_hard_error(env, builtin_name, &message);
        }
        if let Some(value) = value {
            if let Err(error) = env.assign_variable(name, value.to_string()) {
                return report_hard_error(env, builtin_name, &error.to_string());
            }
        }
        apply(env, name, arg.origin);
    }
    Result::new(ExitStatus::SUCCESS)
}

/// Entry point for executing the `export` built-in
pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    let operands = match args.first() {
        None => return print_exported(env),
        Some(first) if first.value == "-p" => {
            if args.len() == 1 {
                return print_exported(env);
            }
            &args[1..]
        }
        Some(first) if first.value == "--" => &args[1..],
        _ => &args[..],
    };
    assign_with_attribute(env, operands, "export", |env, name, _location| {
        env.variables.export(name, true);
    })
}
