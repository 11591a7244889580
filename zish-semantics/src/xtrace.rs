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

//! Execution tracing (`set -x`)

use zish_env::option::{On, XTrace};
use zish_env::semantics::Field;
use zish_env::Env;
use zish_quote::quote;

/// Prints an execution trace for the expanded fields, if tracing is on.
///
/// Fields are quoted so that the trace re-parses to the same words.
pub fn trace_fields(env: &mut Env, fields: &[Field]) {
    if env.options.get(XTrace) != On || fields.is_empty() {
        return;
    }
    let mut line = String::from("+");
    for field in fields {
        line.push(' ');
        line.push_str(&quote(&field.value));
    }
    line.push('\n');
    env.system.print_error(&line);
}

/// Prints an execution trace for an assignment, if tracing is on.
pub fn trace_assignment(env: &mut Env, name: &str, value: &str) {
    if env.options.get(XTrace) != On {
        return;
    }
    let line = format!("+ {}={}\n", name, quote(value));
    env.system.print_error(&line);
}
