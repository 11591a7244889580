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

//! Echo built-in
//!
//! Writes its operands separated by spaces and terminated by a newline.
//! A first operand of `-n` suppresses the newline. No escape sequences
//! are processed; `printf` covers that ground.

use crate::common::output;
use zish_env::builtin::Result;
use zish_env::semantics::Field;
use zish_env::Env;

/// Entry point for executing the `echo` built-in
pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    let (newline, operands) = match args.first() {
        Some(first) if first.value == "-n" => (false, &args[1..]),
        _ => (true, &args[..]),
    };
    let mut content = operands
        .iter()
        .map(|field| field.value.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    if newline {
        content.push('\n');
    }
    output(env, &content)
}
