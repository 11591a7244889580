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

//! Initialization file
//!
//! An interactive shell sources the file named by `$ENV` on startup.
//! Errors in the file are reported but do not prevent the session from
//! starting.

use zish_env::Env;
use zish_semantics::run_source;

/// Sources `$ENV`, if set and readable.
pub fn run_init_file(env: &mut Env) {
    let Some(path) = env.variables.get_scalar("ENV") else {
        return;
    };
    let path = path.to_string();
    let Ok(content) = std::fs::read_to_string(&path) else {
        return;
    };
    _ = run_source(env, &content);
}
