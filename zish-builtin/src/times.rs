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

//! Times built-in
//!
//! Prints the accumulated user and system CPU times of the shell and of
//! its terminated children, in the POSIX `%dm%fs` format.

use crate::common::{output, report_error};
use zish_env::builtin::Result;
use zish_env::semantics::Field;
use zish_env::Env;

fn format_time(seconds: f64) -> String {
    let minutes = (seconds / 60.0).floor() as u64;
    let seconds = seconds - (minutes as f64) * 60.0;
    format!("{minutes}m{seconds:.6}s")
}

/// Entry point for executing the `times` built-in
pub fn main(env: &mut Env, _args: Vec<Field>) -> Result {
    match env.system.times() {
        Ok(times) => {
            let content = format!(
                "{} {}\n{} {}\n",
                format_time(times.self_user),
                format_time(times.self_system),
                format_time(times.children_user),
                format_time(times.children_system),
            );
            output(env, &content)
        }
        Err(errno) => report_error(env, "times", &errno.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_formatting() {
        assert_eq!(format_time(0.0), "0m0.000000s");
        assert_eq!(format_time(61.5), "1m1.500000s");
    }
}
