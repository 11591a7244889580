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

//! Hash built-in
//!
//! # Syntax
//!
//! ```sh
//! hash [name…]
//! hash -r
//! hash -d name…
//! hash -t name…
//! ```
//!
//! Maintains the command path cache: `-r` clears it, `-d` removes single
//! entries, `-t` prints the cached path of a name (failing if absent).
//! Plain names are looked up in `$PATH` and entered into the cache;
//! without operands, the cache is listed.

use crate::common::{output, report_error};
use zish_env::builtin::Result;
use zish_env::semantics::{ExitStatus, Field};
use zish_env::Env;
use zish_semantics::command_search::search_path;

fn print_cache(env: &mut Env) -> Result {
    let mut lines: Vec<String> = env
        .command_paths
        .iter()
        .map(|(name, path)| format!("{}={}\n", name, path.to_string_lossy()))
        .collect();
    lines.sort_unstable();
    output(env, &lines.concat())
}

/// Entry point for executing the `hash` built-in
pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    match args.first().map(|f| f.value.as_str()) {
        None => print_cache(env),
        Some("-r") => {
            env.command_paths.clear();
            Result::new(ExitStatus::SUCCESS)
        }
        Some("-d") => {
            for name in &args[1..] {
                env.command_paths.remove(&name.value);
            }
            Result::new(ExitStatus::SUCCESS)
        }
        Some("-t") => {
            let mut lines = String::new();
            for name in &args[1..] {
                match env.command_paths.get(&name.value) {
                    Some(path) => lines.push_str(&format!("{}\n", path.to_string_lossy())),
                    None => {
                        let message = format!("{}: not found in cache", name.value);
                        return report_error(env, "hash", &message);
                    }
                }
            }
            output(env, &lines)
        }
        Some(_) => {
            for name in &args {
                if search_path(env, &name.value).is_none() {
                    let message = format!("{}: not found", name.value);
                    return report_error(env, "hash", &message);
                }
            }
            Result::new(ExitStatus::SUCCESS)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;
    use zish_env::system::RealSystem;

    #[test]
    fn clear_and_remove() {
        let mut env = Env::new(RealSystem);
        env.command_paths
            .insert("a".to_string(), CString::new("/bin/a").unwrap());
        env.command_paths
            .insert("b".to_string(), CString::new("/bin/b").unwrap());

        main(&mut env, Field::dummies(["-d", "a"]));
        assert!(!env.command_paths.contains_key("a"));
        assert!(env.command_paths.contains_key("b"));

        main(&mut env, Field::dummies(["-r"]));
        assert!(env.command_paths.is_empty());
    }

    #[test]
    fn lookup_of_missing_entry_fails() {
        let mut env = Env::new(RealSystem);
        let result = main(&mut env, Field::dummies(["-t", "nope"]));
        assert_eq!(result.exit_status, ExitStatus::FAILURE);
    }
}
