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

//! Command search
//!
//! A command name is resolved in the POSIX order: special built-ins
//! first, then functions, then other built-ins, and finally external
//! utilities located through `$PATH`. Successful `$PATH` hits are
//! recorded in the environment's path cache, which the `hash` built-in
//! exposes and an assignment to `PATH` clears.

use std::ffi::CString;
use std::rc::Rc;
use zish_env::builtin::{Builtin, Type};
use zish_env::function::Function;
use zish_env::Env;

/// Target of a command search
#[derive(Clone, Debug)]
pub enum Target {
    /// Built-in utility
    Builtin(Builtin),
    /// Function
    Function(Rc<Function>),
    /// External utility
    External {
        /// Absolute or relative path to execute
        path: CString,
    },
}

/// Searches for a command by name.
pub fn search(env: &mut Env, name: &str) -> Option<Target> {
    if let Some(builtin) = env.builtins.get(name) {
        if builtin.r#type == Type::Special {
            return Some(Target::Builtin(*builtin));
        }
    }

    if let Some(function) = env.functions.get(name) {
        return Some(Target::Function(Rc::clone(function)));
    }

    if let Some(builtin) = env.builtins.get(name) {
        return Some(Target::Builtin(*builtin));
    }

    search_path(env, name).map(|path| Target::External { path })
}

/// Locates an external utility, consulting and filling the path cache.
///
/// A name containing a slash is used as a path without any search.
pub fn search_path(env: &mut Env, name: &str) -> Option<CString> {
    if name.contains('/') {
        return CString::new(name).ok();
    }

    if let Some(path) = env.command_paths.get(name) {
        return Some(path.clone());
    }

    let dirs = env.variables.get_scalar("PATH").unwrap_or_default().to_string();
    for dir in dirs.split(':') {
        let mut candidate = if dir.is_empty() {
            String::from(".")
        } else {
            dir.to_string()
        };
        candidate.push('/');
        candidate.push_str(name);
        let Ok(c_path) = CString::new(candidate) else {
            continue;
        };
        if env.system.is_executable_file(&c_path) {
            env.command_paths.insert(name.to_string(), c_path.clone());
            return Some(c_path);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use zish_env::system::RealSystem;

    fn env_with_path(path: &str) -> Env {
        let mut env = Env::new(RealSystem);
        env.variables.assign("PATH", path.to_string()).unwrap();
        env
    }

    #[test]
    fn slash_bypasses_path_search() {
        let mut env = env_with_path("/nonexistent");
        let path = search_path(&mut env, "./local/tool").unwrap();
        assert_eq!(path.to_str().unwrap(), "./local/tool");
        assert!(env.command_paths.is_empty());
    }

    #[test]
    fn path_search_finds_and_caches() {
        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("tool");
        std::fs::write(&tool, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();

        let mut env = env_with_path(dir.path().to_str().unwrap());
        let path = search_path(&mut env, "tool").unwrap();
        assert_eq!(path.to_str().unwrap(), tool.to_str().unwrap());
        assert!(env.command_paths.contains_key("tool"));

        // The cache answers even if PATH no longer matches.
        env.variables.assign("IRRELEVANT", "x".to_string()).unwrap();
        assert_eq!(search_path(&mut env, "tool"), Some(path));
    }

    #[test]
    fn assigning_path_clears_cache() {
        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("tool");
        std::fs::write(&tool, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();

        let mut env = env_with_path(dir.path().to_str().unwrap());
        search_path(&mut env, "tool").unwrap();
        assert!(!env.command_paths.is_empty());
        env.assign_variable("PATH", "/elsewhere".to_string()).unwrap();
        assert!(env.command_paths.is_empty());
    }

    #[test]
    fn non_executable_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("tool");
        std::fs::write(&tool, "data").unwrap();
        std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o644)).unwrap();

        let mut env = env_with_path(dir.path().to_str().unwrap());
        assert_eq!(search_path(&mut env, "tool"), None);
    }
}
