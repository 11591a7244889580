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

//! This crate defines the shell execution environment.
//!
//! The [`Env`] struct aggregates everything command execution may affect
//! or be affected by: variables, functions, options, jobs, traps, the
//! path cache, and the [system interface](system). Application-managed
//! parts are plain Rust data; system-managed parts (file descriptors,
//! processes, signal dispositions) are reached through
//! [`RealSystem`](system::RealSystem).

pub mod builtin;
pub mod function;
pub mod input;
pub mod io;
pub mod job;
pub mod option;
pub mod semantics;
pub mod signal;
pub mod stack;
pub mod system;
pub mod trap;
pub mod variable;

use self::builtin::Builtin;
use self::function::FunctionSet;
use self::job::{JobList, Pid};
use self::option::{Interactive, Monitor, On, OptionSet};
use self::semantics::ExitStatus;
use self::stack::Stack;
use self::system::RealSystem;
use self::trap::TrapSet;
use self::variable::{ReadOnlyError, VariableSet};
use std::collections::HashMap;
use std::ffi::CString;

/// Whole shell execution environment
#[derive(Clone, Debug)]
pub struct Env {
    /// Name the shell was invoked as, expanded from `$0`
    pub arg0: String,

    /// Built-in utilities available in the environment
    pub builtins: HashMap<&'static str, Builtin>,

    /// Cache of resolved command paths (the `hash` built-in)
    ///
    /// Maps command names to the absolute paths found by `$PATH` search.
    /// Assigning to `PATH` clears it.
    pub command_paths: HashMap<String, CString>,

    /// Exit status of the last executed command
    pub exit_status: ExitStatus,

    /// Functions defined in the environment
    pub functions: FunctionSet,

    /// Jobs managed in the environment
    pub jobs: JobList,

    /// Process ID of the main shell process
    ///
    /// This stays the parent's PID in subshells; it is the value of `$$`.
    pub main_pid: Pid,

    /// Shell options
    pub options: OptionSet,

    /// Runtime context stack
    pub stack: Stack,

    /// Interface to the underlying system
    pub system: RealSystem,

    /// Traps defined in the environment
    pub traps: TrapSet,

    /// Variables and positional parameters
    pub variables: VariableSet,
}

impl Env {
    /// Creates a new environment with the given system interface.
    #[must_use]
    pub fn new(system: RealSystem) -> Env {
        let main_pid = system.getpid();
        Env {
            arg0: String::new(),
            builtins: HashMap::new(),
            command_paths: HashMap::new(),
            exit_status: ExitStatus::SUCCESS,
            functions: FunctionSet::new(),
            jobs: JobList::new(),
            main_pid,
            options: OptionSet::posix_default(),
            stack: Stack::new(),
            system,
            traps: TrapSet::new(),
            variables: VariableSet::new(),
        }
    }

    /// Returns true if the shell is interactive.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.options.get(Interactive) == On
    }

    /// Returns true if job control is active.
    #[must_use]
    pub fn controls_jobs(&self) -> bool {
        self.options.get(Monitor) == On
    }

    /// Assigns a shell variable, maintaining the path cache.
    ///
    /// All variable assignments made by command execution go through this
    /// method so that assigning to `PATH` invalidates cached command
    /// locations.
    pub fn assign_variable(&mut self, name: &str, value: String) -> Result<(), ReadOnlyError> {
        if name == "PATH" {
            self.command_paths.clear();
        }
        self.variables.assign(name, value)
    }

    /// Prints a diagnostic with the shell name prefix to standard error.
    pub fn print_error(&mut self, message: &str) {
        let text = format!("{}: {}\n", self.arg0, message);
        self.system.print_error(&text);
    }

    /// Prints a diagnostic from a named utility to standard error.
    pub fn print_named_error(&mut self, name: &str, message: &str) {
        let text = format!("{}: {}: {}\n", self.arg0, name, message);
        self.system.print_error(&text);
    }
}
