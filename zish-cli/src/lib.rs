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

//! Command-line frontend of the shell
//!
//! The [`main`] function, used by the `zish` binary, wires everything
//! together: argument parsing, environment setup, signal dispositions,
//! the initialization file, the main read-eval loop, the EXIT trap, and
//! history persistence.

pub mod history;
pub mod startup;

use self::history::History;
use self::startup::input::prepare_input;
use self::startup::{parse, Source};
use std::ops::ControlFlow::Break;
use std::path::PathBuf;
use std::process::ExitCode;
use zish_env::io::Fd;
use zish_env::option::{Interactive, Monitor, On};
use zish_env::semantics::Divert;
use zish_env::signal::Name;
use zish_env::system::{RealSystem, SignalHandling};
use zish_env::Env;
use zish_semantics::read_eval_loop;
use zish_semantics::trap::run_exit_trap;

/// Prepares shell variables from the process environment.
fn init_variables(env: &mut Env, positional: Vec<String>) {
    env.variables.extend_env(std::env::vars());
    // IFS gets its default value regardless of the inherited environment.
    _ = env.variables.assign("IFS", " \t\n".to_string());
    _ = env
        .variables
        .assign("PPID", env.system.getppid().as_raw().to_string());
    if env.variables.get_scalar("PWD").is_none_or(|pwd| !pwd.starts_with('/')) {
        if let Ok(pwd) = env.system.getcwd() {
            _ = env
                .variables
                .assign("PWD", pwd.to_string_lossy().into_owned());
        }
    }
    env.variables.set_positional_params(positional);
}

/// Installs the signal dispositions of an interactive shell.
///
/// `SIGINT` is caught so that a `^C` at the prompt discards the line;
/// `SIGQUIT` is ignored. Under job control the stop signals are ignored
/// too and the shell takes the terminal in its own process group.
fn init_interactive_signals(env: &mut Env) {
    _ = env
        .system
        .set_signal_handling(Name::Int.number(), SignalHandling::Catch);
    _ = env
        .system
        .set_signal_handling(Name::Quit.number(), SignalHandling::Ignore);
    if env.controls_jobs() {
        for name in [Name::Tstp, Name::Ttin, Name::Ttou] {
            _ = env
                .system
                .set_signal_handling(name.number(), SignalHandling::Ignore);
        }
        let own = env.system.getpid();
        _ = env.system.setpgid(own, own);
        _ = env.system.tcsetpgrp(Fd::STDIN, env.system.getpgrp());
    }
}

fn history_path(env: &Env) -> Option<PathBuf> {
    if let Some(path) = env.variables.get_scalar("HISTFILE") {
        return Some(PathBuf::from(path));
    }
    let home = env.variables.get_scalar("HOME")?;
    Some(PathBuf::from(home).join(".zish_history"))
}

/// Runs the shell and returns its exit code.
pub fn main() -> ExitCode {
    let mut system = RealSystem;
    let mut env = Env::new(system);
    env.builtins.extend(zish_builtin::BUILTINS.iter().copied());

    let invocation = match parse(std::env::args()) {
        Ok(invocation) => invocation,
        Err(error) => {
            let arg0 = std::env::args().next().unwrap_or_else(|| "zish".to_string());
            system.print_error(&format!("{arg0}: {error}\n"));
            return ExitCode::from(2);
        }
    };

    env.arg0 = invocation.arg0.clone();
    init_variables(&mut env, invocation.positional);

    // Interactive when reading from a terminal and not told otherwise.
    let interactive = invocation.force_interactive
        || (invocation.source == Source::Stdin
            && env.system.isatty(Fd::STDIN)
            && env.system.isatty(Fd::STDERR));
    if interactive {
        env.options.set(Interactive, On);
        env.options.set(Monitor, On);
    }
    for (option, state) in invocation.options {
        env.options.set(option, state);
    }
    if matches!(invocation.source, Source::CommandString(_)) {
        env.options.set(zish_env::option::CmdLine, On);
    }

    let history = if env.is_interactive() {
        match history_path(&env) {
            Some(path) => History::load(path),
            None => History::transient(),
        }
    } else {
        History::transient()
    };

    if env.is_interactive() {
        init_interactive_signals(&mut env);
        self::startup::init_file::run_init_file(&mut env);
    }

    let interactive = env.is_interactive();
    let mut input = match prepare_input(&mut env, &invocation.source, interactive, history) {
        Ok(input) => input,
        Err(message) => {
            env.print_error(&message);
            return ExitCode::from(127);
        }
    };

    let result = read_eval_loop(&mut env, &mut *input);
    drop(input);

    let mut run_trap = true;
    if let Break(divert) = result {
        if let Some(exit_status) = divert.exit_status() {
            env.exit_status = exit_status;
        }
        if let Divert::Abort(_) = divert {
            run_trap = false;
        }
    }
    if run_trap {
        run_exit_trap(&mut env);
    }

    ExitCode::from(env.exit_status.0 as u8)
}
