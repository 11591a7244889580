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

//! Simple command execution
//!
//! After word expansion, the first field selects the target through
//! [command search](crate::command_search). Built-ins and functions run
//! in the current shell process with redirections saved and restored;
//! external utilities run in a forked child that applies its
//! redirections and `exec`s.
//!
//! Failures follow the POSIX propagation rules: a redirection or
//! assignment error merely fails the command for an ordinary utility,
//! but interrupts the shell (and so exits a non-interactive shell) for
//! special built-ins and for assignments without a command word.

use super::{wait_for_foreground, Command};
use crate::assign::perform_assignments;
use crate::command_search::{search, Target};
use crate::expansion::expand_words;
use crate::handle::Handle;
use crate::redir::RedirGuard;
use crate::subshell::{restore_default_job_signals, start_subshell_in_group, JobControl};
use crate::trap::run_traps_for_caught_signals;
use crate::xtrace::trace_fields;
use std::ffi::CString;
use std::ops::ControlFlow::{Break, Continue};
use std::rc::Rc;
use zish_env::builtin::Builtin;
use zish_env::function::Function;
use zish_env::job::ProcessState;
use zish_env::semantics::{Divert, ExitStatus, Field, Result};
use zish_env::stack::Frame;
use zish_env::system::Errno;
use zish_env::variable::Variable;
use zish_env::Env;
use zish_syntax::syntax::{self, Assign, Redir};

impl Command for syntax::SimpleCommand {
    fn execute(&self, env: &mut Env) -> Result {
        let (fields, subst_status) = match expand_words(env, &self.words) {
            Ok(result) => result,
            Err(error) => return error.handle(env),
        };

        if fields.is_empty() {
            return execute_absent(env, &self.assigns, &self.redirs, subst_status);
        }

        trace_fields(env, &fields);
        let name = fields[0].value.clone();
        match search(env, &name) {
            Some(Target::Builtin(builtin)) => {
                execute_builtin(env, builtin, &self.assigns, &self.redirs, fields)
            }
            Some(Target::Function(function)) => {
                execute_function(env, &function, &self.assigns, &self.redirs, fields)
            }
            Some(Target::External { path }) => {
                execute_external(env, path, &self.assigns, &self.redirs, fields)
            }
            None => {
                // Redirections still apply, so `cmd 2>/dev/null` can
                // silence the diagnostic.
                let mut guard = RedirGuard::new(env);
                _ = guard.perform_redirs(self.redirs.iter());
                let message = format!("{name}: not found");
                guard.print_error(&message);
                drop(guard);
                env.exit_status = ExitStatus::NOT_FOUND;
                Continue(())
            }
        }
    }
}

/// Executes a simple command without a command word.
///
/// Redirections are performed and undone; assignments persist. The exit
/// status is that of the last command substitution, or zero.
fn execute_absent(
    env: &mut Env,
    assigns: &[Assign],
    redirs: &[Redir],
    subst_status: Option<ExitStatus>,
) -> Result {
    let mut exit_status = subst_status;
    {
        let mut guard = RedirGuard::new(env);
        if let Err(error) = guard.perform_redirs(redirs) {
            drop(guard);
            return error.handle(env);
        }
        match perform_assignments(&mut guard, assigns, false) {
            Ok(status) => exit_status = status.or(exit_status),
            Err(error) => {
                drop(guard);
                // An assignment error without a command word interrupts
                // the shell.
                return error.handle(env);
            }
        }
    }
    env.exit_status = exit_status.unwrap_or(ExitStatus::SUCCESS);
    Continue(())
}

/// Saves the current values of the variables the assignments will touch.
fn save_variables(env: &Env, assigns: &[Assign]) -> Vec<(String, Option<Variable>)> {
    assigns
        .iter()
        .map(|assign| {
            (
                assign.name.clone(),
                env.variables.get(&assign.name).cloned(),
            )
        })
        .collect()
}

/// Restores variables saved by [`save_variables`].
///
/// If the old variable was readonly, the temporary assignment never took
/// effect, and the failed unset here leaves it untouched.
fn restore_variables(env: &mut Env, saved: Vec<(String, Option<Variable>)>) {
    for (name, variable) in saved {
        _ = env.variables.unset(&name);
        if let Some(old) = variable {
            if let Some(value) = old.value {
                _ = env.assign_variable(&name, value);
            }
            env.variables.export(&name, old.is_exported);
            if let Some(location) = old.read_only_location {
                env.variables.make_read_only(&name, location);
            }
        }
    }
}

fn execute_builtin(
    env: &mut Env,
    builtin: Builtin,
    assigns: &[Assign],
    redirs: &[Redir],
    fields: Vec<Field>,
) -> Result {
    let is_special = builtin.is_special();
    let saved = if is_special {
        None
    } else {
        Some(save_variables(env, assigns))
    };

    let mut guard = RedirGuard::new(env);
    if let Err(error) = guard.perform_redirs(redirs) {
        drop(guard);
        let result = error.handle(env);
        if is_special {
            return Break(Divert::Interrupt(Some(ExitStatus::FAILURE)));
        }
        return result;
    }

    if let Err(error) = perform_assignments(&mut guard, assigns, false) {
        drop(guard);
        if let Some(saved) = saved {
            restore_variables(env, saved);
        }
        return error.handle(env);
    }

    let args = fields[1..].to_vec();
    let result = (builtin.execute)(&mut guard, args);
    if result.preserve_redirs {
        guard.preserve_redirs();
    }
    drop(guard);
    if let Some(saved) = saved {
        restore_variables(env, saved);
    }

    env.exit_status = result.exit_status;
    // A delivery point: traps run after a built-in returns.
    match result.divert {
        Continue(()) => run_traps_for_caught_signals(env),
        Break(divert) => Break(divert),
    }
}

fn execute_function(
    env: &mut Env,
    function: &Rc<Function>,
    assigns: &[Assign],
    redirs: &[Redir],
    fields: Vec<Field>,
) -> Result {
    let mut guard = RedirGuard::new(env);
    if let Err(error) = guard.perform_redirs(redirs) {
        drop(guard);
        return error.handle(env);
    }
    if let Err(error) = perform_assignments(&mut guard, assigns, false) {
        drop(guard);
        return error.handle(env);
    }

    let args: Vec<String> = fields[1..].iter().map(|f| f.value.clone()).collect();
    guard.variables.push_positional_frame(args);
    guard.stack.push(Frame::Function);
    let result = function.body.execute(&mut guard);
    guard.stack.pop(Frame::Function);
    guard.variables.pop_positional_frame();
    drop(guard);

    match result {
        Break(Divert::Return(exit_status)) => {
            if let Some(exit_status) = exit_status {
                env.exit_status = exit_status;
            }
            Continue(())
        }
        other => other,
    }
}

pub(crate) fn execute_external(
    env: &mut Env,
    path: CString,
    assigns: &[Assign],
    redirs: &[Redir],
    fields: Vec<Field>,
) -> Result {
    let monitor = env.controls_jobs();
    let job_control = if monitor {
        JobControl::Join(None)
    } else {
        JobControl::Inherit
    };

    let name = fields
        .iter()
        .map(|f| f.value.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let assigns = assigns.to_vec();
    let redirs = redirs.to_vec();
    let child_fields = fields;

    let child = start_subshell_in_group(env, job_control, move |env| {
        restore_default_job_signals(env);

        let mut guard = RedirGuard::new(env);
        if let Err(error) = guard.perform_redirs(&redirs) {
            drop(guard);
            _ = error.handle(env);
            env.exit_status = ExitStatus::FAILURE;
            return Continue(());
        }
        guard.preserve_redirs();
        drop(guard);

        if let Err(error) = perform_assignments(env, &assigns, true) {
            _ = error.handle(env);
            env.exit_status = ExitStatus::FAILURE;
            return Continue(());
        }

        let args: Vec<CString> = child_fields
            .iter()
            .filter_map(|field| CString::new(field.value.as_str()).ok())
            .collect();
        let envs = env.variables.env_c_strings();
        let error = env
            .system
            .execve(&path, &args, &envs)
            .expect_err("execve cannot return on success");
        let (message, exit_status) = match error {
            Errno::ENOENT | Errno::ENOTDIR => {
                (format!("{}: not found", path_str(&path)), ExitStatus::NOT_FOUND)
            }
            errno => (
                format!("cannot execute `{}`: {}", path_str(&path), errno),
                ExitStatus::NOEXEC,
            ),
        };
        env.print_error(&message);
        env.exit_status = exit_status;
        Continue(())
    });

    match child {
        Ok(pid) => {
            let states =
                wait_for_foreground(env, monitor, monitor.then_some(pid), &[pid], &|| name.clone());
            env.exit_status = states
                .last()
                .map(|state| match state {
                    ProcessState::Running => ExitStatus::SUCCESS,
                    ProcessState::Halted(result) => ExitStatus::from(*result),
                })
                .unwrap_or(ExitStatus::FAILURE);
            Continue(())
        }
        Err(errno) => {
            let message = format!("cannot start command: {errno}");
            env.print_error(&message);
            env.exit_status = ExitStatus::FAILURE;
            Continue(())
        }
    }
}

fn path_str(path: &CString) -> String {
    path.to_string_lossy().into_owned()
}
