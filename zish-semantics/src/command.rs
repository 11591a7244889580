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

//! Command execution
//!
//! The [`Command`] trait is implemented for every AST node that can be
//! executed. Execution result and `$?` are communicated through
//! `env.exit_status`; non-local effects (`break`, `return`, `exit`) are
//! carried as [`Divert`](zish_env::semantics::Divert) values in the
//! result.

mod compound_command;
mod pipeline;
mod simple_command;

use crate::subshell::{start_subshell_in_group, JobControl};
use crate::trap::{apply_errexit, run_traps_for_caught_signals};
use std::ops::ControlFlow::Continue;
use std::rc::Rc;
use zish_env::job::Job;
use zish_env::semantics::{ExitStatus, Result};
use zish_env::stack::Frame;
use zish_env::Env;
use zish_syntax::syntax;

pub(crate) use self::pipeline::wait_for_foreground;

/// Runs an external utility with the given fields.
///
/// The `command` built-in uses this to execute a utility while
/// bypassing function lookup.
pub fn execute_external_utility(
    env: &mut Env,
    path: std::ffi::CString,
    fields: Vec<zish_env::semantics::Field>,
) -> Result {
    self::simple_command::execute_external(env, path, &[], &[], fields)
}

/// Execution of an AST node
pub trait Command {
    /// Executes the node, leaving the exit status in `env.exit_status`.
    fn execute(&self, env: &mut Env) -> Result;
}

impl Command for syntax::List {
    /// Executes the items in order.
    ///
    /// Pending signal traps run between items, one of the defined
    /// delivery points.
    fn execute(&self, env: &mut Env) -> Result {
        for item in &self.0 {
            item.execute(env)?;
            run_traps_for_caught_signals(env)?;
        }
        Continue(())
    }
}

impl Command for syntax::Item {
    /// Executes the and-or list, asynchronously if the item ends with
    /// `&`.
    fn execute(&self, env: &mut Env) -> Result {
        if self.async_flag.is_some() {
            start_async(env, self)
        } else {
            self.and_or.execute(env)
        }
    }
}

/// Launches an and-or list as an asynchronous job.
///
/// The job is registered in the job table and `$!` is updated. The exit
/// status of the launch itself is zero.
fn start_async(env: &mut Env, item: &syntax::Item) -> Result {
    let name = item.and_or.to_string();
    let and_or = Rc::clone(&item.and_or);
    let monitor = env.controls_jobs();

    let job_control = if monitor {
        JobControl::Join(None)
    } else {
        JobControl::Inherit
    };
    let child = start_subshell_in_group(env, job_control, move |env| {
        if !monitor {
            // Without job control, an asynchronous command reads from
            // /dev/null and is immune to keyboard interrupts.
            use zish_env::signal::Name::{Int, Quit};
            use zish_env::system::SignalHandling::Ignore;
            _ = env.system.set_signal_handling(Int.number(), Ignore);
            _ = env.system.set_signal_handling(Quit.number(), Ignore);
            if let Ok(null) = env
                .system
                .open(c"/dev/null", libc::O_RDONLY, 0)
            {
                _ = env.system.dup2(null, zish_env::io::Fd::STDIN);
                _ = env.system.close(null);
            }
        }
        and_or.execute(env)
    });

    match child {
        Ok(pid) => {
            let mut job = Job::new(pid);
            job.job_controlled = monitor;
            if !monitor {
                job.pgid = env.system.getpgrp();
            }
            job.name = name;
            job.state_changed = false;
            match env.jobs.add(job) {
                Ok(index) => {
                    if env.is_interactive() {
                        let line = format!("[{}] {}\n", index + 1, pid.as_raw());
                        env.system.print_error(&line);
                    }
                }
                Err(error) => {
                    let message = error.to_string();
                    env.print_error(&message);
                }
            }
            env.jobs.set_last_async_pid(pid);
            env.exit_status = ExitStatus::SUCCESS;
            Continue(())
        }
        Err(errno) => {
            let message = format!("cannot start asynchronous command: {errno}");
            env.print_error(&message);
            env.exit_status = ExitStatus::FAILURE;
            Continue(())
        }
    }
}

impl Command for syntax::AndOrList {
    /// Executes the pipelines with `&&`/`||` short-circuiting.
    ///
    /// Every pipeline except the last runs in a condition context, where
    /// `errexit` does not apply.
    fn execute(&self, env: &mut Env) -> Result {
        let last = self.rest.len();
        execute_pipeline(env, &self.first, last != 0)?;
        for (index, (condition, pipeline)) in self.rest.iter().enumerate() {
            let take = match condition {
                syntax::AndOr::AndThen => env.exit_status.is_successful(),
                syntax::AndOr::OrElse => !env.exit_status.is_successful(),
            };
            if take {
                execute_pipeline(env, pipeline, index + 1 != last)?;
            }
        }
        Continue(())
    }
}

/// Executes one pipeline of an and-or list.
fn execute_pipeline(
    env: &mut Env,
    pipeline: &syntax::Pipeline,
    is_condition: bool,
) -> Result {
    if is_condition {
        env.stack.push(Frame::Condition);
        let result = pipeline.execute(env);
        env.stack.pop(Frame::Condition);
        result
    } else {
        pipeline.execute(env)?;
        if pipeline.negation {
            return Continue(());
        }
        apply_errexit(env)
    }
}

impl Command for syntax::Command {
    fn execute(&self, env: &mut Env) -> Result {
        match self {
            syntax::Command::Simple(command) => command.execute(env),
            syntax::Command::Compound(command) => command.execute(env),
            syntax::Command::Function(definition) => definition.execute(env),
        }
    }
}

impl Command for syntax::FunctionDefinition {
    /// Defines the function.
    ///
    /// The body is shared with the AST, so defining a function costs one
    /// reference count.
    fn execute(&self, env: &mut Env) -> Result {
        env.functions.define(zish_env::function::Function {
            name: self.name.clone(),
            body: Rc::clone(&self.body),
            origin: self.location,
        });
        env.exit_status = ExitStatus::SUCCESS;
        Continue(())
    }
}
