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

//! Pipeline execution
//!
//! A one-command pipeline runs in the current shell execution
//! environment. A longer pipeline forks one subshell per command with
//! the pipes connected before any child executes its command. Under job
//! control, the first child leads a new process group and the group is
//! set on both sides of every fork; the terminal is handed to the group
//! for the duration of the foreground wait and reclaimed afterwards.

use super::Command;
use crate::subshell::{start_subshell_in_group, JobControl};
use std::ops::ControlFlow::Continue;
use std::rc::Rc;
use zish_env::io::Fd;
use zish_env::job::{Job, Pid, ProcessState};
use zish_env::option::{On, PipeFail};
use zish_env::semantics::{ExitStatus, Result};
use zish_env::system::Errno;
use zish_env::Env;
use zish_syntax::syntax;

impl Command for syntax::Pipeline {
    fn execute(&self, env: &mut Env) -> Result {
        if !self.negation {
            return execute_commands(env, &self.commands, &|| self.to_string());
        }

        execute_commands(env, &self.commands, &|| self.to_string())?;
        env.exit_status = if env.exit_status.is_successful() {
            ExitStatus::FAILURE
        } else {
            ExitStatus::SUCCESS
        };
        Continue(())
    }
}

fn execute_commands(
    env: &mut Env,
    commands: &[Rc<syntax::Command>],
    name: &dyn Fn() -> String,
) -> Result {
    match commands {
        [] => {
            env.exit_status = ExitStatus::SUCCESS;
            Continue(())
        }
        [command] => command.execute(env),
        commands => execute_multi_command_pipeline(env, commands, name),
    }
}

fn execute_multi_command_pipeline(
    env: &mut Env,
    commands: &[Rc<syntax::Command>],
    name: &dyn Fn() -> String,
) -> Result {
    let monitor = env.controls_jobs();
    let mut pgid: Option<Pid> = None;
    let mut pids = Vec::with_capacity(commands.len());
    let mut prev_read: Option<Fd> = None;

    let mut iter = commands.iter().peekable();
    while let Some(command) = iter.next() {
        let has_next = iter.peek().is_some();
        let pipe = if has_next {
            match env.system.pipe() {
                Ok(pipe) => Some(pipe),
                Err(errno) => {
                    if let Some(fd) = prev_read {
                        _ = env.system.close(fd);
                    }
                    return pipeline_setup_failure(env, errno);
                }
            }
        } else {
            None
        };

        let job_control = if monitor {
            JobControl::Join(pgid)
        } else {
            JobControl::Inherit
        };
        let command = Rc::clone(command);
        let child = start_subshell_in_group(env, job_control, move |env| {
            if monitor {
                crate::subshell::restore_default_job_signals(env);
            }
            if let Some(read) = prev_read {
                if read != Fd::STDIN {
                    _ = env.system.dup2(read, Fd::STDIN);
                    _ = env.system.close(read);
                }
            }
            if let Some((next_read, write)) = pipe {
                _ = env.system.close(next_read);
                if write != Fd::STDOUT {
                    _ = env.system.dup2(write, Fd::STDOUT);
                    _ = env.system.close(write);
                }
            }
            command.execute(env)
        });

        let child = match child {
            Ok(child) => child,
            Err(errno) => {
                if let Some(fd) = prev_read {
                    _ = env.system.close(fd);
                }
                if let Some((read, write)) = pipe {
                    _ = env.system.close(read);
                    _ = env.system.close(write);
                }
                return pipeline_setup_failure(env, errno);
            }
        };

        if monitor && pgid.is_none() {
            pgid = Some(child);
        }
        if let Some(fd) = prev_read {
            _ = env.system.close(fd);
        }
        prev_read = match pipe {
            Some((read, write)) => {
                _ = env.system.close(write);
                Some(read)
            }
            None => None,
        };
        pids.push(child);
    }

    let states = wait_for_foreground(env, monitor, pgid, &pids, name);

    env.exit_status = pipeline_exit_status(env, &states);
    Continue(())
}

fn pipeline_setup_failure(env: &mut Env, errno: Errno) -> Result {
    let message = format!("cannot set up pipeline: {errno}");
    env.print_error(&message);
    env.exit_status = ExitStatus::FAILURE;
    Continue(())
}

/// Computes the exit status of a pipeline from its element states.
fn pipeline_exit_status(env: &Env, states: &[ProcessState]) -> ExitStatus {
    let status_of = |state: &ProcessState| match state {
        ProcessState::Running => ExitStatus::SUCCESS,
        ProcessState::Halted(result) => ExitStatus::from(*result),
    };
    let last = states.last().map(&status_of).unwrap_or(ExitStatus::SUCCESS);
    if env.options.get(PipeFail) == On {
        states
            .iter()
            .map(&status_of)
            .filter(|status| !status.is_successful())
            .next_back()
            .unwrap_or(last)
    } else {
        last
    }
}

/// Waits for a foreground process group, handling terminal ownership
/// and stopped jobs.
///
/// Returns one final state per process in `pids`. Under job control the
/// terminal is given to `pgid` before waiting and reclaimed afterwards.
/// If the job stops, it is entered into the job table and reported.
pub(crate) fn wait_for_foreground(
    env: &mut Env,
    monitor: bool,
    pgid: Option<Pid>,
    pids: &[Pid],
    name: &dyn Fn() -> String,
) -> Vec<ProcessState> {
    let tty = Fd::STDIN;
    if monitor {
        if let Some(pgid) = pgid {
            _ = env.system.tcsetpgrp(tty, pgid);
        }
    }

    let mut states: Vec<Option<ProcessState>> = vec![None; pids.len()];
    while states.iter().any(Option::is_none) {
        match env.system.wait_any(true) {
            Ok(Some((pid, state))) => {
                if let Some(index) = pids.iter().position(|&p| p == pid) {
                    match state {
                        ProcessState::Running => {}
                        ProcessState::Halted(_) => states[index] = Some(state),
                    }
                } else {
                    env.jobs.update_state(pid, state);
                }
            }
            Ok(None) => unreachable!("blocking wait cannot report no change"),
            Err(Errno::EINTR) => continue,
            Err(_) => break,
        }
    }

    if monitor {
        let own = env.system.getpgrp();
        _ = env.system.tcsetpgrp(tty, own);
    }

    let states: Vec<ProcessState> = states
        .into_iter()
        .map(|state| state.unwrap_or(ProcessState::exited(ExitStatus::FAILURE)))
        .collect();

    // A stopped foreground command becomes a job.
    if let Some(last) = states.last() {
        if last.is_stopped() {
            let last_pid = *pids.last().expect("pipeline has at least one process");
            let mut job = Job::new(last_pid);
            job.pgid = pgid.unwrap_or(last_pid);
            job.job_controlled = monitor;
            job.state = *last;
            job.name = name();
            match env.jobs.add(job) {
                Ok(_) => crate::job::notify_state_changes(env),
                Err(error) => {
                    let message = error.to_string();
                    env.print_error(&message);
                }
            }
        }
    }

    states
}
