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

//! Subshell creation
//!
//! A subshell is a forked copy of the shell. The child clears user-set
//! traps (the EXIT trap is not inherited), drops interactivity, and runs
//! the given task; it never returns. The parent gets the child's process
//! ID.
//!
//! When job control is involved, the caller can request that the child
//! join a process group. The group is set on both sides of the fork so
//! that neither side races ahead before signals can be delivered to the
//! right group.

use std::ops::ControlFlow::{Break, Continue};
use zish_env::job::Pid;
use zish_env::option::{Interactive, Monitor, Off};
use zish_env::semantics::{Divert, ExitStatus, Result as ExecResult};
use zish_env::system::{Errno, ForkResult};
use zish_env::Env;

/// How the new child relates to process groups
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum JobControl {
    /// The child stays in the parent's process group.
    Inherit,
    /// The child joins the given group, or leads a new group of its own
    /// if `None`.
    Join(Option<Pid>),
}

/// Forks a child that runs the given task and exits.
///
/// The parent returns the child's process ID. The child never returns:
/// it runs `task` and terminates with the resulting exit status.
pub fn start_subshell_in_group<F>(
    env: &mut Env,
    job_control: JobControl,
    task: F,
) -> std::result::Result<Pid, Errno>
where
    F: FnOnce(&mut Env) -> ExecResult,
{
    let result = unsafe { env.system.fork() }?;
    match result {
        ForkResult::Parent { child } => {
            if let JobControl::Join(pgid) = job_control {
                // Ignore a race where the child has already set its
                // group or exited.
                _ = env.system.setpgid(child, pgid.unwrap_or(child));
            }
            Ok(child)
        }
        ForkResult::Child => {
            if let JobControl::Join(pgid) = job_control {
                let zero = Pid::from_raw(0);
                _ = env.system.setpgid(zero, pgid.unwrap_or(zero));
            }
            let mut system = env.system;
            env.traps.enter_subshell(&mut system);
            env.options.set(Interactive, Off);
            env.options.set(Monitor, Off);
            env.jobs = zish_env::job::JobList::new();

            let exit_status = match task(env) {
                Continue(()) => env.exit_status,
                Break(divert) => match divert {
                    Divert::Exit(status)
                    | Divert::Abort(status)
                    | Divert::Interrupt(status)
                    | Divert::Return(status) => status.unwrap_or(env.exit_status),
                    Divert::Break { .. } | Divert::Continue { .. } => env.exit_status,
                },
            };
            env.system.exit_process(exit_status)
        }
    }
}

/// Forks a subshell in the parent's process group.
pub fn start_subshell<F>(env: &mut Env, task: F) -> std::result::Result<Pid, Errno>
where
    F: FnOnce(&mut Env) -> ExecResult,
{
    start_subshell_in_group(env, JobControl::Inherit, task)
}

/// Restores the default dispositions of the job-control signals.
///
/// An interactive shell ignores these signals for itself; a child about
/// to run a command must take them again.
pub fn restore_default_job_signals(env: &mut Env) {
    use zish_env::signal::Name::{Int, Quit, Tstp, Ttin, Ttou};
    use zish_env::system::SignalHandling;
    for name in [Int, Quit, Tstp, Ttin, Ttou] {
        _ = env
            .system
            .set_signal_handling(name.number(), SignalHandling::Default);
    }
}

/// Waits for a specific subshell to terminate, returning its exit
/// status.
///
/// State changes of other children reported meanwhile are recorded in
/// the job list. A stopped subshell is resumed rather than waited out,
/// since a subshell without a terminal has no business stopping.
pub fn wait_for_subshell(env: &mut Env, pid: Pid) -> std::result::Result<ExitStatus, Errno> {
    use zish_env::job::ProcessState;
    loop {
        match env.system.wait_any(true) {
            Ok(Some((changed, state))) => {
                if changed == pid {
                    match state {
                        ProcessState::Halted(result) if !result.is_stopped() => {
                            return Ok(result.into());
                        }
                        ProcessState::Halted(_) => {
                            _ = env.system.kill(pid, Some(zish_env::signal::Name::Cont.number()));
                        }
                        ProcessState::Running => {}
                    }
                } else {
                    env.jobs.update_state(changed, state);
                }
            }
            Ok(None) => unreachable!("blocking wait cannot report no change"),
            Err(Errno::EINTR) => continue,
            Err(errno) => return Err(errno),
        }
    }
}
