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

//! Wait built-in
//!
//! # Syntax
//!
//! ```sh
//! wait [job-or-pid…]
//! ```
//!
//! Waits for the given jobs or process IDs to terminate, or for all
//! known jobs when no operand is given. Unknown processes yield status
//! 127. Pending traps run before waiting, which is one of the defined
//! trap delivery points.

use crate::common::report_error;
use std::ops::ControlFlow::Break;
use zish_env::builtin::Result;
use zish_env::job::{id, Pid, ProcessState};
use zish_env::semantics::{ExitStatus, Field};
use zish_env::system::Errno;
use zish_env::Env;

/// Waits until the job containing `pid` terminates, returning its
/// status.
fn wait_for_pid(env: &mut Env, pid: Pid) -> ExitStatus {
    // The process may already have been reaped into the job table.
    if let Some(index) = env.jobs.find_by_pid(pid) {
        let job = env.jobs.get(index).expect("index is live");
        if let ProcessState::Halted(result) = job.state {
            if !result.is_stopped() {
                env.jobs.remove(index);
                return ExitStatus::from(result);
            }
        }
    }

    loop {
        match env.system.wait_any(true) {
            Ok(Some((changed, state))) => {
                if changed == pid {
                    match state {
                        ProcessState::Halted(result) if !result.is_stopped() => {
                            if let Some(index) = env.jobs.find_by_pid(pid) {
                                env.jobs.remove(index);
                            }
                            return ExitStatus::from(result);
                        }
                        _ => env.jobs.update_state(changed, state).map(drop).unwrap_or(()),
                    }
                } else {
                    env.jobs.update_state(changed, state);
                }
            }
            Ok(None) => return ExitStatus::NOT_FOUND,
            Err(Errno::EINTR) => continue,
            Err(Errno::ECHILD) => return ExitStatus::NOT_FOUND,
            Err(_) => return ExitStatus::FAILURE,
        }
    }
}

/// Waits for all known jobs to terminate.
fn wait_for_all(env: &mut Env) -> ExitStatus {
    loop {
        let any_alive = env.jobs.iter().any(|(_, job)| job.state.is_alive());
        if !any_alive {
            return ExitStatus::SUCCESS;
        }
        match env.system.wait_any(true) {
            Ok(Some((pid, state))) => {
                env.jobs.update_state(pid, state);
            }
            Ok(None) => return ExitStatus::SUCCESS,
            Err(Errno::EINTR) => continue,
            Err(Errno::ECHILD) => {
                // No more children: everything recorded is finished.
                let indices: Vec<usize> = env.jobs.iter().map(|(i, _)| i).collect();
                for index in indices {
                    if let Some(job) = env.jobs.get_mut(index) {
                        if job.state == ProcessState::Running {
                            job.state = ProcessState::exited(ExitStatus::SUCCESS);
                        }
                    }
                }
                return ExitStatus::SUCCESS;
            }
            Err(_) => return ExitStatus::FAILURE,
        }
    }
}

/// Entry point for executing the `wait` built-in
pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    // Delivery point: traps run before waiting.
    if let Break(divert) = zish_semantics::trap::run_traps_for_caught_signals(env) {
        return Result::with_divert(env.exit_status, divert);
    }

    if args.is_empty() {
        return Result::new(wait_for_all(env));
    }

    let mut exit_status = ExitStatus::SUCCESS;
    for operand in &args {
        let pid = if operand.value.starts_with('%') {
            match id::parse(&operand.value) {
                Ok(job_id) => match job_id.find(&env.jobs) {
                    Ok(index) => env.jobs.get(index).expect("index is live").pid,
                    Err(error) => return report_error(env, "wait", &error.to_string()),
                },
                Err(error) => return report_error(env, "wait", &error.to_string()),
            }
        } else {
            match operand.value.parse::<i32>() {
                Ok(raw) => Pid::from_raw(raw),
                Err(_) => {
                    let message = format!("invalid operand `{}`", operand.value);
                    return report_error(env, "wait", &message);
                }
            }
        };
        exit_status = wait_for_pid(env, pid);
    }
    Result::new(exit_status)
}
