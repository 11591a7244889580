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

//! Fg built-in
//!
//! Brings a job to the foreground: the job's process group gets the
//! terminal and a `SIGCONT`, and the shell waits for it to finish or
//! stop again. Requires job control.

use crate::common::{output, report_error};
use zish_env::builtin::Result;
use zish_env::io::Fd;
use zish_env::job::{id, Pid, ProcessState};
use zish_env::semantics::{ExitStatus, Field};
use zish_env::signal::Name;
use zish_env::system::Errno;
use zish_env::Env;

/// Resolves an optional job-ID operand, defaulting to the current job.
pub(crate) fn resolve_job(env: &mut Env, args: &[Field]) -> std::result::Result<usize, String> {
    zish_semantics::job::update_from_waits(env);
    let job_id = match args.first() {
        None => id::JobId::CurrentJob,
        Some(operand) => match id::parse(&operand.value) {
            Ok(job_id) => job_id,
            Err(_) => id::parse_tail(&operand.value),
        },
    };
    job_id.find(&env.jobs).map_err(|error| error.to_string())
}

/// Entry point for executing the `fg` built-in
pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    if !env.controls_jobs() {
        return report_error(env, "fg", "job control is not enabled");
    }
    let index = match resolve_job(env, &args) {
        Ok(index) => index,
        Err(message) => return report_error(env, "fg", &message),
    };

    let (pgid, pid, name) = {
        let job = env.jobs.get(index).expect("resolved job is live");
        (job.pgid, job.pid, job.name.clone())
    };

    let line = format!("{name}\n");
    output(env, &line);

    let tty = Fd::STDIN;
    _ = env.system.tcsetpgrp(tty, pgid);
    _ = env
        .system
        .kill(Pid::from_raw(-pgid.as_raw()), Some(Name::Cont.number()));
    if let Some(job) = env.jobs.get_mut(index) {
        job.state = ProcessState::Running;
        job.state_changed = false;
    }

    let exit_status = loop {
        match env.system.wait_any(true) {
            Ok(Some((changed, state))) => {
                if changed == pid {
                    match state {
                        ProcessState::Running => {}
                        ProcessState::Halted(result) if result.is_stopped() => {
                            env.jobs.update_state(pid, state);
                            zish_semantics::job::notify_state_changes(env);
                            break ExitStatus::from(result);
                        }
                        ProcessState::Halted(result) => {
                            env.jobs.remove(index);
                            break ExitStatus::from(result);
                        }
                    }
                } else {
                    env.jobs.update_state(changed, state);
                }
            }
            Ok(None) => break ExitStatus::FAILURE,
            Err(Errno::EINTR) => continue,
            Err(_) => break ExitStatus::FAILURE,
        }
    };

    let own = env.system.getpgrp();
    _ = env.system.tcsetpgrp(tty, own);
    Result::new(exit_status)
}
