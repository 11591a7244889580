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

//! Bg built-in
//!
//! Resumes stopped jobs in the background with `SIGCONT`. Requires job
//! control.

use crate::common::{output, report_error};
use crate::fg::resolve_job;
use zish_env::builtin::Result;
use zish_env::job::{Pid, ProcessState};
use zish_env::semantics::{ExitStatus, Field};
use zish_env::signal::Name;
use zish_env::Env;

fn resume(env: &mut Env, index: usize) -> Result {
    let (pgid, name) = {
        let Some(job) = env.jobs.get(index) else {
            return report_error(env, "bg", "no such job");
        };
        (job.pgid, job.name.clone())
    };
    _ = env
        .system
        .kill(Pid::from_raw(-pgid.as_raw()), Some(Name::Cont.number()));
    if let Some(job) = env.jobs.get_mut(index) {
        job.state = ProcessState::Running;
        job.state_changed = false;
    }
    let line = format!("[{}] {} &\n", index + 1, name);
    output(env, &line)
}

/// Entry point for executing the `bg` built-in
pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    if !env.controls_jobs() {
        return report_error(env, "bg", "job control is not enabled");
    }

    if args.is_empty() {
        match resolve_job(env, &[]) {
            Ok(index) => return resume(env, index),
            Err(message) => return report_error(env, "bg", &message),
        }
    }

    for operand in &args {
        let operand = std::slice::from_ref(operand);
        match resolve_job(env, operand) {
            Ok(index) => {
                let result = resume(env, index);
                if !result.exit_status.is_successful() {
                    return result;
                }
            }
            Err(message) => return report_error(env, "bg", &message),
        }
    }
    Result::new(ExitStatus::SUCCESS)
}
