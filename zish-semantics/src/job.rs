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

//! Job status bookkeeping
//!
//! The shell polls child state changes without blocking, records them in
//! the job list, and reports finished and stopped jobs in batch at
//! prompt boundaries, preserving job-number order. Reported finished
//! jobs leave the table, freeing their numbers.

use zish_env::job::fmt::{Marker, Report};
use zish_env::system::Errno;
use zish_env::Env;

/// Reaps all child state changes that are ready, without blocking.
pub fn update_from_waits(env: &mut Env) {
    loop {
        match env.system.wait_any(false) {
            Ok(Some((pid, state))) => {
                env.jobs.update_state(pid, state);
            }
            Ok(None) => return,
            Err(Errno::ECHILD) => return,
            Err(Errno::EINTR) => continue,
            Err(_) => return,
        }
    }
}

/// Writes unreported job state changes to standard error and removes
/// finished jobs.
pub fn notify_state_changes(env: &mut Env) {
    let current = env.jobs.current_job();
    let previous = env.jobs.previous_job();

    let changed: Vec<usize> = env
        .jobs
        .iter()
        .filter(|(_, job)| job.state_changed)
        .map(|(index, _)| index)
        .collect();

    for index in changed {
        let marker = if Some(index) == current {
            Marker::CurrentJob
        } else if Some(index) == previous {
            Marker::PreviousJob
        } else {
            Marker::None
        };
        let (line, finished) = {
            let job = env.jobs.get(index).expect("job index is live");
            let report = Report {
                index,
                marker,
                job,
            };
            (format!("{report}\n"), !job.state.is_alive())
        };
        env.system.print_error(&line);
        if finished {
            env.jobs.remove(index);
        } else {
            env.jobs.get_mut(index).expect("job index is live").state_changed = false;
        }
    }
}

/// Polls children and reports changes; the prompt-boundary combination.
pub fn update_and_notify(env: &mut Env) {
    update_from_waits(env);
    notify_state_changes(env);
}
