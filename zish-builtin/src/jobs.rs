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

//! Jobs built-in
//!
//! Lists the jobs in the job table after polling for state changes.
//! With `-l`, the process ID is included. Reporting a finished job
//! removes it from the table.

use crate::common::output;
use zish_env::builtin::Result;
use zish_env::job::fmt::{Marker, Report};
use zish_env::semantics::Field;
use zish_env::Env;

/// Entry point for executing the `jobs` built-in
pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    let long = args.first().is_some_and(|arg| arg.value == "-l");

    zish_semantics::job::update_from_waits(env);

    let current = env.jobs.current_job();
    let previous = env.jobs.previous_job();

    let mut lines = String::new();
    let mut finished = Vec::new();
    let indices: Vec<usize> = env.jobs.iter().map(|(index, _)| index).collect();
    for index in indices {
        let job = env.jobs.get_mut(index).expect("job index is live");
        job.state_changed = false;
        let job = env.jobs.get(index).expect("job index is live");
        let marker = if Some(index) == current {
            Marker::CurrentJob
        } else if Some(index) == previous {
            Marker::PreviousJob
        } else {
            Marker::None
        };
        let report = Report { index, marker, job };
        if long {
            lines.push_str(&format!("{report:#}\n"));
        } else {
            lines.push_str(&format!("{report}\n"));
        }
        if !job.state.is_alive() {
            finished.push(index);
        }
    }
    for index in finished {
        env.jobs.remove(index);
    }
    output(env, &lines)
}
