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

//! Job report formatting
//!
//! A [`Report`] formats a job the way POSIX specifies for the `jobs`
//! built-in and for the automatic status reports between commands:
//!
//! ```text
//! [2] + Running              cat foo | grep bar
//! [1] - Done                 sleep 10
//! ```
//!
//! The alternate form (`{:#}`) inserts the process ID before the state.

use super::{Job, ProcessResult, ProcessState};
use crate::semantics::ExitStatus;
use std::fmt::{Display, Formatter, Result};

/// Formats a process result in the style of the `jobs` built-in.
impl Display for ProcessResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::Exited(ExitStatus::SUCCESS) => "Done".fmt(f),
            Self::Exited(exit_status) => write!(f, "Done({exit_status})"),
            Self::Stopped(signal) => write!(f, "Stopped({signal})"),
            Self::Signaled {
                signal,
                core_dump: false,
            } => write!(f, "Killed({signal})"),
            Self::Signaled {
                signal,
                core_dump: true,
            } => write!(f, "Killed({signal}: core dumped)"),
        }
    }
}

impl Display for ProcessState {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            ProcessState::Running => "Running".fmt(f),
            ProcessState::Halted(result) => result.fmt(f),
        }
    }
}

/// Marker indicating the current or previous job
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Marker {
    /// Neither current nor previous
    None,
    /// The current job (`+`)
    CurrentJob,
    /// The previous job (`-`)
    PreviousJob,
}

impl Display for Marker {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(match self {
            Marker::None => " ",
            Marker::CurrentJob => "+",
            Marker::PreviousJob => "-",
        })
    }
}

/// Formatter for a single job line
#[derive(Clone, Copy, Debug)]
pub struct Report<'a> {
    /// Index of the job in the job list (the job number minus one)
    pub index: usize,
    /// Current/previous marker
    pub marker: Marker,
    /// Job to format
    pub job: &'a Job,
}

impl Display for Report<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let number = self.index + 1;
        let marker = self.marker;
        let state = self.job.state.to_string();
        let name = &self.job.name;
        if f.alternate() {
            let pid = self.job.pid.as_raw();
            write!(f, "[{number}] {marker} {pid:5} {state:20} {name}")
        } else {
            write!(f, "[{number}] {marker} {state:20} {name}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::Pid;
    use super::*;
    use crate::signal;

    fn sample_job() -> Job {
        let mut job = Job::new(Pid::from_raw(123));
        job.name = "sleep 10".to_string();
        job
    }

    #[test]
    fn running_report() {
        let job = sample_job();
        let report = Report {
            index: 1,
            marker: Marker::CurrentJob,
            job: &job,
        };
        assert_eq!(report.to_string(), "[2] + Running              sleep 10");
    }

    #[test]
    fn alternate_report_includes_pid() {
        let job = sample_job();
        let report = Report {
            index: 0,
            marker: Marker::None,
            job: &job,
        };
        assert_eq!(
            format!("{report:#}"),
            "[1]     123 Running              sleep 10"
        );
    }

    #[test]
    fn done_and_killed_states() {
        assert_eq!(
            ProcessResult::Exited(ExitStatus::SUCCESS).to_string(),
            "Done"
        );
        assert_eq!(
            ProcessResult::Exited(ExitStatus(3)).to_string(),
            "Done(3)"
        );
        let term = signal::Name::Term.number();
        assert_eq!(
            ProcessResult::Signaled {
                signal: term,
                core_dump: false
            }
            .to_string(),
            "Killed(TERM)"
        );
        let tstp = signal::Name::Tstp.number();
        assert_eq!(ProcessResult::Stopped(tstp).to_string(), "Stopped(TSTP)");
    }
}
