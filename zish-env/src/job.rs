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

//! Type definitions for job management
//!
//! A [`Job`] tracks one background or stopped pipeline: its process group,
//! a representative process ID, its display name, and the last known
//! [`ProcessState`]. The [`JobList`] stores jobs in a [`Slab`] so that job
//! numbers remain stable while a job is alive and can be reused after the
//! job is gone.
//!
//! The job *number* the user sees is the slab index plus one.

pub mod fmt;
pub mod id;

use crate::semantics::ExitStatus;
use crate::signal;
use slab::Slab;
use thiserror::Error;

#[doc(no_inline)]
pub use nix::unistd::Pid;

/// Maximum number of live jobs
pub const MAX_JOBS: usize = 64;

/// Result of a process that is no longer running normally
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProcessResult {
    /// Process exited on its own
    Exited(ExitStatus),
    /// Process was stopped by a signal
    Stopped(signal::Number),
    /// Process was killed by a signal
    Signaled {
        /// Signal that killed the process
        signal: signal::Number,
        /// Whether a core image was dumped
        core_dump: bool,
    },
}

impl ProcessResult {
    /// Returns true if the process can run again.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        matches!(self, ProcessResult::Stopped(_))
    }
}

/// Converts a process result to the exit status it stands for.
///
/// Termination by a signal maps to 128 plus the signal number.
impl From<ProcessResult> for ExitStatus {
    fn from(result: ProcessResult) -> ExitStatus {
        match result {
            ProcessResult::Exited(exit_status) => exit_status,
            ProcessResult::Stopped(signal) | ProcessResult::Signaled { signal, .. } => {
                ExitStatus::from(signal)
            }
        }
    }
}

/// State of a process as the shell knows it
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProcessState {
    /// Process is running
    Running,
    /// Process has stopped or terminated
    Halted(ProcessResult),
}

impl ProcessState {
    /// Convenience constructor for a stopped state.
    #[must_use]
    pub fn stopped(signal: signal::Number) -> ProcessState {
        ProcessState::Halted(ProcessResult::Stopped(signal))
    }

    /// Convenience constructor for a normally exited state.
    #[must_use]
    pub fn exited<S: Into<ExitStatus>>(exit_status: S) -> ProcessState {
        ProcessState::Halted(ProcessResult::Exited(exit_status.into()))
    }

    /// Returns true unless the process has terminated.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        match self {
            ProcessState::Running => true,
            ProcessState::Halted(result) => result.is_stopped(),
        }
    }

    /// Returns true if the process is stopped.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        matches!(self, ProcessState::Halted(result) if result.is_stopped())
    }
}

/// Set of processes executing a pipeline
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Job {
    /// Process group the job's processes run in
    pub pgid: Pid,

    /// Representative process, whose exit status becomes the job's
    pub pid: Pid,

    /// Whether the job runs in its own process group
    pub job_controlled: bool,

    /// Last known state of the job
    pub state: ProcessState,

    /// Whether the current state has not been reported to the user yet
    pub state_changed: bool,

    /// String representation of the job's command
    pub name: String,
}

impl Job {
    /// Creates a running job led by the given process.
    #[must_use]
    pub fn new(pid: Pid) -> Job {
        Job {
            pgid: pid,
            pid,
            job_controlled: false,
            state: ProcessState::Running,
            state_changed: true,
            name: String::new(),
        }
    }
}

/// Error returned when the job table is full
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("too many jobs")]
pub struct TooManyJobsError;

/// Collection of jobs
#[derive(Clone, Debug, Default)]
pub struct JobList {
    jobs: Slab<Job>,

    /// Process ID of the most recently started asynchronous command,
    /// for the special parameter `$!`
    last_async_pid: Option<Pid>,
}

impl JobList {
    pub fn new() -> JobList {
        Self::default()
    }

    /// Adds a job and returns its index.
    ///
    /// Fails when [`MAX_JOBS`] jobs are already live.
    pub fn add(&mut self, job: Job) -> Result<usize, TooManyJobsError> {
        if self.jobs.len() >= MAX_JOBS {
            return Err(TooManyJobsError);
        }
        Ok(self.jobs.insert(job))
    }

    /// Removes the job at the given index.
    pub fn remove(&mut self, index: usize) -> Option<Job> {
        self.jobs.try_remove(index)
    }

    /// Returns the job at the given index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Job> {
        self.jobs.get(index)
    }

    /// Returns the job at the given index, mutably.
    #[must_use]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Job> {
        self.jobs.get_mut(index)
    }

    /// Returns the number of live jobs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Returns true if there are no live jobs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Iterates over index-job pairs in index order.
    pub fn iter(&self) -> slab::Iter<'_, Job> {
        self.jobs.iter()
    }

    /// Finds the job whose representative process is `pid`.
    #[must_use]
    pub fn find_by_pid(&self, pid: Pid) -> Option<usize> {
        self.jobs
            .iter()
            .find(|(_, job)| job.pid == pid)
            .map(|(index, _)| index)
    }

    /// Finds the job whose process group is `pgid`.
    #[must_use]
    pub fn find_by_pgid(&self, pgid: Pid) -> Option<usize> {
        self.jobs
            .iter()
            .find(|(_, job)| job.pgid == pgid)
            .map(|(index, _)| index)
    }

    /// Records a state change reported by `wait`.
    ///
    /// Returns the index of the updated job, if the process belongs to
    /// one.
    pub fn update_state(&mut self, pid: Pid, state: ProcessState) -> Option<usize> {
        let index = self.find_by_pid(pid)?;
        let job = &mut self.jobs[index];
        if job.state != state {
            job.state = state;
            job.state_changed = true;
        }
        Some(index)
    }

    /// Returns the index of the current job.
    ///
    /// The current job is the job with the highest index that is not
    /// done yet, regardless of whether it is running or stopped.
    #[must_use]
    pub fn current_job(&self) -> Option<usize> {
        self.jobs
            .iter()
            .filter(|(_, job)| job.state.is_alive())
            .map(|(index, _)| index)
            .next_back()
    }

    /// Returns the index of the previous job: the not-yet-done job with
    /// the highest index other than the current job.
    #[must_use]
    pub fn previous_job(&self) -> Option<usize> {
        let current = self.current_job()?;
        self.jobs
            .iter()
            .filter(|(index, job)| *index != current && job.state.is_alive())
            .map(|(index, _)| index)
            .next_back()
    }

    /// Returns the process ID of the most recent asynchronous command.
    #[must_use]
    pub fn last_async_pid(&self) -> Option<Pid> {
        self.last_async_pid
    }

    /// Sets the process ID of the most recent asynchronous command.
    pub fn set_last_async_pid(&mut self, pid: Pid) {
        self.last_async_pid = Some(pid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stopped_state() -> ProcessState {
        ProcessState::stopped(signal::Name::Tstp.number())
    }

    #[test]
    fn add_and_number_reuse() {
        let mut jobs = JobList::new();
        let i = jobs.add(Job::new(Pid::from_raw(10))).unwrap();
        let j = jobs.add(Job::new(Pid::from_raw(11))).unwrap();
        assert_eq!((i, j), (0, 1));
        jobs.remove(i);
        let k = jobs.add(Job::new(Pid::from_raw(12))).unwrap();
        assert_eq!(k, 0);
    }

    #[test]
    fn job_limit() {
        let mut jobs = JobList::new();
        for pid in 0..MAX_JOBS {
            jobs.add(Job::new(Pid::from_raw(pid as i32 + 1))).unwrap();
        }
        assert_eq!(
            jobs.add(Job::new(Pid::from_raw(9999))),
            Err(TooManyJobsError)
        );
    }

    #[test]
    fn update_state_marks_changed() {
        let mut jobs = JobList::new();
        let index = jobs.add(Job::new(Pid::from_raw(10))).unwrap();
        jobs.get_mut(index).unwrap().state_changed = false;

        let updated = jobs.update_state(Pid::from_raw(10), ProcessState::exited(ExitStatus(0)));
        assert_eq!(updated, Some(index));
        assert!(jobs.get(index).unwrap().state_changed);

        assert_eq!(jobs.update_state(Pid::from_raw(99), ProcessState::Running), None);
    }

    #[test]
    fn current_job_is_highest_index_regardless_of_state() {
        let mut jobs = JobList::new();
        let _running = jobs.add(Job::new(Pid::from_raw(10))).unwrap();
        let stopped = jobs.add(Job::new(Pid::from_raw(11))).unwrap();
        jobs.get_mut(stopped).unwrap().state = stopped_state();
        let running_late = jobs.add(Job::new(Pid::from_raw(12))).unwrap();

        assert_eq!(jobs.current_job(), Some(running_late));
        assert_eq!(jobs.previous_job(), Some(stopped));
    }

    #[test]
    fn current_job_is_highest_index_live_job() {
        let mut jobs = JobList::new();
        let first = jobs.add(Job::new(Pid::from_raw(10))).unwrap();
        let second = jobs.add(Job::new(Pid::from_raw(11))).unwrap();
        assert_eq!(jobs.current_job(), Some(second));
        assert_eq!(jobs.previous_job(), Some(first));
    }

    #[test]
    fn done_jobs_are_not_current() {
        let mut jobs = JobList::new();
        let index = jobs.add(Job::new(Pid::from_raw(10))).unwrap();
        jobs.get_mut(index).unwrap().state = ProcessState::exited(ExitStatus(0));
        assert_eq!(jobs.current_job(), None);
    }
}
