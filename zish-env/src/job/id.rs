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

//! Job ID parsing
//!
//! A job ID string selects a job in a [`JobList`]:
//!
//! - `%`, `%%`, and `%+` denote the current job.
//! - `%-` denotes the previous job.
//! - `%n` (a positive integer) denotes the job with number `n`.
//! - `%name` denotes the job whose command starts with `name`.
//! - `%?name` denotes the job whose command contains `name`.
//!
//! A name form is ambiguous if it matches more than one live job.

use super::JobList;
use std::fmt::Display;
use std::num::NonZeroUsize;
use thiserror::Error;

/// Parsed form of a job ID
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum JobId<'a> {
    /// The current job (`%`, `%%`, or `%+`)
    CurrentJob,
    /// The previous job (`%-`)
    PreviousJob,
    /// Job with a specific job number (`%n`)
    JobNumber(NonZeroUsize),
    /// Job whose name starts with a specific string (`%name`)
    NamePrefix(&'a str),
    /// Job whose name contains a specific string (`%?name`)
    NameSubstring(&'a str),
}

impl Default for JobId<'_> {
    fn default() -> Self {
        JobId::CurrentJob
    }
}

impl Display for JobId<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            JobId::CurrentJob => "%+".fmt(f),
            JobId::PreviousJob => "%-".fmt(f),
            JobId::JobNumber(number) => write!(f, "%{number}"),
            JobId::NamePrefix(prefix) => write!(f, "%{prefix}"),
            JobId::NameSubstring(substring) => write!(f, "%?{substring}"),
        }
    }
}

/// Error for a job ID not starting with `%`
#[derive(Clone, Copy, Debug, Eq, Error, Hash, PartialEq)]
#[error("a job ID must start with a '%'")]
pub struct ParseError;

/// Parses a job ID without the initial `%`.
pub fn parse_tail(tail: &str) -> JobId<'_> {
    match tail {
        "" | "%" | "+" => JobId::CurrentJob,
        "-" => JobId::PreviousJob,
        _ => match tail.strip_prefix('?') {
            Some(substring) => JobId::NameSubstring(substring),
            None => match tail.parse::<NonZeroUsize>() {
                Ok(number) => JobId::JobNumber(number),
                Err(_) => JobId::NamePrefix(tail),
            },
        },
    }
}

/// Parses a job ID, which must start with `%`.
pub fn parse(job_id: &str) -> Result<JobId<'_>, ParseError> {
    match job_id.strip_prefix('%') {
        Some(tail) => Ok(parse_tail(tail)),
        None => Err(ParseError),
    }
}

/// Error finding the job a job ID refers to
#[derive(Clone, Copy, Debug, Eq, Error, Hash, PartialEq)]
pub enum FindError {
    /// No job matched the ID.
    #[error("no such job")]
    NotFound,
    /// A name form matched more than one job.
    #[error("ambiguous job specification")]
    Ambiguous,
}

impl JobId<'_> {
    /// Finds the index of the job this ID refers to.
    pub fn find(&self, jobs: &JobList) -> Result<usize, FindError> {
        match *self {
            JobId::CurrentJob => jobs.current_job().ok_or(FindError::NotFound),
            JobId::PreviousJob => jobs.previous_job().ok_or(FindError::NotFound),
            JobId::JobNumber(number) => {
                let index = number.get() - 1;
                if jobs.get(index).is_some() {
                    Ok(index)
                } else {
                    Err(FindError::NotFound)
                }
            }
            JobId::NamePrefix(prefix) => {
                find_unique(jobs, |name: &str| name.starts_with(prefix))
            }
            JobId::NameSubstring(substring) => {
                find_unique(jobs, |name: &str| name.contains(substring))
            }
        }
    }
}

fn find_unique<F: Fn(&str) -> bool>(jobs: &JobList, predicate: F) -> Result<usize, FindError> {
    let mut matches = jobs
        .iter()
        .filter(|(_, job)| job.state.is_alive() && predicate(&job.name));
    let (index, _) = matches.next().ok_or(FindError::NotFound)?;
    if matches.next().is_some() {
        return Err(FindError::Ambiguous);
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::super::{Job, Pid};
    use super::*;

    #[test]
    fn parse_tail_forms() {
        assert_eq!(parse_tail(""), JobId::CurrentJob);
        assert_eq!(parse_tail("%"), JobId::CurrentJob);
        assert_eq!(parse_tail("+"), JobId::CurrentJob);
        assert_eq!(parse_tail("-"), JobId::PreviousJob);
        assert_eq!(
            parse_tail("1"),
            JobId::JobNumber(NonZeroUsize::new(1).unwrap())
        );
        assert_eq!(parse_tail("foo"), JobId::NamePrefix("foo"));
        assert_eq!(parse_tail("?foo"), JobId::NameSubstring("foo"));
    }

    #[test]
    fn parse_requires_percent() {
        assert_eq!(parse(""), Err(ParseError));
        assert_eq!(parse("%"), Ok(JobId::CurrentJob));
        assert_eq!(parse("%foo"), Ok(JobId::NamePrefix("foo")));
        assert_eq!(parse("foo"), Err(ParseError));
    }

    fn job_named(pid: i32, name: &str) -> Job {
        let mut job = Job::new(Pid::from_raw(pid));
        job.name = name.to_string();
        job
    }

    #[test]
    fn find_by_number_and_name() {
        let mut jobs = JobList::new();
        let sleep = jobs.add(job_named(10, "sleep 10")).unwrap();
        let cat = jobs.add(job_named(11, "cat file")).unwrap();

        assert_eq!(parse("%1").unwrap().find(&jobs), Ok(sleep));
        assert_eq!(parse("%2").unwrap().find(&jobs), Ok(cat));
        assert_eq!(parse("%3").unwrap().find(&jobs), Err(FindError::NotFound));
        assert_eq!(parse("%sleep").unwrap().find(&jobs), Ok(sleep));
        assert_eq!(parse("%?file").unwrap().find(&jobs), Ok(cat));
        assert_eq!(
            parse("%nothing").unwrap().find(&jobs),
            Err(FindError::NotFound)
        );
    }

    #[test]
    fn ambiguous_name() {
        let mut jobs = JobList::new();
        jobs.add(job_named(10, "sleep 10")).unwrap();
        jobs.add(job_named(11, "sleep 20")).unwrap();
        assert_eq!(
            parse("%sleep").unwrap().find(&jobs),
            Err(FindError::Ambiguous)
        );
    }

    #[test]
    fn current_and_previous() {
        let mut jobs = JobList::new();
        let first = jobs.add(job_named(10, "a")).unwrap();
        let second = jobs.add(job_named(11, "b")).unwrap();
        assert_eq!(parse("%%").unwrap().find(&jobs), Ok(second));
        assert_eq!(parse("%-").unwrap().find(&jobs), Ok(first));
    }
}
