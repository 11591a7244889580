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

//! Kill built-in
//!
//! # Syntax
//!
//! ```sh
//! kill [-s signal | -signal] target…
//! kill -l [exit-status…]
//! ```
//!
//! Sends a signal (default `TERM`) to each target: a process ID, a
//! negated process-group ID, or a `%` job ID, which addresses the job's
//! process group. `-l` lists signal names.

use crate::common::{output, report_error};
use std::str::FromStr;
use zish_env::builtin::Result;
use zish_env::job::{id, Pid};
use zish_env::semantics::{ExitStatus, Field};
use zish_env::signal::{self, Name};
use zish_env::Env;

fn list_signals(env: &mut Env, operands: &[Field]) -> Result {
    let mut lines = String::new();
    if operands.is_empty() {
        for name in signal::ALL_NAMES {
            lines.push_str(&format!("{name}\n"));
        }
    } else {
        for operand in operands {
            let Ok(mut number) = operand.value.parse::<i32>() else {
                let message = format!("invalid signal `{}`", operand.value);
                return report_error(env, "kill", &message);
            };
            // An exit status of a signal-killed process also names the
            // signal.
            if number > 128 {
                number -= 128;
            }
            match signal::Number::from_raw(number).and_then(|n| Name::try_from(n).ok()) {
                Some(name) => lines.push_str(&format!("{name}\n")),
                None => {
                    let message = format!("invalid signal `{}`", operand.value);
                    return report_error(env, "kill", &message);
                }
            }
        }
    }
    output(env, &lines)
}

/// Parses a `-s name`, `-NAME`, or `-N` signal option.
fn parse_signal<'a>(
    args: &'a [Field],
) -> std::result::Result<(Option<signal::Number>, &'a [Field]), String> {
    let Some(first) = args.first() else {
        return Ok((None, args));
    };
    let value = first.value.as_str();
    if value == "-s" {
        let name = args.get(1).ok_or("option -s requires an argument")?;
        let name = Name::from_str(&name.value)
            .map_err(|_| format!("invalid signal `{}`", name.value))?;
        return Ok((Some(name.number()), &args[2..]));
    }
    if let Some(spec) = value.strip_prefix('-') {
        // A leading dash may also start a negative PID operand; only
        // treat it as a signal if it parses as one.
        if let Ok(name) = Name::from_str(spec) {
            return Ok((Some(name.number()), &args[1..]));
        }
        if let Ok(number) = spec.parse::<i32>() {
            if let Some(number) = signal::Number::from_raw(number) {
                return Ok((Some(number), &args[1..]));
            }
        }
        if value == "--" {
            return Ok((None, &args[1..]));
        }
    }
    Ok((None, args))
}

/// Entry point for executing the `kill` built-in
pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    if args.first().is_some_and(|arg| arg.value == "-l") {
        return list_signals(env, &args[1..]);
    }

    let (signal, targets) = match parse_signal(&args) {
        Ok(parsed) => parsed,
        Err(message) => return report_error(env, "kill", &message),
    };
    let signal = signal.unwrap_or(Name::Term.number());

    if targets.is_empty() {
        return report_error(env, "kill", "missing target operand");
    }

    let mut exit_status = ExitStatus::SUCCESS;
    for target in targets {
        let pid = if target.value.starts_with('%') {
            match id::parse(&target.value) {
                Ok(job_id) => match job_id.find(&env.jobs) {
                    Ok(index) => {
                        let pgid = env.jobs.get(index).expect("index is live").pgid;
                        Pid::from_raw(-pgid.as_raw())
                    }
                    Err(error) => {
                        report_error(env, "kill", &error.to_string());
                        exit_status = ExitStatus::FAILURE;
                        continue;
                    }
                },
                Err(error) => {
                    report_error(env, "kill", &error.to_string());
                    exit_status = ExitStatus::FAILURE;
                    continue;
                }
            }
        } else {
            match target.value.parse::<i32>() {
                Ok(raw) => Pid::from_raw(raw),
                Err(_) => {
                    let message = format!("invalid operand `{}`", target.value);
                    report_error(env, "kill", &message);
                    exit_status = ExitStatus::FAILURE;
                    continue;
                }
            }
        };
        if let Err(errno) = env.system.kill(pid, Some(signal)) {
            report_error(env, "kill", &errno.to_string());
            exit_status = ExitStatus::FAILURE;
        }
    }
    Result::new(exit_status)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(values: &[&str]) -> Vec<Field> {
        Field::dummies(values.iter().copied())
    }

    #[test]
    fn signal_option_parsing() {
        let args = fields(&["-s", "TERM", "123"]);
        let (signal, rest) = parse_signal(&args).unwrap();
        assert_eq!(signal, Some(Name::Term.number()));
        assert_eq!(rest.len(), 1);

        let args = fields(&["-INT", "123"]);
        let (signal, rest) = parse_signal(&args).unwrap();
        assert_eq!(signal, Some(Name::Int.number()));
        assert_eq!(rest.len(), 1);

        let args = fields(&["-9", "123"]);
        let (signal, _) = parse_signal(&args).unwrap();
        assert_eq!(signal, Some(Name::Kill.number()));

        let args = fields(&["123"]);
        let (signal, rest) = parse_signal(&args).unwrap();
        assert_eq!(signal, None);
        assert_eq!(rest.len(), 1);
    }
}
