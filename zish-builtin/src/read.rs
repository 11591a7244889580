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

//! Read built-in
//!
//! # Syntax
//!
//! ```sh
//! read [-r] [-p prompt] [-d delimiter] [name…]
//! ```
//!
//! Reads one line (or up to the given delimiter) from standard input and
//! assigns the fields, split according to `$IFS`, to the named
//! variables. The last variable absorbs the remainder of the line.
//! Variables without a corresponding field become empty. Without any
//! name, the whole line goes into `REPLY`.
//!
//! Unless `-r` is given, a backslash escapes the following character and
//! a backslash-newline continues the line.
//!
//! The exit status is non-zero when the end of input is reached before
//! any data.

use crate::common::{report_error, report_hard_error};
use zish_env::builtin::Result;
use zish_env::io::Fd;
use zish_env::semantics::{ExitStatus, Field};
use zish_env::system::Errno;
use zish_env::Env;

struct Options {
    raw: bool,
    prompt: Option<String>,
    delimiter: u8,
}

fn parse_options<'a>(args: &'a [Field]) -> std::result::Result<(Options, &'a [Field]), String> {
    let mut options = Options {
        raw: false,
        prompt: None,
        delimiter: b'\n',
    };
    let mut rest = args;
    while let Some(first) = rest.first() {
        match first.value.as_str() {
            "-r" => {
                options.raw = true;
                rest = &rest[1..];
            }
            "-p" => {
                let prompt = rest.get(1).ok_or("option -p requires an argument")?;
                options.prompt = Some(prompt.value.clone());
                rest = &rest[2..];
            }
            "-d" => {
                let delimiter = rest.get(1).ok_or("option -d requires an argument")?;
                options.delimiter = delimiter.value.bytes().next().unwrap_or(0);
                rest = &rest[2..];
            }
            "--" => {
                rest = &rest[1..];
                break;
            }
            _ => break,
        }
    }
    Ok((options, rest))
}

/// Reads bytes up to the delimiter, processing backslash escapes.
///
/// Returns the line and whether any data was read before the end of
/// input.
fn read_line(env: &mut Env, options: &Options) -> std::result::Result<(String, bool), Errno> {
    let mut bytes = Vec::new();
    let mut any = false;
    let mut byte = [0_u8; 1];
    let mut escaped = false;
    loop {
        match env.system.read(Fd::STDIN, &mut byte) {
            Ok(0) => return Ok((String::from_utf8_lossy(&bytes).into_owned(), any)),
            Ok(_) => {
                any = true;
                let b = byte[0];
                if escaped {
                    escaped = false;
                    if b != b'\n' {
                        bytes.push(b);
                    }
                    continue;
                }
                if !options.raw && b == b'\\' {
                    escaped = true;
                    continue;
                }
                if b == options.delimiter {
                    return Ok((String::from_utf8_lossy(&bytes).into_owned(), any));
                }
                bytes.push(b);
            }
            Err(Errno::EINTR) => continue,
            Err(errno) => return Err(errno),
        }
    }
}

/// Splits the line into at most `count` fields using the IFS rules.
///
/// The last field absorbs the remainder of the line, with trailing IFS
/// whitespace removed.
fn split_fields(line: &str, ifs: &str, count: usize) -> Vec<String> {
    let is_ws = |c: char| ifs.contains(c) && c.is_whitespace();
    let is_sep = |c: char| ifs.contains(c);

    let mut fields = Vec::new();
    let mut chars = line.chars().peekable();

    // Skip leading IFS whitespace.
    while chars.peek().copied().is_some_and(is_ws) {
        chars.next();
    }

    while chars.peek().is_some() {
        if fields.len() + 1 == count {
            // Remainder, minus trailing IFS whitespace
            let rest: String = chars.collect();
            let trimmed = rest.trim_end_matches(is_ws);
            fields.push(trimmed.to_string());
            return fields;
        }
        let mut field = String::new();
        while let Some(&c) = chars.peek() {
            if is_sep(c) {
                break;
            }
            field.push(c);
            chars.next();
        }
        fields.push(field);
        // Consume one separator: ws* [non-ws ws*]
        while chars.peek().copied().is_some_and(is_ws) {
            chars.next();
        }
        if chars.peek().copied().is_some_and(|c| is_sep(c) && !is_ws(c)) {
            chars.next();
            while chars.peek().copied().is_some_and(is_ws) {
                chars.next();
            }
        }
    }
    fields
}

/// Entry point for executing the `read` built-in
pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    let (options, names) = match parse_options(&args) {
        Ok(parsed) => parsed,
        Err(message) => return report_hard_error(env, "read", &message),
    };

    if let Some(prompt) = &options.prompt {
        if env.system.isatty(Fd::STDIN) {
            let prompt = prompt.clone();
            env.system.print_error(&prompt);
        }
    }

    let (line, any) = match read_line(env, &options) {
        Ok(result) => result,
        Err(errno) => return report_error(env, "read", &errno.to_string()),
    };

    if names.is_empty() {
        if let Err(error) = env.assign_variable("REPLY", line) {
            return report_error(env, "read", &error.to_string());
        }
    } else {
        let ifs = env
            .variables
            .get_scalar("IFS")
            .unwrap_or(" \t\n")
            .to_string();
        let mut fields = split_fields(&line, &ifs, names.len());
        fields.resize(names.len(), String::new());
        for (name, value) in names.iter().zip(fields) {
            if let Err(error) = env.assign_variable(&name.value, value) {
                return report_error(env, "read", &error.to_string());
            }
        }
    }

    if any {
        Result::new(ExitStatus::SUCCESS)
    } else {
        Result::new(ExitStatus::FAILURE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splitting_with_colon_ifs() {
        assert_eq!(
            split_fields("one:two:three", ":", 3),
            ["one", "two", "three"]
        );
    }

    #[test]
    fn last_variable_absorbs_remainder() {
        assert_eq!(split_fields("a b c d", " \t\n", 2), ["a", "b c d"]);
    }

    #[test]
    fn fewer_fields_than_variables() {
        assert_eq!(split_fields("a", " \t\n", 3), ["a"]);
    }

    #[test]
    fn leading_and_trailing_whitespace() {
        assert_eq!(split_fields("  a  b  ", " \t\n", 2), ["a", "b"]);
    }
}
