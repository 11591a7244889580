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

//! Test built-in
//!
//! # Syntax
//!
//! ```sh
//! test expression
//! [ expression ]
//! ```
//!
//! Evaluates a conditional expression: string tests (`-n`, `-z`, `=`,
//! `!=`), integer comparisons (`-eq`, `-ne`, `-gt`, `-ge`, `-lt`,
//! `-le`), file tests (`-e`, `-f`, `-d`, `-r`, `-w`, `-x`, and friends,
//! including `-nt`, `-ot`, and `-ef`), negation with `!`, grouping with
//! `(` `)`, and the obsolescent `-a`/`-o` connectives.
//!
//! The exit status is 0 for true, 1 for false, and 2 for a malformed
//! expression.

use zish_env::builtin::Result;
use zish_env::semantics::{ExitStatus, Field};
use zish_env::Env;
use std::ffi::CString;

/// Expression evaluation error
struct Error(String);

struct Evaluator<'a> {
    env: &'a Env,
    args: &'a [Field],
    index: usize,
}

fn stat(env: &Env, path: &str) -> Option<libc::stat> {
    let c_path = CString::new(path).ok()?;
    env.system.stat(&c_path).ok()
}

fn lstat(env: &Env, path: &str) -> Option<libc::stat> {
    let c_path = CString::new(path).ok()?;
    env.system.lstat(&c_path).ok()
}

fn access(env: &Env, path: &str, mode: i32) -> bool {
    CString::new(path).is_ok_and(|c_path| env.system.access(&c_path, mode))
}

fn parse_integer(value: &str) -> std::result::Result<i64, Error> {
    value
        .trim()
        .parse()
        .map_err(|_| Error(format!("integer expression expected: `{value}`")))
}

fn unary_file_test(env: &Env, operator: &str, path: &str) -> Option<bool> {
    let mode_is = |mask: libc::mode_t| stat(env, path).is_some_and(|s| s.st_mode & libc::S_IFMT == mask);
    Some(match operator {
        "-b" => mode_is(libc::S_IFBLK),
        "-c" => mode_is(libc::S_IFCHR),
        "-d" => mode_is(libc::S_IFDIR),
        "-e" => stat(env, path).is_some(),
        "-f" => mode_is(libc::S_IFREG),
        "-g" => stat(env, path).is_some_and(|s| s.st_mode & libc::S_ISGID as libc::mode_t != 0),
        "-h" | "-L" => lstat(env, path).is_some_and(|s| s.st_mode & libc::S_IFMT == libc::S_IFLNK),
        "-p" => mode_is(libc::S_IFIFO),
        "-r" => access(env, path, libc::R_OK),
        "-S" => mode_is(libc::S_IFSOCK),
        "-s" => stat(env, path).is_some_and(|s| s.st_size > 0),
        "-u" => stat(env, path).is_some_and(|s| s.st_mode & libc::S_ISUID as libc::mode_t != 0),
        "-w" => access(env, path, libc::W_OK),
        "-x" => access(env, path, libc::X_OK),
        _ => return None,
    })
}

impl<'a> Evaluator<'a> {
    fn peek(&self) -> Option<&'a str> {
        self.args.get(self.index).map(|field| field.value.as_str())
    }

    fn next(&mut self) -> Option<&'a str> {
        let value = self.peek();
        if value.is_some() {
            self.index += 1;
        }
        value
    }

    fn expect(&mut self, token: &str) -> std::result::Result<(), Error> {
        match self.next() {
            Some(value) if value == token => Ok(()),
            _ => Err(Error(format!("expected `{token}`"))),
        }
    }

    /// `or := and { -o and }`
    fn or_expression(&mut self) -> std::result::Result<bool, Error> {
        let mut value = self.and_expression()?;
        while self.peek() == Some("-o") {
            self.next();
            let rhs = self.and_expression()?;
            value = value || rhs;
        }
        Ok(value)
    }

    /// `and := not { -a not }`
    fn and_expression(&mut self) -> std::result::Result<bool, Error> {
        let mut value = self.not_expression()?;
        while self.peek() == Some("-a") {
            self.next();
            let rhs = self.not_expression()?;
            value = value && rhs;
        }
        Ok(value)
    }

    /// `not := ! not | primary`
    fn not_expression(&mut self) -> std::result::Result<bool, Error> {
        // `!` with nothing after it is the one-argument string test.
        if self.peek() == Some("!") && self.args.len() - self.index > 1 {
            self.next();
            return Ok(!self.not_expression()?);
        }
        self.primary()
    }

    fn primary(&mut self) -> std::result::Result<bool, Error> {
        let Some(first) = self.next() else {
            return Err(Error("missing operand".to_string()));
        };

        if first == "(" && self.remaining_contains_close_paren() {
            let value = self.or_expression()?;
            self.expect(")")?;
            return Ok(value);
        }

        // Binary operator?
        if let Some(operator) = self.peek() {
            if is_binary_operator(operator) {
                self.next();
                let Some(second) = self.next() else {
                    return Err(Error(format!("missing operand after `{operator}`")));
                };
                return self.binary(first, operator, second);
            }
        }

        // Unary operator?
        if first.starts_with('-') && first.len() == 2 {
            if let Some(operand) = self.next() {
                return self.unary(first, operand);
            }
            // A lone `-x` style word is a non-empty string.
            return Ok(true);
        }

        Ok(!first.is_empty())
    }

    fn remaining_contains_close_paren(&self) -> bool {
        self.args[self.index..].iter().any(|f| f.value == ")")
    }

    fn unary(&mut self, operator: &str, operand: &str) -> std::result::Result<bool, Error> {
        match operator {
            "-n" => Ok(!operand.is_empty()),
            "-z" => Ok(operand.is_empty()),
            "-t" => {
                let fd = parse_integer(operand)?;
                Ok(self.env.system.isatty(zish_env::io::Fd(fd as i32)))
            }
            _ => unary_file_test(self.env, operator, operand)
                .ok_or_else(|| Error(format!("unknown operator `{operator}`"))),
        }
    }

    fn binary(
        &mut self,
        first: &str,
        operator: &str,
        second: &str,
    ) -> std::result::Result<bool, Error> {
        match operator {
            "=" => Ok(first == second),
            "!=" => Ok(first != second),
            "-eq" | "-ne" | "-gt" | "-ge" | "-lt" | "-le" => {
                let lhs = parse_integer(first)?;
                let rhs = parse_integer(second)?;
                Ok(match operator {
                    "-eq" => lhs == rhs,
                    "-ne" => lhs != rhs,
                    "-gt" => lhs > rhs,
                    "-ge" => lhs >= rhs,
                    "-lt" => lhs < rhs,
                    _ => lhs <= rhs,
                })
            }
            "-nt" => {
                let lhs = stat(self.env, first);
                let rhs = stat(self.env, second);
                Ok(match (lhs, rhs) {
                    (Some(l), Some(r)) => l.st_mtime > r.st_mtime,
                    (Some(_), None) => true,
                    _ => false,
                })
            }
            "-ot" => {
                let lhs = stat(self.env, first);
                let rhs = stat(self.env, second);
                Ok(match (lhs, rhs) {
                    (Some(l), Some(r)) => l.st_mtime < r.st_mtime,
                    (None, Some(_)) => true,
                    _ => false,
                })
            }
            "-ef" => {
                let lhs = stat(self.env, first);
                let rhs = stat(self.env, second);
                Ok(match (lhs, rhs) {
                    (Some(l), Some(r)) => l.st_dev == r.st_dev && l.st_ino == r.st_ino,
                    _ => false,
                })
            }
            _ => Err(Error(format!("unknown operator `{operator}`"))),
        }
    }
}

fn is_binary_operator(operator: &str) -> bool {
    matches!(
        operator,
        "=" | "!=" | "-eq" | "-ne" | "-gt" | "-ge" | "-lt" | "-le" | "-nt" | "-ot" | "-ef"
    )
}

/// Evaluates a whole test expression.
fn evaluate(env: &Env, args: &[Field]) -> std::result::Result<bool, Error> {
    if args.is_empty() {
        return Ok(false);
    }
    let mut evaluator = Evaluator {
        env,
        args,
        index: 0,
    };
    let value = evaluator.or_expression()?;
    if evaluator.index != args.len() {
        return Err(Error("too many operands".to_string()));
    }
    Ok(value)
}

/// Entry point for executing the `test` built-in
pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    match evaluate(env, &args) {
        Ok(true) => Result::new(ExitStatus::SUCCESS),
        Ok(false) => Result::new(ExitStatus::FAILURE),
        Err(Error(message)) => {
            env.print_named_error("test", &message);
            Result::new(ExitStatus::ERROR)
        }
    }
}

/// Entry point for executing the `[` built-in
///
/// Identical to `test`, except the last argument must be `]`.
pub fn bracket_main(env: &mut Env, mut args: Vec<Field>) -> Result {
    match args.pop() {
        Some(last) if last.value == "]" => main(env, args),
        _ => {
            env.print_named_error("[", "missing closing `]`");
            Result::new(ExitStatus::ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zish_env::system::RealSystem;

    fn run(args: &[&str]) -> ExitStatus {
        let mut env = Env::new(RealSystem);
        main(&mut env, Field::dummies(args.iter().copied())).exit_status
    }

    const TRUE: ExitStatus = ExitStatus::SUCCESS;
    const FALSE: ExitStatus = ExitStatus::FAILURE;

    #[test]
    fn empty_expression_is_false() {
        assert_eq!(run(&[]), FALSE);
    }

    #[test]
    fn single_string() {
        assert_eq!(run(&["x"]), TRUE);
        assert_eq!(run(&[""]), FALSE);
    }

    #[test]
    fn string_length_tests() {
        assert_eq!(run(&["-n", "x"]), TRUE);
        assert_eq!(run(&["-n", ""]), FALSE);
        assert_eq!(run(&["-z", ""]), TRUE);
        assert_eq!(run(&["-z", "x"]), FALSE);
    }

    #[test]
    fn string_comparison() {
        assert_eq!(run(&["a", "=", "a"]), TRUE);
        assert_eq!(run(&["a", "=", "b"]), FALSE);
        assert_eq!(run(&["a", "!=", "b"]), TRUE);
    }

    #[test]
    fn integer_comparison() {
        assert_eq!(run(&["2", "-eq", "2"]), TRUE);
        assert_eq!(run(&["2", "-ne", "2"]), FALSE);
        assert_eq!(run(&["3", "-gt", "2"]), TRUE);
        assert_eq!(run(&["2", "-ge", "2"]), TRUE);
        assert_eq!(run(&["1", "-lt", "2"]), TRUE);
        assert_eq!(run(&["3", "-le", "2"]), FALSE);
    }

    #[test]
    fn malformed_integer_is_an_error() {
        assert_eq!(run(&["x", "-eq", "2"]), ExitStatus::ERROR);
    }

    #[test]
    fn negation() {
        assert_eq!(run(&["!", ""]), TRUE);
        assert_eq!(run(&["!", "x"]), FALSE);
        assert_eq!(run(&["!", "a", "=", "b"]), TRUE);
    }

    #[test]
    fn bang_alone_is_a_string() {
        assert_eq!(run(&["!"]), TRUE);
    }

    #[test]
    fn and_or_connectives() {
        assert_eq!(run(&["a", "-a", "b"]), TRUE);
        assert_eq!(run(&["a", "-a", ""]), FALSE);
        assert_eq!(run(&["", "-o", "b"]), TRUE);
        assert_eq!(run(&["", "-o", ""]), FALSE);
    }

    #[test]
    fn parentheses() {
        assert_eq!(run(&["(", "a", ")"]), TRUE);
        assert_eq!(run(&["(", "", "-o", "b", ")"]), TRUE);
    }

    #[test]
    fn file_tests() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("f");
        std::fs::write(&file, "data").unwrap();
        let file = file.to_str().unwrap();
        let dir_path = dir.path().to_str().unwrap();

        assert_eq!(run(&["-e", file]), TRUE);
        assert_eq!(run(&["-f", file]), TRUE);
        assert_eq!(run(&["-d", file]), FALSE);
        assert_eq!(run(&["-d", dir_path]), TRUE);
        assert_eq!(run(&["-s", file]), TRUE);
        assert_eq!(run(&["-e", "/nonexistent-zish-test"]), FALSE);
    }

    #[test]
    fn same_file_test() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("f");
        std::fs::write(&file, "data").unwrap();
        let file = file.to_str().unwrap();
        assert_eq!(run(&[file, "-ef", file]), TRUE);
    }

    #[test]
    fn bracket_requires_closing() {
        let mut env = Env::new(RealSystem);
        let result = bracket_main(&mut env, Field::dummies(["x", "]"]));
        assert_eq!(result.exit_status, TRUE);
        let result = bracket_main(&mut env, Field::dummies(["x"]));
        assert_eq!(result.exit_status, ExitStatus::ERROR);
    }
}
