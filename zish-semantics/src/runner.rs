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

//! The read-eval loop
//!
//! [`read_eval_loop`] drives the shell: it reads input, parses one
//! complete command at a time, and executes it, threading signal traps
//! and job notifications between commands. Incomplete input (an open
//! quote or compound command at the end of a line) makes the loop
//! request a continuation line; syntax errors discard the input and, in
//! a non-interactive shell, exit with status 2.
//!
//! [`run_source`] runs a complete source string: the `eval` and `.`
//! built-ins, command substitutions, and trap actions use it.

use crate::command::Command;
use crate::handle::Handle;
use crate::trap::run_traps_for_caught_signals;
use std::ops::ControlFlow::{Break, Continue};
use zish_env::input::{Input, Prompt};
use zish_env::option::{On, Verbose};
use zish_env::semantics::{Divert, ExitStatus, Result};
use zish_env::Env;
use zish_syntax::parser::Parser;

/// Parses and executes a complete source string.
///
/// The whole string is parsed before anything runs, so a syntax error
/// anywhere in it prevents execution entirely.
pub fn run_source(env: &mut Env, source: &str) -> Result {
    let mut parser = Parser::new(source);
    match parser.parse_program() {
        Ok(list) => list.execute(env),
        Err(error) => error.handle(env),
    }
}

fn echo_input(env: &mut Env, line: &str) {
    if env.options.get(Verbose) == On {
        let line = line.to_string();
        env.system.print_error(&line);
    }
}

/// Handles a divert that reached the top of the loop.
///
/// Returns `None` if the loop should continue, or the final result to
/// propagate to the caller.
fn handle_divert(env: &mut Env, divert: Divert) -> Option<Result> {
    match divert {
        Divert::Interrupt(status) => {
            if let Some(status) = status {
                env.exit_status = status;
            }
            if env.is_interactive() {
                None
            } else {
                Some(Break(Divert::Exit(Some(env.exit_status))))
            }
        }
        // `break`/`continue` outside a loop are no-ops at the top level.
        Divert::Break { .. } | Divert::Continue { .. } => None,
        // A top-level `return` behaves like `exit`.
        Divert::Return(status) => Some(Break(Divert::Exit(status))),
        divert => Some(Break(divert)),
    }
}

/// Reads and executes commands until the input ends or execution
/// diverts.
///
/// On a normal end of input this returns `Continue(())`; the caller runs
/// the EXIT trap and terminates with the last exit status. A `Break`
/// carries an exit or abort divert.
pub fn read_eval_loop(env: &mut Env, input: &mut dyn Input) -> Result {
    let mut buffer = String::new();

    'read: loop {
        match run_traps_for_caught_signals(env) {
            Continue(()) => {}
            Break(divert) => match handle_divert(env, divert) {
                None => {}
                Some(result) => return result,
            },
        }

        if env.is_interactive() {
            crate::job::update_and_notify(env);
        }

        match input.next_line(env, Prompt::Main) {
            Ok(Some(line)) => {
                echo_input(env, &line);
                buffer.push_str(&line);
            }
            Ok(None) => return Continue(()),
            Err(errno) => {
                let message = format!("cannot read commands: {errno}");
                env.print_error(&message);
                return Break(Divert::Exit(Some(ExitStatus::ERROR)));
            }
        }

        // Execute every complete command in the buffer.
        loop {
            let mut parser = Parser::new(&buffer);
            match parser.next_command() {
                Ok(None) => {
                    buffer.clear();
                    continue 'read;
                }
                Ok(Some(list)) => {
                    let remaining = parser.remaining_source();
                    drop(parser);
                    let result = list.execute(env);
                    buffer = remaining;
                    match result {
                        Continue(()) => {}
                        Break(divert) => match handle_divert(env, divert) {
                            None => {
                                buffer.clear();
                                continue 'read;
                            }
                            Some(result) => return result,
                        },
                    }
                    match run_traps_for_caught_signals(env) {
                        Continue(()) => {}
                        Break(divert) => match handle_divert(env, divert) {
                            None => {}
                            Some(result) => return result,
                        },
                    }
                }
                Err(error) if error.is_incomplete() => {
                    match input.next_line(env, Prompt::Continuation) {
                        Ok(Some(line)) => {
                            echo_input(env, &line);
                            buffer.push_str(&line);
                        }
                        Ok(None) => {
                            // End of input in the middle of a construct
                            buffer.clear();
                            match error.handle(env) {
                                Continue(()) => continue 'read,
                                result => return result,
                            }
                        }
                        Err(errno) => {
                            let message = format!("cannot read commands: {errno}");
                            env.print_error(&message);
                            return Break(Divert::Exit(Some(ExitStatus::ERROR)));
                        }
                    }
                }
                Err(error) => {
                    buffer.clear();
                    match error.handle(env) {
                        Continue(()) => continue 'read,
                        result => return result,
                    }
                }
            }
        }
    }
}
