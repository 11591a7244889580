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

//! Compound command execution
//!
//! Redirections on a compound command apply for its duration and are
//! undone afterwards. Loops consume `break` and `continue` diverts;
//! outer levels see the divert with its count decremented.

use super::{wait_for_foreground, Command};
use crate::expansion::{expand_word, expand_word_attr, expand_words};
use crate::handle::Handle;
use crate::redir::RedirGuard;
use crate::subshell::{start_subshell_in_group, JobControl};
use std::ops::ControlFlow::{Break, Continue};
use zish_env::semantics::{Divert, ExitStatus, Field, Result};
use zish_env::stack::Frame;
use zish_env::Env;
use zish_fnmatch::{Config, Pattern, PatternChar};
use zish_syntax::syntax::{self, CompoundCommand, ElifThen, List, Word};

impl Command for syntax::FullCompoundCommand {
    fn execute(&self, env: &mut Env) -> Result {
        let mut guard = RedirGuard::new(env);
        if let Err(error) = guard.perform_redirs(&self.redirs) {
            drop(guard);
            return error.handle(env);
        }
        self.command.execute(&mut guard)
    }
}

impl Command for CompoundCommand {
    fn execute(&self, env: &mut Env) -> Result {
        use CompoundCommand::*;
        match self {
            Grouping(list) => list.execute(env),
            Subshell { body, location: _ } => execute_subshell(env, body, &|| self.to_string()),
            For { name, values, body } => execute_for(env, name, values.as_deref(), body),
            While { condition, body } => execute_while(env, condition, body, true),
            Until { condition, body } => execute_while(env, condition, body, false),
            If {
                condition,
                body,
                elifs,
                r#else,
            } => execute_if(env, condition, body, elifs, r#else.as_ref()),
            Case { subject, items } => execute_case(env, subject, items),
        }
    }
}

/// Executes a `( … )` subshell in the foreground.
fn execute_subshell(env: &mut Env, body: &std::rc::Rc<List>, name: &dyn Fn() -> String) -> Result {
    let monitor = env.controls_jobs();
    let job_control = if monitor {
        JobControl::Join(None)
    } else {
        JobControl::Inherit
    };
    let body = std::rc::Rc::clone(body);
    let child = start_subshell_in_group(env, job_control, move |env| {
        if monitor {
            crate::subshell::restore_default_job_signals(env);
        }
        env.stack.push(Frame::Subshell);
        body.execute(env)
    });
    match child {
        Ok(pid) => {
            let states = wait_for_foreground(env, monitor, monitor.then_some(pid), &[pid], name);
            env.exit_status = states
                .last()
                .map(|state| match state {
                    zish_env::job::ProcessState::Running => ExitStatus::SUCCESS,
                    zish_env::job::ProcessState::Halted(result) => ExitStatus::from(*result),
                })
                .unwrap_or(ExitStatus::FAILURE);
            Continue(())
        }
        Err(errno) => {
            let message = format!("cannot start subshell: {errno}");
            env.print_error(&message);
            env.exit_status = ExitStatus::FAILURE;
            Continue(())
        }
    }
}

/// What one loop iteration result means for the enclosing loop
enum Iteration {
    /// Proceed normally.
    Normal,
    /// A `break` targeted this loop.
    Break,
    /// A `continue` targeted this loop.
    Continue,
}

/// Consumes `break` and `continue` diverts aimed at this loop.
///
/// Diverts aimed at an outer loop are returned with their counts
/// decremented; any other divert is returned unchanged.
fn filter_loop_divert(result: Result) -> std::result::Result<Iteration, Result> {
    match result {
        Continue(()) => Ok(Iteration::Normal),
        Break(Divert::Break { count: 0 }) => Ok(Iteration::Break),
        Break(Divert::Break { count }) => Err(Break(Divert::Break { count: count - 1 })),
        Break(Divert::Continue { count: 0 }) => Ok(Iteration::Continue),
        Break(Divert::Continue { count }) => {
            Err(Break(Divert::Continue { count: count - 1 }))
        }
        other => Err(other),
    }
}

fn execute_for(
    env: &mut Env,
    name: &Word,
    values: Option<&[Word]>,
    body: &List,
) -> Result {
    let Some(variable) = name.to_string_if_literal() else {
        let message = format!("invalid for-loop variable name `{name}`");
        env.print_error(&message);
        env.exit_status = ExitStatus::ERROR;
        return Continue(());
    };

    let values: Vec<Field> = match values {
        Some(words) => match expand_words(env, words) {
            Ok((fields, _)) => fields,
            Err(error) => return error.handle(env),
        },
        None => Field::dummies(env.variables.positional_params().to_vec()),
    };

    env.stack.push(Frame::Loop);
    let result = for_loop_iterations(env, &variable, values, body);
    env.stack.pop(Frame::Loop);
    result
}

fn for_loop_iterations(
    env: &mut Env,
    variable: &str,
    values: Vec<Field>,
    body: &List,
) -> Result {
    env.exit_status = ExitStatus::SUCCESS;
    for value in values {
        if let Err(error) = env.assign_variable(variable, value.value) {
            let message = error.to_string();
            env.print_error(&message);
            env.exit_status = ExitStatus::FAILURE;
            return Break(Divert::Interrupt(Some(ExitStatus::FAILURE)));
        }
        match filter_loop_divert(body.execute(env)) {
            Ok(Iteration::Normal | Iteration::Continue) => {}
            Ok(Iteration::Break) => break,
            Err(result) => return result,
        }
    }
    Continue(())
}

/// Executes a `while` or `until` loop.
///
/// The whole iteration, condition included, runs inside one loop frame,
/// so a `break` or `continue` fired from the condition affects this
/// loop.
fn execute_while(env: &mut Env, condition: &List, body: &List, while_loop: bool) -> Result {
    env.stack.push(Frame::Loop);
    let result = while_loop_iterations(env, condition, body, while_loop);
    env.stack.pop(Frame::Loop);
    result
}

fn while_loop_iterations(
    env: &mut Env,
    condition: &List,
    body: &List,
    while_loop: bool,
) -> Result {
    let mut last_body_status = ExitStatus::SUCCESS;
    loop {
        env.stack.push(Frame::Condition);
        let result = condition.execute(env);
        env.stack.pop(Frame::Condition);
        match filter_loop_divert(result) {
            Ok(Iteration::Normal) => {}
            Ok(Iteration::Continue) => continue,
            Ok(Iteration::Break) => break,
            Err(result) => return result,
        }

        if env.exit_status.is_successful() != while_loop {
            break;
        }
        match filter_loop_divert(body.execute(env)) {
            Ok(Iteration::Normal) => last_body_status = env.exit_status,
            Ok(Iteration::Continue) => last_body_status = env.exit_status,
            Ok(Iteration::Break) => {
                last_body_status = env.exit_status;
                break;
            }
            Err(result) => return result,
        }
    }
    env.exit_status = last_body_status;
    Continue(())
}

fn execute_if(
    env: &mut Env,
    condition: &List,
    body: &List,
    elifs: &[ElifThen],
    r#else: Option<&List>,
) -> Result {
    env.stack.push(Frame::Condition);
    let result = condition.execute(env);
    env.stack.pop(Frame::Condition);
    result?;

    if env.exit_status.is_successful() {
        return body.execute(env);
    }

    for elif in elifs {
        env.stack.push(Frame::Condition);
        let result = elif.condition.execute(env);
        env.stack.pop(Frame::Condition);
        result?;

        if env.exit_status.is_successful() {
            return elif.body.execute(env);
        }
    }

    match r#else {
        Some(body) => body.execute(env),
        None => {
            env.exit_status = ExitStatus::SUCCESS;
            Continue(())
        }
    }
}

fn execute_case(env: &mut Env, subject: &Word, items: &[syntax::CaseItem]) -> Result {
    let (subject, _) = match expand_word(env, subject) {
        Ok(result) => result,
        Err(error) => return error.handle(env),
    };

    for item in items {
        for pattern_word in &item.patterns {
            let (pattern_field, _) = match expand_word_attr(env, pattern_word) {
                Ok(result) => result,
                Err(error) => return error.handle(env),
            };

            let chars: Vec<PatternChar> = pattern_field
                .chars
                .iter()
                .filter(|c| !c.is_quoting)
                .map(|c| {
                    if c.is_quoted {
                        PatternChar::Literal(c.value)
                    } else {
                        PatternChar::Normal(c.value)
                    }
                })
                .collect();
            let mut config = Config::default();
            config.anchor_begin = true;
            config.anchor_end = true;
            let matches = match Pattern::parse_with_config(chars, config) {
                Ok(pattern) => pattern.is_match(&subject.value),
                // A malformed pattern matches only itself, literally.
                Err(_) => pattern_field.remove_quotes_and_strip().value == subject.value,
            };

            if matches {
                env.exit_status = ExitStatus::SUCCESS;
                return item.body.execute(env);
            }
        }
    }

    env.exit_status = ExitStatus::SUCCESS;
    Continue(())
}
