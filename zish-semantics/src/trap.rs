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

//! Trap execution
//!
//! Signal handlers only record what arrived; this module runs the
//! corresponding trap actions at the executor's safe points: between
//! commands in a list, before reading the next input line, after
//! built-ins return, and before `wait`. The EXIT trap runs when the
//! shell exits normally or through the `exit` built-in; the ERR trap
//! runs from [`apply_errexit`] just before `errexit` takes the shell
//! down.

use crate::runner::run_source;
use std::ops::ControlFlow::{Break, Continue};
use std::rc::Rc;
use zish_env::option::{ErrExit, On};
use zish_env::semantics::{Divert, Result};
use zish_env::stack::Frame;
use zish_env::trap::{Action, Condition};
use zish_env::Env;

/// Runs one trap action command string.
///
/// The exit status of the commands in the trap does not leak into `$?`
/// of the surrounding execution, except through an explicit `exit` or
/// `return`.
fn run_trap(env: &mut Env, action: Rc<str>) -> Result {
    let saved_exit_status = env.exit_status;
    env.stack.push(Frame::Trap);
    let result = run_source(env, &action);
    env.stack.pop(Frame::Trap);
    if result == Continue(()) {
        env.exit_status = saved_exit_status;
    }
    result
}

/// Runs trap actions for the signals caught since the last delivery
/// point.
pub fn run_traps_for_caught_signals(env: &mut Env) -> Result {
    // Re-entering trap actions from within a trap would be surprising;
    // signals stay pending until the outer trap finishes.
    if env.stack.is_in_trap() {
        return Continue(());
    }
    loop {
        let caught = env.system.caught_signals();
        if caught.is_empty() {
            return Continue(());
        }
        for number in caught {
            let Ok(name) = zish_env::signal::Name::try_from(number) else {
                continue;
            };
            let action = env.traps.get_action(Condition::Signal(name)).clone();
            if let Action::Command(command) = action {
                run_trap(env, command)?;
            }
        }
    }
}

/// Runs the EXIT trap, if any.
///
/// The action is removed before running so that an `exit` inside the
/// trap cannot recurse.
pub fn run_exit_trap(env: &mut Env) {
    let Action::Command(command) = env.traps.get_action(Condition::Exit).clone() else {
        return;
    };
    let mut system = env.system;
    _ = env
        .traps
        .set_action(&mut system, Condition::Exit, Action::Default, true);
    _ = run_trap(env, command);
}

/// Applies the `errexit` option after a failed command.
///
/// When `errexit` is on and the current context is not a condition, the
/// ERR trap runs and the shell exits with the failed status.
pub fn apply_errexit(env: &mut Env) -> Result {
    if env.exit_status.is_successful()
        || env.options.get(ErrExit) != On
        || env.stack.is_in_condition()
        || env.stack.is_in_trap()
    {
        return Continue(());
    }

    if let Action::Command(command) = env.traps.get_action(Condition::Err).clone() {
        run_trap(env, command)?;
    }
    Break(Divert::Exit(Some(env.exit_status)))
}
