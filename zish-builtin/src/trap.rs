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

//! Trap built-in
//!
//! # Syntax
//!
//! ```sh
//! trap
//! trap action condition…
//! trap - condition…
//! trap '' condition…
//! ```
//!
//! Sets the action for the given conditions: a command string, `-` for
//! the default, or an empty string to ignore. A first operand that is an
//! unsigned integer makes all operands conditions with the default
//! action, as POSIX requires. Without operands, the current traps are
//! printed in the re-parsable form `trap -- 'action' NAME`.
//!
//! Attempts to trap `SIGKILL` or `SIGSTOP` are ignored without a
//! diagnostic.

use crate::common::{output, report_hard_error, skip_option_terminator};
use std::rc::Rc;
use zish_env::builtin::Result;
use zish_env::semantics::{ExitStatus, Field};
use zish_env::trap::{Action, Condition, SetActionError};
use zish_env::Env;
use zish_quote::quote;

fn print_traps(env: &mut Env) -> Result {
    let mut lines = String::new();
    for (condition, action) in env.traps.iter() {
        let action = match action {
            Action::Default => continue,
            Action::Ignore => String::new(),
            Action::Command(command) => command.to_string(),
        };
        lines.push_str(&format!("trap -- {} {}\n", quote(&action), condition));
    }
    output(env, &lines)
}

/// Entry point for executing the `trap` built-in
pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    let args = skip_option_terminator(&args);
    let Some(first) = args.first() else {
        return print_traps(env);
    };

    // When the first operand is an unsigned integer, every operand is a
    // condition and the action reverts to the default.
    let all_conditions = first.value.parse::<u32>().is_ok();
    let (action, conditions) = if all_conditions {
        (Action::Default, args)
    } else {
        let action = match first.value.as_str() {
            "-" => Action::Default,
            "" => Action::Ignore,
            command => Action::Command(Rc::from(command)),
        };
        (action, &args[1..])
    };

    if conditions.is_empty() {
        return report_hard_error(env, "trap", "missing condition operand");
    }

    let override_ignore = env.is_interactive();
    let mut system = env.system;
    for operand in conditions {
        let Ok(condition) = operand.value.parse::<Condition>() else {
            let message = format!("no such signal or condition: {}", operand.value);
            return report_hard_error(env, "trap", &message);
        };
        match env
            .traps
            .set_action(&mut system, condition, action.clone(), override_ignore)
        {
            Ok(())
            // SIGKILL and SIGSTOP are silently not trappable.
            | Err(SetActionError::SigKill | SetActionError::SigStop) => {}
            Err(SetActionError::InitiallyIgnored) => {}
            Err(SetActionError::SystemError(errno)) => {
                return report_hard_error(env, "trap", &errno.to_string());
            }
        }
    }
    Result::new(ExitStatus::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zish_env::signal::Name;
    use zish_env::system::RealSystem;

    fn run(env: &mut Env, args: &[&str]) -> Result {
        main(env, Field::dummies(args.iter().copied()))
    }

    #[test]
    fn sets_and_clears_a_trap() {
        let mut env = Env::new(RealSystem);
        run(&mut env, &["echo usr1", "USR1"]);
        assert_eq!(
            env.traps.get_action(Condition::Signal(Name::Usr1)),
            &Action::Command(Rc::from("echo usr1"))
        );
        run(&mut env, &["-", "USR1"]);
        assert_eq!(
            env.traps.get_action(Condition::Signal(Name::Usr1)),
            &Action::Default
        );
    }

    #[test]
    fn numeric_first_operand_resets() {
        let mut env = Env::new(RealSystem);
        run(&mut env, &["echo x", "USR1"]);
        // `trap 10 12` style: all operands are conditions.
        let usr1 = Name::Usr1.number().as_raw().to_string();
        run(&mut env, &[usr1.as_str()]);
        assert_eq!(
            env.traps.get_action(Condition::Signal(Name::Usr1)),
            &Action::Default
        );
    }

    #[test]
    fn exit_trap() {
        let mut env = Env::new(RealSystem);
        run(&mut env, &["echo bye", "EXIT"]);
        assert_eq!(
            env.traps.get_action(Condition::Exit),
            &Action::Command(Rc::from("echo bye"))
        );
    }

    #[test]
    fn kill_and_stop_are_silently_ignored() {
        let mut env = Env::new(RealSystem);
        let result = run(&mut env, &["echo x", "KILL", "STOP"]);
        assert_eq!(result.exit_status, ExitStatus::SUCCESS);
        assert_eq!(
            env.traps.get_action(Condition::Signal(Name::Kill)),
            &Action::Default
        );
    }
}
