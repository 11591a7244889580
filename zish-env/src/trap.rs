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

//! Signal and condition traps
//!
//! The [`TrapSet`] stores the [`Action`] for each [`Condition`]: a real
//! signal, or the pseudo-conditions `EXIT` and `ERR`. Setting a signal
//! trap installs a handler through [`RealSystem`]; the handler merely
//! records the signal, and the executor runs the pending actions at safe
//! points.
//!
//! A signal that was ignored when the shell started cannot be trapped by
//! a non-interactive shell, which this module enforces the way POSIX
//! requires. Entering a subshell resets all user-set traps to the default
//! action; the action strings are reference-counted so both the parent
//! and the forked child own their copy.

use crate::signal;
use crate::system::{Errno, RealSystem, SignalHandling};
use std::collections::BTreeMap;
use std::rc::Rc;
use std::str::FromStr;
use thiserror::Error;

/// Condition that triggers a trap
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Condition {
    /// The shell is exiting.
    Exit,
    /// A command finished with a non-zero exit status while `errexit` is
    /// in effect.
    Err,
    /// A signal was delivered to the shell.
    Signal(signal::Name),
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Condition::Exit => "EXIT".fmt(f),
            Condition::Err => "ERR".fmt(f),
            Condition::Signal(name) => name.fmt(f),
        }
    }
}

/// Error parsing a condition name
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("no such signal or condition")]
pub struct UnknownCondition;

/// Parses a condition: `EXIT`, `ERR`, a signal name, or a signal number.
///
/// The number `0` denotes `EXIT`.
impl FromStr for Condition {
    type Err = UnknownCondition;

    fn from_str(s: &str) -> Result<Condition, UnknownCondition> {
        match s {
            "EXIT" | "0" => return Ok(Condition::Exit),
            "ERR" => return Ok(Condition::Err),
            _ => {}
        }
        if let Ok(raw) = s.parse::<i32>() {
            let number = signal::Number::from_raw(raw).ok_or(UnknownCondition)?;
            let name = signal::Name::try_from(number).map_err(|_| UnknownCondition)?;
            return Ok(Condition::Signal(name));
        }
        s.parse().map(Condition::Signal).map_err(|_| UnknownCondition)
    }
}

/// Action taken when a condition is met
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Action {
    /// Performs the default action.
    #[default]
    Default,
    /// Pretends the condition was not met.
    Ignore,
    /// Executes a command string.
    Command(Rc<str>),
}

impl From<&Action> for SignalHandling {
    fn from(action: &Action) -> SignalHandling {
        match action {
            Action::Default => SignalHandling::Default,
            Action::Ignore => SignalHandling::Ignore,
            Action::Command(_) => SignalHandling::Catch,
        }
    }
}

/// Error that may happen in [`TrapSet::set_action`]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SetActionError {
    /// Attempt to trap a signal that has been ignored since startup
    #[error("the signal has been ignored since the shell started")]
    InitiallyIgnored,
    /// Attempt to trap `SIGKILL`
    #[error("SIGKILL cannot be trapped")]
    SigKill,
    /// Attempt to trap `SIGSTOP`
    #[error("SIGSTOP cannot be trapped")]
    SigStop,
    /// Error from the underlying system interface
    #[error(transparent)]
    SystemError(#[from] Errno),
}

/// Collection of trap actions
#[derive(Clone, Debug, Default)]
pub struct TrapSet {
    actions: BTreeMap<Condition, Action>,
    /// Signals that were ignored when the shell started
    initially_ignored: Vec<signal::Name>,
}

impl TrapSet {
    pub fn new() -> TrapSet {
        Self::default()
    }

    /// Records that a signal was ignored on shell startup.
    ///
    /// A non-interactive shell cannot trap such signals.
    pub fn set_initially_ignored(&mut self, name: signal::Name) {
        if !self.initially_ignored.contains(&name) {
            self.initially_ignored.push(name);
        }
    }

    /// Returns the action for a condition.
    #[must_use]
    pub fn get_action(&self, condition: Condition) -> &Action {
        self.actions.get(&condition).unwrap_or(&Action::Default)
    }

    /// Sets the action for a condition.
    ///
    /// For a signal condition, this installs the corresponding signal
    /// disposition. `override_ignore` allows an interactive shell to trap
    /// initially ignored signals.
    pub fn set_action(
        &mut self,
        system: &mut RealSystem,
        condition: Condition,
        action: Action,
        override_ignore: bool,
    ) -> Result<(), SetActionError> {
        if let Condition::Signal(name) = condition {
            match name {
                signal::Name::Kill => return Err(SetActionError::SigKill),
                signal::Name::Stop => return Err(SetActionError::SigStop),
                _ => {}
            }
            if !override_ignore && self.initially_ignored.contains(&name) {
                return Err(SetActionError::InitiallyIgnored);
            }
            system.set_signal_handling(name.number(), (&action).into())?;
        }
        if action == Action::Default {
            self.actions.remove(&condition);
        } else {
            self.actions.insert(condition, action);
        }
        Ok(())
    }

    /// Iterates over the conditions with a non-default action.
    pub fn iter(&self) -> impl Iterator<Item = (Condition, &Action)> {
        self.actions.iter().map(|(&condition, action)| (condition, action))
    }

    /// Resets traps for a subshell.
    ///
    /// User-set command actions revert to the default, including the EXIT
    /// trap, which subshells do not inherit. Ignored signals stay
    /// ignored.
    pub fn enter_subshell(&mut self, system: &mut RealSystem) {
        let conditions: Vec<Condition> = self
            .actions
            .iter()
            .filter(|(_, action)| matches!(action, Action::Command(_)))
            .map(|(&condition, _)| condition)
            .collect();
        for condition in conditions {
            self.actions.remove(&condition);
            if let Condition::Signal(name) = condition {
                _ = system.set_signal_handling(name.number(), SignalHandling::Default);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_parsing() {
        assert_eq!("EXIT".parse(), Ok(Condition::Exit));
        assert_eq!("0".parse(), Ok(Condition::Exit));
        assert_eq!("ERR".parse(), Ok(Condition::Err));
        assert_eq!("INT".parse(), Ok(Condition::Signal(signal::Name::Int)));
        assert_eq!("SIGTERM".parse(), Ok(Condition::Signal(signal::Name::Term)));
        assert_eq!(
            libc::SIGINT.to_string().parse(),
            Ok(Condition::Signal(signal::Name::Int))
        );
        assert_eq!("NOPE".parse::<Condition>(), Err(UnknownCondition));
    }

    #[test]
    fn kill_and_stop_are_rejected() {
        let mut traps = TrapSet::new();
        let mut system = RealSystem;
        let action = Action::Command(Rc::from("echo"));
        assert_eq!(
            traps.set_action(
                &mut system,
                Condition::Signal(signal::Name::Kill),
                action.clone(),
                false,
            ),
            Err(SetActionError::SigKill)
        );
        assert_eq!(
            traps.set_action(
                &mut system,
                Condition::Signal(signal::Name::Stop),
                action,
                false,
            ),
            Err(SetActionError::SigStop)
        );
    }

    #[test]
    fn initially_ignored_signals_cannot_be_trapped() {
        let mut traps = TrapSet::new();
        let mut system = RealSystem;
        traps.set_initially_ignored(signal::Name::Usr1);
        let action = Action::Command(Rc::from("echo"));
        assert_eq!(
            traps.set_action(
                &mut system,
                Condition::Signal(signal::Name::Usr1),
                action.clone(),
                false,
            ),
            Err(SetActionError::InitiallyIgnored)
        );
        assert_eq!(
            traps.set_action(
                &mut system,
                Condition::Signal(signal::Name::Usr1),
                action,
                true,
            ),
            Ok(())
        );
    }

    #[test]
    fn exit_trap_storage() {
        let mut traps = TrapSet::new();
        let mut system = RealSystem;
        let action = Action::Command(Rc::from("echo bye"));
        traps
            .set_action(&mut system, Condition::Exit, action.clone(), false)
            .unwrap();
        assert_eq!(traps.get_action(Condition::Exit), &action);

        traps.enter_subshell(&mut system);
        assert_eq!(traps.get_action(Condition::Exit), &Action::Default);
    }
}
