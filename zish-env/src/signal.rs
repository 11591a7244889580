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

//! Signal names and numbers
//!
//! A [`Name`] is the portable identifier of a signal (`INT`, `CHLD`, …); a
//! [`Number`] is the raw non-zero integer the kernel uses. The trap
//! built-in and the `kill` built-in parse user input into names and
//! convert them to numbers through this module.

use std::fmt::Display;
use std::num::NonZeroI32;
use std::str::FromStr;
use thiserror::Error;

/// Non-zero raw signal number
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Number(NonZeroI32);

impl Number {
    /// Converts a raw number, returning `None` if it is not positive.
    #[must_use]
    pub fn from_raw(raw: i32) -> Option<Number> {
        if raw > 0 {
            NonZeroI32::new(raw).map(Number)
        } else {
            None
        }
    }

    /// Returns the raw signal number.
    #[must_use]
    pub const fn as_raw(self) -> i32 {
        self.0.get()
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match Name::try_from(*self) {
            Ok(name) => name.fmt(f),
            Err(_) => self.0.fmt(f),
        }
    }
}

/// Symbolic signal name
///
/// The variants cover the signals the shell honors (see the `trap` and
/// `kill` built-ins). `SIGKILL` and `SIGSTOP` are included so that they
/// can be *named*, though they can never be trapped.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Name {
    Abrt,
    Alrm,
    Bus,
    Chld,
    Cont,
    Fpe,
    Hup,
    Ill,
    Int,
    Kill,
    Pipe,
    Quit,
    Segv,
    Stop,
    Term,
    Tstp,
    Ttin,
    Ttou,
    Usr1,
    Usr2,
}

/// All signal names, in alphabetical order.
pub const ALL_NAMES: &[Name] = &[
    Name::Abrt,
    Name::Alrm,
    Name::Bus,
    Name::Chld,
    Name::Cont,
    Name::Fpe,
    Name::Hup,
    Name::Ill,
    Name::Int,
    Name::Kill,
    Name::Pipe,
    Name::Quit,
    Name::Segv,
    Name::Stop,
    Name::Term,
    Name::Tstp,
    Name::Ttin,
    Name::Ttou,
    Name::Usr1,
    Name::Usr2,
];

impl Name {
    /// Returns the name without the `SIG` prefix.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        use Name::*;
        match self {
            Abrt => "ABRT",
            Alrm => "ALRM",
            Bus => "BUS",
            Chld => "CHLD",
            Cont => "CONT",
            Fpe => "FPE",
            Hup => "HUP",
            Ill => "ILL",
            Int => "INT",
            Kill => "KILL",
            Pipe => "PIPE",
            Quit => "QUIT",
            Segv => "SEGV",
            Stop => "STOP",
            Term => "TERM",
            Tstp => "TSTP",
            Ttin => "TTIN",
            Ttou => "TTOU",
            Usr1 => "USR1",
            Usr2 => "USR2",
        }
    }

    /// Returns the raw number of the signal on the current system.
    #[must_use]
    pub const fn as_raw(self) -> i32 {
        use Name::*;
        match self {
            Abrt => libc::SIGABRT,
            Alrm => libc::SIGALRM,
            Bus => libc::SIGBUS,
            Chld => libc::SIGCHLD,
            Cont => libc::SIGCONT,
            Fpe => libc::SIGFPE,
            Hup => libc::SIGHUP,
            Ill => libc::SIGILL,
            Int => libc::SIGINT,
            Kill => libc::SIGKILL,
            Pipe => libc::SIGPIPE,
            Quit => libc::SIGQUIT,
            Segv => libc::SIGSEGV,
            Stop => libc::SIGSTOP,
            Term => libc::SIGTERM,
            Tstp => libc::SIGTSTP,
            Ttin => libc::SIGTTIN,
            Ttou => libc::SIGTTOU,
            Usr1 => libc::SIGUSR1,
            Usr2 => libc::SIGUSR2,
        }
    }

    /// Returns the signal number.
    #[must_use]
    pub fn number(self) -> Number {
        Number::from_raw(self.as_raw()).expect("signal numbers are positive")
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string or number does not name a signal
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("no such signal")]
pub struct UnknownSignal;

impl TryFrom<Number> for Name {
    type Error = UnknownSignal;

    fn try_from(number: Number) -> Result<Name, UnknownSignal> {
        ALL_NAMES
            .iter()
            .copied()
            .find(|name| name.as_raw() == number.as_raw())
            .ok_or(UnknownSignal)
    }
}

/// Parses a signal name, with or without the `SIG` prefix, ignoring case.
impl FromStr for Name {
    type Err = UnknownSignal;

    fn from_str(s: &str) -> Result<Name, UnknownSignal> {
        let upper = s.to_ascii_uppercase();
        let stripped = upper.strip_prefix("SIG").unwrap_or(&upper);
        ALL_NAMES
            .iter()
            .copied()
            .find(|name| name.as_str() == stripped)
            .ok_or(UnknownSignal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_round_trip() {
        for &name in ALL_NAMES {
            assert_eq!(Name::try_from(name.number()), Ok(name));
        }
    }

    #[test]
    fn parsing_names() {
        assert_eq!("INT".parse(), Ok(Name::Int));
        assert_eq!("SIGINT".parse(), Ok(Name::Int));
        assert_eq!("int".parse(), Ok(Name::Int));
        assert_eq!("NOSUCH".parse::<Name>(), Err(UnknownSignal));
    }

    #[test]
    fn number_display_prefers_name() {
        assert_eq!(Name::Term.number().to_string(), "TERM");
    }
}
