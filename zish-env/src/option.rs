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

//! Type definitions for shell options
//!
//! This module defines the [`OptionSet`] recording which [`Option`]s are
//! on. Options are named positively (`Clobber`, `Glob`, `Unset`), so the
//! familiar POSIX spellings `noclobber`, `noglob`, and `nounset` parse to
//! the corresponding option with an `Off` state. `OptionSet` only stores
//! state; honoring an option is the executor's business.

use enumset::{EnumSet, EnumSetType};
use std::fmt::Display;
use std::ops::Not;
use std::str::FromStr;
use thiserror::Error;

/// State of an option: either enabled or disabled
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum State {
    /// Enabled
    On,
    /// Disabled
    Off,
}

pub use State::*;

impl Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            On => "on".fmt(f),
            Off => "off".fmt(f),
        }
    }
}

impl Not for State {
    type Output = Self;
    fn not(self) -> Self {
        match self {
            On => Off,
            Off => On,
        }
    }
}

/// Shell option
#[derive(Clone, Copy, Debug, EnumSetType, Eq, Hash, PartialEq)]
#[enumset(no_super_impls)]
#[non_exhaustive]
pub enum Option {
    /// Allows overwriting an existing file with the `>` redirection.
    ///
    /// `set -C` (`noclobber`) turns this off.
    Clobber,
    /// The shell was invoked with a command string (`-c`).
    CmdLine,
    /// Makes the shell exit when a command returns a non-zero exit status.
    ErrExit,
    /// Makes the shell actually execute commands.
    Exec,
    /// Enables pathname expansion.
    ///
    /// `set -f` (`noglob`) turns this off.
    Glob,
    /// Enables features for interactive use.
    Interactive,
    /// Enables job control.
    Monitor,
    /// Makes a pipeline's exit status non-zero when any element fails.
    PipeFail,
    /// The shell reads commands from standard input.
    Stdin,
    /// Allows expanding unset parameters as empty strings.
    ///
    /// `set -u` (`nounset`) turns this off.
    Unset,
    /// Echoes input lines as they are read.
    Verbose,
    /// Prints a trace of each command before execution.
    XTrace,
}

pub use self::Option::*;

impl Option {
    /// Returns the canonical long name of the option.
    #[must_use]
    pub const fn long_name(self) -> &'static str {
        match self {
            Clobber => "clobber",
            CmdLine => "cmdline",
            ErrExit => "errexit",
            Exec => "exec",
            Glob => "glob",
            Interactive => "interactive",
            Monitor => "monitor",
            PipeFail => "pipefail",
            Stdin => "stdin",
            Unset => "unset",
            Verbose => "verbose",
            XTrace => "xtrace",
        }
    }

    /// Returns the short option character and the state it selects, for
    /// options that have one.
    ///
    /// For example, `-e` turns `ErrExit` on while `-f` turns `Glob` off.
    #[must_use]
    pub const fn short_name(self) -> std::option::Option<(char, State)> {
        match self {
            Clobber => Some(('C', Off)),
            CmdLine => Some(('c', On)),
            ErrExit => Some(('e', On)),
            Exec => Some(('n', Off)),
            Glob => Some(('f', Off)),
            Interactive => Some(('i', On)),
            Monitor => Some(('m', On)),
            Stdin => Some(('s', On)),
            Unset => Some(('u', Off)),
            Verbose => Some(('v', On)),
            XTrace => Some(('x', On)),
            PipeFail => None,
        }
    }

    /// Finds the option a short flag character selects, with the state the
    /// flag selects when used with `-`.
    #[must_use]
    pub fn from_short_name(c: char) -> std::option::Option<(Option, State)> {
        EnumSet::<Option>::all()
            .iter()
            .find_map(|option| match option.short_name() {
                Some((short, state)) if short == c => Some((option, state)),
                _ => None,
            })
    }
}

impl Display for Option {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.long_name().fmt(f)
    }
}

/// Error parsing an option name
#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
#[error("no such option")]
pub struct UnknownOption;

/// Parses a long option name.
///
/// The name may be the canonical name or the canonical name with a `no`
/// prefix, which selects the opposite state: both `(clobber, On)` and
/// `(noclobber, Off)` describe `set +C`. The result pairs the option with
/// the state selected by *enabling* the named option.
impl FromStr for OptionSpec {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<OptionSpec, UnknownOption> {
        for option in EnumSet::<Option>::all() {
            if s == option.long_name() {
                return Ok(OptionSpec { option, state: On });
            }
        }
        if let Some(positive) = s.strip_prefix("no") {
            for option in EnumSet::<Option>::all() {
                if positive == option.long_name() {
                    return Ok(OptionSpec { option, state: Off });
                }
            }
        }
        Err(UnknownOption)
    }
}

/// Option paired with the state its name selects
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct OptionSpec {
    /// The option
    pub option: Option,
    /// State selected by turning the named option on
    pub state: State,
}

/// Set of enabled options
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct OptionSet {
    enabled: EnumSet<Option>,
}

impl OptionSet {
    /// Returns the default option set for a non-interactive shell.
    #[must_use]
    pub fn posix_default() -> OptionSet {
        OptionSet {
            enabled: Clobber | Exec | Glob | Unset,
        }
    }

    /// Returns the state of an option.
    #[must_use]
    pub fn get(&self, option: Option) -> State {
        if self.enabled.contains(option) {
            On
        } else {
            Off
        }
    }

    /// Sets the state of an option.
    pub fn set(&mut self, option: Option, state: State) {
        match state {
            On => self.enabled.insert(option),
            Off => self.enabled.remove(option),
        };
    }

    /// Iterates over all options with their states.
    pub fn iter(&self) -> impl Iterator<Item = (Option, State)> + '_ {
        EnumSet::<Option>::all()
            .iter()
            .map(|option| (option, self.get(option)))
    }

    /// Renders the value of the special parameter `$-`: the short flag
    /// characters of the options currently selected.
    #[must_use]
    pub fn short_flags(&self) -> String {
        let mut flags: Vec<char> = EnumSet::<Option>::all()
            .iter()
            .filter_map(|option| {
                let (c, state) = option.short_name()?;
                (self.get(option) == state).then_some(c)
            })
            .collect();
        flags.sort_unstable();
        flags.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let set = OptionSet::posix_default();
        assert_eq!(set.get(Clobber), On);
        assert_eq!(set.get(Glob), On);
        assert_eq!(set.get(Unset), On);
        assert_eq!(set.get(ErrExit), Off);
        assert_eq!(set.get(PipeFail), Off);
    }

    #[test]
    fn long_name_parsing() {
        let spec: OptionSpec = "errexit".parse().unwrap();
        assert_eq!(spec.option, ErrExit);
        assert_eq!(spec.state, On);

        let spec: OptionSpec = "noclobber".parse().unwrap();
        assert_eq!(spec.option, Clobber);
        assert_eq!(spec.state, Off);

        let spec: OptionSpec = "pipefail".parse().unwrap();
        assert_eq!(spec.option, PipeFail);
        assert_eq!(spec.state, On);

        assert_eq!("bogus".parse::<OptionSpec>(), Err(UnknownOption));
    }

    #[test]
    fn short_flag_lookup() {
        assert_eq!(Option::from_short_name('e'), Some((ErrExit, On)));
        assert_eq!(Option::from_short_name('u'), Some((Unset, Off)));
        assert_eq!(Option::from_short_name('C'), Some((Clobber, Off)));
        assert_eq!(Option::from_short_name('Z'), None);
    }

    #[test]
    fn short_flags_rendering() {
        let mut set = OptionSet::posix_default();
        set.set(ErrExit, On);
        set.set(Glob, Off);
        let flags = set.short_flags();
        assert!(flags.contains('e'));
        assert!(flags.contains('f'));
        assert!(!flags.contains('u'));
    }

    #[test]
    fn set_and_reset() {
        let mut set = OptionSet::posix_default();
        set.set(Monitor, On);
        assert_eq!(set.get(Monitor), On);
        set.set(Monitor, Off);
        assert_eq!(set.get(Monitor), Off);
    }
}
