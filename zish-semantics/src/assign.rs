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

//! Assignment semantics
//!
//! Assignment values are expanded to a single field: tilde expansions
//! after colons apply, but no field splitting or pathname expansion.

use crate::expansion;
use thiserror::Error as ThisError;
use zish_env::semantics::ExitStatus;
use zish_env::variable::ReadOnlyError;
use zish_env::Env;
use zish_syntax::source::Location;
use zish_syntax::syntax::Assign;

/// Error performing an assignment
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ErrorCause {
    /// Error expanding the value
    #[error(transparent)]
    Expansion(expansion::ErrorCause),

    /// The variable is readonly.
    #[error(transparent)]
    ReadOnly(#[from] ReadOnlyError),
}

/// Assignment error with its location
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{cause}")]
pub struct Error {
    /// Cause of the error
    pub cause: ErrorCause,
    /// Location of the assignment
    pub location: Location,
}

impl From<expansion::Error> for Error {
    fn from(error: expansion::Error) -> Self {
        Error {
            cause: ErrorCause::Expansion(error.cause),
            location: error.location,
        }
    }
}

/// Performs assignments, in order.
///
/// Returns the exit status of the last command substitution performed in
/// the values, if any.
pub fn perform_assignments(
    env: &mut Env,
    assigns: &[Assign],
    export: bool,
) -> Result<Option<ExitStatus>, Error> {
    let mut exit_status = None;
    for assign in assigns {
        let (field, status) = expansion::expand_word(env, &assign.value)?;
        exit_status = status.or(exit_status);
        env.assign_variable(&assign.name, field.value)
            .map_err(|e| Error {
                cause: ErrorCause::ReadOnly(e),
                location: assign.location,
            })?;
        if export {
            env.variables.export(&assign.name, true);
        }
    }
    Ok(exit_status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zish_env::system::RealSystem;
    use zish_syntax::syntax::{TextUnit, Word, WordUnit};

    fn assign(name: &str, value: &str) -> Assign {
        Assign {
            name: name.to_string(),
            value: Word {
                units: value
                    .chars()
                    .map(|c| WordUnit::Unquoted(TextUnit::Literal(c)))
                    .collect(),
                location: Location::dummy(),
            },
            location: Location::dummy(),
        }
    }

    #[test]
    fn assigns_in_order() {
        let mut env = Env::new(RealSystem);
        let assigns = [assign("x", "1"), assign("y", "2")];
        perform_assignments(&mut env, &assigns, false).unwrap();
        assert_eq!(env.variables.get_scalar("x"), Some("1"));
        assert_eq!(env.variables.get_scalar("y"), Some("2"));
    }

    #[test]
    fn readonly_assignment_fails() {
        let mut env = Env::new(RealSystem);
        env.variables.assign("x", "1".to_string()).unwrap();
        env.variables.make_read_only("x", Location::dummy());
        let error = perform_assignments(&mut env, &[assign("x", "2")], false).unwrap_err();
        assert_matches::assert_matches!(error.cause, ErrorCause::ReadOnly(_));
    }

    #[test]
    fn export_flag_marks_variable() {
        let mut env = Env::new(RealSystem);
        perform_assignments(&mut env, &[assign("x", "1")], true).unwrap();
        assert!(env.variables.get("x").unwrap().is_exported);
    }
}
