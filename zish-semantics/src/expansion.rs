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

//! Word expansion
//!
//! Expansion proceeds in the POSIX-mandated phases:
//!
//! 1. The [initial] expansion resolves tildes, parameters, command
//!    substitutions, and arithmetic, producing attributed characters
//!    ([`attr::AttrChar`]).
//! 2. [Field splitting](split) applies to unquoted expansion results.
//! 3. [Pathname expansion](glob) applies to each field unless disabled.
//! 4. Quote removal drops the quotation marks.
//!
//! [`expand_words`] runs the full pipeline for command words.
//! [`expand_word`] expands a word to exactly one field, skipping
//! splitting and pathname expansion, as required for assignment values,
//! case subjects, and redirection operands. [`expand_text`] expands a
//! text (here-document contents and the like) to a string.

pub mod attr;
pub mod glob;
pub mod initial;
pub mod split;

use self::attr::{AttrChar, AttrField};
use thiserror::Error as ThisError;
use zish_env::semantics::{ExitStatus, Field};
use zish_env::system::Errno;
use zish_env::variable::ReadOnlyError;
use zish_env::Env;
use zish_syntax::source::Location;
use zish_syntax::syntax::{Text, Word};

/// Intermediate expansion result: a list of fields of attributed
/// characters
///
/// An expansion may produce any number of fields: `"$@"` yields one field
/// per positional parameter, and none at all when there are no
/// parameters.
pub type Phrase = Vec<Vec<AttrChar>>;

/// Appends a phrase to an accumulated phrase.
///
/// The first field of `next` is joined onto the last accumulated field;
/// remaining fields start new fields. An empty `next` contributes
/// nothing.
pub(crate) fn join_phrase(accumulator: &mut Phrase, next: Phrase) {
    let mut fields = next.into_iter();
    let Some(first) = fields.next() else { return };
    match accumulator.last_mut() {
        Some(last) => last.extend(first),
        None => accumulator.push(first),
    }
    accumulator.extend(fields);
}

/// Cause of an expansion error
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ErrorCause {
    /// Expansion of an unset parameter while `nounset` is in effect
    #[error("{name}: parameter not set")]
    UnsetParameter {
        /// Name of the parameter
        name: String,
    },

    /// `${name?}` or `${name:?}` on a missing value
    #[error("{name}: {message}")]
    EmptyExpansion {
        /// Name of the parameter
        name: String,
        /// Message given in the expansion, or the default message
        message: String,
    },

    /// `${name=word}` on a parameter that is not a variable
    #[error("{name}: cannot assign in this context")]
    NonassignableParameter {
        /// Name of the parameter
        name: String,
    },

    /// Error in an arithmetic expansion
    #[error("arithmetic expansion: {message}")]
    ArithError {
        /// Description of the error
        message: String,
    },

    /// System error performing a command substitution
    #[error("command substitution: {0}")]
    CommandSubstError(Errno),

    /// Assignment to a readonly variable
    #[error(transparent)]
    AssignReadOnly(#[from] ReadOnlyError),
}

/// Expansion error with its location
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{cause}")]
pub struct Error {
    /// Cause of the error
    pub cause: ErrorCause,
    /// Location of the word the error occurred in
    pub location: Location,
}

/// Environment wrapper used during expansion
///
/// Tracks whether the current expansion is subject to later field
/// splitting and remembers the exit status of the last command
/// substitution, which becomes the exit status of a simple command that
/// has no command words.
pub struct ExpansionEnv<'a> {
    /// The shell environment
    pub inner: &'a mut Env,
    /// Exit status of the last command substitution performed
    pub last_command_subst_exit_status: Option<ExitStatus>,
}

impl<'a> ExpansionEnv<'a> {
    pub fn new(inner: &'a mut Env) -> Self {
        ExpansionEnv {
            inner,
            last_command_subst_exit_status: None,
        }
    }
}

/// Expands command words to fields.
///
/// This performs the full expansion pipeline: initial expansion, field
/// splitting, pathname expansion, and quote removal. The second result is
/// the exit status of the last command substitution, if any.
pub fn expand_words(
    env: &mut Env,
    words: &[Word],
) -> Result<(Vec<Field>, Option<ExitStatus>), Error> {
    let mut expansion_env = ExpansionEnv::new(env);
    let mut fields = Vec::new();
    for word in words {
        let phrase = initial::expand_word_units(&mut expansion_env, &word.units, false)?;
        let ifs = expansion_env
            .inner
            .variables
            .get_scalar("IFS")
            .unwrap_or(" \t\n")
            .to_string();
        for chars in split::split_fields(phrase, &ifs) {
            let attr_field = AttrField {
                chars,
                origin: word.location,
            };
            fields.extend(glob::glob_field(expansion_env.inner, attr_field));
        }
    }
    let exit_status = expansion_env.last_command_subst_exit_status;
    Ok((fields, exit_status))
}

/// Expands a word to exactly one field.
///
/// No field splitting or pathname expansion happens. A multi-field
/// expansion like `"$@"` is joined with spaces.
pub fn expand_word(
    env: &mut Env,
    word: &Word,
) -> Result<(Field, Option<ExitStatus>), Error> {
    let (attr_field, exit_status) = expand_word_attr(env, word)?;
    Ok((attr_field.remove_quotes_and_strip(), exit_status))
}

/// Expands a word to one field, retaining character attributes.
///
/// This is the variant used where the result serves as a pattern, so the
/// caller can distinguish quoted characters.
pub fn expand_word_attr(
    env: &mut Env,
    word: &Word,
) -> Result<(AttrField, Option<ExitStatus>), Error> {
    let mut expansion_env = ExpansionEnv::new(env);
    let phrase = initial::expand_word_units(&mut expansion_env, &word.units, false)?;
    let mut fields = phrase.into_iter();
    let mut chars = fields.next().unwrap_or_default();
    for field in fields {
        chars.push(AttrChar {
            value: ' ',
            origin: attr::Origin::SoftExpansion,
            is_quoted: true,
            is_quoting: false,
        });
        chars.extend(field);
    }
    let exit_status = expansion_env.last_command_subst_exit_status;
    Ok((
        AttrField {
            chars,
            origin: word.location,
        },
        exit_status,
    ))
}

/// Expands a text to a string.
///
/// Used for here-document contents and other contexts where the result is
/// a single string not subject to splitting or pathname expansion.
pub fn expand_text(
    env: &mut Env,
    text: &Text,
) -> Result<(String, Option<ExitStatus>), Error> {
    let mut expansion_env = ExpansionEnv::new(env);
    let phrase = initial::expand_text_units(&mut expansion_env, text, false)?;
    let mut value = String::new();
    for (i, field) in phrase.iter().enumerate() {
        if i > 0 {
            value.push(' ');
        }
        value.extend(field.iter().filter(|c| !c.is_quoting).map(|c| c.value));
    }
    let exit_status = expansion_env.last_command_subst_exit_status;
    Ok((value, exit_status))
}

#[cfg(test)]
mod tests {
    use super::attr::Origin;
    use super::*;

    fn soft(value: char) -> AttrChar {
        AttrChar {
            value,
            origin: Origin::SoftExpansion,
            is_quoted: false,
            is_quoting: false,
        }
    }

    #[test]
    fn join_phrase_merges_boundary_fields() {
        let mut accumulator = vec![vec![soft('a')]];
        join_phrase(&mut accumulator, vec![vec![soft('b')], vec![soft('c')]]);
        assert_eq!(
            accumulator,
            [vec![soft('a'), soft('b')], vec![soft('c')]]
        );
    }

    #[test]
    fn join_phrase_with_empty_next() {
        let mut accumulator = vec![vec![soft('a')]];
        join_phrase(&mut accumulator, vec![]);
        assert_eq!(accumulator, [vec![soft('a')]]);
    }
}
