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

//! Initial expansion
//!
//! The initial expansion turns word and text units into a [`Phrase`],
//! resolving tilde prefixes, parameters, command substitutions, and
//! arithmetic. Quoting is recorded in the character attributes rather
//! than resolved here; field splitting, pathname expansion, and quote
//! removal consume the attributes later.

pub mod arith;
pub mod command_subst;
pub mod param;

use super::attr::{AttrChar, Origin};
use super::{join_phrase, Error, ExpansionEnv, Phrase};
use zish_syntax::syntax::{BackquoteUnit, Text, TextUnit, Word, WordUnit};

/// Creates a field of soft-expansion characters from a string.
pub(super) fn soft_chars(value: &str, quoted: bool) -> Vec<AttrChar> {
    value
        .chars()
        .map(|c| AttrChar {
            value: c,
            origin: Origin::SoftExpansion,
            is_quoted: quoted,
            is_quoting: false,
        })
        .collect()
}

/// Expands the units of a word.
///
/// With `quoted`, every produced character is marked quoted; this is used
/// for words nested in a quoted parameter expansion.
pub fn expand_word_units(
    env: &mut ExpansionEnv,
    units: &[WordUnit],
    quoted: bool,
) -> Result<Phrase, Error> {
    let mut phrase = vec![Vec::new()];
    for unit in units {
        let next = expand_word_unit(env, unit, quoted)?;
        join_phrase(&mut phrase, next);
    }
    Ok(phrase)
}

/// Expands a whole word to a phrase, as a nested expansion.
pub(super) fn expand_word_nested(
    env: &mut ExpansionEnv,
    word: &Word,
    quoted: bool,
) -> Result<Phrase, Error> {
    expand_word_units(env, &word.units, quoted)
}

fn expand_word_unit(
    env: &mut ExpansionEnv,
    unit: &WordUnit,
    quoted: bool,
) -> Result<Phrase, Error> {
    match unit {
        WordUnit::Unquoted(text_unit) => expand_text_unit(env, text_unit, quoted),
        WordUnit::SingleQuote(body) => {
            let mut chars = Vec::with_capacity(body.chars().count() + 2);
            chars.push(AttrChar::quoting('\''));
            chars.extend(body.chars().map(|c| AttrChar {
                value: c,
                origin: Origin::Literal,
                is_quoted: true,
                is_quoting: false,
            }));
            chars.push(AttrChar::quoting('\''));
            Ok(vec![chars])
        }
        WordUnit::DoubleQuote(text) => {
            let mut inner: Phrase = Vec::new();
            for text_unit in &text.0 {
                let next = expand_text_unit(env, text_unit, true)?;
                join_phrase(&mut inner, next);
            }
            // `"$@"` with no positional parameters produces no fields at
            // all, so the quotes must not create one. A literally empty
            // `""` still yields one empty field.
            if inner.is_empty() {
                if text.0.is_empty() {
                    inner.push(Vec::new());
                } else {
                    return Ok(Vec::new());
                }
            }
            inner.first_mut().unwrap().insert(0, AttrChar::quoting('"'));
            inner.last_mut().unwrap().push(AttrChar::quoting('"'));
            Ok(inner)
        }
        WordUnit::Tilde(name) => Ok(vec![expand_tilde(env, name)]),
    }
}

/// Expands the units of a text.
pub fn expand_text_units(
    env: &mut ExpansionEnv,
    text: &Text,
    quoted: bool,
) -> Result<Phrase, Error> {
    let mut phrase = vec![Vec::new()];
    for unit in &text.0 {
        let next = expand_text_unit(env, unit, quoted)?;
        join_phrase(&mut phrase, next);
    }
    Ok(phrase)
}

fn expand_text_unit(
    env: &mut ExpansionEnv,
    unit: &TextUnit,
    quoted: bool,
) -> Result<Phrase, Error> {
    match unit {
        TextUnit::Literal(c) => Ok(vec![vec![AttrChar {
            value: *c,
            origin: Origin::Literal,
            is_quoted: quoted,
            is_quoting: false,
        }]]),
        TextUnit::Backslashed(c) => Ok(vec![vec![
            AttrChar {
                value: '\\',
                origin: Origin::Literal,
                is_quoted: quoted,
                is_quoting: true,
            },
            AttrChar {
                value: *c,
                origin: Origin::Literal,
                is_quoted: true,
                is_quoting: false,
            },
        ]]),
        TextUnit::RawParam { param, location } => {
            param::expand(env, param, &zish_syntax::syntax::Modifier::None, quoted, *location)
        }
        TextUnit::BracedParam(braced) => {
            param::expand(env, &braced.param, &braced.modifier, quoted, braced.location)
        }
        TextUnit::CommandSubst { content, location } => {
            command_subst::expand(env, content, quoted, *location)
        }
        TextUnit::Backquote { content, location } => {
            let mut command = String::new();
            for unit in content {
                match unit {
                    BackquoteUnit::Literal(c) => command.push(*c),
                    BackquoteUnit::Backslashed(c) => command.push(*c),
                }
            }
            command_subst::expand(env, &command, quoted, *location)
        }
        TextUnit::Arith { content, location } => arith::expand(env, content, quoted, *location),
    }
}

/// Expands a tilde prefix.
///
/// An empty name resolves to `$HOME`; otherwise the named user's home
/// directory is looked up. If the resolution fails, the prefix stays
/// literal. The result is a hard expansion: exempt from field splitting
/// and pathname expansion.
fn expand_tilde(env: &mut ExpansionEnv, name: &str) -> Vec<AttrChar> {
    let value = if name.is_empty() {
        match env.inner.variables.get_scalar("HOME") {
            Some(home) => home.to_string(),
            None => "~".to_string(),
        }
    } else {
        match env.inner.system.getpwnam_dir(name) {
            Some(dir) => dir.to_string_lossy().into_owned(),
            None => format!("~{name}"),
        }
    };
    value
        .chars()
        .map(|c| AttrChar {
            value: c,
            origin: Origin::HardExpansion,
            is_quoted: false,
            is_quoting: false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use zish_env::system::RealSystem;
    use zish_env::Env;
    use zish_syntax::source::Location;

    fn env_with_home(home: &str) -> Env {
        let mut env = Env::new(RealSystem);
        env.variables.assign("HOME", home.to_string()).unwrap();
        env
    }

    fn strip(phrase: Phrase) -> Vec<String> {
        phrase
            .into_iter()
            .map(|field| {
                field
                    .into_iter()
                    .filter(|c| !c.is_quoting)
                    .map(|c| c.value)
                    .collect()
            })
            .collect()
    }

    #[test]
    fn single_quote_preserves_value() {
        let mut env = Env::new(RealSystem);
        let mut expansion_env = ExpansionEnv::new(&mut env);
        let units = [WordUnit::SingleQuote("a b".to_string())];
        let phrase = expand_word_units(&mut expansion_env, &units, false).unwrap();
        assert_eq!(strip(phrase), ["a b"]);
    }

    #[test]
    fn tilde_resolves_home() {
        let mut env = env_with_home("/home/me");
        let mut expansion_env = ExpansionEnv::new(&mut env);
        let units = [
            WordUnit::Tilde(String::new()),
            WordUnit::Unquoted(TextUnit::Literal('/')),
            WordUnit::Unquoted(TextUnit::Literal('x')),
        ];
        let phrase = expand_word_units(&mut expansion_env, &units, false).unwrap();
        assert_eq!(strip(phrase), ["/home/me/x"]);
    }

    #[test]
    fn tilde_result_is_hard_expansion() {
        let mut env = env_with_home("/home/me");
        let mut expansion_env = ExpansionEnv::new(&mut env);
        let units = [WordUnit::Tilde(String::new())];
        let phrase = expand_word_units(&mut expansion_env, &units, false).unwrap();
        assert!(phrase[0]
            .iter()
            .all(|c| c.origin == Origin::HardExpansion));
    }

    #[test]
    fn raw_param_expansion() {
        let mut env = Env::new(RealSystem);
        env.variables.assign("x", "hello".to_string()).unwrap();
        let mut expansion_env = ExpansionEnv::new(&mut env);
        let units = [WordUnit::Unquoted(TextUnit::RawParam {
            param: zish_syntax::syntax::Param::variable("x"),
            location: Location::dummy(),
        })];
        let phrase = expand_word_units(&mut expansion_env, &units, false).unwrap();
        assert_eq!(strip(phrase), ["hello"]);
    }
}
