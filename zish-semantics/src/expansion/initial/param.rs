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

//! Parameter expansion
//!
//! Looks up the parameter value, applies the modifier (length, switch, or
//! trim), and converts the result into a phrase. `$@` produces one field
//! per positional parameter; `$*` joins the parameters with the first
//! character of `$IFS`.

use super::super::attr::AttrChar;
use super::super::{Error, ErrorCause, ExpansionEnv, Phrase};
use super::{expand_word_nested, soft_chars};
use zish_env::option::{Off, Unset as UnsetOption};
use zish_fnmatch::{Config, Pattern, PatternChar};
use zish_syntax::source::Location;
use zish_syntax::syntax::{
    Modifier, Param, ParamType, SpecialParam, Switch, SwitchCondition, SwitchType, Trim,
    TrimLength, TrimSide,
};

/// Raw value of a parameter before modifiers apply
#[derive(Clone, Debug, Eq, PartialEq)]
enum Value {
    /// The parameter is not set.
    Unset,
    /// Single string value
    Scalar(String),
    /// All positional parameters (`$@` and `$*`)
    Array(Vec<String>),
}

use Value::*;

impl Value {
    /// Returns true if the value triggers a switch with the given
    /// condition.
    fn is_missing(&self, condition: SwitchCondition) -> bool {
        match condition {
            SwitchCondition::Unset => matches!(self, Unset),
            SwitchCondition::UnsetOrEmpty => match self {
                Unset => true,
                Scalar(value) => value.is_empty(),
                Array(values) => values.is_empty(),
            },
        }
    }
}

fn look_up(env: &ExpansionEnv, param: &Param) -> Value {
    match param.r#type {
        ParamType::Variable => match env.inner.variables.get_scalar(&param.id) {
            Some(value) => Scalar(value.to_string()),
            None => Unset,
        },
        ParamType::Positional(index) => {
            let params = env.inner.variables.positional_params();
            match index.checked_sub(1).and_then(|i| params.get(i)) {
                Some(value) => Scalar(value.clone()),
                None => Unset,
            }
        }
        ParamType::Special(special) => look_up_special(env, special),
    }
}

fn look_up_special(env: &ExpansionEnv, special: SpecialParam) -> Value {
    use SpecialParam::*;
    match special {
        At | Asterisk => Array(env.inner.variables.positional_params().to_vec()),
        Number => Scalar(env.inner.variables.positional_params().len().to_string()),
        Question => Scalar(env.inner.exit_status.to_string()),
        Hyphen => Scalar(env.inner.options.short_flags()),
        Dollar => Scalar(env.inner.main_pid.as_raw().to_string()),
        Exclamation => Scalar(
            env.inner
                .jobs
                .last_async_pid()
                .map(|pid| pid.as_raw().to_string())
                .unwrap_or_default(),
        ),
        Zero => Scalar(env.inner.arg0.clone()),
    }
}

/// First character of `$IFS`, used to join `$*`
fn ifs_first_char(env: &ExpansionEnv) -> Option<char> {
    match env.inner.variables.get_scalar("IFS") {
        Some(ifs) => ifs.chars().next(),
        None => Some(' '),
    }
}

/// Converts a value to a phrase.
fn into_phrase(env: &ExpansionEnv, param: &Param, value: Value, quoted: bool) -> Phrase {
    match value {
        Unset => vec![Vec::new()],
        Scalar(value) => vec![soft_chars(&value, quoted)],
        Array(values) => {
            if param.r#type == ParamType::Special(SpecialParam::Asterisk) {
                let separator = ifs_first_char(env);
                let mut joined = String::new();
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        if let Some(separator) = separator {
                            joined.push(separator);
                        }
                    }
                    joined.push_str(value);
                }
                vec![soft_chars(&joined, quoted)]
            } else {
                values
                    .iter()
                    .map(|value| soft_chars(value, quoted))
                    .collect()
            }
        }
    }
}

/// Expands a parameter with its modifier.
pub fn expand(
    env: &mut ExpansionEnv,
    param: &Param,
    modifier: &Modifier,
    quoted: bool,
    location: Location,
) -> Result<Phrase, Error> {
    let value = look_up(env, param);

    match modifier {
        Modifier::None => {
            check_nounset(env, param, &value, location)?;
            Ok(into_phrase(env, param, value, quoted))
        }

        Modifier::Length => {
            check_nounset(env, param, &value, location)?;
            let length = match &value {
                Unset => 0,
                Scalar(value) => value.len(),
                Array(values) => values.len(),
            };
            Ok(vec![soft_chars(&length.to_string(), quoted)])
        }

        Modifier::Switch(switch) => expand_switch(env, param, switch, value, quoted, location),

        Modifier::Trim(trim) => {
            check_nounset(env, param, &value, location)?;
            let value = apply_trim(env, trim, value)?;
            Ok(into_phrase(env, param, value, quoted))
        }
    }
}

/// Reports an error for an unset variable or positional parameter when
/// the `nounset` option is in effect.
fn check_nounset(
    env: &ExpansionEnv,
    param: &Param,
    value: &Value,
    location: Location,
) -> Result<(), Error> {
    if *value == Unset
        && env.inner.options.get(UnsetOption) == Off
        && matches!(
            param.r#type,
            ParamType::Variable | ParamType::Positional(_)
        )
    {
        return Err(Error {
            cause: ErrorCause::UnsetParameter {
                name: param.id.clone(),
            },
            location,
        });
    }
    Ok(())
}

fn expand_switch(
    env: &mut ExpansionEnv,
    param: &Param,
    switch: &Switch,
    value: Value,
    quoted: bool,
    location: Location,
) -> Result<Phrase, Error> {
    let missing = value.is_missing(switch.condition);

    match switch.r#type {
        SwitchType::Default => {
            if missing {
                expand_word_nested(env, &switch.word, quoted)
            } else {
                Ok(into_phrase(env, param, value, quoted))
            }
        }

        SwitchType::Alter => {
            if missing {
                Ok(vec![Vec::new()])
            } else {
                expand_word_nested(env, &switch.word, quoted)
            }
        }

        SwitchType::Assign => {
            if missing {
                if param.r#type != ParamType::Variable {
                    return Err(Error {
                        cause: ErrorCause::NonassignableParameter {
                            name: param.id.clone(),
                        },
                        location,
                    });
                }
                let phrase = expand_word_nested(env, &switch.word, quoted)?;
                let new_value: String = phrase
                    .iter()
                    .flatten()
                    .filter(|c| !c.is_quoting)
                    .map(|c| c.value)
                    .collect();
                env.inner
                    .assign_variable(&param.id, new_value.clone())
                    .map_err(|e| Error {
                        cause: ErrorCause::AssignReadOnly(e),
                        location,
                    })?;
                Ok(vec![soft_chars(&new_value, quoted)])
            } else {
                Ok(into_phrase(env, param, value, quoted))
            }
        }

        SwitchType::Error => {
            if missing {
                let message = if switch.word.units.is_empty() {
                    match switch.condition {
                        SwitchCondition::Unset => "parameter not set".to_string(),
                        SwitchCondition::UnsetOrEmpty => "parameter null or not set".to_string(),
                    }
                } else {
                    let phrase = expand_word_nested(env, &switch.word, false)?;
                    phrase
                        .iter()
                        .flatten()
                        .filter(|c| !c.is_quoting)
                        .map(|c| c.value)
                        .collect()
                };
                Err(Error {
                    cause: ErrorCause::EmptyExpansion {
                        name: param.id.clone(),
                        message,
                    },
                    location,
                })
            } else {
                check_nounset(env, param, &value, location)?;
                Ok(into_phrase(env, param, value, quoted))
            }
        }
    }
}

/// Converts a pattern field to pattern characters.
///
/// Quoted characters match literally and never act as wildcards.
fn to_pattern_chars(chars: &[AttrChar]) -> impl Iterator<Item = PatternChar> + Clone + '_ {
    chars.iter().filter(|c| !c.is_quoting).map(|c| {
        if c.is_quoted {
            PatternChar::Literal(c.value)
        } else {
            PatternChar::Normal(c.value)
        }
    })
}

fn apply_trim(env: &mut ExpansionEnv, trim: &Trim, value: Value) -> Result<Value, Error> {
    let pattern_phrase = expand_word_nested(env, &trim.pattern, false)?;
    let pattern_chars: Vec<AttrChar> = pattern_phrase.into_iter().flatten().collect();

    let mut config = Config::default();
    match trim.side {
        TrimSide::Prefix => config.anchor_begin = true,
        TrimSide::Suffix => config.anchor_end = true,
    }
    if trim.length == TrimLength::Shortest {
        config.shortest_match = true;
    }
    let pattern = match Pattern::parse_with_config(to_pattern_chars(&pattern_chars), config) {
        Ok(pattern) => pattern,
        // A malformed pattern matches nothing.
        Err(_) => return Ok(value),
    };

    let trim_one = |mut value: String| {
        if let Some(range) = pattern.find(&value) {
            value.drain(range);
        }
        value
    };

    Ok(match value {
        Unset => Unset,
        Scalar(value) => Scalar(trim_one(value)),
        Array(values) => Array(values.into_iter().map(trim_one).collect()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use zish_env::system::RealSystem;
    use zish_env::Env;

    fn expand_simple(env: &mut Env, id: &str, modifier: Modifier) -> Result<Vec<String>, Error> {
        let mut expansion_env = ExpansionEnv::new(env);
        let param = Param::from_id(id.to_string());
        let phrase = expand(
            &mut expansion_env,
            &param,
            &modifier,
            false,
            Location::dummy(),
        )?;
        Ok(phrase
            .into_iter()
            .map(|field| {
                field
                    .into_iter()
                    .filter(|c| !c.is_quoting)
                    .map(|c| c.value)
                    .collect()
            })
            .collect())
    }

    fn literal_word(s: &str) -> zish_syntax::syntax::Word {
        use zish_syntax::syntax::{TextUnit, WordUnit};
        zish_syntax::syntax::Word {
            units: s
                .chars()
                .map(|c| WordUnit::Unquoted(TextUnit::Literal(c)))
                .collect(),
            location: Location::dummy(),
        }
    }

    #[test]
    fn plain_variable() {
        let mut env = Env::new(RealSystem);
        env.variables.assign("x", "value".to_string()).unwrap();
        assert_eq!(
            expand_simple(&mut env, "x", Modifier::None).unwrap(),
            ["value"]
        );
    }

    #[test]
    fn unset_variable_is_empty() {
        let mut env = Env::new(RealSystem);
        assert_eq!(expand_simple(&mut env, "x", Modifier::None).unwrap(), [""]);
    }

    #[test]
    fn nounset_rejects_unset_variable() {
        use zish_env::option::Unset as UnsetOption;
        let mut env = Env::new(RealSystem);
        env.options.set(UnsetOption, Off);
        let error = expand_simple(&mut env, "x", Modifier::None).unwrap_err();
        assert_eq!(
            error.cause,
            ErrorCause::UnsetParameter {
                name: "x".to_string()
            }
        );
    }

    #[test]
    fn length_is_byte_count() {
        let mut env = Env::new(RealSystem);
        env.variables.assign("x", "hello".to_string()).unwrap();
        assert_eq!(
            expand_simple(&mut env, "x", Modifier::Length).unwrap(),
            ["5"]
        );
    }

    #[test]
    fn at_expands_to_separate_fields() {
        let mut env = Env::new(RealSystem);
        env.variables
            .set_positional_params(vec!["a".to_string(), "b c".to_string()]);
        assert_eq!(
            expand_simple(&mut env, "@", Modifier::None).unwrap(),
            ["a", "b c"]
        );
    }

    #[test]
    fn star_joins_with_first_ifs_char() {
        let mut env = Env::new(RealSystem);
        env.variables
            .set_positional_params(vec!["a".to_string(), "b".to_string()]);
        env.variables.assign("IFS", ":".to_string()).unwrap();
        assert_eq!(
            expand_simple(&mut env, "*", Modifier::None).unwrap(),
            ["a:b"]
        );
    }

    #[test]
    fn switch_default_on_unset() {
        let mut env = Env::new(RealSystem);
        let modifier = Modifier::Switch(Switch {
            r#type: SwitchType::Default,
            condition: SwitchCondition::UnsetOrEmpty,
            word: literal_word("fallback"),
        });
        assert_eq!(
            expand_simple(&mut env, "x", modifier).unwrap(),
            ["fallback"]
        );
    }

    #[test]
    fn switch_default_distinguishes_colon() {
        let mut env = Env::new(RealSystem);
        env.variables.assign("x", String::new()).unwrap();

        // Without the colon, an empty value is used as is.
        let unset_only = Modifier::Switch(Switch {
            r#type: SwitchType::Default,
            condition: SwitchCondition::Unset,
            word: literal_word("fallback"),
        });
        assert_eq!(expand_simple(&mut env, "x", unset_only).unwrap(), [""]);

        // With the colon, an empty value triggers the default.
        let unset_or_empty = Modifier::Switch(Switch {
            r#type: SwitchType::Default,
            condition: SwitchCondition::UnsetOrEmpty,
            word: literal_word("fallback"),
        });
        assert_eq!(
            expand_simple(&mut env, "x", unset_or_empty).unwrap(),
            ["fallback"]
        );
    }

    #[test]
    fn switch_assign_writes_back() {
        let mut env = Env::new(RealSystem);
        let modifier = Modifier::Switch(Switch {
            r#type: SwitchType::Assign,
            condition: SwitchCondition::UnsetOrEmpty,
            word: literal_word("assigned"),
        });
        assert_eq!(
            expand_simple(&mut env, "x", modifier).unwrap(),
            ["assigned"]
        );
        assert_eq!(env.variables.get_scalar("x"), Some("assigned"));
    }

    #[test]
    fn switch_error_reports_message() {
        let mut env = Env::new(RealSystem);
        let modifier = Modifier::Switch(Switch {
            r#type: SwitchType::Error,
            condition: SwitchCondition::UnsetOrEmpty,
            word: literal_word("x is required"),
        });
        let error = expand_simple(&mut env, "x", modifier).unwrap_err();
        assert_eq!(
            error.cause,
            ErrorCause::EmptyExpansion {
                name: "x".to_string(),
                message: "x is required".to_string(),
            }
        );
    }

    #[test]
    fn switch_alter_on_set() {
        let mut env = Env::new(RealSystem);
        env.variables.assign("x", "anything".to_string()).unwrap();
        let modifier = Modifier::Switch(Switch {
            r#type: SwitchType::Alter,
            condition: SwitchCondition::UnsetOrEmpty,
            word: literal_word("replacement"),
        });
        assert_eq!(
            expand_simple(&mut env, "x", modifier).unwrap(),
            ["replacement"]
        );
    }

    #[test]
    fn trim_prefix_shortest_and_longest() {
        let mut env = Env::new(RealSystem);
        env.variables.assign("x", "a.b.c".to_string()).unwrap();

        let shortest = Modifier::Trim(Trim {
            side: TrimSide::Prefix,
            length: TrimLength::Shortest,
            pattern: literal_word("*."),
        });
        assert_eq!(expand_simple(&mut env, "x", shortest).unwrap(), ["b.c"]);

        let longest = Modifier::Trim(Trim {
            side: TrimSide::Prefix,
            length: TrimLength::Longest,
            pattern: literal_word("*."),
        });
        assert_eq!(expand_simple(&mut env, "x", longest).unwrap(), ["c"]);
    }

    #[test]
    fn trim_suffix_shortest_and_longest() {
        let mut env = Env::new(RealSystem);
        env.variables.assign("x", "a.b.c".to_string()).unwrap();

        let shortest = Modifier::Trim(Trim {
            side: TrimSide::Suffix,
            length: TrimLength::Shortest,
            pattern: literal_word(".*"),
        });
        assert_eq!(expand_simple(&mut env, "x", shortest).unwrap(), ["a.b"]);

        let longest = Modifier::Trim(Trim {
            side: TrimSide::Suffix,
            length: TrimLength::Longest,
            pattern: literal_word(".*"),
        });
        assert_eq!(expand_simple(&mut env, "x", longest).unwrap(), ["a"]);
    }

    #[test]
    fn special_parameters() {
        let mut env = Env::new(RealSystem);
        env.exit_status = zish_env::semantics::ExitStatus(42);
        env.variables
            .set_positional_params(vec!["a".to_string(), "b".to_string()]);
        env.arg0 = "zish".to_string();
        assert_eq!(expand_simple(&mut env, "?", Modifier::None).unwrap(), ["42"]);
        assert_eq!(expand_simple(&mut env, "#", Modifier::None).unwrap(), ["2"]);
        assert_eq!(
            expand_simple(&mut env, "0", Modifier::None).unwrap(),
            ["zish"]
        );
        assert_eq!(expand_simple(&mut env, "1", Modifier::None).unwrap(), ["a"]);
    }
}
