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

//! Arithmetic expansion
//!
//! The content text is expanded first (parameters and nested
//! substitutions apply inside `$((…))`), then handed to the `zish-arith`
//! evaluator. Assignments and increments write back to shell variables.

use super::super::{Error, ErrorCause, ExpansionEnv, Phrase};
use super::{expand_text_units, soft_chars};
use zish_arith::Value;
use zish_env::variable::ReadOnlyError;
use zish_env::Env;
use zish_syntax::source::Location;
use zish_syntax::syntax::Text;

/// Adapter exposing shell variables to the arithmetic evaluator
struct VarEnv<'a> {
    env: &'a mut Env,
}

impl zish_arith::Env for VarEnv<'_> {
    type AssignVariableError = ReadOnlyError;

    fn get_variable(&self, name: &str) -> Option<&str> {
        self.env.variables.get_scalar(name)
    }

    fn assign_variable(&mut self, name: &str, value: String) -> Result<(), ReadOnlyError> {
        self.env.assign_variable(name, value)
    }
}

/// Expands an arithmetic expansion to a phrase.
pub fn expand(
    env: &mut ExpansionEnv,
    content: &Text,
    quoted: bool,
    location: Location,
) -> Result<Phrase, Error> {
    let phrase = expand_text_units(env, content, false)?;
    let expression: String = phrase
        .iter()
        .flatten()
        .filter(|c| !c.is_quoting)
        .map(|c| c.value)
        .collect();

    let mut var_env = VarEnv { env: env.inner };
    match zish_arith::eval(&expression, &mut var_env) {
        Ok(Value::Integer(value)) => Ok(vec![soft_chars(&value.to_string(), quoted)]),
        Err(error) => Err(Error {
            cause: ErrorCause::ArithError {
                message: error.to_string(),
            },
            location,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use zish_env::system::RealSystem;
    use zish_syntax::syntax::TextUnit;

    fn text(s: &str) -> Text {
        Text(s.chars().map(TextUnit::Literal).collect())
    }

    fn eval_in(env: &mut Env, expression: &str) -> Result<String, Error> {
        let mut expansion_env = ExpansionEnv::new(env);
        let phrase = expand(
            &mut expansion_env,
            &text(expression),
            false,
            Location::dummy(),
        )?;
        Ok(phrase[0].iter().map(|c| c.value).collect())
    }

    #[test]
    fn evaluates_constant_expression() {
        let mut env = Env::new(RealSystem);
        assert_eq!(eval_in(&mut env, "1 + 2 * 3").unwrap(), "7");
    }

    #[test]
    fn reads_and_writes_variables() {
        let mut env = Env::new(RealSystem);
        env.variables.assign("x", "5".to_string()).unwrap();
        assert_eq!(eval_in(&mut env, "x += 3").unwrap(), "8");
        assert_eq!(env.variables.get_scalar("x"), Some("8"));
    }

    #[test]
    fn post_increment() {
        let mut env = Env::new(RealSystem);
        env.variables.assign("x", "5".to_string()).unwrap();
        assert_eq!(eval_in(&mut env, "x++").unwrap(), "5");
        assert_eq!(env.variables.get_scalar("x"), Some("6"));
    }

    #[test]
    fn division_by_zero_is_an_error() {
        let mut env = Env::new(RealSystem);
        let error = eval_in(&mut env, "1 / 0").unwrap_err();
        assert_matches!(error.cause, ErrorCause::ArithError { .. });
    }

    #[test]
    fn nested_parameter_expansion() {
        let mut env = Env::new(RealSystem);
        env.variables.assign("x", "4".to_string()).unwrap();
        let mut expansion_env = ExpansionEnv::new(&mut env);
        let content = Text(vec![
            TextUnit::RawParam {
                param: zish_syntax::syntax::Param::variable("x"),
                location: Location::dummy(),
            },
            TextUnit::Literal('*'),
            TextUnit::Literal('2'),
        ]);
        let phrase = expand(&mut expansion_env, &content, false, Location::dummy()).unwrap();
        let result: String = phrase[0].iter().map(|c| c.value).collect();
        assert_eq!(result, "8");
    }
}
