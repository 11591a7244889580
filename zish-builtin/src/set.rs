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

//! Set built-in
//!
//! # Syntax
//!
//! ```sh
//! set
//! set [-o option]… [+o option]… [-flags] [+flags] [--] [operand…]
//! set -o
//! set +o
//! ```
//!
//! Without arguments, prints all variables. With option arguments,
//! changes shell options: `-e` and friends turn their option on, `+e`
//! off, and `-o name`/`+o name` use long names. `set -o` alone lists the
//! option states; `set +o` lists them in a form that can be re-read with
//! `eval`. Remaining operands replace the positional parameters; `--`
//! forces the remaining arguments to be operands.

use crate::common::{output, report_hard_error};
use zish_env::builtin::Result;
use zish_env::option::{Off, On, Option as ShellOption, OptionSpec, State};
use zish_env::semantics::{ExitStatus, Field};
use zish_env::Env;
use zish_quote::quote;

fn print_variables(env: &mut Env) -> Result {
    let mut lines: Vec<String> = env
        .variables
        .iter()
        .filter_map(|(name, variable)| {
            let value = variable.value.as_deref()?;
            Some(format!("{}={}\n", name, quote(value)))
        })
        .collect();
    lines.sort_unstable();
    output(env, &lines.concat())
}

fn print_option_states(env: &mut Env, reparsable: bool) -> Result {
    let mut lines = String::new();
    for (option, state) in env.options.iter() {
        if reparsable {
            let sign = if state == On { '-' } else { '+' };
            lines.push_str(&format!("set {sign}o {option}\n"));
        } else {
            lines.push_str(&format!("{option:<16}{state}\n"));
        }
    }
    output(env, &lines)
}

fn apply_long_option(env: &mut Env, name: &str, negate: bool) -> std::result::Result<(), String> {
    let spec: OptionSpec = name
        .parse()
        .map_err(|_| format!("no such option: {name}"))?;
    let state = if negate { !spec.state } else { spec.state };
    env.options.set(spec.option, state);
    Ok(())
}

fn apply_short_options(
    env: &mut Env,
    flags: &str,
    negate: bool,
) -> std::result::Result<(), String> {
    for flag in flags.chars() {
        let (option, state): (ShellOption, State) = ShellOption::from_short_name(flag)
            .ok_or_else(|| format!("no such option: -{flag}"))?;
        let state = if negate { !state } else { state };
        env.options.set(option, state);
    }
    Ok(())
}

/// Entry point for executing the `set` built-in
pub fn main(env: &mut Env, args: Vec<Field>) -> Result {
    if args.is_empty() {
        return print_variables(env);
    }

    let mut iter = args.iter().peekable();
    let mut set_params = false;
    while let Some(arg) = iter.peek() {
        let value = arg.value.as_str();
        match value {
            "--" => {
                iter.next();
                set_params = true;
                break;
            }
            "-o" | "+o" => {
                let negate = value.starts_with('+');
                iter.next();
                match iter.next() {
                    None => return print_option_states(env, negate),
                    Some(name) => {
                        if let Err(message) = apply_long_option(env, &name.value, negate) {
                            return report_hard_error(env, "set", &message);
                        }
                    }
                }
            }
            _ if value.len() > 1 && (value.starts_with('-') || value.starts_with('+')) => {
                let negate = value.starts_with('+');
                if let Err(message) = apply_short_options(env, &value[1..], negate) {
                    return report_hard_error(env, "set", &message);
                }
                iter.next();
            }
            _ => {
                set_params = true;
                break;
            }
        }
    }

    if set_params {
        let params: Vec<String> = iter.map(|field| field.value.clone()).collect();
        env.variables.set_positional_params(params);
    }
    Result::new(ExitStatus::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zish_env::option::{ErrExit, Glob, PipeFail, Unset};
    use zish_env::system::RealSystem;

    fn run(env: &mut Env, args: &[&str]) -> Result {
        main(env, Field::dummies(args.iter().copied()))
    }

    #[test]
    fn short_flags() {
        let mut env = Env::new(RealSystem);
        run(&mut env, &["-e"]);
        assert_eq!(env.options.get(ErrExit), On);
        run(&mut env, &["+e"]);
        assert_eq!(env.options.get(ErrExit), Off);
    }

    #[test]
    fn noglob_flag_turns_glob_off() {
        let mut env = Env::new(RealSystem);
        run(&mut env, &["-f"]);
        assert_eq!(env.options.get(Glob), Off);
        run(&mut env, &["+f"]);
        assert_eq!(env.options.get(Glob), On);
    }

    #[test]
    fn long_options() {
        let mut env = Env::new(RealSystem);
        run(&mut env, &["-o", "pipefail"]);
        assert_eq!(env.options.get(PipeFail), On);
        run(&mut env, &["+o", "pipefail"]);
        assert_eq!(env.options.get(PipeFail), Off);
        run(&mut env, &["-o", "nounset"]);
        assert_eq!(env.options.get(Unset), Off);
    }

    #[test]
    fn operands_replace_positional_params() {
        let mut env = Env::new(RealSystem);
        run(&mut env, &["a", "b", "c"]);
        assert_eq!(
            env.variables.positional_params(),
            ["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }

    #[test]
    fn double_dash_forces_operands() {
        let mut env = Env::new(RealSystem);
        run(&mut env, &["--", "-e", "x"]);
        assert_eq!(
            env.variables.positional_params(),
            ["-e".to_string(), "x".to_string()]
        );
        assert_eq!(env.options.get(ErrExit), Off);
    }

    #[test]
    fn mixed_flags_and_operands() {
        let mut env = Env::new(RealSystem);
        run(&mut env, &["-e", "-o", "pipefail", "one"]);
        assert_eq!(env.options.get(ErrExit), On);
        assert_eq!(env.options.get(PipeFail), On);
        assert_eq!(env.variables.positional_params(), ["one".to_string()]);
    }
}
