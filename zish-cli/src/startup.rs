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

//! Shell invocation
//!
//! Parses the command-line arguments into an [`Invocation`]: the source
//! of commands (`-c` string, script file, or standard input), initial
//! option settings, and the positional parameters.

pub mod init_file;
pub mod input;

use thiserror::Error;
use zish_env::option::{Option as ShellOption, OptionSpec, State};

/// Where the shell reads commands from
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Source {
    /// Operand of the `-c` option
    CommandString(String),
    /// Script file
    File(String),
    /// Standard input
    Stdin,
}

/// Parsed invocation
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Invocation {
    /// Value for `$0`
    pub arg0: String,
    /// Source of commands
    pub source: Source,
    /// Options selected on the command line
    pub options: Vec<(ShellOption, State)>,
    /// Initial positional parameters
    pub positional: Vec<String>,
    /// Whether `-i` was given
    pub force_interactive: bool,
}

/// Error in the invocation arguments
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum InvocationError {
    /// Unknown option flag
    #[error("unknown option `{0}`")]
    UnknownOption(String),
    /// `-c` without a command string
    #[error("option -c requires a command string operand")]
    MissingCommandString,
    /// `-o` without an option name
    #[error("option -o requires an option name")]
    MissingOptionName,
}

/// Parses the argument vector.
pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Invocation, InvocationError> {
    let mut args = args.into_iter();
    let arg0 = args.next().unwrap_or_else(|| "zish".to_string());
    let mut invocation = Invocation {
        arg0,
        source: Source::Stdin,
        options: Vec::new(),
        positional: Vec::new(),
        force_interactive: false,
    };
    let mut command_string = false;
    let mut read_stdin = false;

    let mut rest = None;
    let args_ref = args.by_ref();
    while let Some(arg) = args_ref.next() {
        match arg.as_str() {
            "--" => break,
            "-c" => command_string = true,
            "-s" => read_stdin = true,
            "-i" => invocation.force_interactive = true,
            "-o" | "+o" => {
                let negate = arg.starts_with('+');
                let name = args_ref.next().ok_or(InvocationError::MissingOptionName)?;
                let spec: OptionSpec = name
                    .parse()
                    .map_err(|_| InvocationError::UnknownOption(name.clone()))?;
                let state = if negate { !spec.state } else { spec.state };
                invocation.options.push((spec.option, state));
            }
            flags if flags.len() > 1 && (flags.starts_with('-') || flags.starts_with('+')) => {
                let negate = flags.starts_with('+');
                for flag in flags[1..].chars() {
                    match flag {
                        'c' => command_string = true,
                        's' => read_stdin = true,
                        'i' => invocation.force_interactive = true,
                        _ => match ShellOption::from_short_name(flag) {
                            Some((option, state)) => {
                                let state = if negate { !state } else { state };
                                invocation.options.push((option, state));
                            }
                            None => {
                                return Err(InvocationError::UnknownOption(format!("-{flag}")));
                            }
                        },
                    }
                }
            }
            _ => {
                rest = Some(arg);
                break;
            }
        }
    }

    let mut operands: Vec<String> = rest.into_iter().chain(args).collect();

    if command_string {
        if operands.is_empty() {
            return Err(InvocationError::MissingCommandString);
        }
        invocation.source = Source::CommandString(operands.remove(0));
        if !operands.is_empty() {
            // With -c, the first remaining operand names the command.
            invocation.arg0 = operands.remove(0);
        }
        invocation.positional = operands;
    } else if read_stdin || operands.is_empty() {
        invocation.source = Source::Stdin;
        invocation.positional = operands;
    } else {
        let file = operands.remove(0);
        invocation.arg0 = file.clone();
        invocation.source = Source::File(file);
        invocation.positional = operands;
    }

    Ok(invocation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zish_env::option::{ErrExit, On};

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_arguments_reads_stdin() {
        let invocation = parse(strings(&["zish"])).unwrap();
        assert_eq!(invocation.source, Source::Stdin);
        assert_eq!(invocation.arg0, "zish");
    }

    #[test]
    fn command_string() {
        let invocation = parse(strings(&["zish", "-c", "echo hi"])).unwrap();
        assert_eq!(
            invocation.source,
            Source::CommandString("echo hi".to_string())
        );
    }

    #[test]
    fn command_string_with_name_and_params() {
        let invocation = parse(strings(&["zish", "-c", "echo hi", "name", "a", "b"])).unwrap();
        assert_eq!(invocation.arg0, "name");
        assert_eq!(invocation.positional, ["a", "b"]);
    }

    #[test]
    fn script_file_with_params() {
        let invocation = parse(strings(&["zish", "script.sh", "x"])).unwrap();
        assert_eq!(invocation.source, Source::File("script.sh".to_string()));
        assert_eq!(invocation.arg0, "script.sh");
        assert_eq!(invocation.positional, ["x"]);
    }

    #[test]
    fn option_flags() {
        let invocation = parse(strings(&["zish", "-e", "-o", "pipefail", "-c", "true"])).unwrap();
        assert!(invocation.options.contains(&(ErrExit, On)));
        assert_eq!(invocation.options.len(), 2);
    }

    #[test]
    fn missing_command_string() {
        assert_eq!(
            parse(strings(&["zish", "-c"])),
            Err(InvocationError::MissingCommandString)
        );
    }

    #[test]
    fn unknown_flag() {
        assert_matches::assert_matches!(
            parse(strings(&["zish", "-Z"])),
            Err(InvocationError::UnknownOption(_))
        );
    }
}
