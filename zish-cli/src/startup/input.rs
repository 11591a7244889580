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

//! Input preparation
//!
//! Builds the [`Input`] implementation matching the invocation:
//! a prepared string for `-c`, the whole file for a script operand, a
//! plain line reader for non-interactive standard input, and the
//! prompting [`InteractiveInput`] for an interactive session.
//!
//! The interactive input is the line-editor seam: it prints `PS1`/`PS2`,
//! reads a line, records history, and turns `SIGINT` during a read into
//! a discarded line and a fresh prompt. Anything fancier (cursor
//! movement, completion) would replace this type without touching the
//! read-eval loop.

use crate::history::History;
use zish_env::input::{FdReader, Input, Prompt};
use zish_env::io::Fd;
use zish_env::signal::Name;
use zish_env::system::Errno;
use zish_env::Env;

/// Prompting, history-recording input for interactive sessions
#[derive(Debug)]
pub struct InteractiveInput {
    reader: FdReader,
    /// Command-line history, appended on every main-prompt line
    pub history: History,
}

impl InteractiveInput {
    pub fn new(reader: FdReader, history: History) -> Self {
        InteractiveInput { reader, history }
    }
}

/// The history file is written when the session's input is torn down,
/// however the session ends.
impl Drop for InteractiveInput {
    fn drop(&mut self) {
        self.history.save();
    }
}

fn prompt_string(env: &Env, prompt: Prompt) -> String {
    match prompt {
        Prompt::Main => env
            .variables
            .get_scalar("PS1")
            .unwrap_or("$ ")
            .to_string(),
        Prompt::Continuation => env
            .variables
            .get_scalar("PS2")
            .unwrap_or("> ")
            .to_string(),
    }
}

impl Input for InteractiveInput {
    fn next_line(&mut self, env: &mut Env, prompt: Prompt) -> Result<Option<String>, Errno> {
        loop {
            let text = prompt_string(env, prompt);
            env.system.print_error(&text);
            match self.reader.read_line() {
                Ok(Some(line)) => {
                    if prompt == Prompt::Main && !line.trim().is_empty() {
                        self.history.push(line.trim_end_matches('\n'));
                    }
                    return Ok(Some(line));
                }
                Ok(None) => return Ok(None),
                Err(Errno::EINTR) => {
                    // ^C discards the current input and prompts anew.
                    if env.system.take_signal_if_caught(Name::Int) {
                        env.system.print_error("\n");
                    }
                    continue;
                }
                Err(errno) => return Err(errno),
            }
        }
    }
}

/// Builds the input for the given source.
pub fn prepare_input(
    env: &mut Env,
    source: &crate::startup::Source,
    interactive: bool,
    history: History,
) -> Result<Box<dyn Input>, String> {
    use crate::startup::Source::*;
    match source {
        CommandString(command) => Ok(Box::new(zish_env::input::Memory::new(command.clone()))),
        File(path) => match std::fs::read_to_string(path) {
            Ok(content) => Ok(Box::new(zish_env::input::Memory::new(content))),
            Err(error) => Err(format!("cannot read `{path}`: {error}")),
        },
        Stdin => {
            let reader = FdReader::new(Fd::STDIN, env.system);
            if interactive {
                Ok(Box::new(InteractiveInput::new(reader, history)))
            } else {
                Ok(Box::new(reader))
            }
        }
    }
}
