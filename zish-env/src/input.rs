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

//! Source input
//!
//! The read-eval loop obtains source code through the [`Input`]
//! abstraction, one chunk at a time. A chunk is typically a line;
//! [`Memory`] yields a whole prepared string at once. The [`Prompt`]
//! argument tells an interactive implementation which prompt to issue,
//! and the environment is passed so the implementation can resolve
//! `PS1`/`PS2` and reach the system interface.

use crate::io::Fd;
use crate::system::{Errno, RealSystem};
use crate::Env;

/// Which prompt to issue before reading
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Prompt {
    /// First line of a command (`PS1`)
    Main,
    /// Continuation line of an incomplete command (`PS2`)
    Continuation,
}

/// Line-wise source of shell input
pub trait Input {
    /// Returns the next chunk of input, or `None` at the end of input.
    ///
    /// The chunk should include the trailing newline if there is one.
    fn next_line(&mut self, env: &mut Env, prompt: Prompt) -> Result<Option<String>, Errno>;
}

/// Input from a string prepared in memory
///
/// Yields the whole string as a single chunk. Used for `-c` operands and
/// script files read up front.
#[derive(Clone, Debug)]
pub struct Memory {
    content: Option<String>,
}

impl Memory {
    pub fn new<S: Into<String>>(content: S) -> Memory {
        Memory {
            content: Some(content.into()),
        }
    }
}

impl Input for Memory {
    fn next_line(&mut self, _env: &mut Env, _prompt: Prompt) -> Result<Option<String>, Errno> {
        Ok(self.content.take())
    }
}

/// Input read from a file descriptor, one line at a time
///
/// Reading byte-by-byte is deliberate: the descriptor may be shared with
/// commands the shell runs (as when a script comes from standard input),
/// so the shell must not consume bytes beyond the next newline.
#[derive(Clone, Debug)]
pub struct FdReader {
    fd: Fd,
    system: RealSystem,
    at_eof: bool,
}

impl FdReader {
    pub fn new(fd: Fd, system: RealSystem) -> FdReader {
        FdReader {
            fd,
            system,
            at_eof: false,
        }
    }

    /// Reads one line, without issuing any prompt.
    pub fn read_line(&mut self) -> Result<Option<String>, Errno> {
        if self.at_eof {
            return Ok(None);
        }
        let mut line = Vec::new();
        let mut byte = [0_u8; 1];
        loop {
            match self.system.read(self.fd, &mut byte) {
                Ok(0) => {
                    self.at_eof = true;
                    break;
                }
                Ok(_) => {
                    line.push(byte[0]);
                    if byte[0] == b'\n' {
                        break;
                    }
                }
                Err(error) => return Err(error),
            }
        }
        if line.is_empty() {
            Ok(None)
        } else {
            Ok(Some(String::from_utf8_lossy(&line).into_owned()))
        }
    }
}

impl Input for FdReader {
    fn next_line(&mut self, _env: &mut Env, _prompt: Prompt) -> Result<Option<String>, Errno> {
        loop {
            match self.read_line() {
                Err(Errno::EINTR) => continue,
                other => return other,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_yields_once() {
        let mut env = Env::new(RealSystem);
        let mut input = Memory::new("echo hello\n");
        assert_eq!(
            input.next_line(&mut env, Prompt::Main).unwrap().as_deref(),
            Some("echo hello\n")
        );
        assert_eq!(input.next_line(&mut env, Prompt::Main).unwrap(), None);
    }
}
