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

//! Command substitution
//!
//! The command string runs in a forked subshell whose standard output
//! feeds a pipe. The parent reads the whole output, strips trailing
//! newlines, and substitutes it as a single soft-expansion field subject
//! to later field splitting. The exit status of the substitution is
//! remembered in the [`ExpansionEnv`].

use super::super::{Error, ErrorCause, ExpansionEnv, Phrase};
use super::soft_chars;
use crate::subshell;
use zish_env::io::Fd;
use zish_env::semantics::ExitStatus;
use zish_syntax::source::Location;

/// Expands a command substitution to a phrase.
pub fn expand(
    env: &mut ExpansionEnv,
    command: &str,
    quoted: bool,
    location: Location,
) -> Result<Phrase, Error> {
    let system_error = |errno| Error {
        cause: ErrorCause::CommandSubstError(errno),
        location,
    };

    let (read, write) = env.inner.system.pipe().map_err(system_error)?;

    let command = command.to_string();
    let child = subshell::start_subshell(env.inner, move |env| {
        _ = env.system.close(read);
        if write != Fd::STDOUT {
            _ = env.system.dup2(write, Fd::STDOUT);
            _ = env.system.close(write);
        }
        crate::runner::run_source(env, &command)
    })
    .map_err(system_error)?;

    _ = env.inner.system.close(write);

    let mut output = Vec::new();
    let mut buffer = [0_u8; 4096];
    loop {
        match env.inner.system.read(read, &mut buffer) {
            Ok(0) => break,
            Ok(count) => output.extend_from_slice(&buffer[..count]),
            Err(zish_env::system::Errno::EINTR) => continue,
            Err(errno) => {
                _ = env.inner.system.close(read);
                return Err(system_error(errno));
            }
        }
    }
    _ = env.inner.system.close(read);

    let exit_status = subshell::wait_for_subshell(env.inner, child)
        .unwrap_or(ExitStatus::FAILURE);
    env.last_command_subst_exit_status = Some(exit_status);

    let mut output = String::from_utf8_lossy(&output).into_owned();
    while output.ends_with('\n') {
        output.pop();
    }
    Ok(vec![soft_chars(&output, quoted)])
}
