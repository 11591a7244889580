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

//! This crate implements the execution semantics of the shell: word
//! expansion, redirection, command search, the recursive interpreter
//! over the syntax tree, trap delivery, and the read-eval loop that ties
//! them together.
//!
//! The entry points are [`read_eval_loop`] for driving a whole input
//! source and [`Command::execute`] for running a parsed command in an
//! environment.

pub mod assign;
pub mod command;
pub mod command_search;
pub mod expansion;
pub mod handle;
pub mod job;
pub mod redir;
pub mod runner;
pub mod subshell;
pub mod trap;
pub mod xtrace;

pub use command::Command;
pub use handle::Handle;
pub use runner::{read_eval_loop, run_source};

#[doc(no_inline)]
pub use zish_env::semantics::{Divert, ExitStatus};
