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

//! This crate defines the shell language syntax: the abstract syntax tree
//! produced by the [parser](parser) and consumed by the executor, and the
//! parser itself.
//!
//! The AST types live in the [`syntax`] module. They implement `Display` so
//! that any node can be turned back into source form, which the shell uses
//! for job names and function listings. [`source`] defines source-code
//! locations attached to words and commands.
//!
//! The [`parser`] module parses one complete command at a time. Its error
//! type distinguishes plain syntax errors from *incomplete input*, i.e. an
//! end of input inside an open construct, which an interactive shell
//! answers with a continuation prompt rather than a diagnostic.

pub mod parser;
pub mod source;
pub mod syntax;
