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

//! Implementations of the built-in utilities
//!
//! Each utility lives in its own module and exposes a `main` function.
//! [`builtins`] returns the whole set for registration in the
//! environment. Special built-ins are those whose hard errors terminate
//! a non-interactive shell; they are also found before functions in
//! command search.

pub mod bg;
pub mod r#break;
pub mod cd;
pub mod colon;
pub mod command;
pub mod common;
pub mod r#continue;
pub mod echo;
pub mod eval;
pub mod exec;
pub mod exit;
pub mod export;
pub mod r#false;
pub mod fg;
pub mod hash;
pub mod jobs;
pub mod kill;
pub mod printf;
pub mod pwd;
pub mod read;
pub mod readonly;
pub mod r#return;
pub mod set;
pub mod shift;
pub mod source;
pub mod test;
pub mod times;
pub mod trap;
pub mod r#true;
pub mod r#type;
pub mod umask;
pub mod unset;
pub mod wait;

use zish_env::builtin::{Builtin, Main, Type};

const fn special(execute: Main) -> Builtin {
    Builtin {
        r#type: Type::Special,
        execute,
    }
}

const fn mandatory(execute: Main) -> Builtin {
    Builtin {
        r#type: Type::Mandatory,
        execute,
    }
}

/// All built-ins, with their names, sorted by name.
pub const BUILTINS: &[(&str, Builtin)] = &[
    (".", special(source::main)),
    (":", special(colon::main)),
    ("[", mandatory(test::bracket_main)),
    ("bg", mandatory(bg::main)),
    ("break", special(r#break::main)),
    ("cd", mandatory(cd::main)),
    ("command", mandatory(command::main)),
    ("continue", special(r#continue::main)),
    ("echo", mandatory(echo::main)),
    ("eval", special(eval::main)),
    ("exec", special(exec::main)),
    ("exit", special(exit::main)),
    ("export", special(export::main)),
    ("false", mandatory(r#false::main)),
    ("fg", mandatory(fg::main)),
    ("hash", mandatory(hash::main)),
    ("jobs", mandatory(jobs::main)),
    ("kill", mandatory(kill::main)),
    ("printf", mandatory(printf::main)),
    ("pwd", mandatory(pwd::main)),
    ("read", mandatory(read::main)),
    ("readonly", special(readonly::main)),
    ("return", special(r#return::main)),
    ("set", special(set::main)),
    ("shift", special(shift::main)),
    ("source", special(source::main)),
    ("test", mandatory(test::main)),
    ("times", special(times::main)),
    ("trap", special(trap::main)),
    ("true", mandatory(r#true::main)),
    ("type", mandatory(r#type::main)),
    ("umask", mandatory(umask::main)),
    ("unset", special(unset::main)),
    ("wait", mandatory(wait::main)),
];
