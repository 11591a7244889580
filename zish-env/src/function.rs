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

//! Type definitions for shell functions

use std::collections::HashMap;
use std::rc::Rc;
use zish_syntax::source::Location;
use zish_syntax::syntax::FullCompoundCommand;

/// Definition of a function
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Function {
    /// Name of the function
    pub name: String,

    /// Command performed when the function is executed
    ///
    /// The body is shared with the AST node the function was defined by.
    /// Function bodies must outlive the command that defined them, which
    /// is why the AST wraps them in `Rc` in the first place.
    pub body: Rc<FullCompoundCommand>,

    /// Location of the function definition command
    pub origin: Location,
}

/// Collection of functions, keyed by name
#[derive(Clone, Debug, Default)]
pub struct FunctionSet {
    functions: HashMap<String, Rc<Function>>,
}

impl FunctionSet {
    pub fn new() -> FunctionSet {
        Self::default()
    }

    /// Returns the function with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Rc<Function>> {
        self.functions.get(name)
    }

    /// Defines a function, replacing any previous definition of the same
    /// name.
    pub fn define(&mut self, function: Function) {
        self.functions
            .insert(function.name.clone(), Rc::new(function));
    }

    /// Removes the function with the given name.
    pub fn undefine(&mut self, name: &str) -> Option<Rc<Function>> {
        self.functions.remove(name)
    }

    /// Iterates over the functions, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Rc<Function>> {
        self.functions.values()
    }
}
