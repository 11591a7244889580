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

//! Shell variables and positional parameters
//!
//! The [`VariableSet`] maps names to [`Variable`]s carrying the scalar
//! value and the exported and readonly attributes. Positional parameters
//! are kept as a stack of frames: calling a function pushes a new frame,
//! returning pops it.

use std::collections::HashMap;
use std::ffi::CString;
use thiserror::Error;
use zish_syntax::source::Location;

/// Variable with its attributes
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Variable {
    /// Value, or `None` for a variable that has attributes but no value
    pub value: Option<String>,

    /// Whether the variable is passed to the environment of child
    /// processes
    pub is_exported: bool,

    /// Location of the command that made the variable readonly, if any
    pub read_only_location: Option<Location>,
}

impl Variable {
    /// Creates a variable with the given value and no attributes.
    pub fn new<S: Into<String>>(value: S) -> Variable {
        Variable {
            value: Some(value.into()),
            ..Variable::default()
        }
    }

    /// Returns true if the variable is readonly.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.read_only_location.is_some()
    }
}

/// Error assigning to or unsetting a readonly variable
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("readonly variable `{name}`")]
pub struct ReadOnlyError {
    /// Name of the variable
    pub name: String,
    /// Location of the command that made the variable readonly
    pub read_only_location: Location,
}

/// Collection of variables and positional parameters
#[derive(Clone, Debug)]
pub struct VariableSet {
    variables: HashMap<String, Variable>,
    /// Stack of positional-parameter frames; never empty
    positional_frames: Vec<Vec<String>>,
}

impl Default for VariableSet {
    fn default() -> Self {
        VariableSet {
            variables: HashMap::new(),
            positional_frames: vec![Vec::new()],
        }
    }
}

impl VariableSet {
    pub fn new() -> VariableSet {
        Self::default()
    }

    /// Returns the variable with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    /// Returns the value of the variable, if set.
    #[must_use]
    pub fn get_scalar(&self, name: &str) -> Option<&str> {
        self.variables.get(name)?.value.as_deref()
    }

    /// Assigns a value to a variable, keeping existing attributes.
    ///
    /// Fails if the variable is readonly.
    pub fn assign(&mut self, name: &str, value: String) -> Result<(), ReadOnlyError> {
        match self.variables.get_mut(name) {
            Some(variable) => {
                if let Some(location) = variable.read_only_location {
                    return Err(ReadOnlyError {
                        name: name.to_string(),
                        read_only_location: location,
                    });
                }
                variable.value = Some(value);
            }
            None => {
                self.variables.insert(name.to_string(), Variable::new(value));
            }
        }
        Ok(())
    }

    /// Marks a variable as exported, creating it valueless if absent.
    pub fn export(&mut self, name: &str, on: bool) {
        self.variables.entry(name.to_string()).or_default().is_exported = on;
    }

    /// Marks a variable as readonly, creating it valueless if absent.
    pub fn make_read_only(&mut self, name: &str, location: Location) {
        let variable = self.variables.entry(name.to_string()).or_default();
        if variable.read_only_location.is_none() {
            variable.read_only_location = Some(location);
        }
    }

    /// Removes a variable.
    ///
    /// Fails if the variable is readonly.
    pub fn unset(&mut self, name: &str) -> Result<Option<Variable>, ReadOnlyError> {
        if let Some(variable) = self.variables.get(name) {
            if let Some(location) = variable.read_only_location {
                return Err(ReadOnlyError {
                    name: name.to_string(),
                    read_only_location: location,
                });
            }
        }
        Ok(self.variables.remove(name))
    }

    /// Iterates over all name-variable pairs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Variable)> {
        self.variables.iter().map(|(name, variable)| (name.as_str(), variable))
    }

    /// Returns the `name=value` strings of exported variables, for use as
    /// the `envp` argument of `execve`.
    #[must_use]
    pub fn env_c_strings(&self) -> Vec<CString> {
        self.variables
            .iter()
            .filter_map(|(name, variable)| {
                let value = variable.value.as_deref()?;
                if !variable.is_exported {
                    return None;
                }
                let mut entry = name.clone();
                entry.push('=');
                entry.push_str(value);
                // A name or value with an interior nul cannot be passed on.
                CString::new(entry).ok()
            })
            .collect()
    }

    /// Imports variables from the process environment, marking them
    /// exported.
    pub fn extend_env<I, K, V>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in vars {
            let variable = Variable {
                value: Some(value.into()),
                is_exported: true,
                read_only_location: None,
            };
            self.variables.insert(name.into(), variable);
        }
    }

    /// Returns the current positional parameters.
    #[must_use]
    pub fn positional_params(&self) -> &[String] {
        self.positional_frames.last().expect("frame stack is never empty")
    }

    /// Replaces the current positional parameters.
    pub fn set_positional_params(&mut self, params: Vec<String>) {
        *self.positional_frames.last_mut().expect("frame stack is never empty") = params;
    }

    /// Pushes a new positional-parameter frame for a function call.
    pub fn push_positional_frame(&mut self, params: Vec<String>) {
        self.positional_frames.push(params);
    }

    /// Pops the positional-parameter frame pushed for a function call.
    pub fn pop_positional_frame(&mut self) {
        assert!(
            self.positional_frames.len() > 1,
            "cannot pop the initial positional-parameter frame"
        );
        self.positional_frames.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_and_get() {
        let mut set = VariableSet::new();
        set.assign("x", "5".to_string()).unwrap();
        assert_eq!(set.get_scalar("x"), Some("5"));
        assert_eq!(set.get_scalar("y"), None);
    }

    #[test]
    fn assignment_keeps_export_attribute() {
        let mut set = VariableSet::new();
        set.export("x", true);
        set.assign("x", "1".to_string()).unwrap();
        assert!(set.get("x").unwrap().is_exported);
    }

    #[test]
    fn readonly_rejects_assignment() {
        let mut set = VariableSet::new();
        set.assign("x", "1".to_string()).unwrap();
        set.make_read_only("x", Location::dummy());
        let error = set.assign("x", "2".to_string()).unwrap_err();
        assert_eq!(error.name, "x");
        assert_eq!(set.get_scalar("x"), Some("1"));
    }

    #[test]
    fn readonly_rejects_unset() {
        let mut set = VariableSet::new();
        set.assign("x", "1".to_string()).unwrap();
        set.make_read_only("x", Location::dummy());
        assert!(set.unset("x").is_err());
    }

    #[test]
    fn unset_missing_variable_is_ok() {
        let mut set = VariableSet::new();
        assert_eq!(set.unset("nope").unwrap(), None);
    }

    #[test]
    fn env_c_strings_contains_exported_only() {
        let mut set = VariableSet::new();
        set.assign("a", "1".to_string()).unwrap();
        set.export("a", true);
        set.assign("b", "2".to_string()).unwrap();
        let env = set.env_c_strings();
        assert_eq!(env, [CString::new("a=1").unwrap()]);
    }

    #[test]
    fn positional_frames() {
        let mut set = VariableSet::new();
        set.set_positional_params(vec!["a".to_string(), "b".to_string()]);
        set.push_positional_frame(vec!["c".to_string()]);
        assert_eq!(set.positional_params(), ["c".to_string()]);
        set.pop_positional_frame();
        assert_eq!(set.positional_params(), ["a".to_string(), "b".to_string()]);
    }
}
