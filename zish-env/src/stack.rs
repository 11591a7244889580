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

//! Runtime execution context stack
//!
//! The executor pushes a [`Frame`] when it enters a loop, function call,
//! subshell, or condition context, and pops it on the way out. The stack
//! answers questions like "is `break` valid here and how many loops are
//! there to break out of" and "is `errexit` suppressed because we are in
//! an `if` condition".

/// Execution context
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Frame {
    /// A `for`, `while`, or `until` loop body
    Loop,
    /// A function call
    Function,
    /// A subshell
    Subshell,
    /// The condition part of `if`, `while`, `until`, or the left side of
    /// `&&`/`||`
    Condition,
    /// A trap action
    Trap,
    /// A script run by the dot built-in
    DotScript,
}

/// Stack of execution contexts
#[derive(Clone, Debug, Default)]
pub struct Stack {
    frames: Vec<Frame>,
}

impl Stack {
    pub fn new() -> Stack {
        Self::default()
    }

    /// Pushes a frame.
    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    /// Pops the top frame, which must equal `frame`.
    pub fn pop(&mut self, frame: Frame) {
        let top = self.frames.pop();
        debug_assert_eq!(top, Some(frame), "unbalanced context stack");
    }

    /// Counts the loop frames entered since the last function call or
    /// subshell boundary.
    ///
    /// This is the number of loops `break` and `continue` can affect.
    #[must_use]
    pub fn loop_count(&self) -> usize {
        self.frames
            .iter()
            .rev()
            .take_while(|frame| !matches!(frame, Frame::Function | Frame::Subshell))
            .filter(|frame| matches!(frame, Frame::Loop))
            .count()
    }

    /// Returns true if the stack contains a function-call frame.
    #[must_use]
    pub fn is_in_function(&self) -> bool {
        self.frames.contains(&Frame::Function)
    }

    /// Returns true if the nearest enclosing special frame is a condition
    /// context, in which `errexit` and the ERR trap are suppressed.
    #[must_use]
    pub fn is_in_condition(&self) -> bool {
        self.frames.contains(&Frame::Condition)
    }

    /// Returns true if a trap action is currently executing.
    #[must_use]
    pub fn is_in_trap(&self) -> bool {
        self.frames.contains(&Frame::Trap)
    }

    /// Returns true if the stack contains a dot-script frame.
    #[must_use]
    pub fn is_in_dot_script(&self) -> bool {
        self.frames.contains(&Frame::DotScript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loop_count_stops_at_function_boundary() {
        let mut stack = Stack::new();
        stack.push(Frame::Loop);
        stack.push(Frame::Function);
        stack.push(Frame::Loop);
        stack.push(Frame::Loop);
        assert_eq!(stack.loop_count(), 2);
        stack.pop(Frame::Loop);
        assert_eq!(stack.loop_count(), 1);
    }

    #[test]
    fn condition_detection() {
        let mut stack = Stack::new();
        assert!(!stack.is_in_condition());
        stack.push(Frame::Condition);
        assert!(stack.is_in_condition());
        stack.pop(Frame::Condition);
        assert!(!stack.is_in_condition());
    }
}
