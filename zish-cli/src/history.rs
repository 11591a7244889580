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

//! Command-line history
//!
//! History is a newline-separated list of input lines in chronological
//! order, loaded from `$HISTFILE` (default `~/.zish_history`) when an
//! interactive session starts and written back when it ends, capped to
//! the most recent [`CAPACITY`] entries.

use std::path::PathBuf;

/// Maximum number of entries kept in the history file
pub const CAPACITY: usize = 1024;

/// In-memory command history
#[derive(Clone, Debug, Default)]
pub struct History {
    path: Option<PathBuf>,
    entries: Vec<String>,
}

impl History {
    /// Loads the history from the given file.
    ///
    /// A missing or unreadable file yields an empty history; it will be
    /// created on save.
    #[must_use]
    pub fn load(path: PathBuf) -> History {
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) => content.lines().map(str::to_string).collect(),
            Err(_) => Vec::new(),
        };
        History {
            path: Some(path),
            entries,
        }
    }

    /// Creates a history that is not persisted.
    #[must_use]
    pub fn transient() -> History {
        History::default()
    }

    /// Appends an entry.
    pub fn push(&mut self, line: &str) {
        self.entries.push(line.to_string());
    }

    /// Writes the history back to its file, keeping the most recent
    /// entries only.
    pub fn save(&self) {
        let Some(path) = &self.path else { return };
        let start = self.entries.len().saturating_sub(CAPACITY);
        let mut content = self.entries[start..].join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        _ = std::fs::write(path, content);
    }
}
