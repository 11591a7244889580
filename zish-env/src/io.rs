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

//! File descriptor utilities

#[doc(no_inline)]
pub use zish_syntax::syntax::Fd;

/// Minimum file descriptor the shell uses for internal purposes
///
/// POSIX requires file descriptors 0 through 9 to remain available to the
/// user. When the shell saves a descriptor across a redirection or opens a
/// file for its own use, it moves the descriptor to this value or above
/// and sets the close-on-exec flag.
pub const MIN_INTERNAL_FD: Fd = Fd(100);
