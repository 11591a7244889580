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

//! Redirection semantics
//!
//! To perform redirections in a context that must be undone afterwards
//! (built-ins, functions, compound commands), wrap the environment in a
//! [`RedirGuard`] and call [`perform_redirs`](RedirGuard::perform_redirs).
//! The guard saves each affected file descriptor by duplicating it to a
//! close-on-exec descriptor at or above [`MIN_INTERNAL_FD`], and restores
//! the saved descriptors in reverse order when dropped or when
//! [`undo_redirs`](RedirGuard::undo_redirs) is called. In a child process
//! about to `exec`, no restoration is needed and the guard is simply not
//! used.
//!
//! Here-document contents are delivered through a pipe. Small bodies are
//! written directly, with the write end closed before the command runs;
//! bodies that may exceed the pipe buffer are fed by a forked writer so
//! the shell cannot deadlock against its own pipe.

use crate::expansion::{expand_text, expand_word};
use std::ffi::CString;
use std::ops::{Deref, DerefMut};
use thiserror::Error as ThisError;
use zish_env::io::{Fd, MIN_INTERNAL_FD};
use zish_env::option::{Clobber, Off};
use zish_env::system::Errno;
use zish_env::Env;
use zish_syntax::source::Location;
use zish_syntax::syntax::{HereDoc, Redir, RedirBody, RedirOp};

/// Limit on saved file descriptors per redirection context
const SAVED_FD_LIMIT: usize = 64;

/// Largest here-document body written without a helper process
///
/// PIPE_BUF is the portable lower bound on pipe capacity, so writes up
/// to this size cannot block.
const DIRECT_HERE_DOC_SIZE: usize = libc::PIPE_BUF;

/// Cause of a redirection error
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ErrorCause {
    /// Error expanding the operand word
    #[error(transparent)]
    Expansion(crate::expansion::ErrorCause),

    /// Error opening the file
    #[error("cannot open `{path}`: {errno}")]
    OpenFile {
        /// Pathname that could not be opened
        path: String,
        /// Error from the system
        errno: Errno,
    },

    /// `noclobber` prevented overwriting an existing file
    #[error("cannot overwrite existing file `{path}`")]
    NoClobber {
        /// Pathname of the existing file
        path: String,
    },

    /// Operand of `<&` or `>&` that is not a number or `-`
    #[error("`{0}` is not a valid file descriptor")]
    MalformedFd(String),

    /// Error duplicating a file descriptor
    #[error("cannot duplicate file descriptor: {0}")]
    FdCopy(Errno),

    /// Too many nested redirections
    #[error("too many redirections")]
    TooManyRedirections,

    /// System error preparing a here-document
    #[error("cannot prepare here-document: {0}")]
    HereDoc(Errno),
}

/// Redirection error with its location
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{cause}")]
pub struct Error {
    /// Cause of the error
    pub cause: ErrorCause,
    /// Location of the redirection
    pub location: Location,
}

impl From<crate::expansion::Error> for Error {
    fn from(error: crate::expansion::Error) -> Self {
        Error {
            cause: ErrorCause::Expansion(error.cause),
            location: error.location,
        }
    }
}

/// Record of one saved file descriptor
#[derive(Clone, Copy, Debug)]
struct SavedFd {
    /// Descriptor affected by the redirection
    original: Fd,
    /// Saved copy of the original, or `None` if it was closed
    save: Option<Fd>,
}

/// What to install on the target descriptor
enum FdSpec {
    /// Newly opened descriptor to move onto the target
    Open(Fd),
    /// Existing descriptor to copy onto the target
    Copy(Fd),
    /// Close the target
    Close,
}

/// Environment wrapper that undoes redirections on drop
#[derive(Debug)]
pub struct RedirGuard<'e> {
    env: &'e mut Env,
    saved: Vec<SavedFd>,
}

impl Deref for RedirGuard<'_> {
    type Target = Env;
    fn deref(&self) -> &Env {
        self.env
    }
}

impl DerefMut for RedirGuard<'_> {
    fn deref_mut(&mut self) -> &mut Env {
        self.env
    }
}

impl Drop for RedirGuard<'_> {
    fn drop(&mut self) {
        self.undo_redirs();
    }
}

impl<'e> RedirGuard<'e> {
    /// Wraps an environment.
    pub fn new(env: &'e mut Env) -> Self {
        RedirGuard {
            env,
            saved: Vec::new(),
        }
    }

    /// Performs redirections, in order.
    pub fn perform_redirs<'a, I>(&mut self, redirs: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = &'a Redir>,
    {
        for redir in redirs {
            self.perform_redir(redir)?;
        }
        Ok(())
    }

    /// Performs one redirection.
    pub fn perform_redir(&mut self, redir: &Redir) -> Result<(), Error> {
        let target = Fd(redir.fd_or_default().0);
        let location = redir.body.operand().location;

        let spec = match &redir.body {
            RedirBody::Normal { operator, operand } => {
                let (field, _) = expand_word(self.env, operand)?;
                self.resolve_normal(*operator, field.value, location)?
            }
            RedirBody::HereDoc(here_doc) => self.here_doc_fd(here_doc, location)?,
        };

        self.save_fd(target, location)?;

        let result = match spec {
            FdSpec::Open(fd) => {
                if fd == target {
                    Ok(())
                } else {
                    let result = self.env.system.dup2(fd, target).map(drop);
                    _ = self.env.system.close(fd);
                    result
                }
            }
            FdSpec::Copy(fd) => self.env.system.dup2(fd, target).map(drop),
            FdSpec::Close => self.env.system.close(target),
        };
        result.map_err(|errno| Error {
            cause: ErrorCause::FdCopy(errno),
            location,
        })
    }

    fn resolve_normal(
        &mut self,
        operator: RedirOp,
        operand: String,
        location: Location,
    ) -> Result<FdSpec, Error> {
        use RedirOp::*;
        match operator {
            FileIn => self.open_file(operand, libc::O_RDONLY, location),
            FileInOut => self.open_file(operand, libc::O_RDWR | libc::O_CREAT, location),
            FileAppend => self.open_file(
                operand,
                libc::O_WRONLY | libc::O_CREAT | libc::O_APPEND,
                location,
            ),
            FileClobber => self.open_file(
                operand,
                libc::O_WRONLY | libc::O_CREAT | libc::O_TRUNC,
                location,
            ),
            FileOut => {
                if self.env.options.get(Clobber) == Off {
                    self.open_file_no_clobber(operand, location)
                } else {
                    self.open_file(
                        operand,
                        libc::O_WRONLY | libc::O_CREAT | libc::O_TRUNC,
                        location,
                    )
                }
            }
            FdIn | FdOut => {
                if operand == "-" {
                    Ok(FdSpec::Close)
                } else {
                    match operand.parse() {
                        Ok(fd) => Ok(FdSpec::Copy(Fd(fd))),
                        Err(_) => Err(Error {
                            cause: ErrorCause::MalformedFd(operand),
                            location,
                        }),
                    }
                }
            }
            String => {
                let mut content = operand;
                content.push('\n');
                self.content_fd(content.as_bytes(), location)
            }
        }
    }

    fn open_file(
        &mut self,
        path: String,
        flags: i32,
        location: Location,
    ) -> Result<FdSpec, Error> {
        let Ok(c_path) = CString::new(path.as_str()) else {
            return Err(Error {
                cause: ErrorCause::OpenFile {
                    path,
                    errno: Errno::EINVAL,
                },
                location,
            });
        };
        match self.env.system.open(&c_path, flags, 0o666) {
            Ok(fd) => Ok(FdSpec::Open(fd)),
            Err(errno) => Err(Error {
                cause: ErrorCause::OpenFile { path, errno },
                location,
            }),
        }
    }

    /// Opens a file for writing under `noclobber` rules.
    ///
    /// An existing regular file is an error; other existing files (like
    /// terminals and FIFOs) are opened without truncation.
    fn open_file_no_clobber(
        &mut self,
        path: String,
        location: Location,
    ) -> Result<FdSpec, Error> {
        let Ok(c_path) = CString::new(path.as_str()) else {
            return Err(Error {
                cause: ErrorCause::OpenFile {
                    path,
                    errno: Errno::EINVAL,
                },
                location,
            });
        };
        match self.env.system.open(
            &c_path,
            libc::O_WRONLY | libc::O_CREAT | libc::O_EXCL,
            0o666,
        ) {
            Ok(fd) => Ok(FdSpec::Open(fd)),
            Err(Errno::EEXIST) => match self.env.system.stat(&c_path) {
                Ok(stat) if stat.st_mode & libc::S_IFMT != libc::S_IFREG => {
                    self.open_file(path, libc::O_WRONLY, location)
                }
                _ => Err(Error {
                    cause: ErrorCause::NoClobber { path },
                    location,
                }),
            },
            Err(errno) => Err(Error {
                cause: ErrorCause::OpenFile { path, errno },
                location,
            }),
        }
    }

    /// Opens a readable descriptor yielding the here-document content.
    fn here_doc_fd(&mut self, here_doc: &HereDoc, location: Location) -> Result<FdSpec, Error> {
        let content = here_doc
            .content
            .get()
            .expect("here-document content must be filled by the parser");
        let (text, _) = expand_text(self.env, content)?;
        self.content_fd(text.as_bytes(), location)
    }

    /// Presents a byte string as the readable end of a pipe.
    fn content_fd(&mut self, content: &[u8], location: Location) -> Result<FdSpec, Error> {
        let system_error = |errno| Error {
            cause: ErrorCause::HereDoc(errno),
            location,
        };
        let (read, write) = self.env.system.pipe().map_err(system_error)?;

        if content.len() <= DIRECT_HERE_DOC_SIZE {
            let result = self.env.system.write_all(write, content);
            _ = self.env.system.close(write);
            result.map_err(system_error)?;
        } else {
            // The body may not fit in the pipe buffer; stream it from a
            // helper process so the shell does not deadlock.
            let content = content.to_vec();
            let child = crate::subshell::start_subshell(self.env, move |env| {
                _ = env.system.close(read);
                _ = env
                    .system
                    .set_signal_handling(
                        zish_env::signal::Name::Pipe.number(),
                        zish_env::system::SignalHandling::Default,
                    );
                _ = env.system.write_all(write, &content);
                std::ops::ControlFlow::Continue(())
            });
            _ = self.env.system.close(write);
            if let Err(errno) = child {
                _ = self.env.system.close(read);
                return Err(system_error(errno));
            }
        }
        Ok(FdSpec::Open(read))
    }

    /// Saves the descriptor about to be modified.
    fn save_fd(&mut self, target: Fd, location: Location) -> Result<(), Error> {
        if self.saved.len() >= SAVED_FD_LIMIT {
            return Err(Error {
                cause: ErrorCause::TooManyRedirections,
                location,
            });
        }
        let save = match self.env.system.dup(target, MIN_INTERNAL_FD, true) {
            Ok(save) => Some(save),
            Err(Errno::EBADF) => None,
            Err(errno) => {
                return Err(Error {
                    cause: ErrorCause::FdCopy(errno),
                    location,
                });
            }
        };
        self.saved.push(SavedFd {
            original: target,
            save,
        });
        Ok(())
    }

    /// Undoes the performed redirections, most recent first.
    pub fn undo_redirs(&mut self) {
        while let Some(SavedFd { original, save }) = self.saved.pop() {
            match save {
                Some(save) => {
                    _ = self.env.system.dup2(save, original);
                    _ = self.env.system.close(save);
                }
                None => {
                    _ = self.env.system.close(original);
                }
            }
        }
    }

    /// Makes the performed redirections permanent.
    ///
    /// The saved descriptors are closed instead of being restored. Used
    /// by the `exec` built-in.
    pub fn preserve_redirs(&mut self) {
        while let Some(SavedFd { save, .. }) = self.saved.pop() {
            if let Some(save) = save {
                _ = self.env.system.close(save);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::os::unix::io::AsRawFd;
    use zish_env::system::RealSystem;
    use zish_syntax::syntax::{TextUnit, Word, WordUnit};

    fn literal_word(s: &str) -> Word {
        Word {
            units: s
                .chars()
                .map(|c| WordUnit::Unquoted(TextUnit::Literal(c)))
                .collect(),
            location: Location::dummy(),
        }
    }

    fn file_redir(fd: Option<i32>, operator: RedirOp, path: &str) -> Redir {
        Redir {
            fd: fd.map(Fd),
            body: RedirBody::Normal {
                operator,
                operand: literal_word(path),
            },
        }
    }

    #[test]
    fn redirect_and_restore_high_fd() {
        // Use a high target descriptor so the test does not disturb the
        // test harness's standard descriptors.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out");
        let mut env = Env::new(RealSystem);
        let target = 7;

        {
            let mut guard = RedirGuard::new(&mut env);
            guard
                .perform_redir(&file_redir(
                    Some(target),
                    RedirOp::FileOut,
                    path.to_str().unwrap(),
                ))
                .unwrap();
            let mut system = RealSystem;
            system.write_all(Fd(target), b"written\n").unwrap();
        }

        // After the guard is dropped, fd 7 must be closed again.
        let mut system = RealSystem;
        assert_eq!(system.write_all(Fd(target), b"x"), Err(Errno::EBADF));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "written\n");
    }

    #[test]
    fn noclobber_blocks_existing_regular_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exists");
        std::fs::write(&path, "content").unwrap();

        let mut env = Env::new(RealSystem);
        env.options.set(Clobber, Off);
        let mut guard = RedirGuard::new(&mut env);
        let error = guard
            .perform_redir(&file_redir(
                Some(7),
                RedirOp::FileOut,
                path.to_str().unwrap(),
            ))
            .unwrap_err();
        assert_matches::assert_matches!(error.cause, ErrorCause::NoClobber { .. });
        drop(guard);

        // `>|` overrides noclobber.
        env.options.set(Clobber, Off);
        let mut guard = RedirGuard::new(&mut env);
        guard
            .perform_redir(&file_redir(
                Some(7),
                RedirOp::FileClobber,
                path.to_str().unwrap(),
            ))
            .unwrap();
        drop(guard);
    }

    #[test]
    fn missing_file_fails_with_open_error() {
        let mut env = Env::new(RealSystem);
        let mut guard = RedirGuard::new(&mut env);
        let error = guard
            .perform_redir(&file_redir(
                Some(7),
                RedirOp::FileIn,
                "/nonexistent-zish-test/input",
            ))
            .unwrap_err();
        assert_matches::assert_matches!(error.cause, ErrorCause::OpenFile { .. });
    }

    #[test]
    fn here_string_content_is_readable() {
        let mut env = Env::new(RealSystem);
        let redir = Redir {
            fd: Some(Fd(8)),
            body: RedirBody::Normal {
                operator: RedirOp::String,
                operand: literal_word("one:two:three"),
            },
        };
        let mut guard = RedirGuard::new(&mut env);
        guard.perform_redir(&redir).unwrap();
        let mut buffer = [0_u8; 64];
        let mut system = RealSystem;
        let count = system.read(Fd(8), &mut buffer).unwrap();
        assert_eq!(&buffer[..count], b"one:two:three\n");
    }

    #[test]
    fn fd_copy_and_close() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"seed").unwrap();
        let source = file.as_raw_fd();

        let mut env = Env::new(RealSystem);
        {
            let mut guard = RedirGuard::new(&mut env);
            let copy = Redir {
                fd: Some(Fd(9)),
                body: RedirBody::Normal {
                    operator: RedirOp::FdOut,
                    operand: literal_word(&source.to_string()),
                },
            };
            guard.perform_redir(&copy).unwrap();
            let mut system = RealSystem;
            system.write_all(Fd(9), b"-more").unwrap();

            let close = Redir {
                fd: Some(Fd(9)),
                body: RedirBody::Normal {
                    operator: RedirOp::FdOut,
                    operand: literal_word("-"),
                },
            };
            guard.perform_redir(&close).unwrap();
            assert_eq!(system.write_all(Fd(9), b"x"), Err(Errno::EBADF));
        }

        drop(file);
        let mut content = String::new();
        std::fs::File::open(&path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "seed-more");
    }
}
