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

//! Interface to the underlying operating system
//!
//! [`RealSystem`] is the single choke point for system calls: file
//! descriptor manipulation, process creation, waiting, signals, and
//! terminal control. The rest of the shell never calls into `libc`
//! directly, which keeps descriptor and signal discipline auditable in
//! one place.
//!
//! `RealSystem` itself is stateless; all the relevant state lives in the
//! kernel. Signal handlers installed through this module do nothing but
//! record the signal in a fixed-size array of flags, which the main loop
//! drains with [`RealSystem::caught_signals`] at safe points.

use crate::io::Fd;
use crate::job::{Pid, ProcessState};
use crate::semantics::ExitStatus;
use crate::signal::{self, Number};
use std::convert::Infallible;
use std::ffi::{c_char, c_int, CStr, CString, OsStr, OsString};
use std::mem::MaybeUninit;
use std::os::unix::ffi::{OsStrExt, OsStringExt};
use std::path::PathBuf;
use std::ptr::null;
use std::sync::atomic::{AtomicBool, Ordering};

#[doc(no_inline)]
pub use nix::errno::Errno;

/// Maximum signal number the shell tracks, exclusive
const SIGNAL_SLOTS: usize = 64;

/// Flags set by the signal handler, indexed by signal number
///
/// The handler only stores into this array; everything else happens on
/// the main thread.
static CAUGHT_SIGNALS: [AtomicBool; SIGNAL_SLOTS] =
    [const { AtomicBool::new(false) }; SIGNAL_SLOTS];

extern "C" fn catch_signal(signal: c_int) {
    if let Some(flag) = CAUGHT_SIGNALS.get(signal as usize) {
        flag.store(true, Ordering::Relaxed);
    }
}

/// How a signal is disposed of
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SignalHandling {
    /// Performs the default action.
    Default,
    /// Ignores the signal.
    Ignore,
    /// Records the signal for later processing by the main loop.
    Catch,
}

/// Result of a `fork` call
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ForkResult {
    /// Returned in the parent process
    Parent {
        /// Process ID of the new child
        child: Pid,
    },
    /// Returned in the child process
    Child,
}

/// Process times in seconds
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Times {
    /// User CPU time of the shell
    pub self_user: f64,
    /// System CPU time of the shell
    pub self_system: f64,
    /// User CPU time of terminated children
    pub children_user: f64,
    /// System CPU time of terminated children
    pub children_system: f64,
}

fn check(ret: c_int) -> Result<c_int, Errno> {
    if ret == -1 {
        Err(Errno::last())
    } else {
        Ok(ret)
    }
}

fn decode_wait_status(status: c_int) -> ProcessState {
    if libc::WIFEXITED(status) {
        ProcessState::exited(ExitStatus(libc::WEXITSTATUS(status)))
    } else if libc::WIFSIGNALED(status) {
        match Number::from_raw(libc::WTERMSIG(status)) {
            Some(signal) => ProcessState::Halted(crate::job::ProcessResult::Signaled {
                signal,
                core_dump: libc::WCOREDUMP(status),
            }),
            None => ProcessState::exited(ExitStatus::FAILURE),
        }
    } else if libc::WIFSTOPPED(status) {
        match Number::from_raw(libc::WSTOPSIG(status)) {
            Some(signal) => ProcessState::stopped(signal),
            None => ProcessState::Running,
        }
    } else {
        // WIFCONTINUED
        ProcessState::Running
    }
}

/// Implementation of the system interface that actually interacts with
/// the system
#[derive(Clone, Copy, Debug, Default)]
pub struct RealSystem;

impl RealSystem {
    /// Opens a file, returning the new file descriptor.
    pub fn open(&mut self, path: &CStr, flags: c_int, mode: libc::mode_t) -> Result<Fd, Errno> {
        let fd = check(unsafe { libc::open(path.as_ptr(), flags, mode as c_int) })?;
        Ok(Fd(fd))
    }

    /// Closes a file descriptor.
    ///
    /// Closing an already closed descriptor is not an error.
    pub fn close(&mut self, fd: Fd) -> Result<(), Errno> {
        match check(unsafe { libc::close(fd.0) }) {
            Ok(_) => Ok(()),
            Err(Errno::EBADF) => Ok(()),
            Err(error) => Err(error),
        }
    }

    /// Duplicates a file descriptor to the lowest free descriptor not
    /// less than `min`.
    pub fn dup(&mut self, fd: Fd, min: Fd, cloexec: bool) -> Result<Fd, Errno> {
        let command = if cloexec {
            libc::F_DUPFD_CLOEXEC
        } else {
            libc::F_DUPFD
        };
        let new = check(unsafe { libc::fcntl(fd.0, command, min.0) })?;
        Ok(Fd(new))
    }

    /// Duplicates `from` onto `to`, closing `to` first if open.
    pub fn dup2(&mut self, from: Fd, to: Fd) -> Result<Fd, Errno> {
        loop {
            match check(unsafe { libc::dup2(from.0, to.0) }) {
                Ok(fd) => return Ok(Fd(fd)),
                Err(Errno::EINTR) => {}
                Err(error) => return Err(error),
            }
        }
    }

    /// Sets or clears the close-on-exec flag.
    pub fn set_cloexec(&mut self, fd: Fd, on: bool) -> Result<(), Errno> {
        let flags = check(unsafe { libc::fcntl(fd.0, libc::F_GETFD) })?;
        let flags = if on {
            flags | libc::FD_CLOEXEC
        } else {
            flags & !libc::FD_CLOEXEC
        };
        check(unsafe { libc::fcntl(fd.0, libc::F_SETFD, flags) })?;
        Ok(())
    }

    /// Creates a pipe, returning the read and write ends.
    pub fn pipe(&mut self) -> Result<(Fd, Fd), Errno> {
        let mut fds = [0; 2];
        check(unsafe { libc::pipe(fds.as_mut_ptr()) })?;
        Ok((Fd(fds[0]), Fd(fds[1])))
    }

    /// Reads from a file descriptor.
    ///
    /// The result may be `Err(Errno::EINTR)` if a signal arrived before
    /// any data; the caller decides whether to run traps and retry.
    pub fn read(&mut self, fd: Fd, buffer: &mut [u8]) -> Result<usize, Errno> {
        let count = unsafe { libc::read(fd.0, buffer.as_mut_ptr().cast(), buffer.len()) };
        if count == -1 {
            Err(Errno::last())
        } else {
            Ok(count as usize)
        }
    }

    /// Writes the whole buffer to a file descriptor, retrying on partial
    /// writes and interruptions.
    pub fn write_all(&mut self, fd: Fd, mut bytes: &[u8]) -> Result<(), Errno> {
        while !bytes.is_empty() {
            let count = unsafe { libc::write(fd.0, bytes.as_ptr().cast(), bytes.len()) };
            if count == -1 {
                match Errno::last() {
                    Errno::EINTR => continue,
                    error => return Err(error),
                }
            }
            bytes = &bytes[count as usize..];
        }
        Ok(())
    }

    /// Writes a message to the standard error.
    ///
    /// Failure to write an error message is ignored; there is no one left
    /// to tell.
    pub fn print_error(&mut self, message: &str) {
        _ = self.write_all(Fd::STDERR, message.as_bytes());
    }

    /// Tests whether the file descriptor refers to a terminal.
    #[must_use]
    pub fn isatty(&self, fd: Fd) -> bool {
        unsafe { libc::isatty(fd.0) == 1 }
    }

    /// Creates a new child process.
    ///
    /// # Safety
    ///
    /// In a multi-threaded program only async-signal-safe operations may
    /// follow in the child. The shell is single-threaded.
    pub unsafe fn fork(&mut self) -> Result<ForkResult, Errno> {
        match unsafe { libc::fork() } {
            -1 => Err(Errno::last()),
            0 => Ok(ForkResult::Child),
            pid => Ok(ForkResult::Parent {
                child: Pid::from_raw(pid),
            }),
        }
    }

    /// Replaces the current process image.
    pub fn execve(
        &mut self,
        path: &CStr,
        args: &[CString],
        envs: &[CString],
    ) -> Result<Infallible, Errno> {
        let argv: Vec<*const c_char> = args
            .iter()
            .map(|arg| arg.as_ptr())
            .chain(std::iter::once(null()))
            .collect();
        let envp: Vec<*const c_char> = envs
            .iter()
            .map(|env| env.as_ptr())
            .chain(std::iter::once(null()))
            .collect();
        loop {
            unsafe { libc::execve(path.as_ptr(), argv.as_ptr(), envp.as_ptr()) };
            let error = Errno::last();
            if error != Errno::EINTR {
                return Err(error);
            }
        }
    }

    /// Terminates the current process without running any cleanup.
    ///
    /// Forked children use this so they never unwind the parent's state.
    pub fn exit_process(&mut self, exit_status: ExitStatus) -> ! {
        unsafe { libc::_exit(exit_status.0) }
    }

    /// Waits for any child process to change state.
    ///
    /// Returns `Ok(None)` if `block` is false and no child has changed
    /// state. Stopped and continued children are reported as well as
    /// terminated ones.
    pub fn wait_any(&mut self, block: bool) -> Result<Option<(Pid, ProcessState)>, Errno> {
        let mut status = 0;
        let mut flags = libc::WUNTRACED | libc::WCONTINUED;
        if !block {
            flags |= libc::WNOHANG;
        }
        match unsafe { libc::waitpid(-1, &mut status, flags) } {
            -1 => Err(Errno::last()),
            0 => Ok(None),
            pid => Ok(Some((Pid::from_raw(pid), decode_wait_status(status)))),
        }
    }

    /// Sends a signal to a process or process group.
    ///
    /// A negative `pid` addresses the process group `-pid`; `None` as the
    /// signal probes for existence.
    pub fn kill(&mut self, pid: Pid, signal: Option<Number>) -> Result<(), Errno> {
        let raw_signal = signal.map_or(0, Number::as_raw);
        check(unsafe { libc::kill(pid.as_raw(), raw_signal) })?;
        Ok(())
    }

    /// Puts a process in a process group.
    pub fn setpgid(&mut self, pid: Pid, pgid: Pid) -> Result<(), Errno> {
        check(unsafe { libc::setpgid(pid.as_raw(), pgid.as_raw()) })?;
        Ok(())
    }

    /// Returns the process group ID of the current process.
    #[must_use]
    pub fn getpgrp(&self) -> Pid {
        Pid::from_raw(unsafe { libc::getpgrp() })
    }

    /// Returns the process ID of the current process.
    #[must_use]
    pub fn getpid(&self) -> Pid {
        Pid::from_raw(unsafe { libc::getpid() })
    }

    /// Returns the process ID of the parent process.
    #[must_use]
    pub fn getppid(&self) -> Pid {
        Pid::from_raw(unsafe { libc::getppid() })
    }

    /// Makes the given process group the foreground process group of the
    /// terminal.
    pub fn tcsetpgrp(&mut self, fd: Fd, pgid: Pid) -> Result<(), Errno> {
        check(unsafe { libc::tcsetpgrp(fd.0, pgid.as_raw()) })?;
        Ok(())
    }

    /// Returns the foreground process group of the terminal.
    pub fn tcgetpgrp(&self, fd: Fd) -> Result<Pid, Errno> {
        let pgid = check(unsafe { libc::tcgetpgrp(fd.0) })?;
        Ok(Pid::from_raw(pgid))
    }

    /// Installs a disposition for a signal, returning the previous one.
    pub fn set_signal_handling(
        &mut self,
        number: Number,
        handling: SignalHandling,
    ) -> Result<SignalHandling, Errno> {
        let mut action: libc::sigaction = unsafe { std::mem::zeroed() };
        action.sa_sigaction = match handling {
            SignalHandling::Default => libc::SIG_DFL,
            SignalHandling::Ignore => libc::SIG_IGN,
            SignalHandling::Catch => catch_signal as extern "C" fn(c_int) as libc::sighandler_t,
        };
        unsafe { libc::sigemptyset(&mut action.sa_mask) };
        let mut old = MaybeUninit::<libc::sigaction>::uninit();
        check(unsafe { libc::sigaction(number.as_raw(), &action, old.as_mut_ptr()) })?;
        let old = unsafe { old.assume_init() };
        Ok(match old.sa_sigaction {
            libc::SIG_DFL => SignalHandling::Default,
            libc::SIG_IGN => SignalHandling::Ignore,
            _ => SignalHandling::Catch,
        })
    }

    /// Drains the signals caught since the last call.
    pub fn caught_signals(&mut self) -> Vec<Number> {
        (1..SIGNAL_SLOTS)
            .filter(|&n| CAUGHT_SIGNALS[n].swap(false, Ordering::Relaxed))
            .filter_map(|n| Number::from_raw(n as i32))
            .collect()
    }

    /// Tests whether a caught signal is pending without consuming it.
    #[must_use]
    pub fn is_signal_caught(&self, name: signal::Name) -> bool {
        CAUGHT_SIGNALS[name.as_raw() as usize].load(Ordering::Relaxed)
    }

    /// Consumes the pending flag of one signal, returning whether it was
    /// set.
    pub fn take_signal_if_caught(&mut self, name: signal::Name) -> bool {
        CAUGHT_SIGNALS[name.as_raw() as usize].swap(false, Ordering::Relaxed)
    }

    /// Returns the current working directory.
    pub fn getcwd(&self) -> Result<PathBuf, Errno> {
        let mut buffer = vec![0_u8; 4096];
        loop {
            if unsafe { libc::getcwd(buffer.as_mut_ptr().cast(), buffer.len()) }.is_null() {
                match Errno::last() {
                    Errno::ERANGE => buffer.resize(buffer.len() * 2, 0),
                    error => return Err(error),
                }
            } else {
                let len = buffer.iter().position(|&b| b == 0).unwrap_or(buffer.len());
                buffer.truncate(len);
                return Ok(PathBuf::from(OsString::from_vec(buffer)));
            }
        }
    }

    /// Changes the working directory.
    pub fn chdir(&mut self, path: &CStr) -> Result<(), Errno> {
        check(unsafe { libc::chdir(path.as_ptr()) })?;
        Ok(())
    }

    /// Returns the `stat` record for a path.
    pub fn stat(&self, path: &CStr) -> Result<libc::stat, Errno> {
        let mut stat = MaybeUninit::<libc::stat>::uninit();
        check(unsafe { libc::stat(path.as_ptr(), stat.as_mut_ptr()) })?;
        Ok(unsafe { stat.assume_init() })
    }

    /// Returns the `stat` record for a path, without following a final
    /// symbolic link.
    pub fn lstat(&self, path: &CStr) -> Result<libc::stat, Errno> {
        let mut stat = MaybeUninit::<libc::stat>::uninit();
        check(unsafe { libc::lstat(path.as_ptr(), stat.as_mut_ptr()) })?;
        Ok(unsafe { stat.assume_init() })
    }

    /// Tests accessibility of a path with the real user and group IDs.
    #[must_use]
    pub fn access(&self, path: &CStr, mode: c_int) -> bool {
        unsafe { libc::access(path.as_ptr(), mode) == 0 }
    }

    /// Tests whether a path names an executable regular file.
    #[must_use]
    pub fn is_executable_file(&self, path: &CStr) -> bool {
        match self.stat(path) {
            Ok(stat) => {
                stat.st_mode & libc::S_IFMT == libc::S_IFREG
                    && self.access(path, libc::X_OK)
            }
            Err(_) => false,
        }
    }

    /// Returns the home directory of a named user.
    #[must_use]
    pub fn getpwnam_dir(&self, name: &str) -> Option<PathBuf> {
        let name = CString::new(name).ok()?;
        let passwd = unsafe { libc::getpwnam(name.as_ptr()) };
        if passwd.is_null() {
            return None;
        }
        let dir = unsafe { CStr::from_ptr((*passwd).pw_dir) };
        Some(PathBuf::from(OsStr::from_bytes(dir.to_bytes())))
    }

    /// Sets the file mode creation mask, returning the previous mask.
    pub fn umask(&mut self, mask: libc::mode_t) -> libc::mode_t {
        unsafe { libc::umask(mask) }
    }

    /// Returns the accumulated CPU times of the shell and its children.
    pub fn times(&self) -> Result<Times, Errno> {
        let ticks_per_second = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
        if ticks_per_second <= 0 {
            return Err(Errno::EINVAL);
        }
        let ticks_per_second = ticks_per_second as f64;
        let mut tms = MaybeUninit::<libc::tms>::uninit();
        if unsafe { libc::times(tms.as_mut_ptr()) } == -1 {
            return Err(Errno::last());
        }
        let tms = unsafe { tms.assume_init() };
        Ok(Times {
            self_user: tms.tms_utime as f64 / ticks_per_second,
            self_system: tms.tms_stime as f64 / ticks_per_second,
            children_user: tms.tms_cutime as f64 / ticks_per_second,
            children_system: tms.tms_cstime as f64 / ticks_per_second,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_exited() {
        // Status 0x0500 is "exited with status 5" in the conventional
        // encoding used by Linux and friends.
        let state = decode_wait_status(0x0500);
        assert_eq!(state, ProcessState::exited(ExitStatus(5)));
    }

    #[test]
    fn caught_signal_flags() {
        let mut system = RealSystem;
        catch_signal(libc::SIGUSR1);
        let caught = system.caught_signals();
        assert!(caught.contains(&Number::from_raw(libc::SIGUSR1).unwrap()));
        // Draining clears the flag.
        assert!(system.caught_signals().is_empty());
    }
}
