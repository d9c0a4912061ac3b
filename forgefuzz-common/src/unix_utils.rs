// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use libc::{EXIT_FAILURE, STDERR_FILENO, STDIN_FILENO, STDOUT_FILENO, _exit};
use nix::errno::Errno;
use std::ffi::CString;
use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::io::{AsRawFd, RawFd};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StdioError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to duplicate fd {src} onto fd {dst}: {source}")]
    Dup {
        src: RawFd,
        dst: RawFd,
        #[source]
        source: io::Error,
    },
}

/// An argument vector in the shape exec expects: owned C strings backed by a
/// pointer array that is always NULL terminated.
pub struct ExecVec {
    items: Vec<CString>,
    // Always NULL ptr terminated
    ptrs: Vec<*const libc::c_char>,
}

impl ExecVec {
    pub fn empty() -> Self {
        Self {
            items: vec![],
            ptrs: vec![std::ptr::null()],
        }
    }

    pub fn push(&mut self, item: CString) {
        let l = self.ptrs.len();
        // replace previous trailing null with ptr to the item
        self.ptrs[l - 1] = item.as_ptr();
        self.ptrs.push(std::ptr::null());
        self.items.push(item);
    }

    /// Number of arguments, excluding the trailing NULL sentinel.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn args(&self) -> &[CString] {
        &self.items
    }

    pub fn as_ptr(&self) -> *const *const libc::c_char {
        self.ptrs.as_ptr()
    }

    /// Replaces the process image with `argv[0]`, resolved through PATH.
    /// Only returns on failure.
    pub fn exec(&self) -> Result<(), Errno> {
        let Some(file) = self.items.first() else {
            return Err(Errno::EINVAL);
        };
        // Safety: `push` keeps the pointer array NULL terminated and pointing
        // at live CStrings owned by `self`.
        if unsafe { libc::execvp(file.as_ptr(), self.as_ptr()) } == -1 {
            Err(Errno::last())
        } else {
            Ok(())
        }
    }
}

impl std::fmt::Debug for ExecVec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(&self.items).finish()
    }
}

/// Points fds 0-2 at `/dev/null`, silencing the target's stdio.
pub fn nullify_stdio() -> Result<(), StdioError> {
    let null = open_rw("/dev/null")?;
    for target in [STDIN_FILENO, STDOUT_FILENO, STDERR_FILENO] {
        dup2_raw(null.as_raw_fd(), target)?;
    }
    Ok(())
}

/// Points fd 0 at `path`, so the target reads the test case from stdin.
pub fn redirect_stdin_from(path: &Path) -> Result<(), StdioError> {
    let file = File::open(path).map_err(|source| StdioError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    dup2_raw(file.as_raw_fd(), STDIN_FILENO)
}

/// Best-effort recovery of fds 0-2 after a nullify or redirect, so a failed
/// exec can still log somewhere visible. Points them back at the controlling
/// terminal; a no-op when there is none.
pub fn restore_stdio() {
    if let Ok(tty) = open_rw("/dev/tty") {
        for target in [STDIN_FILENO, STDOUT_FILENO, STDERR_FILENO] {
            // Safety: raw fd duplication has no memory-safety preconditions.
            let _ = unsafe { libc::dup2(tty.as_raw_fd(), target) };
        }
    }
}

/// Kills the program without raising an abort or calling at_exit.
pub fn terminate() -> ! {
    // Safety: No preconditions
    unsafe { _exit(EXIT_FAILURE) }
}

fn open_rw(path: &str) -> Result<File, StdioError> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .map_err(|source| StdioError::Open {
            path: PathBuf::from(path),
            source,
        })
}

fn dup2_raw(src: RawFd, dst: RawFd) -> Result<(), StdioError> {
    // Safety: raw fd duplication has no memory-safety preconditions.
    if unsafe { libc::dup2(src, dst) } == -1 {
        Err(StdioError::Dup {
            src,
            dst,
            source: io::Error::last_os_error(),
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exec_vec_stays_null_terminated() {
        let mut argv = ExecVec::empty();
        assert!(argv.is_empty());
        // Safety: `as_ptr` points at one trailing NULL entry.
        assert!(unsafe { (*argv.as_ptr()).is_null() });

        argv.push(CString::new("/bin/true").unwrap());
        argv.push(CString::new("-q").unwrap());
        assert_eq!(argv.len(), 2);

        // Safety: len() items plus the sentinel are always present.
        let ptrs = unsafe { std::slice::from_raw_parts(argv.as_ptr(), 3) };
        assert!(!ptrs[0].is_null());
        assert!(!ptrs[1].is_null());
        assert!(ptrs[2].is_null());
        assert_eq!(argv.args()[0].to_str().unwrap(), "/bin/true");
        assert_eq!(argv.args()[1].to_str().unwrap(), "-q");
    }

    #[test]
    fn exec_without_argv0_is_rejected() {
        assert_eq!(ExecVec::empty().exec(), Err(Errno::EINVAL));
    }
}
