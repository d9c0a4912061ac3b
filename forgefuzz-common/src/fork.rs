// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use nix::unistd::Pid;

pub enum Fork {
    Parent(Pid),
    Child,
}

/// Duplicates the current process, returning which side of the fork we are on.
///
/// # Errors
///
/// Returns the OS error if the child process can't be forked.
///
/// # Safety
///
/// Existing state of the process must allow safe forking: the fuzz worker must
/// not hold locks owned by background threads, since those threads do not
/// exist in the child and the locks would never be released there.
///
/// The child side should restrict itself to async-signal-safe work until it
/// calls exec.
pub unsafe fn fork() -> Result<Fork, std::io::Error> {
    match libc::fork() {
        -1 => Err(std::io::Error::last_os_error()),
        0 => Ok(Fork::Child),
        pid => Ok(Fork::Parent(Pid::from_raw(pid))),
    }
}

/// Sets a panic handler that exits with status 1 after the original handler
/// runs. Forked test children use this so a failed assertion in the child is
/// visible to the parent as a non-zero exit status.
pub fn set_default_child_panic_handler() {
    let old_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |p| {
        old_hook(p);
        std::process::exit(1);
    }));
}
