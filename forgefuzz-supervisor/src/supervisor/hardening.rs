// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::shared::constants::{
    ENV_ASAN_OPTIONS, ENV_ASAN_OPTIONS_VALUE, ENV_MALLOC_CHECK, ENV_MALLOC_CHECK_VALUE,
};
use anyhow::Context;
use nix::sys::personality::{self, Persona};
use nix::sys::prctl;
use nix::sys::signal::Signal;

/// Hardens the about-to-exec process. Everything here is process-global and
/// survives the exec, so it must run in the forked child, before the image is
/// replaced. Any failure aborts the launch attempt: a target that can't be
/// hardened must not run untrusted input.
pub(crate) fn harden_environment() -> anyhow::Result<()> {
    // Kill a target which corrupts its own heap (with ABRT), and tell any
    // sanitizer runtime to leave SEGVs to the kernel but abort on its own
    // findings.
    std::env::set_var(ENV_MALLOC_CHECK, ENV_MALLOC_CHECK_VALUE);
    std::env::set_var(ENV_ASAN_OPTIONS, ENV_ASAN_OPTIONS_VALUE);

    // Kill the target when the engine dies (e.g. due to Ctrl+C).
    prctl::set_pdeathsig(Signal::SIGKILL)
        .context("prctl(PR_SET_PDEATHSIG, SIGKILL) failed")?;

    // Disable ASLR, so the same input hits the same crash addresses.
    let persona = personality::get().context("reading the process persona failed")?;
    personality::set(persona | Persona::ADDR_NO_RANDOMIZE)
        .context("personality(ADDR_NO_RANDOMIZE) failed")?;

    Ok(())
}
