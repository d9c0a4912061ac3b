// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use super::{cmdline, hardening, watchdog};
use crate::hooks::Tracer;
use crate::shared::configuration::FuzzConfig;
use anyhow::Context;
use forgefuzz_common::unix_utils::{nullify_stdio, redirect_stdin_from, restore_stdio};
use log::debug;
use std::convert::Infallible;
use std::path::Path;

/// Prepares the current (freshly forked) process and replaces its image with
/// the target. Runs entirely in the child; every armed limit and environment
/// tweak survives the exec and binds the target.
///
/// Only returns on failure. The first failed step aborts the attempt; the
/// caller logs it and terminates the child.
pub fn launch<T: Tracer>(
    config: &FuzzConfig,
    case_path: &Path,
    tracer: &T,
) -> anyhow::Result<Infallible> {
    hardening::harden_environment()?;

    if !config.timeout().is_zero() {
        watchdog::arm_watchdogs(config.timeout())?;
    }
    if let Some(limit_mib) = config.address_space_limit_mib() {
        watchdog::limit_address_space(limit_mib);
    }

    if config.nullify_stdio() {
        nullify_stdio().context("nullifying target stdio failed")?;
    }
    if config.fuzz_stdin() {
        redirect_stdin_from(case_path).with_context(|| {
            format!("redirecting stdin from '{}' failed", case_path.display())
        })?;
    }

    tracer
        .enable_on_self(config)
        .context("enabling trace-attach on the child failed")?;

    let argv = cmdline::materialize_cmdline(config, case_path)?;
    debug!(
        "launching '{}' on case '{}'",
        config.cmdline()[0],
        case_path.display()
    );

    // execvp only comes back on failure. Put stdio back first, so the caller
    // still has somewhere visible to report the fatal error.
    let Err(errno) = argv.exec() else {
        unreachable!("execvp returned without an error")
    };
    restore_stdio();
    anyhow::bail!("failed to exec '{}': {errno}", config.cmdline()[0])
}
