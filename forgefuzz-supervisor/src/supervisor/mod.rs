// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! The supervision core: pre-exec launch pipeline (child side), the reap loop
//! (parent side), and the fork glue pairing them per test case.

pub(crate) mod cmdline;
mod hardening;
mod launcher;
mod reaper;
pub(crate) mod watchdog;
mod worker;

pub use launcher::launch;
pub use reaper::reap_child;
pub use worker::run_case;

use crate::hooks::Tracer;
use crate::shared::configuration::FuzzConfig;
use anyhow::Context;

/// One-time, process-wide preparation, to run before the first launch. No
/// launch may proceed if this fails.
pub fn init_arch<T: Tracer>(config: &FuzzConfig, tracer: &T) -> anyhow::Result<()> {
    tracer
        .prepare(config)
        .context("preparing the trace subsystem failed")
}
