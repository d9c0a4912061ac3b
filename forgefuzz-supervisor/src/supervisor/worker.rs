// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use super::{launch, reap_child};
use crate::hooks::{Instrumentation, Tracer};
use crate::shared::configuration::FuzzConfig;
use crate::shared::run_state::RunState;
use anyhow::Context;
use forgefuzz_common::fork::{fork, Fork};
use forgefuzz_common::unix_utils::terminate;
use log::error;
use std::path::Path;

/// Runs one test case end to end: forks, launches the hardened target in the
/// child, supervises it from the parent, and hands back the run state once
/// the reaper declares the child terminal.
///
/// The two sides share nothing but the kernel's wait interface: the child
/// either becomes the target or terminates, and the parent is the sole owner
/// of the child's state-change notifications.
pub fn run_case<T, I>(
    config: &FuzzConfig,
    case_path: &Path,
    tracer: &T,
    instrumentation: &I,
) -> anyhow::Result<RunState>
where
    T: Tracer,
    I: Instrumentation,
{
    let mut run = RunState::new(case_path);

    // Safety: the child side only runs the exec-or-terminate path below.
    match unsafe { fork() }.context("couldn't fork a fuzz worker child")? {
        Fork::Child => {
            if let Err(e) = launch(config, case_path, tracer) {
                error!("launching '{}' failed: {e:#}", config.cmdline()[0]);
            }
            terminate()
        }
        Fork::Parent(pid) => {
            run.set_pid(pid);
            reap_child(config, &mut run, tracer, instrumentation);
            Ok(run)
        }
    }
}
