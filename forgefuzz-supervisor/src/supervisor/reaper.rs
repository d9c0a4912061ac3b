// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::hooks::{Instrumentation, Tracer};
use crate::shared::configuration::FuzzConfig;
use crate::shared::run_state::RunState;
use log::{debug, error};
use nix::unistd::Pid;

/// Where the reaper is in one child's lifetime. Activation is only reachable
/// out of `Waiting`, which makes "instrumentation attaches exactly once per
/// child" structural rather than a flag convention.
enum Phase<H> {
    /// Nothing observed yet; the child may not even exist.
    Waiting,
    /// Instrumentation attached; classifying state changes until terminal.
    Monitoring { handle: H },
}

/// Supervises one child until the trace collaborator classifies a state
/// change as terminal, then runs instrumentation analysis on the captured
/// handle. This loop is the sole consumer of the child's wait notifications.
///
/// The raw wait status is handed to [`Tracer::classify`] untouched; only the
/// collaborator's terminal/non-terminal verdict steers the loop.
pub fn reap_child<T, I>(config: &FuzzConfig, run: &mut RunState, tracer: &T, instrumentation: &I)
where
    T: Tracer,
    I: Instrumentation,
{
    let mut phase = Phase::Waiting;
    loop {
        let (pid, status) = wait_for_state_change();

        phase = match phase {
            Phase::Waiting => {
                let handle = match instrumentation.activate(pid, config) {
                    Ok(handle) => handle,
                    Err(e) => {
                        // A run without instrumentation produces nothing the
                        // engine can use, and there is no per-run recovery.
                        error!("couldn't activate instrumentation for pid {pid}: {e:#}");
                        std::process::exit(1);
                    }
                };
                Phase::Monitoring { handle }
            }
            monitoring => monitoring,
        };

        debug!("process (pid {pid}) came back with status {status}");

        if tracer.classify(config, status, pid, run) {
            let Phase::Monitoring { handle } = phase else {
                unreachable!("terminal classification before the first state change")
            };
            instrumentation.analyze(config, run, handle);
            return;
        }
    }
}

/// Blocks until any process in the worker's wait set changes state: exits,
/// gets killed, stops, or continues. Non-positive returns (interruptions,
/// spurious wakeups) are retried; they are never a terminal condition.
fn wait_for_state_change() -> (Pid, i32) {
    let mut status: libc::c_int = 0;
    loop {
        // Safety: `status` is a live out-parameter for the duration of the
        // call.
        let pid = unsafe {
            libc::waitpid(
                -1,
                &mut status,
                libc::__WALL | libc::__WNOTHREAD | libc::WUNTRACED | libc::WCONTINUED,
            )
        };
        if pid > 0 {
            return (Pid::from_raw(pid), status);
        }
    }
}
