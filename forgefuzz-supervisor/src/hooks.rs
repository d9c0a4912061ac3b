// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Seams to the two external observation engines. The supervision core owns
//! when these are called and in what order; the mechanics (ptrace stepping,
//! perf counters, coverage maps) belong entirely to the implementations.

use crate::shared::configuration::FuzzConfig;
use crate::shared::run_state::RunState;
use nix::unistd::Pid;

/// The trace-attach and crash/state analysis engine.
pub trait Tracer {
    /// One-time, process-wide preparation, before any launch. Failure is
    /// fatal to the whole engine.
    fn prepare(&self, config: &FuzzConfig) -> anyhow::Result<()>;

    /// Called from the forked child, immediately before exec, to make the
    /// about-to-exec image traceable.
    fn enable_on_self(&self, config: &FuzzConfig) -> anyhow::Result<()>;

    /// Classifies one raw wait status. `status` is the untouched OS encoding;
    /// the reaper never inspects it. Returns true when the state change is
    /// terminal (exit, fatal signal, crash) and monitoring should end, false
    /// for stop/continue-style events that only need the loop to keep going.
    /// Findings go into `run`.
    fn classify(&self, config: &FuzzConfig, status: i32, pid: Pid, run: &mut RunState) -> bool;
}

/// The per-process counter/coverage engine.
pub trait Instrumentation {
    /// Resource tied to one child's lifetime, produced by `activate` and
    /// consumed by `analyze`.
    type Handle;

    /// Attaches instrumentation to `pid`. The reaper calls this exactly once
    /// per child, on the first observed state change; the child cannot be
    /// assumed to exist any earlier. Failure is fatal to the whole engine.
    fn activate(&self, pid: Pid, config: &FuzzConfig) -> anyhow::Result<Self::Handle>;

    /// Consumes the handle after the terminal state change, folding whatever
    /// the counters collected into `run`.
    fn analyze(&self, config: &FuzzConfig, run: &mut RunState, handle: Self::Handle);
}
