// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Process-supervision core of the forgefuzz engine.
//!
//! Architecturally, one fuzz worker drives one target process per test case,
//! split across two address spaces:
//! 1. The launcher runs in the freshly forked child. It hardens the
//!    environment (heap-corruption abort, sanitizer behavior, parent-death
//!    signal, ASLR off), arms a layered watchdog against hangs, wires stdio
//!    according to the configuration, enables trace-attach on itself, and
//!    replaces the process image with the target. After exec, the armed
//!    limits and environment keep applying to the target by OS semantics.
//! 2. The reaper runs in the supervising parent. It blocks on process-group
//!    state changes, lazily activates instrumentation exactly once per child,
//!    and hands every raw wait status to the trace collaborator, looping
//!    until that collaborator classifies a state change as terminal.
//!
//! The trace and instrumentation engines themselves live behind the [`Tracer`]
//! and [`Instrumentation`] traits; this crate owns the ordering and lifetime
//! contract between them, not their mechanics.
#![cfg(target_os = "linux")]

mod hooks;
mod shared;
mod supervisor;

pub use hooks::{Instrumentation, Tracer};
pub use shared::configuration::FuzzConfig;
pub use shared::constants::*;
pub use shared::run_state::{RunState, Verdict};
pub use supervisor::cmdline::{materialize_cmdline, CmdlineError};
pub use supervisor::watchdog::{watchdog_layers, WatchdogLayer};
pub use supervisor::{init_arch, launch, reap_child, run_case};
