// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use nix::unistd::Pid;
use std::path::{Path, PathBuf};

/// Terminal outcome of one run, written by the trace collaborator while the
/// reaper loops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Exited { code: i32 },
    Crashed { signal: i32 },
    TimedOut,
}

/// Per-test-case state. Exclusively owned by one launch/reap pair; the trace
/// and instrumentation collaborators accumulate their findings here, and the
/// engine reads them out after the reaper returns.
#[derive(Debug)]
pub struct RunState {
    case_path: PathBuf,
    pid: Option<Pid>,
    verdict: Option<Verdict>,
}

impl RunState {
    pub fn new(case_path: impl Into<PathBuf>) -> Self {
        Self {
            case_path: case_path.into(),
            pid: None,
            verdict: None,
        }
    }

    pub fn case_path(&self) -> &Path {
        &self.case_path
    }

    pub fn pid(&self) -> Option<Pid> {
        self.pid
    }

    pub(crate) fn set_pid(&mut self, pid: Pid) {
        self.pid = Some(pid);
    }

    pub fn verdict(&self) -> Option<&Verdict> {
        self.verdict.as_ref()
    }

    /// Records the terminal outcome. Collaborator-facing: the last write
    /// before a terminal classification is what the engine sees.
    pub fn record_verdict(&mut self, verdict: Verdict) {
        self.verdict = Some(verdict);
    }
}
