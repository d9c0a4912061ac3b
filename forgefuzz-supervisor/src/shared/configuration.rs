// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Read-only configuration for a whole fuzzing session. Built once by the
/// engine, then shared by reference into every launch/reap pair; the core
/// never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuzzConfig {
    // Target command-line template. Arguments equal to the file placeholder
    // are substituted with the test-case path at launch time.
    cmdline: Vec<String>,
    // Deliver the test case on the target's stdin instead of substituting
    // the placeholder.
    fuzz_stdin: bool,
    // Point the target's fds 0-2 at /dev/null before exec.
    nullify_stdio: bool,
    // Soft timeout. ZERO disables every watchdog layer; the caller owns the
    // unlimited-time policy in that case.
    timeout: Duration,
    // Address-space cap in MiB. Enforcement is best-effort.
    address_space_limit_mib: Option<u64>,
}

impl FuzzConfig {
    pub fn new(
        cmdline: Vec<String>,
        fuzz_stdin: bool,
        nullify_stdio: bool,
        timeout: Duration,
        address_space_limit_mib: Option<u64>,
    ) -> anyhow::Result<Self> {
        anyhow::ensure!(
            !cmdline.is_empty(),
            "the command-line template needs at least the target executable"
        );
        anyhow::ensure!(
            !cmdline[0].is_empty(),
            "the target executable name can't be empty"
        );
        anyhow::ensure!(
            address_space_limit_mib != Some(0),
            "an address-space limit of 0 MiB would stop the target from mapping anything; \
             use None for no limit"
        );
        Ok(Self {
            cmdline,
            fuzz_stdin,
            nullify_stdio,
            timeout,
            address_space_limit_mib,
        })
    }

    pub fn cmdline(&self) -> &[String] {
        &self.cmdline
    }

    pub fn fuzz_stdin(&self) -> bool {
        self.fuzz_stdin
    }

    pub fn nullify_stdio(&self) -> bool {
        self.nullify_stdio
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn address_space_limit_mib(&self) -> Option<u64> {
        self.address_space_limit_mib
    }
}
