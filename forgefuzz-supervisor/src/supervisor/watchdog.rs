// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use anyhow::Context;
use log::debug;
use nix::sys::resource::{setrlimit, Resource};
use std::time::Duration;

/// One armed expiry mechanism. The layers are independent, not redundant:
/// each one closes an evasion the previous layer leaves open. A target can
/// sleep off the CPU timer, and it can install handlers that swallow both
/// timer signals, but it can't outlive the kernel's CPU rlimit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchdogLayer {
    /// SIGPROF every `period` of consumed process CPU time.
    CpuTimer { period: Duration },
    /// SIGALRM once, after `delay` of wall-clock time.
    WallTimer { delay: Duration },
    /// Hard cap on CPU seconds, soft == hard.
    CpuLimit { seconds: u64 },
}

/// The layered defense for one soft timeout `t`: a CPU interval timer at `t`,
/// a one-shot wall timer at `2t`, and RLIMIT_CPU at `2t`. Empty when `t` is
/// zero; the caller owns the unlimited-time policy.
pub fn watchdog_layers(timeout: Duration) -> Vec<WatchdogLayer> {
    if timeout.is_zero() {
        return vec![];
    }
    vec![
        WatchdogLayer::CpuTimer { period: timeout },
        WatchdogLayer::WallTimer { delay: timeout * 2 },
        WatchdogLayer::CpuLimit {
            seconds: timeout.as_secs() * 2,
        },
    ]
}

impl WatchdogLayer {
    pub(crate) fn arm(&self) -> anyhow::Result<()> {
        match *self {
            WatchdogLayer::CpuTimer { period } => set_itimer(libc::ITIMER_PROF, period, period)
                .context("couldn't set the ITIMER_PROF timer"),
            WatchdogLayer::WallTimer { delay } => {
                set_itimer(libc::ITIMER_REAL, delay, Duration::ZERO)
                    .context("couldn't set the ITIMER_REAL timer")
            }
            WatchdogLayer::CpuLimit { seconds } => setrlimit(Resource::RLIMIT_CPU, seconds, seconds)
                .context("couldn't enforce the RLIMIT_CPU resource limit"),
        }
    }
}

/// Arms every layer for `timeout`. The first layer that can't be armed aborts
/// the launch attempt.
pub(crate) fn arm_watchdogs(timeout: Duration) -> anyhow::Result<()> {
    for layer in watchdog_layers(timeout) {
        layer.arm()?;
    }
    Ok(())
}

/// Best-effort address-space cap, roughly the RAM the target may use. Some
/// kernels and targets reject RLIMIT_AS; losing this one layer is tolerable,
/// so failure is logged and the launch proceeds.
pub(crate) fn limit_address_space(limit_mib: u64) {
    let bytes = limit_mib.saturating_mul(1024 * 1024);
    if let Err(e) = setrlimit(Resource::RLIMIT_AS, bytes, bytes) {
        debug!("couldn't enforce the RLIMIT_AS resource limit ({limit_mib} MiB), ignoring: {e}");
    }
}

fn set_itimer(which: libc::c_int, value: Duration, interval: Duration) -> anyhow::Result<()> {
    let timer = libc::itimerval {
        it_interval: to_timeval(interval),
        it_value: to_timeval(value),
    };
    // Safety: `timer` is a live out-of-line struct for the duration of the
    // call, and a null old-value pointer is allowed.
    let rc = unsafe { libc::setitimer(which, &timer, std::ptr::null_mut()) };
    anyhow::ensure!(
        rc == 0,
        "setitimer failed: {}",
        std::io::Error::last_os_error()
    );
    Ok(())
}

fn to_timeval(d: Duration) -> libc::timeval {
    libc::timeval {
        tv_sec: d.as_secs() as libc::time_t,
        tv_usec: d.subsec_micros() as libc::suseconds_t,
    }
}
