// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0
// Integration tests for the reap loop: real children, recording fakes for the
// trace and instrumentation collaborators.

#![cfg(target_os = "linux")]

use forgefuzz_common::fork::{fork, Fork};
use forgefuzz_supervisor::{
    reap_child, run_case, FuzzConfig, Instrumentation, RunState, Tracer, Verdict,
};
use nix::unistd::Pid;
use std::sync::atomic::{AtomicUsize, Ordering::SeqCst};
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

// The reaper waits on the whole wait set (-1); serialize these tests so one
// test's reaper can't steal another test's child.
fn reap_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

/// Classifies with the POSIX macros and counts every call. Stopped children
/// are continued so the loop can observe their eventual exit.
#[derive(Default)]
struct RecordingTracer {
    classifications: AtomicUsize,
}

impl Tracer for RecordingTracer {
    fn prepare(&self, _config: &FuzzConfig) -> anyhow::Result<()> {
        Ok(())
    }

    fn enable_on_self(&self, _config: &FuzzConfig) -> anyhow::Result<()> {
        Ok(())
    }

    fn classify(&self, _config: &FuzzConfig, status: i32, pid: Pid, run: &mut RunState) -> bool {
        self.classifications.fetch_add(1, SeqCst);
        if libc::WIFSTOPPED(status) {
            // Safety: sending SIGCONT to our own stopped child.
            unsafe { libc::kill(pid.as_raw(), libc::SIGCONT) };
            return false;
        }
        if libc::WIFCONTINUED(status) {
            return false;
        }
        if libc::WIFEXITED(status) {
            run.record_verdict(Verdict::Exited {
                code: libc::WEXITSTATUS(status),
            });
            return true;
        }
        if libc::WIFSIGNALED(status) {
            run.record_verdict(Verdict::Crashed {
                signal: libc::WTERMSIG(status),
            });
            return true;
        }
        false
    }
}

#[derive(Default)]
struct RecordingInstrumentation {
    activations: AtomicUsize,
    analyses: AtomicUsize,
}

impl Instrumentation for RecordingInstrumentation {
    type Handle = Pid;

    fn activate(&self, pid: Pid, _config: &FuzzConfig) -> anyhow::Result<Pid> {
        self.activations.fetch_add(1, SeqCst);
        Ok(pid)
    }

    fn analyze(&self, _config: &FuzzConfig, _run: &mut RunState, _handle: Pid) {
        self.analyses.fetch_add(1, SeqCst);
    }
}

fn basic_config() -> FuzzConfig {
    FuzzConfig::new(
        vec!["/bin/true".to_string()],
        false,
        false,
        Duration::ZERO,
        None,
    )
    .unwrap()
}

#[test]
fn test_reap_ends_on_exit_with_one_activation_and_one_analysis() {
    let _guard = reap_lock().lock().unwrap();
    let tracer = RecordingTracer::default();
    let instrumentation = RecordingInstrumentation::default();
    let config = basic_config();
    let mut run = RunState::new("/tmp/forge-case");

    // Safety: the child only calls _exit.
    match unsafe { fork() }.unwrap() {
        Fork::Child => unsafe { libc::_exit(7) },
        Fork::Parent(_) => {}
    }
    reap_child(&config, &mut run, &tracer, &instrumentation);

    assert_eq!(instrumentation.activations.load(SeqCst), 1);
    assert_eq!(instrumentation.analyses.load(SeqCst), 1);
    assert_eq!(run.verdict(), Some(&Verdict::Exited { code: 7 }));
    assert!(tracer.classifications.load(SeqCst) >= 1);
}

#[test]
fn test_reap_loops_through_a_stop_and_activates_only_once() {
    let _guard = reap_lock().lock().unwrap();
    let tracer = RecordingTracer::default();
    let instrumentation = RecordingInstrumentation::default();
    let config = basic_config();
    let mut run = RunState::new("/tmp/forge-case");

    // Safety: the child only stops itself and exits.
    match unsafe { fork() }.unwrap() {
        Fork::Child => unsafe {
            libc::raise(libc::SIGSTOP);
            libc::_exit(0)
        },
        Fork::Parent(_) => {}
    }
    reap_child(&config, &mut run, &tracer, &instrumentation);

    // Stop and exit are at least two observed state changes, but the
    // instrumentation attached exactly once, on the first.
    assert!(tracer.classifications.load(SeqCst) >= 2);
    assert_eq!(instrumentation.activations.load(SeqCst), 1);
    assert_eq!(instrumentation.analyses.load(SeqCst), 1);
    assert_eq!(run.verdict(), Some(&Verdict::Exited { code: 0 }));
}

#[test]
fn test_reap_classifies_a_fatal_signal_as_terminal() {
    let _guard = reap_lock().lock().unwrap();
    let tracer = RecordingTracer::default();
    let instrumentation = RecordingInstrumentation::default();
    let config = basic_config();
    let mut run = RunState::new("/tmp/forge-case");

    // Safety: the child only kills itself.
    match unsafe { fork() }.unwrap() {
        Fork::Child => unsafe {
            libc::kill(libc::getpid(), libc::SIGKILL);
            libc::_exit(0)
        },
        Fork::Parent(_) => {}
    }
    reap_child(&config, &mut run, &tracer, &instrumentation);

    assert_eq!(instrumentation.activations.load(SeqCst), 1);
    assert_eq!(instrumentation.analyses.load(SeqCst), 1);
    assert_eq!(
        run.verdict(),
        Some(&Verdict::Crashed {
            signal: libc::SIGKILL
        })
    );
}

#[test]
fn test_run_case_supervises_a_real_target_end_to_end() {
    let _guard = reap_lock().lock().unwrap();
    let tracer = RecordingTracer::default();
    let instrumentation = RecordingInstrumentation::default();
    let config = basic_config();

    let run = run_case(
        &config,
        std::path::Path::new("/dev/null"),
        &tracer,
        &instrumentation,
    )
    .unwrap();

    assert!(run.pid().is_some());
    assert_eq!(run.verdict(), Some(&Verdict::Exited { code: 0 }));
    assert_eq!(instrumentation.activations.load(SeqCst), 1);
    assert_eq!(instrumentation.analyses.load(SeqCst), 1);
}
