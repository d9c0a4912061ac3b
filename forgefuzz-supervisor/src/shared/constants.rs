// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Stable string and size contracts between the supervisor, the target's
//! runtime, and the engine above.

/// Reserved token in the command-line template that the launcher replaces
/// with the current test-case path. Left untouched in stdin-fuzzing mode,
/// where the case arrives on fd 0 instead.
pub const FILE_PLACEHOLDER: &str = "___FILE___";

/// Upper bound on the number of target arguments the materializer supports.
/// Exceeding it is a construction error, never a truncation.
pub const MAX_CMDLINE_ARGS: usize = 512;

/// glibc heap-consistency knob. The value aborts the target on detected heap
/// corruption, turning silent corruption into an observable kill.
pub const ENV_MALLOC_CHECK: &str = "MALLOC_CHECK_";
pub const ENV_MALLOC_CHECK_VALUE: &str = "3";

/// ASan runtime contract: leave synchronous SEGVs to the kernel (the tracer
/// observes those directly) but abort on every error ASan itself detects, so
/// sanitizer findings still terminate the target observably.
pub const ENV_ASAN_OPTIONS: &str = "ASAN_OPTIONS";
pub const ENV_ASAN_OPTIONS_VALUE: &str = "handle_segv=0:abort_on_error=1";
