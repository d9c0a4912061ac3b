// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::shared::configuration::FuzzConfig;
use crate::shared::constants::{FILE_PLACEHOLDER, MAX_CMDLINE_ARGS};
use forgefuzz_common::unix_utils::ExecVec;
use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum CmdlineError {
    #[error("command line has {0} arguments, the supported maximum is {MAX_CMDLINE_ARGS}")]
    TooManyArgs(usize),
    #[error("argument has an interior NUL byte: {0:?}")]
    InteriorNul(String),
}

/// Builds the final exec vector for one test case: the template copied
/// verbatim, except that arguments equal to [`FILE_PLACEHOLDER`] become the
/// case path. In stdin-fuzzing mode the placeholder stays untouched, since
/// the case arrives on fd 0 instead of the filesystem.
pub fn materialize_cmdline(config: &FuzzConfig, case_path: &Path) -> Result<ExecVec, CmdlineError> {
    let template = config.cmdline();
    if template.len() > MAX_CMDLINE_ARGS {
        return Err(CmdlineError::TooManyArgs(template.len()));
    }

    let mut argv = ExecVec::empty();
    for arg in template {
        let materialized = if !config.fuzz_stdin() && arg == FILE_PLACEHOLDER {
            CString::new(case_path.as_os_str().as_bytes())
                .map_err(|_| CmdlineError::InteriorNul(case_path.display().to_string()))?
        } else {
            CString::new(arg.as_str()).map_err(|_| CmdlineError::InteriorNul(arg.clone()))?
        };
        argv.push(materialized);
    }
    Ok(argv)
}
