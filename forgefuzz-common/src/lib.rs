// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Shared Unix plumbing for the forgefuzz engine: a thin fork wrapper and the
//! fd-level helpers a fuzz worker needs on either side of exec.
#![cfg(unix)]

pub mod fork;
pub mod unix_utils;
