// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Structures shared between the launcher (child side) and the reaper
//! (supervisor side).

pub(crate) mod configuration;
pub(crate) mod constants;
pub(crate) mod run_state;
