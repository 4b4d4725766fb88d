// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The execution-sandbox boundary.
//!
//! The compiler core never runs emitted Python; a host-side sandbox
//! does, and exchanges these envelopes with it. Only the wire shapes are
//! defined here. Runtime diagnostics come back through the shared
//! [`Diagnostic`] type using the `RUN###` codes — `RUN001` for a Python
//! error (traceback distilled to its last two lines), `RUN408` for an
//! execution timeout, `RUN409` for sandbox initialization timeout, and
//! `RUN500` for a sandbox crash.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostic;

/// Named in-memory line files the emitted runtime reads and writes
/// instead of real disk I/O. `BTreeMap` keeps the wire order stable.
pub type VirtualFiles = BTreeMap<String, Vec<String>>;

/// A request to run an emitted program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRequest {
    /// The emitted Python program, prelude included.
    pub python_code: String,
    /// Lines consumed by `INPUT`, in order.
    #[serde(default)]
    pub stdin_lines: Vec<String>,
    /// Virtual files visible to the program when it starts.
    #[serde(default)]
    pub virtual_files: VirtualFiles,
}

/// The sandbox's response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    /// Whether the program ran to completion.
    pub success: bool,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Runtime diagnostics (`RUN###` codes).
    pub diagnostics: Vec<Diagnostic>,
    /// Virtual files as the program left them.
    pub virtual_files: VirtualFiles,
}
