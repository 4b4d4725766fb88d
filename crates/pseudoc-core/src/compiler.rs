// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The compiler façade.
//!
//! Runs the full pipeline — lex, parse, analyze, emit — over one source
//! text and returns a [`CompileResult`]. The façade owns the two rules
//! every caller relies on:
//!
//! - diagnostics from all stages are merged and sorted by
//!   `(start_line, start_column, code)`
//! - code is emitted iff no diagnostic has `Error` severity, so
//!   `success == true ⇔ python_code.is_some()`
//!
//! Compilation is synchronous, has no external effects, and never
//! fails: malformed input yields diagnostics, not errors.

use serde::Serialize;

use crate::codegen;
use crate::diagnostics::{sort_diagnostics, Diagnostic, Severity};
use crate::semantic_analysis::analyze;
use crate::source_analysis::{lex, parse};

/// A compile request.
///
/// `strict` is reserved; the only supported mode is strict (uppercase
/// keywords), and the field is carried for wire compatibility.
#[derive(Debug, Clone)]
pub struct CompileRequest<'a> {
    /// The pseudocode source text.
    pub source: &'a str,
    /// The display name of the source (for host-side rendering).
    pub filename: &'a str,
    /// Reserved; currently always `true`.
    pub strict: bool,
}

impl<'a> CompileRequest<'a> {
    /// Creates a strict-mode request.
    #[must_use]
    pub fn new(source: &'a str, filename: &'a str) -> Self {
        Self {
            source,
            filename,
            strict: true,
        }
    }
}

/// The result of compiling one source text.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileResult {
    /// Whether compilation succeeded (no error-severity diagnostics).
    pub success: bool,
    /// All diagnostics, sorted by `(start_line, start_column, code)`.
    pub diagnostics: Vec<Diagnostic>,
    /// The AST serialized to JSON (present on success and failure).
    pub ast_json: String,
    /// The emitted Python program; present iff `success`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub python_code: Option<String>,
}

/// Compiles a request through the whole pipeline.
#[must_use]
pub fn compile(request: &CompileRequest<'_>) -> CompileResult {
    compile_source(request.source)
}

/// Compiles source text through the whole pipeline.
///
/// # Examples
///
/// ```
/// use pseudoc_core::compiler::compile_source;
///
/// let result = compile_source("OUTPUT 6");
/// assert!(result.success);
/// assert!(result.python_code.unwrap().contains("__output(6)"));
///
/// let result = compile_source("Value <- 7");
/// assert!(!result.success);
/// assert!(result.python_code.is_none());
/// ```
#[must_use]
pub fn compile_source(source: &str) -> CompileResult {
    let (tokens, mut diagnostics) = lex(source);
    let (program, parse_diagnostics) = parse(tokens);
    diagnostics.extend(parse_diagnostics);

    let analysis = analyze(&program);
    diagnostics.extend(analysis.diagnostics.iter().cloned());

    sort_diagnostics(&mut diagnostics);

    let success = !diagnostics
        .iter()
        .any(|diagnostic| diagnostic.severity == Severity::Error);

    let python_code = success.then(|| codegen::generate(&program, &analysis));

    let ast_json =
        serde_json::to_string(&program).unwrap_or_else(|_| "null".to_string());

    CompileResult {
        success,
        diagnostics,
        ast_json,
        python_code,
    }
}
