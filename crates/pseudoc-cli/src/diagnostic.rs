// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Terminal diagnostics rendering using miette.
//!
//! Converts pseudoc-core diagnostics into miette reports with source
//! context, arrows at the error location, and the stable diagnostic
//! code. The core tracks one-based line/column spans; miette wants byte
//! offsets, so the conversion happens here, where the source text is at
//! hand.

use miette::{Diagnostic, SourceSpan};
use pseudoc_core::diagnostics::{Diagnostic as CoreDiagnostic, Severity};
use pseudoc_core::source_analysis::Span;

/// A compilation diagnostic with rich formatting.
#[derive(Debug, Diagnostic, thiserror::Error)]
#[error("{message}")]
pub struct CompileDiagnostic {
    /// Error, warning, or info.
    pub severity: Severity,
    /// Human-readable message, prefixed with the stable code.
    pub message: String,
    /// Source code for context.
    #[source_code]
    pub src: miette::NamedSource<String>,
    /// Location of the finding.
    #[label("{label}")]
    pub span: SourceSpan,
    /// Label for the span.
    pub label: String,
    /// Optional fix hint.
    #[help]
    pub hint: Option<String>,
}

impl CompileDiagnostic {
    /// Builds a rich diagnostic from a core diagnostic.
    pub fn from_core_diagnostic(
        diagnostic: &CoreDiagnostic,
        source_path: &str,
        source: &str,
    ) -> Self {
        let label = match diagnostic.severity {
            Severity::Error => "error here",
            Severity::Warning => "warning here",
            Severity::Info => "note",
        };

        Self {
            severity: diagnostic.severity,
            message: format!("{}: {}", diagnostic.code, diagnostic.message),
            src: miette::NamedSource::new(source_path, source.to_string()),
            span: span_to_offsets(source, diagnostic.span),
            label: label.to_string(),
            hint: diagnostic.hint.as_ref().map(ToString::to_string),
        }
    }
}

/// Converts a one-based line/column span to a byte-offset span.
///
/// Columns count characters, so multi-byte characters (the assignment
/// arrow, for one) advance the byte offset by more than one.
fn span_to_offsets(source: &str, span: Span) -> SourceSpan {
    let start = position_to_offset(source, span.start_line(), span.start_column());
    let end = position_to_offset(source, span.end_line(), span.end_column());
    let length = end.saturating_sub(start);
    (start, length.max(1)).into()
}

fn position_to_offset(source: &str, line: u32, column: u32) -> usize {
    let mut current_line = 1u32;
    let mut current_column = 1u32;
    for (offset, c) in source.char_indices() {
        if current_line == line && current_column == column {
            return offset;
        }
        if current_line > line {
            return offset;
        }
        if c == '\n' {
            current_line += 1;
            current_column = 1;
        } else {
            current_column += 1;
        }
    }
    source.len()
}
