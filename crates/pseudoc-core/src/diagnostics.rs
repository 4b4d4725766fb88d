// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The diagnostic model shared by every compiler stage.
//!
//! Diagnostics are values, never exceptions: malformed input produces a
//! list of [`Diagnostic`]s and a best-effort result, and the pipeline
//! itself cannot fail. Codes are stable and namespaced — `SYN###` for
//! lexical/syntactic findings, `SEM###` for semantic findings, `RUN###`
//! reserved for the execution sandbox (the compiler never emits them,
//! but hosts report through the same type).
//!
//! The list returned to callers is totally ordered by
//! `(start_line, start_column, code)` so editor clients can attach
//! markers without re-sorting.

use ecow::EcoString;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::source_analysis::Span;

/// The closed set of diagnostic codes the toolchain knows about.
///
/// Codes order by their rendered form (`RUN… < SEM… < SYN…`), which is
/// what the stable diagnostic sort ties on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    /// Keyword written in non-uppercase form in strict mode.
    Syn001,
    /// Character outside the language's alphabet.
    Syn002,
    /// Token cannot start a statement.
    Syn004,
    /// Statement not followed by end of line.
    Syn005,
    /// String literal not closed before end of line or file.
    Syn008,
    /// Character literal not closed before end of line or file.
    Syn009,
    /// `DECLARE` without an identifier.
    Syn010,
    /// Declaration missing `:` before its type.
    Syn011,
    /// Expected a type name.
    Syn012,
    /// Array bound is not an integer literal.
    Syn013,
    /// Array bounds missing `:` separator.
    Syn014,
    /// Array bounds missing closing `]`.
    Syn015,
    /// Array type missing `OF`.
    Syn016,
    /// `IF` condition not followed by `THEN`.
    Syn017,
    /// `IF` without matching `ENDIF`.
    Syn018,
    /// Expected the assignment arrow.
    Syn019,
    /// Expected an expression.
    Syn020,
    /// Parenthesized expression missing `)`.
    Syn021,
    /// `CASE` without `OF`.
    Syn022,
    /// `CASE` clause statement does not start on the clause line.
    Syn023,
    /// `CASE` without matching `ENDCASE`.
    Syn024,
    /// `FOR` missing `TO`.
    Syn025,
    /// `FOR` without matching `NEXT`.
    Syn027,
    /// `NEXT` identifier does not match the loop iterator.
    Syn028,
    /// `REPEAT` without matching `UNTIL`.
    Syn029,
    /// `WHILE` condition not followed by `DO`.
    Syn030,
    /// `CASE` clause value missing `:`.
    Syn031,
    /// `WHILE` without matching `ENDWHILE`.
    Syn033,
    /// Routine definition without a name.
    Syn040,
    /// Parameter list expects a parameter name.
    Syn041,
    /// Parameter missing `:` before its type.
    Syn042,
    /// Parameter or argument list missing `)`.
    Syn043,
    /// `PROCEDURE` without matching `ENDPROCEDURE`.
    Syn044,
    /// `FUNCTION` missing `RETURNS`.
    Syn045,
    /// `FUNCTION` without matching `ENDFUNCTION`.
    Syn046,
    /// `OPENFILE` missing `FOR`.
    Syn050,
    /// File mode is neither `READ` nor `WRITE`.
    Syn051,
    /// `READFILE`/`WRITEFILE` missing `,` between file and operand.
    Syn052,
    /// Array access missing closing `]`.
    Syn060,
    /// Expression nesting exceeds the parser's depth bound.
    Syn076,
    /// Duplicate routine name, or routine colliding with another symbol.
    Sem001,
    /// Duplicate declaration within a single scope.
    Sem002,
    /// Assigned value cannot feed the target's type.
    Sem003,
    /// `IF` condition is not BOOLEAN.
    Sem004,
    /// `FOR` iterator not declared.
    Sem005,
    /// `FOR` iterator is not INTEGER.
    Sem006,
    /// `FOR` bound or `STEP` is not numeric.
    Sem007,
    /// `UNTIL` condition is not BOOLEAN.
    Sem008,
    /// `WHILE` condition is not BOOLEAN.
    Sem009,
    /// Duplicate parameter name.
    Sem010,
    /// Function body contains no `RETURN` statement.
    Sem011,
    /// `CALL` target is not a known procedure.
    Sem012,
    /// `RETURN` outside a function body.
    Sem013,
    /// Returned value cannot feed the declared return type.
    Sem014,
    /// `READFILE` on a handle opened for `WRITE`.
    Sem015,
    /// `WRITEFILE` on a handle opened for `READ`.
    Sem016,
    /// Wrong number of arguments.
    Sem017,
    /// Argument type does not feed the parameter type.
    Sem018,
    /// Identifier not declared.
    Sem019,
    /// `NOT` applied to a non-BOOLEAN operand.
    Sem020,
    /// Unary `-` applied to a non-numeric operand.
    Sem021,
    /// Arithmetic operator applied to a non-numeric operand.
    Sem022,
    /// `AND`/`OR` applied to a non-BOOLEAN operand.
    Sem023,
    /// Call target is not a known function.
    Sem024,
    /// Assignment or `INPUT` into a constant.
    Sem025,
    /// `FOR` iterator assigned inside its own loop body (warning).
    Sem026,
    /// Array access with the wrong number of dimensions.
    Sem027,
    /// Array index is not INTEGER.
    Sem028,
    /// Runtime error reported by the sandbox.
    Run001,
    /// Execution timeout reported by the sandbox.
    Run408,
    /// Sandbox initialization timeout.
    Run409,
    /// Sandbox crash or unknown failure.
    Run500,
}

impl DiagnosticCode {
    /// Returns the stable wire form of the code, e.g. `"SEM019"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Syn001 => "SYN001",
            Self::Syn002 => "SYN002",
            Self::Syn004 => "SYN004",
            Self::Syn005 => "SYN005",
            Self::Syn008 => "SYN008",
            Self::Syn009 => "SYN009",
            Self::Syn010 => "SYN010",
            Self::Syn011 => "SYN011",
            Self::Syn012 => "SYN012",
            Self::Syn013 => "SYN013",
            Self::Syn014 => "SYN014",
            Self::Syn015 => "SYN015",
            Self::Syn016 => "SYN016",
            Self::Syn017 => "SYN017",
            Self::Syn018 => "SYN018",
            Self::Syn019 => "SYN019",
            Self::Syn020 => "SYN020",
            Self::Syn021 => "SYN021",
            Self::Syn022 => "SYN022",
            Self::Syn023 => "SYN023",
            Self::Syn024 => "SYN024",
            Self::Syn025 => "SYN025",
            Self::Syn027 => "SYN027",
            Self::Syn028 => "SYN028",
            Self::Syn029 => "SYN029",
            Self::Syn030 => "SYN030",
            Self::Syn031 => "SYN031",
            Self::Syn033 => "SYN033",
            Self::Syn040 => "SYN040",
            Self::Syn041 => "SYN041",
            Self::Syn042 => "SYN042",
            Self::Syn043 => "SYN043",
            Self::Syn044 => "SYN044",
            Self::Syn045 => "SYN045",
            Self::Syn046 => "SYN046",
            Self::Syn050 => "SYN050",
            Self::Syn051 => "SYN051",
            Self::Syn052 => "SYN052",
            Self::Syn060 => "SYN060",
            Self::Syn076 => "SYN076",
            Self::Sem001 => "SEM001",
            Self::Sem002 => "SEM002",
            Self::Sem003 => "SEM003",
            Self::Sem004 => "SEM004",
            Self::Sem005 => "SEM005",
            Self::Sem006 => "SEM006",
            Self::Sem007 => "SEM007",
            Self::Sem008 => "SEM008",
            Self::Sem009 => "SEM009",
            Self::Sem010 => "SEM010",
            Self::Sem011 => "SEM011",
            Self::Sem012 => "SEM012",
            Self::Sem013 => "SEM013",
            Self::Sem014 => "SEM014",
            Self::Sem015 => "SEM015",
            Self::Sem016 => "SEM016",
            Self::Sem017 => "SEM017",
            Self::Sem018 => "SEM018",
            Self::Sem019 => "SEM019",
            Self::Sem020 => "SEM020",
            Self::Sem021 => "SEM021",
            Self::Sem022 => "SEM022",
            Self::Sem023 => "SEM023",
            Self::Sem024 => "SEM024",
            Self::Sem025 => "SEM025",
            Self::Sem026 => "SEM026",
            Self::Sem027 => "SEM027",
            Self::Sem028 => "SEM028",
            Self::Run001 => "RUN001",
            Self::Run408 => "RUN408",
            Self::Run409 => "RUN409",
            Self::Run500 => "RUN500",
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialOrd for DiagnosticCode {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DiagnosticCode {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_str().cmp(other.as_str())
    }
}

/// Diagnostic severity level.
///
/// Only `Error` blocks code emission; warnings and infos ride along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Prevents code emission.
    Error,
    /// Should be addressed, does not block emission.
    Warning,
    /// Informational only.
    Info,
}

/// A structured finding reported by a compiler stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The stable diagnostic code.
    pub code: DiagnosticCode,
    /// The severity of the diagnostic.
    pub severity: Severity,
    /// The human-readable message.
    pub message: EcoString,
    /// The source location.
    pub span: Span,
    /// Optional hint for how to fix the issue.
    pub hint: Option<EcoString>,
}

impl Diagnostic {
    /// Creates a new error diagnostic.
    #[must_use]
    pub fn error(code: DiagnosticCode, message: impl Into<EcoString>, span: Span) -> Self {
        Self {
            code,
            severity: Severity::Error,
            message: message.into(),
            span,
            hint: None,
        }
    }

    /// Creates a new warning diagnostic.
    #[must_use]
    pub fn warning(code: DiagnosticCode, message: impl Into<EcoString>, span: Span) -> Self {
        Self {
            code,
            severity: Severity::Warning,
            message: message.into(),
            span,
            hint: None,
        }
    }

    /// Attaches a fix hint.
    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<EcoString>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// The stable sort key: `(start_line, start_column, code)`.
    #[must_use]
    pub fn sort_key(&self) -> (u32, u32, DiagnosticCode) {
        (
            self.span.start_line(),
            self.span.start_column(),
            self.code,
        )
    }
}

/// Sorts a diagnostic list into the stable order callers rely on.
pub fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by_key(Diagnostic::sort_key);
}

impl Serialize for Diagnostic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Wire shape: { code, message, severity, line, column, endLine, endColumn, hint? }
        let fields = if self.hint.is_some() { 8 } else { 7 };
        let mut state = serializer.serialize_struct("Diagnostic", fields)?;
        state.serialize_field("code", self.code.as_str())?;
        state.serialize_field("message", self.message.as_str())?;
        state.serialize_field("severity", &self.severity)?;
        state.serialize_field("line", &self.span.start_line())?;
        state.serialize_field("column", &self.span.start_column())?;
        state.serialize_field("endLine", &self.span.end_line())?;
        state.serialize_field("endColumn", &self.span.end_column())?;
        if let Some(hint) = &self.hint {
            state.serialize_field("hint", hint.as_str())?;
        }
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_ordering_matches_rendered_codes() {
        let mut codes = vec![
            DiagnosticCode::Sem019,
            DiagnosticCode::Syn001,
            DiagnosticCode::Run001,
            DiagnosticCode::Sem001,
            DiagnosticCode::Syn033,
        ];
        codes.sort();
        let rendered: Vec<_> = codes.iter().map(|c| c.as_str()).collect();
        let mut by_string = rendered.clone();
        by_string.sort_unstable();
        assert_eq!(rendered, by_string);
    }

    #[test]
    fn sort_is_by_line_then_column_then_code() {
        let mut diagnostics = vec![
            Diagnostic::error(DiagnosticCode::Sem019, "b", Span::point(2, 1)),
            Diagnostic::error(DiagnosticCode::Syn001, "a", Span::point(1, 5)),
            Diagnostic::error(DiagnosticCode::Sem003, "c", Span::point(1, 5)),
            Diagnostic::error(DiagnosticCode::Syn002, "d", Span::point(1, 1)),
        ];
        sort_diagnostics(&mut diagnostics);
        let codes: Vec<_> = diagnostics.iter().map(|d| d.code.as_str()).collect();
        assert_eq!(codes, ["SYN002", "SEM003", "SYN001", "SEM019"]);
    }

    #[test]
    fn wire_shape_includes_span_fields() {
        let diagnostic = Diagnostic::error(
            DiagnosticCode::Sem019,
            "'Value' is not declared",
            Span::on_line(1, 1, 5),
        );
        let json = serde_json::to_value(&diagnostic).expect("serializes");
        assert_eq!(json["code"], "SEM019");
        assert_eq!(json["severity"], "error");
        assert_eq!(json["line"], 1);
        assert_eq!(json["column"], 1);
        assert_eq!(json["endLine"], 1);
        assert_eq!(json["endColumn"], 6);
        assert!(json.get("hint").is_none());
    }

    #[test]
    fn wire_shape_carries_hint_when_present() {
        let diagnostic = Diagnostic::error(
            DiagnosticCode::Syn001,
            "Keyword DECLARE must be uppercase in strict mode",
            Span::on_line(1, 1, 7),
        )
        .with_hint("write 'DECLARE'");
        let json = serde_json::to_value(&diagnostic).expect("serializes");
        assert_eq!(json["hint"], "write 'DECLARE'");
    }

    #[test]
    fn severity_serializes_lowercase() {
        let json = serde_json::to_value(Severity::Warning).expect("serializes");
        assert_eq!(json, "warning");
    }
}
