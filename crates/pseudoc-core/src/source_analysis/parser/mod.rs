// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Recursive descent parser for pseudocode source.
//!
//! The parser builds a [`Program`] from a token stream. It is designed
//! around line-oriented error recovery and comprehensive diagnostics.
//!
//! # Design Philosophy
//!
//! - **Error recovery is mandatory** — the parser MUST always produce a
//!   `Program`, however malformed the input
//! - **Multiple errors** — report all errors, don't stop at the first
//! - **Per-line recovery** — after a statement-level error, discard
//!   tokens up to and including the next newline, then resume
//! - **Blocks close on stop keywords** — each structured statement parses
//!   its body until one of its terminator keywords, so a missing
//!   terminator is reported once, where the body ends
//!
//! # Binary Operator Precedence (Pratt Parsing)
//!
//! Expressions use Pratt parsing (top-down operator precedence) driven by
//! a binding-power table:
//!
//! | Level | Operators | Associativity |
//! |-------|-----------|---------------|
//! | 10 | `OR` | Left |
//! | 20 | `AND` | Left |
//! | 30 | `=` `<` `<=` `>` `>=` `<>` | Left |
//! | 40 | `+` `-` | Left |
//! | 50 | `*` `/` | Left |
//! | 60 | `^` | Right |
//!
//! Unary `-` and `NOT` bind tighter than every binary operator.
//!
//! # Usage
//!
//! ```
//! use pseudoc_core::source_analysis::{lex, parse};
//!
//! let (tokens, mut diagnostics) = lex("OUTPUT 1 + 2");
//! let (program, parse_diagnostics) = parse(tokens);
//! diagnostics.extend(parse_diagnostics);
//!
//! assert!(diagnostics.is_empty());
//! assert_eq!(program.statements.len(), 1);
//! ```

use crate::ast::{Expression, Literal, Program};
use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::source_analysis::{Keyword, Span, Token, TokenKind};
use ecow::EcoString;

// Submodules with additional impl blocks for Parser
mod expressions;
mod statements;


// ============================================================================
// Pratt Parsing for Binary Operator Precedence
// ============================================================================

/// Binding power for binary operators (Pratt parsing).
///
/// Higher values bind tighter. Left and right binding powers differ
/// for associativity:
/// - Left-associative: `left == right - 1` (e.g., `+`, `-`)
/// - Right-associative: `left == right + 1` (e.g., `^`)
#[derive(Debug, Clone, Copy)]
pub(super) struct BindingPower {
    /// How tightly this operator binds to its left operand.
    pub(super) left: u8,
    /// How tightly this operator binds to its right operand.
    pub(super) right: u8,
}

impl BindingPower {
    /// Creates a left-associative binding power.
    const fn left_assoc(precedence: u8) -> Self {
        Self {
            left: precedence,
            right: precedence + 1,
        }
    }

    /// Creates a right-associative binding power.
    const fn right_assoc(precedence: u8) -> Self {
        Self {
            left: precedence + 1,
            right: precedence,
        }
    }
}

/// Gets the operator and binding power for a binary operator token.
///
/// Returns `None` for tokens that are not binary operators, which ends
/// binary expression parsing — useful for error recovery.
pub(super) fn binary_binding_power(
    kind: TokenKind,
) -> Option<(crate::ast::BinaryOp, BindingPower)> {
    use crate::ast::BinaryOp;

    let entry = match kind {
        TokenKind::Keyword(Keyword::Or) => (BinaryOp::Or, BindingPower::left_assoc(10)),
        TokenKind::Keyword(Keyword::And) => (BinaryOp::And, BindingPower::left_assoc(20)),

        TokenKind::Equal => (BinaryOp::Equal, BindingPower::left_assoc(30)),
        TokenKind::NotEqual => (BinaryOp::NotEqual, BindingPower::left_assoc(30)),
        TokenKind::Less => (BinaryOp::Less, BindingPower::left_assoc(30)),
        TokenKind::LessEqual => (BinaryOp::LessEqual, BindingPower::left_assoc(30)),
        TokenKind::Greater => (BinaryOp::Greater, BindingPower::left_assoc(30)),
        TokenKind::GreaterEqual => (BinaryOp::GreaterEqual, BindingPower::left_assoc(30)),

        TokenKind::Plus => (BinaryOp::Add, BindingPower::left_assoc(40)),
        TokenKind::Minus => (BinaryOp::Subtract, BindingPower::left_assoc(40)),

        TokenKind::Star => (BinaryOp::Multiply, BindingPower::left_assoc(50)),
        TokenKind::Slash => (BinaryOp::Divide, BindingPower::left_assoc(50)),

        TokenKind::Caret => (BinaryOp::Power, BindingPower::right_assoc(60)),

        _ => return None,
    };
    Some(entry)
}

/// Parses a token stream into a program.
///
/// This is the main entry point for parsing. It always returns a
/// [`Program`], even when there are syntax errors; check the returned
/// diagnostics for those.
#[must_use]
pub fn parse(tokens: Vec<Token>) -> (Program, Vec<Diagnostic>) {
    let mut parser = Parser::new(tokens);
    let program = parser.parse_program();
    (program, parser.diagnostics)
}

/// Maximum expression nesting depth.
///
/// Recursive descent drives the call stack, so unbounded nesting in
/// source text (`((((…))))`, `NOT NOT NOT …`) would overflow it. Past
/// this bound the parser reports `SYN076` and abandons the expression.
/// The bound is far above anything a real program nests.
const MAX_NESTING_DEPTH: usize = 64;

/// Block terminator keywords that may legally follow a statement without
/// an intervening newline (the enclosing construct consumes them).
const BLOCK_TERMINATORS: &[Keyword] = &[
    Keyword::Else,
    Keyword::Endif,
    Keyword::Otherwise,
    Keyword::Endcase,
    Keyword::Next,
    Keyword::Until,
    Keyword::Endwhile,
    Keyword::Endprocedure,
    Keyword::Endfunction,
];

/// The parser state.
pub(super) struct Parser {
    /// The tokens being parsed. Always ends with EOF.
    pub(super) tokens: Vec<Token>,
    /// Current token index.
    pub(super) current: usize,
    /// Accumulated diagnostics.
    pub(super) diagnostics: Vec<Diagnostic>,
    /// Current expression nesting depth (see [`MAX_NESTING_DEPTH`]).
    pub(super) depth: usize,
}

impl Parser {
    /// Creates a new parser for the given tokens.
    fn new(tokens: Vec<Token>) -> Self {
        let tokens = if tokens.is_empty() {
            // Defensive: the lexer always appends EOF, but an empty vector
            // must not be able to panic the parser.
            vec![Token::new(TokenKind::Eof, "", Span::default())]
        } else {
            tokens
        };
        Self {
            tokens,
            current: 0,
            diagnostics: Vec::new(),
            depth: 0,
        }
    }

    // ========================================================================
    // Token Management
    // ========================================================================

    /// Returns the current token.
    pub(super) fn current_token(&self) -> &Token {
        self.tokens
            .get(self.current)
            .unwrap_or_else(|| self.tokens.last().expect("token vector is never empty"))
    }

    /// Returns the current token kind.
    pub(super) fn current_kind(&self) -> TokenKind {
        self.current_token().kind()
    }

    /// Returns the span of the current token.
    pub(super) fn current_span(&self) -> Span {
        self.current_token().span()
    }

    /// Checks if we're at the end of input.
    pub(super) fn is_at_end(&self) -> bool {
        self.current_kind().is_eof()
    }

    /// Advances to the next token and returns the previous one.
    pub(super) fn advance(&mut self) -> Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.tokens[self.current.saturating_sub(1)].clone()
    }

    /// Returns the span of the most recently consumed token.
    pub(super) fn previous_span(&self) -> Span {
        self.tokens[self.current.saturating_sub(1)].span()
    }

    /// Checks if the current token has exactly the given kind.
    pub(super) fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Checks if the current token is the given keyword.
    pub(super) fn check_keyword(&self, keyword: Keyword) -> bool {
        self.current_kind() == TokenKind::Keyword(keyword)
    }

    /// Consumes the current token if it has the given kind.
    pub(super) fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes the current token if it is the given keyword.
    pub(super) fn match_keyword(&mut self, keyword: Keyword) -> bool {
        self.match_kind(TokenKind::Keyword(keyword))
    }

    /// Expects a token of the given kind, advancing past it.
    ///
    /// Reports `code` at the current token and returns `None` otherwise.
    pub(super) fn expect_kind(
        &mut self,
        kind: TokenKind,
        code: DiagnosticCode,
        message: &str,
    ) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            self.error(code, message);
            None
        }
    }

    /// Expects the given keyword, advancing past it.
    pub(super) fn expect_keyword(
        &mut self,
        keyword: Keyword,
        code: DiagnosticCode,
        message: &str,
    ) -> Option<Token> {
        self.expect_kind(TokenKind::Keyword(keyword), code, message)
    }

    // ========================================================================
    // Error Handling & Recovery
    // ========================================================================

    /// Reports an error at the current token.
    pub(super) fn error(&mut self, code: DiagnosticCode, message: impl Into<EcoString>) {
        let span = self.current_span();
        self.diagnostics.push(Diagnostic::error(code, message, span));
    }

    /// Discards tokens up to and including the next newline.
    ///
    /// This is the statement-level recovery point: the rest of the broken
    /// line is abandoned and parsing resumes at the start of the next one.
    pub(super) fn recover_to_line_end(&mut self) {
        while !self.is_at_end() && !self.check(TokenKind::Newline) {
            self.advance();
        }
        self.match_kind(TokenKind::Newline);
    }

    /// Skips any run of newline tokens.
    pub(super) fn skip_newlines(&mut self) {
        while self.match_kind(TokenKind::Newline) {}
    }

    /// Enters one level of expression nesting.
    ///
    /// Returns `false` (with `SYN076` reported) once the depth bound is
    /// reached; callers abandon the expression and recovery takes over.
    /// Every `true` return must be paired with [`Self::leave_nesting`].
    pub(super) fn enter_nesting(&mut self) -> bool {
        if self.depth >= MAX_NESTING_DEPTH {
            self.error(DiagnosticCode::Syn076, "Expression nesting is too deep");
            return false;
        }
        self.depth += 1;
        true
    }

    /// Leaves one level of expression nesting.
    pub(super) fn leave_nesting(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// A placeholder expression standing in for one that failed to parse.
    ///
    /// Typed BOOLEAN so enclosing condition checks don't cascade; the
    /// syntax error it replaces already blocks emission.
    pub(super) fn error_expression(&self, span: Span) -> Expression {
        Expression::Literal {
            value: Literal::Boolean(true),
            span,
        }
    }

    /// Consumes the end of a simple statement's line.
    ///
    /// Accepts a newline (consumed), end of file, or a block terminator
    /// keyword left for the enclosing construct. Anything else is `SYN005`
    /// and the rest of the line is discarded.
    pub(super) fn end_statement_line(&mut self) {
        if self.match_kind(TokenKind::Newline) || self.is_at_end() {
            return;
        }
        if let TokenKind::Keyword(keyword) = self.current_kind() {
            if BLOCK_TERMINATORS.contains(&keyword) {
                return;
            }
        }
        let found = self.current_kind().describe();
        self.error(
            DiagnosticCode::Syn005,
            ecow::eco_format!("Expected end of line after statement, found {found}"),
        );
        self.recover_to_line_end();
    }

    // ========================================================================
    // Program Parsing
    // ========================================================================

    /// Parses a complete program (top-level).
    fn parse_program(&mut self) -> Program {
        let start = self.current_span();
        let mut statements = Vec::new();

        self.skip_newlines();
        while !self.is_at_end() {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            self.skip_newlines();
        }

        let span = start.merge(self.previous_span());
        Program::new(statements, span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Statement;
    use crate::source_analysis::lex;

    pub(crate) fn parse_source(source: &str) -> (Program, Vec<Diagnostic>) {
        let (tokens, mut diagnostics) = lex(source);
        let (program, parse_diagnostics) = parse(tokens);
        diagnostics.extend(parse_diagnostics);
        (program, diagnostics)
    }

    fn codes(source: &str) -> Vec<DiagnosticCode> {
        let (_, diagnostics) = parse_source(source);
        diagnostics.iter().map(|d| d.code).collect()
    }

    #[test]
    fn empty_program() {
        let (program, diagnostics) = parse_source("");
        assert!(program.statements.is_empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn blank_lines_and_comments_only() {
        let (program, diagnostics) = parse_source("\n\n// nothing here\n\n");
        assert!(program.statements.is_empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn statement_dispatch_rejects_stray_operator() {
        assert_eq!(codes("+ 1"), vec![DiagnosticCode::Syn004]);
    }

    #[test]
    fn recovery_resumes_on_next_line() {
        let (program, diagnostics) = parse_source("+ nonsense here\nOUTPUT 1");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::Syn004);
        assert_eq!(program.statements.len(), 1);
        assert!(matches!(program.statements[0], Statement::Output { .. }));
    }

    #[test]
    fn trailing_junk_after_statement() {
        let (program, diagnostics) = parse_source("OUTPUT 1 2\nOUTPUT 3");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::Syn005);
        // Both statements survive; the junk is discarded.
        assert_eq!(program.statements.len(), 2);
    }
}
