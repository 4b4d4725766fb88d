// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for the lexer.
//!
//! These tests use `proptest` to verify lexer invariants over generated
//! inputs:
//!
//! 1. **Lexer never panics** — arbitrary string input always produces tokens
//! 2. **EOF is always last** — and only appears once
//! 3. **Spans stay in bounds** — every span starts at or after `(1, 1)` and
//!    is ordered start-before-end
//! 4. **Lexer is deterministic** — same input, same tokens and diagnostics
//! 5. **Valid fragments produce no diagnostics** — known-good inputs lex clean

use proptest::prelude::*;

use super::lexer::lex;
use super::token::TokenKind;

// ============================================================================
// Generators
// ============================================================================

/// Known-valid single-token fragments that should lex without diagnostics.
const VALID_SINGLE_TOKENS: &[&str] = &[
    "42",
    "3.14",
    "\"hello\"",
    "'a'",
    "TRUE",
    "FALSE",
    "Total",
    "x2",
    "+",
    "-",
    "*",
    "/",
    "^",
    "(",
    ")",
    "[",
    "]",
    ":",
    ",",
    "<-",
    "\u{2190}",
    "<=",
    ">=",
    "<>",
    "=",
    "DECLARE",
    "ENDWHILE",
    "SUBSTRING",
];

/// Multi-token valid lines that should lex cleanly.
const VALID_LINES: &[&str] = &[
    "DECLARE Total : INTEGER",
    "Total <- Total + 1",
    "OUTPUT \"Hi\", Name",
    "FOR I <- 1 TO 10 STEP 2",
    "IF X >= 3 AND Y <> 0 THEN",
    "OPENFILE \"F.txt\" FOR READ",
    "RETURN DIV(A, B)",
];

fn valid_single_token() -> impl Strategy<Value = String> {
    prop::sample::select(VALID_SINGLE_TOKENS).prop_map(str::to_string)
}

fn valid_line() -> impl Strategy<Value = String> {
    prop::sample::select(VALID_LINES).prop_map(str::to_string)
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Property 1: the lexer never panics on arbitrary input.
    #[test]
    fn lexer_never_panics(input in "\\PC{0,500}") {
        let _ = lex(&input);
    }

    /// Property 2: EOF is always the final token, exactly once.
    #[test]
    fn eof_is_always_last(input in "\\PC{0,500}") {
        let (tokens, _) = lex(&input);
        prop_assert!(!tokens.is_empty());
        prop_assert!(tokens.last().unwrap().kind().is_eof());
        let eof_count = tokens.iter().filter(|t| t.kind().is_eof()).count();
        prop_assert_eq!(eof_count, 1);
    }

    /// Property 3: spans are one-based and start-before-end ordered.
    #[test]
    fn spans_stay_in_bounds(input in "\\PC{0,500}") {
        let (tokens, diagnostics) = lex(&input);
        for token in &tokens {
            let span = token.span();
            prop_assert!(span.start_line() >= 1);
            prop_assert!(span.start_column() >= 1);
            prop_assert!(span.start() <= span.end(), "span inverted: {span:?}");
        }
        for diagnostic in &diagnostics {
            prop_assert!(diagnostic.span.start() >= (1, 1));
        }
    }

    /// Property 4: lexing is deterministic.
    #[test]
    fn lexer_is_deterministic(input in "\\PC{0,500}") {
        let first = lex(&input);
        let second = lex(&input);
        prop_assert_eq!(first.0, second.0);
        prop_assert_eq!(first.1, second.1);
    }

    /// Property 5a: valid single tokens lex without diagnostics.
    #[test]
    fn valid_tokens_lex_clean(fragment in valid_single_token()) {
        let (tokens, diagnostics) = lex(&fragment);
        prop_assert!(diagnostics.is_empty(), "diagnostics: {diagnostics:?}");
        // fragment plus EOF
        prop_assert_eq!(tokens.len(), 2);
    }

    /// Property 5b: valid lines lex without diagnostics.
    #[test]
    fn valid_lines_lex_clean(line in valid_line()) {
        let (_, diagnostics) = lex(&line);
        prop_assert!(diagnostics.is_empty(), "diagnostics: {diagnostics:?}");
    }

    /// Newline tokens partition the stream by line number: a token after
    /// the n-th newline is on line n+1.
    #[test]
    fn newlines_advance_line_numbers(lines in prop::collection::vec(valid_line(), 1..5)) {
        let source = lines.join("\n");
        let (tokens, _) = lex(&source);
        let mut expected_line = 1;
        for token in &tokens {
            if token.kind().is_eof() {
                break;
            }
            prop_assert_eq!(token.span().start_line(), expected_line);
            if token.kind() == TokenKind::Newline {
                expected_line += 1;
            }
        }
    }
}
