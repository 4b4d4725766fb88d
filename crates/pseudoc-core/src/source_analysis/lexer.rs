// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis for pseudocode source text.
//!
//! Converts UTF-8 source into a stream of [`Token`]s plus diagnostics. The
//! lexer is hand-written for full control over error recovery: it never
//! fails, never panics, and always appends a terminal EOF token.
//!
//! # Scanning rules
//!
//! - Spaces, tabs and carriage returns are skipped; `//` comments run to
//!   end of line and are skipped.
//! - Newlines emit a first-class [`TokenKind::Newline`] token.
//! - The assignment arrow is `←` (U+2190) or the two-character `<-`.
//! - Keywords are recognised case-insensitively but must be written in
//!   uppercase; other spellings lex as the keyword and earn `SYN001`.
//! - Unterminated string/character literals still yield their partial
//!   content so the parser can keep going (`SYN008`/`SYN009`).
//!
//! # Example
//!
//! ```
//! use pseudoc_core::source_analysis::{lex, TokenKind};
//!
//! let (tokens, diagnostics) = lex("OUTPUT 42");
//! assert!(diagnostics.is_empty());
//! // OUTPUT, 42, EOF
//! assert_eq!(tokens.len(), 3);
//! assert_eq!(tokens[2].kind(), TokenKind::Eof);
//! ```

use std::iter::Peekable;
use std::str::Chars;

use ecow::{eco_format, EcoString};

use crate::diagnostics::{Diagnostic, DiagnosticCode};

use super::{Keyword, Span, Token, TokenKind};

/// The character-literal quote, with its lookalike `ꞌ` (U+A78C) accepted
/// as an equivalent opener and closer.
const CHAR_QUOTES: [char; 2] = ['\'', '\u{A78C}'];

/// Tokenizes source text into `(tokens, diagnostics)`.
///
/// The returned token vector always ends with an EOF token, and the
/// diagnostics list holds any lexical findings in source order.
#[must_use]
pub fn lex(source: &str) -> (Vec<Token>, Vec<Diagnostic>) {
    Lexer::new(source).tokenize()
}

/// A lexer over pseudocode source text.
///
/// Tracks one-based line and column positions in characters, not bytes,
/// so spans line up with what an editor displays.
pub struct Lexer<'src> {
    chars: Peekable<Chars<'src>>,
    line: u32,
    column: u32,
    tokens: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
}

impl std::fmt::Debug for Lexer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("line", &self.line)
            .field("column", &self.column)
            .field("tokens", &self.tokens.len())
            .finish()
    }
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source text.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
            column: 1,
            tokens: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Runs the lexer to completion.
    #[must_use]
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<Diagnostic>) {
        while let Some(c) = self.peek_char() {
            self.scan_char(c);
        }
        let eof_span = Span::point(self.line, self.column);
        self.tokens.push(Token::new(TokenKind::Eof, "", eof_span));
        (self.tokens, self.diagnostics)
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn peek_char_n(&self, n: usize) -> Option<char> {
        let mut iter = self.chars.clone();
        for _ in 0..n {
            iter.next();
        }
        iter.next()
    }

    /// Consumes one character, advancing the column counter.
    ///
    /// Newline bookkeeping is done by the newline arm of [`Self::scan_char`],
    /// not here, so the emitted NEWLINE token spans its own column.
    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.column += 1;
        Some(c)
    }

    fn advance_while(&mut self, predicate: impl Fn(char) -> bool, buffer: &mut EcoString) {
        while let Some(c) = self.peek_char() {
            if !predicate(c) {
                break;
            }
            self.advance();
            buffer.push(c);
        }
    }

    fn push_token(&mut self, kind: TokenKind, lexeme: impl Into<EcoString>, span: Span) {
        self.tokens.push(Token::new(kind, lexeme, span));
    }

    fn span_from(&self, start_column: u32) -> Span {
        Span::new(self.line, start_column, self.line, self.column)
    }

    fn scan_char(&mut self, c: char) {
        match c {
            ' ' | '\t' | '\r' => {
                self.advance();
            }
            '\n' => {
                let span = Span::point(self.line, self.column);
                self.advance();
                self.push_token(TokenKind::Newline, "\n", span);
                self.line += 1;
                self.column = 1;
            }
            '/' if self.peek_char_n(1) == Some('/') => {
                while self.peek_char().is_some_and(|c| c != '\n') {
                    self.advance();
                }
            }
            '\u{2190}' => {
                let start = self.column;
                self.advance();
                self.push_token(TokenKind::Assign, "\u{2190}", self.span_from(start));
            }
            '<' => self.lex_angle_left(),
            '>' => self.lex_angle_right(),
            '"' => self.lex_string(),
            c if CHAR_QUOTES.contains(&c) => self.lex_char(c),
            '0'..='9' => self.lex_number(),
            'A'..='Z' | 'a'..='z' => self.lex_word(),
            ':' => self.lex_single(TokenKind::Colon, c),
            ',' => self.lex_single(TokenKind::Comma, c),
            '(' => self.lex_single(TokenKind::LeftParen, c),
            ')' => self.lex_single(TokenKind::RightParen, c),
            '[' => self.lex_single(TokenKind::LeftBracket, c),
            ']' => self.lex_single(TokenKind::RightBracket, c),
            '+' => self.lex_single(TokenKind::Plus, c),
            '-' => self.lex_single(TokenKind::Minus, c),
            '*' => self.lex_single(TokenKind::Star, c),
            '/' => self.lex_single(TokenKind::Slash, c),
            '^' => self.lex_single(TokenKind::Caret, c),
            '=' => self.lex_single(TokenKind::Equal, c),
            _ => {
                let span = Span::point(self.line, self.column);
                self.advance();
                self.diagnostics.push(Diagnostic::error(
                    DiagnosticCode::Syn002,
                    eco_format!("Unexpected character '{c}'"),
                    span,
                ));
            }
        }
    }

    fn lex_single(&mut self, kind: TokenKind, c: char) {
        let span = Span::point(self.line, self.column);
        self.advance();
        let mut lexeme = EcoString::new();
        lexeme.push(c);
        self.push_token(kind, lexeme, span);
    }

    /// `<-` (assignment), `<=`, `<>`, or `<`.
    fn lex_angle_left(&mut self) {
        let start = self.column;
        self.advance();
        let (kind, lexeme) = match self.peek_char() {
            Some('-') => {
                self.advance();
                (TokenKind::Assign, "<-")
            }
            Some('=') => {
                self.advance();
                (TokenKind::LessEqual, "<=")
            }
            Some('>') => {
                self.advance();
                (TokenKind::NotEqual, "<>")
            }
            _ => (TokenKind::Less, "<"),
        };
        self.push_token(kind, lexeme, self.span_from(start));
    }

    /// `>=` or `>`.
    fn lex_angle_right(&mut self) {
        let start = self.column;
        self.advance();
        let (kind, lexeme) = if self.peek_char() == Some('=') {
            self.advance();
            (TokenKind::GreaterEqual, ">=")
        } else {
            (TokenKind::Greater, ">")
        };
        self.push_token(kind, lexeme, self.span_from(start));
    }

    /// A double-quoted string literal.
    ///
    /// Runs to the closing quote, end of line, or end of file. When
    /// unterminated, emits `SYN008` but still yields a `StringLiteral`
    /// token containing everything read so far.
    fn lex_string(&mut self) {
        let start = self.column;
        self.advance(); // opening "
        let mut content = EcoString::new();
        self.advance_while(|c| c != '"' && c != '\n', &mut content);
        if self.peek_char() == Some('"') {
            self.advance();
        } else {
            self.diagnostics.push(Diagnostic::error(
                DiagnosticCode::Syn008,
                "Unterminated string literal",
                self.span_from(start),
            ));
        }
        self.push_token(TokenKind::StringLiteral, content, self.span_from(start));
    }

    /// A character literal, quoted by `'` or its lookalike `ꞌ`.
    fn lex_char(&mut self, _open: char) {
        let start = self.column;
        self.advance(); // opening quote
        let mut content = EcoString::new();
        self.advance_while(|c| !CHAR_QUOTES.contains(&c) && c != '\n', &mut content);
        if self.peek_char().is_some_and(|c| CHAR_QUOTES.contains(&c)) {
            self.advance();
        } else {
            self.diagnostics.push(Diagnostic::error(
                DiagnosticCode::Syn009,
                "Unterminated character literal",
                self.span_from(start),
            ));
        }
        self.push_token(TokenKind::CharLiteral, content, self.span_from(start));
    }

    /// An integer literal, or a real literal when a `.` is followed by
    /// another digit.
    fn lex_number(&mut self) {
        let start = self.column;
        let mut text = EcoString::new();
        self.advance_while(|c| c.is_ascii_digit(), &mut text);

        let is_real = self.peek_char() == Some('.')
            && self.peek_char_n(1).is_some_and(|c| c.is_ascii_digit());
        if is_real {
            self.advance();
            text.push('.');
            self.advance_while(|c| c.is_ascii_digit(), &mut text);
            self.push_token(TokenKind::RealLiteral, text, self.span_from(start));
        } else {
            self.push_token(TokenKind::IntegerLiteral, text, self.span_from(start));
        }
    }

    /// An identifier or keyword: `[A-Za-z][A-Za-z0-9]*`.
    ///
    /// The uppercased spelling is looked up in the keyword set. A match in
    /// any other casing still classifies as that keyword so parsing can
    /// continue, but earns `SYN001` under the strict-mode casing rule.
    fn lex_word(&mut self) {
        let start = self.column;
        let mut text = EcoString::new();
        self.advance_while(|c| c.is_ascii_alphanumeric(), &mut text);
        let span = self.span_from(start);

        let uppercase: EcoString = text.chars().map(|c| c.to_ascii_uppercase()).collect();
        if let Some(keyword) = Keyword::from_uppercase(&uppercase) {
            if text != uppercase {
                self.diagnostics.push(
                    Diagnostic::error(
                        DiagnosticCode::Syn001,
                        eco_format!("Keyword {uppercase} must be uppercase in strict mode"),
                        span,
                    )
                    .with_hint(eco_format!("write '{uppercase}'")),
                );
            }
            self.push_token(TokenKind::Keyword(keyword), text, span);
        } else {
            self.push_token(TokenKind::Identifier, text, span);
        }
    }
}
