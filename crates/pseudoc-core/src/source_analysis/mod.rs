// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Source analysis: lexing and parsing.
//!
//! This module owns the front half of the pipeline — source text in,
//! tokens and AST out — together with the [`Span`] type every later
//! stage shares.

mod lexer;
mod parser;
mod span;
mod token;

#[cfg(test)]
mod lexer_property_tests;

pub use lexer::{lex, Lexer};
pub use parser::parse;
pub use span::Span;
pub use token::{Keyword, Token, TokenKind};
