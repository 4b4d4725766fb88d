// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Expression parsing.
//!
//! Expressions are parsed with Pratt-style operator-precedence climbing
//! over the binding-power table in the parent module. Primaries cover
//! literals, parenthesized expressions, identifiers (with optional call
//! arguments or array indices), and built-in routine names, which lex as
//! keywords but are also accepted as call heads.

use ecow::eco_format;

use crate::ast::{Expression, Identifier, Literal, UnaryOp};
use crate::diagnostics::DiagnosticCode;
use crate::source_analysis::{Keyword, TokenKind};

use super::{binary_binding_power, Parser};

impl Parser {
    // ========================================================================
    // Expression Parsing
    // ========================================================================

    /// Parses any expression.
    ///
    /// Returns `None` when no expression could be started; a `SYN020`
    /// diagnostic has been reported and the current token is untouched so
    /// the caller can run line-level recovery.
    pub(super) fn parse_expression(&mut self) -> Option<Expression> {
        self.parse_binary_expression(0)
    }

    /// Precedence-climbing loop for binary operators.
    ///
    /// Self-recursive (right operands, and parenthesized primaries come
    /// back through here), so each entry takes one nesting level; the
    /// depth guard turns runaway nesting into `SYN076` instead of a
    /// stack overflow.
    fn parse_binary_expression(&mut self, min_binding_power: u8) -> Option<Expression> {
        if !self.enter_nesting() {
            return None;
        }
        let result = self.parse_binary_operand(min_binding_power);
        self.leave_nesting();
        result
    }

    fn parse_binary_operand(&mut self, min_binding_power: u8) -> Option<Expression> {
        let mut left = self.parse_unary_expression()?;

        while let Some((op, power)) = binary_binding_power(self.current_kind()) {
            if power.left < min_binding_power {
                break;
            }
            self.advance();
            let right = self.parse_binary_expression(power.right)?;
            let span = left.span().merge(right.span());
            left = Expression::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                span,
            };
        }

        Some(left)
    }

    /// Unary prefix `-` and `NOT` bind tighter than every binary operator.
    ///
    /// Stacked prefixes recurse here without passing through
    /// [`Self::parse_binary_expression`], so this recursion carries its
    /// own nesting level.
    fn parse_unary_expression(&mut self) -> Option<Expression> {
        let op = match self.current_kind() {
            TokenKind::Minus => Some(UnaryOp::Negate),
            TokenKind::Keyword(Keyword::Not) => Some(UnaryOp::Not),
            _ => None,
        };

        if let Some(op) = op {
            let start = self.current_span();
            self.advance();
            if !self.enter_nesting() {
                return None;
            }
            let operand = self.parse_unary_expression();
            self.leave_nesting();
            let operand = operand?;
            let span = start.merge(operand.span());
            return Some(Expression::Unary {
                op,
                operand: Box::new(operand),
                span,
            });
        }

        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Option<Expression> {
        match self.current_kind() {
            TokenKind::IntegerLiteral => {
                let token = self.advance();
                // Out-of-range literals saturate; the value is unusable
                // anyway once the magnitude exceeds i64.
                let value = token.lexeme().parse().unwrap_or(i64::MAX);
                Some(Expression::Literal {
                    value: Literal::Integer(value),
                    span: token.span(),
                })
            }
            TokenKind::RealLiteral => {
                let token = self.advance();
                let value = token.lexeme().parse().unwrap_or(f64::MAX);
                Some(Expression::Literal {
                    value: Literal::Real(value),
                    span: token.span(),
                })
            }
            TokenKind::StringLiteral => {
                let token = self.advance();
                Some(Expression::Literal {
                    value: Literal::String(token.lexeme().into()),
                    span: token.span(),
                })
            }
            TokenKind::CharLiteral => {
                let token = self.advance();
                Some(Expression::Literal {
                    value: Literal::Char(token.lexeme().into()),
                    span: token.span(),
                })
            }
            TokenKind::Keyword(Keyword::True) => {
                let token = self.advance();
                Some(Expression::Literal {
                    value: Literal::Boolean(true),
                    span: token.span(),
                })
            }
            TokenKind::Keyword(Keyword::False) => {
                let token = self.advance();
                Some(Expression::Literal {
                    value: Literal::Boolean(false),
                    span: token.span(),
                })
            }
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect_kind(
                    TokenKind::RightParen,
                    DiagnosticCode::Syn021,
                    "Expected ')' to close parenthesized expression",
                )?;
                Some(inner)
            }
            TokenKind::Identifier => {
                let token = self.advance();
                let name = Identifier::new(token.lexeme(), token.span());
                self.parse_postfix(name)
            }
            TokenKind::Keyword(keyword) if keyword.is_builtin_routine() => {
                let token = self.advance();
                let name = Identifier::new(keyword.as_str(), token.span());
                if self.check(TokenKind::LeftParen) {
                    self.parse_call(name)
                } else {
                    // A bare builtin name is a zero-argument call; the
                    // analyzer's arity check flags misuse.
                    let span = name.span;
                    Some(Expression::Call {
                        name,
                        args: Vec::new(),
                        span,
                    })
                }
            }
            other => {
                self.error(
                    DiagnosticCode::Syn020,
                    eco_format!("Expected an expression, found {}", other.describe()),
                );
                None
            }
        }
    }

    /// Optional call arguments or array indices after an identifier.
    fn parse_postfix(&mut self, name: Identifier) -> Option<Expression> {
        if self.check(TokenKind::LeftParen) {
            return self.parse_call(name);
        }
        if self.check(TokenKind::LeftBracket) {
            self.advance();
            let indices = self.parse_expression_list()?;
            let close = self.expect_kind(
                TokenKind::RightBracket,
                DiagnosticCode::Syn060,
                "Expected ']' after array indices",
            )?;
            let span = name.span.merge(close.span());
            return Some(Expression::ArrayAccess {
                array: name,
                indices,
                span,
            });
        }
        Some(Expression::Identifier(name))
    }

    /// `( args? )` after a call head.
    fn parse_call(&mut self, name: Identifier) -> Option<Expression> {
        self.advance(); // (
        let args = if self.check(TokenKind::RightParen) {
            Vec::new()
        } else {
            self.parse_expression_list()?
        };
        let close = self.expect_kind(
            TokenKind::RightParen,
            DiagnosticCode::Syn043,
            "Expected ')' after arguments",
        )?;
        let span = name.span.merge(close.span());
        Some(Expression::Call { name, args, span })
    }

    /// A non-empty comma-separated expression list.
    pub(super) fn parse_expression_list(&mut self) -> Option<Vec<Expression>> {
        let mut expressions = vec![self.parse_expression()?];
        while self.match_kind(TokenKind::Comma) {
            expressions.push(self.parse_expression()?);
        }
        Some(expressions)
    }
}
