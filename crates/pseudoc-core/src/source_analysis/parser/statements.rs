// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Statement parsing.
//!
//! Statements dispatch on their leading keyword (or identifier, for
//! assignments). Structured statements parse their bodies with
//! [`Parser::parse_statements`], which stops at the construct's
//! terminator keywords; a missing terminator is reported where the body
//! ran out.

use ecow::eco_format;

use crate::ast::{
    CaseClause, Expression, FileMode, Identifier, Parameter, Statement, TypeName, TypeSpec,
};
use crate::diagnostics::DiagnosticCode;
use crate::source_analysis::{Keyword, TokenKind};

use super::Parser;

impl Parser {
    // ========================================================================
    // Statement Dispatch
    // ========================================================================

    /// Parses one statement, or recovers to the next line and returns
    /// `None` when the current line cannot form one.
    pub(super) fn parse_statement(&mut self) -> Option<Statement> {
        match self.current_kind() {
            TokenKind::Keyword(keyword) => match keyword {
                Keyword::Declare => self.parse_declare(),
                Keyword::Constant => self.parse_constant(),
                Keyword::Input => self.parse_input(),
                Keyword::Output => self.parse_output(),
                Keyword::If => self.parse_if(),
                Keyword::Case => self.parse_case(),
                Keyword::For => self.parse_for(),
                Keyword::Repeat => self.parse_repeat(),
                Keyword::While => self.parse_while(),
                Keyword::Procedure => self.parse_procedure(),
                Keyword::Function => self.parse_function(),
                Keyword::Call => self.parse_call_statement(),
                Keyword::Return => self.parse_return(),
                Keyword::Openfile => self.parse_openfile(),
                Keyword::Readfile => self.parse_readfile(),
                Keyword::Writefile => self.parse_writefile(),
                Keyword::Closefile => self.parse_closefile(),
                other => {
                    self.error(
                        DiagnosticCode::Syn004,
                        eco_format!("{other} cannot start a statement"),
                    );
                    self.recover_to_line_end();
                    None
                }
            },
            TokenKind::Identifier => self.parse_assignment(),
            other => {
                self.error(
                    DiagnosticCode::Syn004,
                    eco_format!("Expected a statement, found {}", other.describe()),
                );
                self.recover_to_line_end();
                None
            }
        }
    }

    /// Parses statements until one of the stop keywords (or EOF).
    ///
    /// The stop keyword itself is left for the caller to consume, so a
    /// missing terminator surfaces exactly once, in the caller.
    fn parse_statements(&mut self, stop: &[Keyword]) -> Vec<Statement> {
        let mut statements = Vec::new();
        loop {
            self.skip_newlines();
            if self.is_at_end() {
                break;
            }
            if let TokenKind::Keyword(keyword) = self.current_kind() {
                if stop.contains(&keyword) {
                    break;
                }
            }
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
        }
        statements
    }

    /// Expects an identifier token and converts it to an [`Identifier`].
    fn expect_identifier(&mut self, code: DiagnosticCode, message: &str) -> Option<Identifier> {
        let token = self.expect_kind(TokenKind::Identifier, code, message)?;
        Some(Identifier::new(token.lexeme(), token.span()))
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    /// `DECLARE Ident : Type`
    fn parse_declare(&mut self) -> Option<Statement> {
        let start = self.advance().span();
        let Some(name) =
            self.expect_identifier(DiagnosticCode::Syn010, "Expected identifier after DECLARE")
        else {
            self.recover_to_line_end();
            return None;
        };
        if self
            .expect_kind(
                TokenKind::Colon,
                DiagnosticCode::Syn011,
                "Expected ':' between name and type",
            )
            .is_none()
        {
            self.recover_to_line_end();
            return None;
        }
        let Some(type_spec) = self.parse_type() else {
            self.recover_to_line_end();
            return None;
        };
        let span = start.merge(type_spec.span());
        self.end_statement_line();
        Some(Statement::Declare {
            name,
            type_spec,
            span,
        })
    }

    /// A basic type name, or `ARRAY[lo:hi(,lo:hi)?] OF Type`.
    fn parse_type(&mut self) -> Option<TypeSpec> {
        if self.check_keyword(Keyword::Array) {
            return self.parse_array_type();
        }
        let Some(name) = self.basic_type_name() else {
            self.error(DiagnosticCode::Syn012, "Expected a type name");
            return None;
        };
        let span = self.advance().span();
        Some(TypeSpec::Basic { name, span })
    }

    /// Maps the current token to a basic type name, without consuming.
    fn basic_type_name(&self) -> Option<TypeName> {
        match self.current_kind() {
            TokenKind::Keyword(Keyword::Integer) => Some(TypeName::Integer),
            TokenKind::Keyword(Keyword::Real) => Some(TypeName::Real),
            TokenKind::Keyword(Keyword::Char) => Some(TypeName::Char),
            TokenKind::Keyword(Keyword::String) => Some(TypeName::String),
            TokenKind::Keyword(Keyword::Boolean) => Some(TypeName::Boolean),
            _ => None,
        }
    }

    fn parse_array_type(&mut self) -> Option<TypeSpec> {
        let start = self.advance().span(); // ARRAY
        self.expect_kind(
            TokenKind::LeftBracket,
            DiagnosticCode::Syn015,
            "Expected '[' after ARRAY",
        )?;

        let mut dimensions = vec![self.parse_bound_pair()?];
        if self.match_kind(TokenKind::Comma) {
            dimensions.push(self.parse_bound_pair()?);
        }

        self.expect_kind(
            TokenKind::RightBracket,
            DiagnosticCode::Syn015,
            "Expected ']' after array bounds",
        )?;
        self.expect_keyword(
            Keyword::Of,
            DiagnosticCode::Syn016,
            "Expected OF after array bounds",
        )?;

        let Some(element) = self.basic_type_name() else {
            self.error(DiagnosticCode::Syn012, "Expected a type name after OF");
            return None;
        };
        let end = self.advance().span();
        Some(TypeSpec::Array {
            element,
            dimensions,
            span: start.merge(end),
        })
    }

    /// `lo : hi` where both are optionally negated integer literals.
    fn parse_bound_pair(&mut self) -> Option<(i64, i64)> {
        let lower = self.parse_array_bound()?;
        self.expect_kind(
            TokenKind::Colon,
            DiagnosticCode::Syn014,
            "Expected ':' between array bounds",
        )?;
        let upper = self.parse_array_bound()?;
        Some((lower, upper))
    }

    fn parse_array_bound(&mut self) -> Option<i64> {
        let negative = self.match_kind(TokenKind::Minus);
        let Some(token) = self.expect_kind(
            TokenKind::IntegerLiteral,
            DiagnosticCode::Syn013,
            "Array bounds must be integer literals",
        ) else {
            return None;
        };
        let magnitude: i64 = token.lexeme().parse().unwrap_or(i64::MAX);
        Some(if negative { -magnitude } else { magnitude })
    }

    /// `CONSTANT Ident <- Expr`
    fn parse_constant(&mut self) -> Option<Statement> {
        let start = self.advance().span();
        let Some(name) =
            self.expect_identifier(DiagnosticCode::Syn010, "Expected identifier after CONSTANT")
        else {
            self.recover_to_line_end();
            return None;
        };
        if self
            .expect_kind(
                TokenKind::Assign,
                DiagnosticCode::Syn019,
                "Expected '<-' after constant name",
            )
            .is_none()
        {
            self.recover_to_line_end();
            return None;
        }
        let Some(value) = self.parse_expression() else {
            self.recover_to_line_end();
            return None;
        };
        let span = start.merge(value.span());
        self.end_statement_line();
        Some(Statement::Constant { name, value, span })
    }

    // ========================================================================
    // Assignment and I/O
    // ========================================================================

    /// An identifier or array-element target position.
    fn parse_target(&mut self) -> Option<Expression> {
        let name = self.expect_identifier(DiagnosticCode::Syn010, "Expected an identifier")?;
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

    /// `target <- expr`
    fn parse_assignment(&mut self) -> Option<Statement> {
        let Some(target) = self.parse_target() else {
            self.recover_to_line_end();
            return None;
        };
        if self
            .expect_kind(
                TokenKind::Assign,
                DiagnosticCode::Syn019,
                "Expected '<-' in assignment",
            )
            .is_none()
        {
            self.recover_to_line_end();
            return None;
        }
        let Some(value) = self.parse_expression() else {
            self.recover_to_line_end();
            return None;
        };
        let span = target.span().merge(value.span());
        self.end_statement_line();
        Some(Statement::Assignment {
            target,
            value,
            span,
        })
    }

    /// `INPUT target`
    fn parse_input(&mut self) -> Option<Statement> {
        let start = self.advance().span();
        let Some(target) = self.parse_target() else {
            self.recover_to_line_end();
            return None;
        };
        let span = start.merge(target.span());
        self.end_statement_line();
        Some(Statement::Input { target, span })
    }

    /// `OUTPUT expr (, expr)*`
    fn parse_output(&mut self) -> Option<Statement> {
        let start = self.advance().span();
        let Some(values) = self.parse_expression_list() else {
            self.recover_to_line_end();
            return None;
        };
        let end = values.last().map_or(start, Expression::span);
        let span = start.merge(end);
        self.end_statement_line();
        Some(Statement::Output { values, span })
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// `IF cond THEN ... (ELSE ...)? ENDIF`
    fn parse_if(&mut self) -> Option<Statement> {
        let start = self.advance().span();

        let condition = match self.parse_expression() {
            Some(condition) => {
                self.expect_keyword(
                    Keyword::Then,
                    DiagnosticCode::Syn017,
                    "Expected THEN after IF condition",
                );
                condition
            }
            None => {
                self.recover_to_line_end();
                self.error_expression(start)
            }
        };

        let then_branch = self.parse_statements(&[Keyword::Else, Keyword::Endif]);
        let else_branch = if self.match_keyword(Keyword::Else) {
            Some(self.parse_statements(&[Keyword::Endif]))
        } else {
            None
        };

        let end = if self.check_keyword(Keyword::Endif) {
            self.advance().span()
        } else {
            self.error(DiagnosticCode::Syn018, "Expected ENDIF to close IF");
            self.previous_span()
        };
        self.end_statement_line();
        Some(Statement::If {
            condition,
            then_branch,
            else_branch,
            span: start.merge(end),
        })
    }

    /// `CASE OF expr NEWLINE (value : stmt | OTHERWISE stmt)* ENDCASE`
    fn parse_case(&mut self) -> Option<Statement> {
        let start = self.advance().span();
        self.expect_keyword(Keyword::Of, DiagnosticCode::Syn022, "Expected OF after CASE");

        let subject = match self.parse_expression() {
            Some(subject) => subject,
            None => {
                self.recover_to_line_end();
                self.error_expression(start)
            }
        };
        self.end_statement_line();

        let mut clauses = Vec::new();
        let mut otherwise: Option<Box<Statement>> = None;
        let end = loop {
            self.skip_newlines();
            if self.check_keyword(Keyword::Endcase) {
                break self.advance().span();
            }
            if self.is_at_end() {
                self.error(DiagnosticCode::Syn024, "Expected ENDCASE to close CASE");
                break self.previous_span();
            }

            if self.match_keyword(Keyword::Otherwise) {
                if let Some(body) = self.parse_case_clause_body() {
                    otherwise = Some(Box::new(body));
                }
                continue;
            }

            let Some(value) = self.parse_expression() else {
                self.recover_to_line_end();
                continue;
            };
            if self
                .expect_kind(
                    TokenKind::Colon,
                    DiagnosticCode::Syn031,
                    "Expected ':' after CASE value",
                )
                .is_none()
            {
                self.recover_to_line_end();
                continue;
            }
            if let Some(body) = self.parse_case_clause_body() {
                let span = value.span().merge(body.span());
                clauses.push(CaseClause {
                    value,
                    body: Box::new(body),
                    span,
                });
            }
        };

        self.end_statement_line();
        Some(Statement::Case {
            subject,
            clauses,
            otherwise,
            span: start.merge(end),
        })
    }

    /// The single statement of a CASE clause, which must begin on the
    /// same line as its `:` or `OTHERWISE`.
    fn parse_case_clause_body(&mut self) -> Option<Statement> {
        if self.check(TokenKind::Newline) || self.is_at_end() {
            self.error(
                DiagnosticCode::Syn023,
                "CASE clause statement must begin on the same line",
            );
            return None;
        }
        self.parse_statement()
    }

    // ========================================================================
    // Iteration
    // ========================================================================

    /// `FOR Ident <- start TO end (STEP step)? ... NEXT (Ident)?`
    fn parse_for(&mut self) -> Option<Statement> {
        let start_span = self.advance().span();
        let Some(iterator) =
            self.expect_identifier(DiagnosticCode::Syn010, "Expected loop variable after FOR")
        else {
            self.recover_to_line_end();
            return None;
        };
        if self
            .expect_kind(
                TokenKind::Assign,
                DiagnosticCode::Syn019,
                "Expected '<-' after loop variable",
            )
            .is_none()
        {
            self.recover_to_line_end();
            return None;
        }
        let Some(start) = self.parse_expression() else {
            self.recover_to_line_end();
            return None;
        };
        if self
            .expect_keyword(Keyword::To, DiagnosticCode::Syn025, "Expected TO after start value")
            .is_none()
        {
            self.recover_to_line_end();
            return None;
        }
        let Some(end) = self.parse_expression() else {
            self.recover_to_line_end();
            return None;
        };
        let step = if self.match_keyword(Keyword::Step) {
            match self.parse_expression() {
                Some(step) => Some(step),
                None => {
                    self.recover_to_line_end();
                    None
                }
            }
        } else {
            None
        };

        let body = self.parse_statements(&[Keyword::Next]);

        let mut end_span = self.previous_span();
        if self.check_keyword(Keyword::Next) {
            end_span = self.advance().span();
            // The trailing identifier is optional, but when present it
            // must match the loop variable (case-insensitively).
            if self.check(TokenKind::Identifier) {
                let token = self.advance();
                end_span = token.span();
                if !token.lexeme().eq_ignore_ascii_case(&iterator.name) {
                    self.diagnostics.push(
                        crate::diagnostics::Diagnostic::error(
                            DiagnosticCode::Syn028,
                            eco_format!(
                                "NEXT variable '{}' does not match loop variable '{}'",
                                token.lexeme(),
                                iterator.name
                            ),
                            token.span(),
                        )
                        .with_hint(eco_format!("write 'NEXT {}'", iterator.name)),
                    );
                }
            }
        } else {
            self.error(DiagnosticCode::Syn027, "Expected NEXT to close FOR");
        }

        self.end_statement_line();
        Some(Statement::For {
            iterator,
            start,
            end,
            step,
            body,
            span: start_span.merge(end_span),
        })
    }

    /// `REPEAT ... UNTIL cond`
    fn parse_repeat(&mut self) -> Option<Statement> {
        let start = self.advance().span();
        let body = self.parse_statements(&[Keyword::Until]);

        let condition = if self.match_keyword(Keyword::Until) {
            match self.parse_expression() {
                Some(condition) => condition,
                None => {
                    self.recover_to_line_end();
                    self.error_expression(start)
                }
            }
        } else {
            self.error(DiagnosticCode::Syn029, "Expected UNTIL to close REPEAT");
            self.error_expression(start)
        };

        let span = start.merge(condition.span()).merge(self.previous_span());
        self.end_statement_line();
        Some(Statement::Repeat {
            body,
            condition,
            span,
        })
    }

    /// `WHILE cond DO ... ENDWHILE`
    fn parse_while(&mut self) -> Option<Statement> {
        let start = self.advance().span();

        let condition = match self.parse_expression() {
            Some(condition) => {
                self.expect_keyword(
                    Keyword::Do,
                    DiagnosticCode::Syn030,
                    "Expected DO after WHILE condition",
                );
                condition
            }
            None => {
                self.recover_to_line_end();
                self.error_expression(start)
            }
        };

        let body = self.parse_statements(&[Keyword::Endwhile]);

        let end = if self.check_keyword(Keyword::Endwhile) {
            self.advance().span()
        } else {
            self.error(DiagnosticCode::Syn033, "Expected ENDWHILE to close WHILE");
            self.previous_span()
        };
        self.end_statement_line();
        Some(Statement::While {
            condition,
            body,
            span: start.merge(end),
        })
    }

    // ========================================================================
    // Routines
    // ========================================================================

    /// `(name : Type, ...)` — the parenthesized list is optional.
    fn parse_parameters(&mut self) -> Vec<Parameter> {
        let mut params = Vec::new();
        if !self.match_kind(TokenKind::LeftParen) {
            return params;
        }
        if self.match_kind(TokenKind::RightParen) {
            return params;
        }
        loop {
            let Some(name) =
                self.expect_identifier(DiagnosticCode::Syn041, "Expected parameter name")
            else {
                break;
            };
            if self
                .expect_kind(
                    TokenKind::Colon,
                    DiagnosticCode::Syn042,
                    "Expected ':' after parameter name",
                )
                .is_none()
            {
                break;
            }
            let Some(type_spec) = self.parse_type() else {
                break;
            };
            let span = name.span.merge(type_spec.span());
            params.push(Parameter {
                name,
                type_spec,
                span,
            });
            if !self.match_kind(TokenKind::Comma) {
                break;
            }
        }
        self.expect_kind(
            TokenKind::RightParen,
            DiagnosticCode::Syn043,
            "Expected ')' after parameters",
        );
        params
    }

    /// `PROCEDURE name (params?) ... ENDPROCEDURE`
    fn parse_procedure(&mut self) -> Option<Statement> {
        let start = self.advance().span();
        let Some(name) =
            self.expect_identifier(DiagnosticCode::Syn040, "Expected procedure name")
        else {
            self.recover_to_line_end();
            return None;
        };
        let params = self.parse_parameters();
        let body = self.parse_statements(&[Keyword::Endprocedure]);

        let end = if self.check_keyword(Keyword::Endprocedure) {
            self.advance().span()
        } else {
            self.error(
                DiagnosticCode::Syn044,
                "Expected ENDPROCEDURE to close PROCEDURE",
            );
            self.previous_span()
        };
        self.end_statement_line();
        Some(Statement::Procedure {
            name,
            params,
            body,
            span: start.merge(end),
        })
    }

    /// `FUNCTION name (params?) RETURNS Type ... ENDFUNCTION`
    fn parse_function(&mut self) -> Option<Statement> {
        let start = self.advance().span();
        let Some(name) = self.expect_identifier(DiagnosticCode::Syn040, "Expected function name")
        else {
            self.recover_to_line_end();
            return None;
        };
        let params = self.parse_parameters();

        if self
            .expect_keyword(
                Keyword::Returns,
                DiagnosticCode::Syn045,
                "Expected RETURNS before the return type",
            )
            .is_none()
        {
            self.recover_to_line_end();
            return None;
        }
        let Some(returns) = self.parse_type() else {
            self.recover_to_line_end();
            return None;
        };

        let body = self.parse_statements(&[Keyword::Endfunction]);

        let end = if self.check_keyword(Keyword::Endfunction) {
            self.advance().span()
        } else {
            self.error(
                DiagnosticCode::Syn046,
                "Expected ENDFUNCTION to close FUNCTION",
            );
            self.previous_span()
        };
        self.end_statement_line();
        Some(Statement::Function {
            name,
            params,
            returns,
            body,
            span: start.merge(end),
        })
    }

    /// `CALL name (args?)` — parentheses optional with zero arguments.
    fn parse_call_statement(&mut self) -> Option<Statement> {
        let start = self.advance().span();
        let Some(name) = self.expect_identifier(DiagnosticCode::Syn040, "Expected procedure name")
        else {
            self.recover_to_line_end();
            return None;
        };
        let mut end = name.span;
        let args = if self.match_kind(TokenKind::LeftParen) {
            let args = if self.check(TokenKind::RightParen) {
                Vec::new()
            } else {
                match self.parse_expression_list() {
                    Some(args) => args,
                    None => {
                        self.recover_to_line_end();
                        return None;
                    }
                }
            };
            match self.expect_kind(
                TokenKind::RightParen,
                DiagnosticCode::Syn043,
                "Expected ')' after arguments",
            ) {
                Some(close) => end = close.span(),
                None => {
                    self.recover_to_line_end();
                    return None;
                }
            }
            args
        } else {
            Vec::new()
        };
        self.end_statement_line();
        Some(Statement::Call {
            name,
            args,
            span: start.merge(end),
        })
    }

    /// `RETURN expr`
    fn parse_return(&mut self) -> Option<Statement> {
        let start = self.advance().span();
        let Some(value) = self.parse_expression() else {
            self.recover_to_line_end();
            return None;
        };
        let span = start.merge(value.span());
        self.end_statement_line();
        Some(Statement::Return { value, span })
    }

    // ========================================================================
    // File Operations
    // ========================================================================

    /// `OPENFILE expr FOR READ|WRITE`
    fn parse_openfile(&mut self) -> Option<Statement> {
        let start = self.advance().span();
        let Some(file) = self.parse_expression() else {
            self.recover_to_line_end();
            return None;
        };
        if self
            .expect_keyword(
                Keyword::For,
                DiagnosticCode::Syn050,
                "Expected FOR after the file identifier",
            )
            .is_none()
        {
            self.recover_to_line_end();
            return None;
        }
        let mode = if self.check_keyword(Keyword::Read) {
            FileMode::Read
        } else if self.check_keyword(Keyword::Write) {
            FileMode::Write
        } else {
            self.error(DiagnosticCode::Syn051, "File mode must be READ or WRITE");
            self.recover_to_line_end();
            return None;
        };
        let end = self.advance().span();
        self.end_statement_line();
        Some(Statement::OpenFile {
            file,
            mode,
            span: start.merge(end),
        })
    }

    /// `READFILE expr, target`
    fn parse_readfile(&mut self) -> Option<Statement> {
        let start = self.advance().span();
        let Some(file) = self.parse_expression() else {
            self.recover_to_line_end();
            return None;
        };
        if self
            .expect_kind(
                TokenKind::Comma,
                DiagnosticCode::Syn052,
                "Expected ',' between file and target",
            )
            .is_none()
        {
            self.recover_to_line_end();
            return None;
        }
        let Some(target) = self.parse_target() else {
            self.recover_to_line_end();
            return None;
        };
        let span = start.merge(target.span());
        self.end_statement_line();
        Some(Statement::ReadFile { file, target, span })
    }

    /// `WRITEFILE expr, value`
    fn parse_writefile(&mut self) -> Option<Statement> {
        let start = self.advance().span();
        let Some(file) = self.parse_expression() else {
            self.recover_to_line_end();
            return None;
        };
        if self
            .expect_kind(
                TokenKind::Comma,
                DiagnosticCode::Syn052,
                "Expected ',' between file and value",
            )
            .is_none()
        {
            self.recover_to_line_end();
            return None;
        }
        let Some(value) = self.parse_expression() else {
            self.recover_to_line_end();
            return None;
        };
        let span = start.merge(value.span());
        self.end_statement_line();
        Some(Statement::WriteFile { file, value, span })
    }

    /// `CLOSEFILE expr`
    fn parse_closefile(&mut self) -> Option<Statement> {
        let start = self.advance().span();
        let Some(file) = self.parse_expression() else {
            self.recover_to_line_end();
            return None;
        };
        let span = start.merge(file.span());
        self.end_statement_line();
        Some(Statement::CloseFile { file, span })
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::parse_source;
    use crate::ast::{FileMode, Statement, TypeName, TypeSpec};
    use crate::diagnostics::DiagnosticCode;

    fn codes(source: &str) -> Vec<DiagnosticCode> {
        let (_, diagnostics) = parse_source(source);
        diagnostics.iter().map(|d| d.code).collect()
    }

    fn single_statement(source: &str) -> Statement {
        let (program, diagnostics) = parse_source(source);
        assert!(diagnostics.is_empty(), "unexpected: {diagnostics:?}");
        assert_eq!(program.statements.len(), 1, "program: {program:?}");
        program.statements.into_iter().next().unwrap()
    }

    #[test]
    fn declare_basic() {
        let statement = single_statement("DECLARE Total : INTEGER");
        let Statement::Declare { name, type_spec, .. } = statement else {
            panic!("expected DECLARE");
        };
        assert_eq!(name.name, "Total");
        assert!(matches!(
            type_spec,
            TypeSpec::Basic {
                name: TypeName::Integer,
                ..
            }
        ));
    }

    #[test]
    fn declare_one_dimensional_array() {
        let statement = single_statement("DECLARE Scores : ARRAY[1:30] OF REAL");
        let Statement::Declare { type_spec, .. } = statement else {
            panic!("expected DECLARE");
        };
        let TypeSpec::Array {
            element,
            dimensions,
            ..
        } = type_spec
        else {
            panic!("expected array type");
        };
        assert_eq!(element, TypeName::Real);
        assert_eq!(dimensions, vec![(1, 30)]);
    }

    #[test]
    fn declare_two_dimensional_array_with_negative_bound() {
        let statement = single_statement("DECLARE Grid : ARRAY[-3:3, 1:10] OF INTEGER");
        let Statement::Declare { type_spec, .. } = statement else {
            panic!("expected DECLARE");
        };
        let TypeSpec::Array { dimensions, .. } = type_spec else {
            panic!("expected array type");
        };
        assert_eq!(dimensions, vec![(-3, 3), (1, 10)]);
    }

    #[test]
    fn array_bound_must_be_integer_literal() {
        assert!(codes("DECLARE A : ARRAY[x:10] OF INTEGER").contains(&DiagnosticCode::Syn013));
    }

    #[test]
    fn constant_definition() {
        let statement = single_statement("CONSTANT Pi <- 3.14");
        assert!(matches!(statement, Statement::Constant { .. }));
    }

    #[test]
    fn assignment_to_array_element() {
        let (program, diagnostics) = parse_source("G[2] <- 9");
        assert!(diagnostics.is_empty());
        let Statement::Assignment { ref target, .. } = program.statements[0] else {
            panic!("expected assignment");
        };
        assert!(matches!(target, crate::ast::Expression::ArrayAccess { .. }));
    }

    #[test]
    fn assignment_parses() {
        let (program, diagnostics) = parse_source("Total <- Total + 1");
        assert!(diagnostics.is_empty());
        assert!(matches!(program.statements[0], Statement::Assignment { .. }));
    }

    #[test]
    fn missing_arrow_in_assignment() {
        assert!(codes("Total 1").contains(&DiagnosticCode::Syn019));
    }

    #[test]
    fn input_and_output() {
        let (program, diagnostics) = parse_source("INPUT Name\nOUTPUT \"Hi \", Name");
        assert!(diagnostics.is_empty());
        assert!(matches!(program.statements[0], Statement::Input { .. }));
        let Statement::Output { ref values, .. } = program.statements[1] else {
            panic!("expected OUTPUT");
        };
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn if_with_else() {
        let statement =
            single_statement("IF X > 0 THEN\n    OUTPUT \"pos\"\nELSE\n    OUTPUT \"neg\"\nENDIF");
        let Statement::If {
            then_branch,
            else_branch,
            ..
        } = statement
        else {
            panic!("expected IF");
        };
        assert_eq!(then_branch.len(), 1);
        assert_eq!(else_branch.expect("has else").len(), 1);
    }

    #[test]
    fn if_missing_endif() {
        assert!(codes("IF X > 0 THEN\nOUTPUT 1").contains(&DiagnosticCode::Syn018));
    }

    #[test]
    fn if_missing_then() {
        assert!(codes("IF X > 0\nOUTPUT 1\nENDIF").contains(&DiagnosticCode::Syn017));
    }

    #[test]
    fn case_with_clauses_and_otherwise() {
        let statement = single_statement(
            "CASE OF Choice\n    1 : OUTPUT \"one\"\n    2 : OUTPUT \"two\"\n    OTHERWISE OUTPUT \"other\"\nENDCASE",
        );
        let Statement::Case {
            clauses, otherwise, ..
        } = statement
        else {
            panic!("expected CASE");
        };
        assert_eq!(clauses.len(), 2);
        assert!(otherwise.is_some());
    }

    #[test]
    fn case_clause_must_start_on_same_line() {
        let diagnostics = codes("CASE OF X\n    1 :\n        OUTPUT 1\nENDCASE");
        assert!(diagnostics.contains(&DiagnosticCode::Syn023));
    }

    #[test]
    fn case_missing_endcase() {
        assert!(codes("CASE OF X\n    1 : OUTPUT 1").contains(&DiagnosticCode::Syn024));
    }

    #[test]
    fn for_loop_with_step_and_matching_next() {
        let statement = single_statement("FOR I <- 10 TO 1 STEP -2\n    OUTPUT I\nNEXT I");
        let Statement::For { step, body, .. } = statement else {
            panic!("expected FOR");
        };
        assert!(step.is_some());
        assert_eq!(body.len(), 1);
    }

    #[test]
    fn for_next_identifier_is_optional() {
        let (_, diagnostics) = parse_source("FOR I <- 1 TO 3\nNEXT");
        assert!(diagnostics.is_empty(), "unexpected: {diagnostics:?}");
    }

    #[test]
    fn for_next_identifier_mismatch() {
        let (program, diagnostics) = parse_source("FOR I <- 1 TO 3\n    OUTPUT I\nNEXT J");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::Syn028);
        // The FOR still parses.
        assert!(matches!(program.statements[0], Statement::For { .. }));
    }

    #[test]
    fn for_next_identifier_matches_case_insensitively() {
        let (_, diagnostics) = parse_source("FOR Index <- 1 TO 3\nNEXT INDEX");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn for_missing_next() {
        assert!(codes("FOR I <- 1 TO 3\nOUTPUT I").contains(&DiagnosticCode::Syn027));
    }

    #[test]
    fn repeat_until() {
        let statement = single_statement("REPEAT\n    X <- X + 1\nUNTIL X > 9");
        assert!(matches!(statement, Statement::Repeat { .. }));
    }

    #[test]
    fn repeat_missing_until() {
        assert!(codes("REPEAT\nX <- 1").contains(&DiagnosticCode::Syn029));
    }

    #[test]
    fn while_loop() {
        let statement = single_statement("WHILE X < 5 DO\n    X <- X + 1\nENDWHILE");
        assert!(matches!(statement, Statement::While { .. }));
    }

    #[test]
    fn while_missing_do() {
        assert!(codes("WHILE X < 5\nX <- 1\nENDWHILE").contains(&DiagnosticCode::Syn030));
    }

    #[test]
    fn while_missing_endwhile() {
        assert!(codes("WHILE X < 5 DO\nX <- X + 1").contains(&DiagnosticCode::Syn033));
    }

    #[test]
    fn procedure_with_parameters() {
        let statement = single_statement(
            "PROCEDURE Greet(Name : STRING, Times : INTEGER)\n    OUTPUT Name\nENDPROCEDURE",
        );
        let Statement::Procedure { params, .. } = statement else {
            panic!("expected PROCEDURE");
        };
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name.name, "Name");
    }

    #[test]
    fn function_with_return_type() {
        let statement = single_statement(
            "FUNCTION Double(N : INTEGER) RETURNS INTEGER\n    RETURN N * 2\nENDFUNCTION",
        );
        let Statement::Function { returns, body, .. } = statement else {
            panic!("expected FUNCTION");
        };
        assert!(matches!(
            returns,
            TypeSpec::Basic {
                name: TypeName::Integer,
                ..
            }
        ));
        assert_eq!(body.len(), 1);
    }

    #[test]
    fn function_missing_returns() {
        assert!(
            codes("FUNCTION F\nRETURN 1\nENDFUNCTION").contains(&DiagnosticCode::Syn045)
        );
    }

    #[test]
    fn call_without_parentheses() {
        let statement = single_statement("CALL Setup");
        let Statement::Call { args, .. } = statement else {
            panic!("expected CALL");
        };
        assert!(args.is_empty());
    }

    #[test]
    fn call_with_arguments() {
        let statement = single_statement("CALL Greet(\"Ada\", 3)");
        let Statement::Call { args, .. } = statement else {
            panic!("expected CALL");
        };
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn file_statements() {
        let (program, diagnostics) = parse_source(
            "OPENFILE \"F.txt\" FOR WRITE\nWRITEFILE \"F.txt\", \"line\"\nCLOSEFILE \"F.txt\"\nOPENFILE \"F.txt\" FOR READ\nREADFILE \"F.txt\", Line\nCLOSEFILE \"F.txt\"",
        );
        assert!(diagnostics.is_empty(), "unexpected: {diagnostics:?}");
        assert_eq!(program.statements.len(), 6);
        assert!(matches!(
            program.statements[0],
            Statement::OpenFile {
                mode: FileMode::Write,
                ..
            }
        ));
        assert!(matches!(program.statements[4], Statement::ReadFile { .. }));
    }

    #[test]
    fn openfile_requires_mode_keyword() {
        assert!(codes("OPENFILE \"F\" FOR APPEND").contains(&DiagnosticCode::Syn051));
    }

    #[test]
    fn readfile_requires_comma() {
        assert!(codes("READFILE \"F\" Line").contains(&DiagnosticCode::Syn052));
    }
}
