// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Semantic analysis for pseudocode programs.
//!
//! The analyzer walks the AST once (after a routine pre-pass) and checks:
//! - name resolution against case-insensitive scoped symbol tables
//! - type compatibility per the [`types`] lattice
//! - routine signatures (user-defined and built-in)
//! - file-mode discipline for literal file names
//! - the function return rule
//!
//! The return rule is deliberately conservative: a function body must
//! contain at least one `RETURN` statement *textually*, not on every
//! control path. Returns inside never-taken branches count. This avoids
//! false positives on idiomatic `IF/ELSE` functions.
//!
//! Analysis never mutates the AST and produces an [`AnalysisResult`]:
//! diagnostics plus the side tables the code generator consumes.

use std::collections::HashMap;

use ecow::{eco_format, EcoString};

use crate::ast::{
    Expression, FileMode, Identifier, Parameter, Program, Statement, TypeName, UnaryOp,
};
use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::source_analysis::Span;

pub mod builtins;
pub mod scope;
pub mod types;


pub use builtins::{builtin_signature, BuiltinSignature};
pub use scope::{ScopeStack, Symbol, SymbolKind};
pub use types::StaticType;

/// Result of semantic analysis.
#[derive(Debug, Clone, Default)]
pub struct AnalysisResult {
    /// Diagnostics (errors and warnings) from analysis.
    pub diagnostics: Vec<Diagnostic>,
    /// For `INPUT` statements whose target has a known basic type: the
    /// type to coerce the read line to, keyed by the statement's span.
    pub input_coercions: HashMap<Span, TypeName>,
    /// First-declared spelling per lowercased name. Emitted code uses
    /// these so later references in other casings don't fork variables.
    pub spellings: HashMap<String, EcoString>,
}

/// The signature of a user-defined routine.
#[derive(Debug, Clone, PartialEq)]
struct RoutineSignature {
    name: EcoString,
    params: Vec<StaticType>,
    /// `Some` for functions, `None` for procedures.
    returns: Option<StaticType>,
}

/// Performs semantic analysis on a program.
///
/// This is the main entry point. It never fails; all findings are
/// reported through the result's diagnostics.
#[must_use]
pub fn analyze(program: &Program) -> AnalysisResult {
    let mut analyzer = Analyzer::new();
    analyzer.register_routines(program);
    analyzer.analyze_statements(&program.statements);
    AnalysisResult {
        diagnostics: analyzer.diagnostics,
        input_coercions: analyzer.input_coercions,
        spellings: analyzer.spellings,
    }
}

/// The analyzer state for one walk over a program.
struct Analyzer {
    scopes: ScopeStack,
    diagnostics: Vec<Diagnostic>,
    procedures: HashMap<String, RoutineSignature>,
    functions: HashMap<String, RoutineSignature>,
    /// Literal file name → mode it is currently open in.
    open_files: HashMap<String, FileMode>,
    /// Declared return type while analyzing a function body.
    current_return: Option<StaticType>,
    /// Lowercased iterator names of the enclosing FOR loops.
    active_iterators: Vec<String>,
    input_coercions: HashMap<Span, TypeName>,
    spellings: HashMap<String, EcoString>,
}

impl Analyzer {
    fn new() -> Self {
        Self {
            scopes: ScopeStack::new(),
            diagnostics: Vec::new(),
            procedures: HashMap::new(),
            functions: HashMap::new(),
            open_files: HashMap::new(),
            current_return: None,
            active_iterators: Vec::new(),
            input_coercions: HashMap::new(),
            spellings: HashMap::new(),
        }
    }

    fn error(&mut self, code: DiagnosticCode, message: impl Into<EcoString>, span: Span) {
        self.diagnostics.push(Diagnostic::error(code, message, span));
    }

    fn record_spelling(&mut self, name: &Identifier) {
        self.spellings
            .entry(name.key())
            .or_insert_with(|| name.name.clone());
    }

    fn define(&mut self, name: &Identifier, kind: SymbolKind, ty: StaticType) {
        self.record_spelling(name);
        let symbol = Symbol {
            name: name.name.clone(),
            kind,
            ty,
            defined_at: name.span,
        };
        if self.scopes.define(symbol).is_err() {
            self.error(
                DiagnosticCode::Sem002,
                eco_format!("'{}' is already declared in this scope", name.name),
                name.span,
            );
        }
    }

    // ========================================================================
    // Routine Pre-pass
    // ========================================================================

    /// Registers every top-level procedure and function before the main
    /// walk, so routines can be called before their definitions appear.
    fn register_routines(&mut self, program: &Program) {
        for statement in &program.statements {
            match statement {
                Statement::Procedure { name, params, .. } => {
                    self.register_routine(name, params, None);
                }
                Statement::Function {
                    name,
                    params,
                    returns,
                    ..
                } => {
                    let return_type = StaticType::from_spec(returns);
                    self.register_routine(name, params, Some(return_type));
                }
                _ => {}
            }
        }
    }

    fn register_routine(
        &mut self,
        name: &Identifier,
        params: &[Parameter],
        returns: Option<StaticType>,
    ) {
        let key = name.key();
        if self.procedures.contains_key(&key) || self.functions.contains_key(&key) {
            self.error(
                DiagnosticCode::Sem001,
                eco_format!("'{}' is already defined", name.name),
                name.span,
            );
            return;
        }

        self.record_spelling(name);
        let kind = if returns.is_some() {
            SymbolKind::Function
        } else {
            SymbolKind::Procedure
        };
        // Routine names live in the global scope too, so a later DECLARE
        // with the same name is rejected as a duplicate.
        let symbol = Symbol {
            name: name.name.clone(),
            kind,
            ty: StaticType::Unknown,
            defined_at: name.span,
        };
        if self.scopes.define(symbol).is_err() {
            self.error(
                DiagnosticCode::Sem001,
                eco_format!("'{}' is already defined", name.name),
                name.span,
            );
            return;
        }

        let signature = RoutineSignature {
            name: name.name.clone(),
            params: params
                .iter()
                .map(|p| StaticType::from_spec(&p.type_spec))
                .collect(),
            returns,
        };
        if returns.is_some() {
            self.functions.insert(key, signature);
        } else {
            self.procedures.insert(key, signature);
        }
    }

    // ========================================================================
    // Statement Analysis
    // ========================================================================

    fn analyze_statements(&mut self, statements: &[Statement]) {
        for statement in statements {
            self.analyze_statement(statement);
        }
    }

    /// Runs `body` in a fresh child scope.
    ///
    /// The open-file map is restored afterwards: mode changes inside a
    /// block do not leak out.
    fn in_child_scope(&mut self, body: impl FnOnce(&mut Self)) {
        let saved_files = self.open_files.clone();
        self.scopes.push();
        body(self);
        self.scopes.pop();
        self.open_files = saved_files;
    }

    fn analyze_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Declare {
                name, type_spec, ..
            } => {
                let ty = StaticType::from_spec(type_spec);
                self.define(name, SymbolKind::Variable, ty);
            }
            Statement::Constant { name, value, .. } => {
                let ty = self.infer_expression(value);
                self.define(name, SymbolKind::Constant, ty);
            }
            Statement::Assignment { target, value, .. } => {
                self.analyze_assignment(target, value);
            }
            Statement::Input { target, span } => {
                let target_type = self.check_target(target);
                if let Some(basic) = target_type.basic() {
                    self.input_coercions.insert(*span, basic);
                }
            }
            Statement::Output { values, .. } => {
                for value in values {
                    self.infer_expression(value);
                }
            }
            Statement::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                self.check_condition(condition, DiagnosticCode::Sem004, "IF");
                self.in_child_scope(|a| a.analyze_statements(then_branch));
                if let Some(else_branch) = else_branch {
                    self.in_child_scope(|a| a.analyze_statements(else_branch));
                }
            }
            Statement::Case {
                subject,
                clauses,
                otherwise,
                ..
            } => {
                self.infer_expression(subject);
                for clause in clauses {
                    self.infer_expression(&clause.value);
                    self.in_child_scope(|a| a.analyze_statement(&clause.body));
                }
                if let Some(otherwise) = otherwise {
                    self.in_child_scope(|a| a.analyze_statement(otherwise));
                }
            }
            Statement::For {
                iterator,
                start,
                end,
                step,
                body,
                ..
            } => self.analyze_for(iterator, start, end, step.as_ref(), body),
            Statement::Repeat {
                body, condition, ..
            } => {
                self.in_child_scope(|a| a.analyze_statements(body));
                self.check_condition(condition, DiagnosticCode::Sem008, "UNTIL");
            }
            Statement::While {
                condition, body, ..
            } => {
                self.check_condition(condition, DiagnosticCode::Sem009, "WHILE");
                self.in_child_scope(|a| a.analyze_statements(body));
            }
            Statement::Procedure { params, body, .. } => {
                self.analyze_routine_body(params, body, None);
            }
            Statement::Function {
                name,
                params,
                returns,
                body,
                ..
            } => {
                let return_type = StaticType::from_spec(returns);
                self.analyze_routine_body(params, body, Some(return_type));
                if !contains_return(body) {
                    self.error(
                        DiagnosticCode::Sem011,
                        eco_format!("Function '{}' must contain a RETURN statement", name.name),
                        name.span,
                    );
                }
            }
            Statement::Call { name, args, span } => self.analyze_call_statement(name, args, *span),
            Statement::Return { value, span } => {
                let value_type = self.infer_expression(value);
                match self.current_return {
                    None => self.error(
                        DiagnosticCode::Sem013,
                        "RETURN is only allowed inside a function",
                        *span,
                    ),
                    Some(return_type) => {
                        if !value_type.can_feed(return_type) {
                            self.error(
                                DiagnosticCode::Sem014,
                                eco_format!(
                                    "Cannot return {value_type} from a function declared to return {return_type}"
                                ),
                                value.span(),
                            );
                        }
                    }
                }
            }
            Statement::OpenFile { file, mode, .. } => {
                self.infer_expression(file);
                if let Some(name) = file.as_string_literal() {
                    self.open_files.insert(name.to_string(), *mode);
                }
            }
            Statement::ReadFile { file, target, .. } => {
                self.infer_expression(file);
                if let Some(name) = file.as_string_literal() {
                    if self.open_files.get(name) == Some(&FileMode::Write) {
                        self.diagnostics.push(
                            Diagnostic::error(
                                DiagnosticCode::Sem015,
                                eco_format!("File \"{name}\" is open for WRITE; READFILE needs READ mode"),
                                file.span(),
                            )
                            .with_hint(eco_format!("open it with OPENFILE \"{name}\" FOR READ")),
                        );
                    }
                }
                // READFILE hands the line to the target as-is; no
                // coercion is recorded because the STRING check below
                // already pins the target's type.
                let target_type = self.check_target(target);
                if !StaticType::Basic(TypeName::String).can_feed(target_type) {
                    self.error(
                        DiagnosticCode::Sem003,
                        eco_format!("READFILE reads a STRING line; cannot store it in {target_type}"),
                        target.span(),
                    );
                }
            }
            Statement::WriteFile { file, value, .. } => {
                self.infer_expression(file);
                self.infer_expression(value);
                if let Some(name) = file.as_string_literal() {
                    if self.open_files.get(name) == Some(&FileMode::Read) {
                        self.diagnostics.push(
                            Diagnostic::error(
                                DiagnosticCode::Sem016,
                                eco_format!("File \"{name}\" is open for READ; WRITEFILE needs WRITE mode"),
                                file.span(),
                            )
                            .with_hint(eco_format!("open it with OPENFILE \"{name}\" FOR WRITE")),
                        );
                    }
                }
            }
            Statement::CloseFile { file, .. } => {
                self.infer_expression(file);
                if let Some(name) = file.as_string_literal() {
                    self.open_files.remove(name);
                }
            }
        }
    }

    fn analyze_assignment(&mut self, target: &Expression, value: &Expression) {
        let target_type = self.check_target(target);
        let value_type = self.infer_expression(value);
        if !value_type.can_feed(target_type) {
            self.error(
                DiagnosticCode::Sem003,
                eco_format!("Cannot assign {value_type} to {target_type}"),
                value.span(),
            );
        }

        if let Expression::Identifier(identifier) = target {
            if self.active_iterators.contains(&identifier.key()) {
                self.diagnostics.push(Diagnostic::warning(
                    DiagnosticCode::Sem026,
                    eco_format!(
                        "Assignment to loop variable '{}' inside its FOR body",
                        identifier.name
                    ),
                    identifier.span,
                ));
            }
        }
    }

    fn analyze_for(
        &mut self,
        iterator: &Identifier,
        start: &Expression,
        end: &Expression,
        step: Option<&Expression>,
        body: &[Statement],
    ) {
        match self.scopes.lookup(&iterator.name) {
            None => {
                self.error(
                    DiagnosticCode::Sem005,
                    eco_format!("FOR loop variable '{}' is not declared", iterator.name),
                    iterator.span,
                );
            }
            Some(symbol) => {
                let ty = symbol.ty;
                if !ty.is_unknown() && ty != StaticType::Basic(TypeName::Integer) {
                    self.error(
                        DiagnosticCode::Sem006,
                        eco_format!("FOR loop variable '{}' must be INTEGER, not {ty}", iterator.name),
                        iterator.span,
                    );
                }
            }
        }

        for bound in [Some(start), Some(end), step].into_iter().flatten() {
            let ty = self.infer_expression(bound);
            if !ty.is_numeric() {
                self.error(
                    DiagnosticCode::Sem007,
                    eco_format!("FOR bounds and STEP must be numeric, not {ty}"),
                    bound.span(),
                );
            }
        }

        self.active_iterators.push(iterator.key());
        self.in_child_scope(|a| a.analyze_statements(body));
        self.active_iterators.pop();
    }

    fn analyze_routine_body(
        &mut self,
        params: &[Parameter],
        body: &[Statement],
        return_type: Option<StaticType>,
    ) {
        let saved_return = self.current_return;
        let saved_iterators = std::mem::take(&mut self.active_iterators);
        self.current_return = return_type;

        self.in_child_scope(|a| {
            for param in params {
                let ty = StaticType::from_spec(&param.type_spec);
                a.record_spelling(&param.name);
                let symbol = Symbol {
                    name: param.name.name.clone(),
                    kind: SymbolKind::Param,
                    ty,
                    defined_at: param.name.span,
                };
                if a.scopes.define(symbol).is_err() {
                    a.error(
                        DiagnosticCode::Sem010,
                        eco_format!("Duplicate parameter '{}'", param.name.name),
                        param.name.span,
                    );
                }
            }
            a.analyze_statements(body);
        });

        self.current_return = saved_return;
        self.active_iterators = saved_iterators;
    }

    fn analyze_call_statement(&mut self, name: &Identifier, args: &[Expression], span: Span) {
        let arg_types: Vec<StaticType> = args.iter().map(|a| self.infer_expression(a)).collect();
        let Some(signature) = self.procedures.get(&name.key()).cloned() else {
            self.error(
                DiagnosticCode::Sem012,
                eco_format!("'{}' is not a known procedure", name.name),
                name.span,
            );
            return;
        };
        self.check_arguments(&signature.name, &signature.params, args, &arg_types, span);
    }

    fn check_arguments(
        &mut self,
        routine_name: &str,
        params: &[StaticType],
        args: &[Expression],
        arg_types: &[StaticType],
        span: Span,
    ) {
        if params.len() != args.len() {
            self.error(
                DiagnosticCode::Sem017,
                eco_format!(
                    "'{routine_name}' takes {} argument(s), found {}",
                    params.len(),
                    args.len()
                ),
                span,
            );
            return;
        }
        for ((arg, arg_type), param_type) in args.iter().zip(arg_types).zip(params) {
            if !arg_type.can_feed(*param_type) {
                self.error(
                    DiagnosticCode::Sem018,
                    eco_format!("Cannot pass {arg_type} where {param_type} is expected"),
                    arg.span(),
                );
            }
        }
    }

    fn check_condition(&mut self, condition: &Expression, code: DiagnosticCode, construct: &str) {
        let ty = self.infer_expression(condition);
        if !ty.is_boolean() {
            self.error(
                code,
                eco_format!("{construct} condition must be BOOLEAN, not {ty}"),
                condition.span(),
            );
        }
    }

    // ========================================================================
    // Targets (assignment / INPUT / READFILE positions)
    // ========================================================================

    /// Resolves and types a target position, rejecting constants.
    fn check_target(&mut self, target: &Expression) -> StaticType {
        match target {
            Expression::Identifier(identifier) => {
                let Some(symbol) = self.scopes.lookup(&identifier.name) else {
                    self.error(
                        DiagnosticCode::Sem019,
                        eco_format!("'{}' is not declared", identifier.name),
                        identifier.span,
                    );
                    return StaticType::Unknown;
                };
                let (kind, ty) = (symbol.kind, symbol.ty);
                if kind == SymbolKind::Constant {
                    self.error(
                        DiagnosticCode::Sem025,
                        eco_format!("'{}' is a constant and cannot be changed", identifier.name),
                        identifier.span,
                    );
                }
                ty
            }
            Expression::ArrayAccess { .. } => self.infer_expression(target),
            // The parser only produces identifier/array-access targets;
            // anything else came from recovery and is already diagnosed.
            other => self.infer_expression(other),
        }
    }

    // ========================================================================
    // Expression Typing
    // ========================================================================

    fn infer_expression(&mut self, expression: &Expression) -> StaticType {
        match expression {
            Expression::Literal { value, .. } => StaticType::Basic(value.type_name()),
            Expression::Identifier(identifier) => {
                let Some(symbol) = self.scopes.lookup(&identifier.name) else {
                    self.error(
                        DiagnosticCode::Sem019,
                        eco_format!("'{}' is not declared", identifier.name),
                        identifier.span,
                    );
                    return StaticType::Unknown;
                };
                symbol.ty
            }
            Expression::Unary { op, operand, span } => self.infer_unary(*op, operand, *span),
            Expression::Binary {
                op, left, right, ..
            } => self.infer_binary(*op, left, right),
            Expression::Call { name, args, span } => self.infer_call(name, args, *span),
            Expression::ArrayAccess {
                array,
                indices,
                span,
            } => self.infer_array_access(array, indices, *span),
        }
    }

    fn infer_unary(&mut self, op: UnaryOp, operand: &Expression, _span: Span) -> StaticType {
        let operand_type = self.infer_expression(operand);
        match op {
            UnaryOp::Not => {
                if !operand_type.is_boolean() {
                    self.error(
                        DiagnosticCode::Sem020,
                        eco_format!("NOT requires a BOOLEAN operand, not {operand_type}"),
                        operand.span(),
                    );
                }
                StaticType::Basic(TypeName::Boolean)
            }
            UnaryOp::Negate => {
                if !operand_type.is_numeric() {
                    self.error(
                        DiagnosticCode::Sem021,
                        eco_format!("Unary '-' requires a numeric operand, not {operand_type}"),
                        operand.span(),
                    );
                    return StaticType::Unknown;
                }
                operand_type
            }
        }
    }

    fn infer_binary(
        &mut self,
        op: crate::ast::BinaryOp,
        left: &Expression,
        right: &Expression,
    ) -> StaticType {
        use crate::ast::BinaryOp;

        let left_type = self.infer_expression(left);
        let right_type = self.infer_expression(right);

        if op.is_relational() {
            // Relational operands are deliberately unrestricted.
            return StaticType::Basic(TypeName::Boolean);
        }

        if op.is_logical() {
            for (operand, ty) in [(left, left_type), (right, right_type)] {
                if !ty.is_boolean() {
                    self.error(
                        DiagnosticCode::Sem023,
                        eco_format!("{} requires BOOLEAN operands, not {ty}", op_keyword(op)),
                        operand.span(),
                    );
                }
            }
            return StaticType::Basic(TypeName::Boolean);
        }

        // Arithmetic: + - * / ^
        for (operand, ty) in [(left, left_type), (right, right_type)] {
            if !ty.is_numeric() {
                self.error(
                    DiagnosticCode::Sem022,
                    eco_format!("Arithmetic requires numeric operands, not {ty}"),
                    operand.span(),
                );
            }
        }
        if op == BinaryOp::Divide {
            // Division always yields REAL; use DIV for integer division.
            return StaticType::Basic(TypeName::Real);
        }
        if left_type.is_unknown() || right_type.is_unknown() {
            return StaticType::Unknown;
        }
        if left_type == StaticType::Basic(TypeName::Real)
            || right_type == StaticType::Basic(TypeName::Real)
        {
            StaticType::Basic(TypeName::Real)
        } else if left_type == StaticType::Basic(TypeName::Integer)
            && right_type == StaticType::Basic(TypeName::Integer)
        {
            StaticType::Basic(TypeName::Integer)
        } else {
            StaticType::Unknown
        }
    }

    fn infer_call(&mut self, name: &Identifier, args: &[Expression], span: Span) -> StaticType {
        let arg_types: Vec<StaticType> = args.iter().map(|a| self.infer_expression(a)).collect();

        // Built-ins resolve first, by uppercase name.
        let uppercase = name.name.to_ascii_uppercase();
        if let Some(builtin) = builtin_signature(&uppercase) {
            let params: Vec<StaticType> =
                builtin.params.iter().map(|t| StaticType::Basic(*t)).collect();
            self.check_arguments(builtin.name, &params, args, &arg_types, span);
            return StaticType::Basic(builtin.returns);
        }

        let Some(signature) = self.functions.get(&name.key()).cloned() else {
            self.error(
                DiagnosticCode::Sem024,
                eco_format!("'{}' is not a known function", name.name),
                name.span,
            );
            return StaticType::Unknown;
        };
        self.check_arguments(&signature.name, &signature.params, args, &arg_types, span);
        signature.returns.unwrap_or(StaticType::Unknown)
    }

    fn infer_array_access(
        &mut self,
        array: &Identifier,
        indices: &[Expression],
        span: Span,
    ) -> StaticType {
        let index_types: Vec<StaticType> =
            indices.iter().map(|i| self.infer_expression(i)).collect();

        let Some(symbol) = self.scopes.lookup(&array.name) else {
            self.error(
                DiagnosticCode::Sem019,
                eco_format!("'{}' is not declared", array.name),
                array.span,
            );
            return StaticType::Unknown;
        };
        let symbol_type = symbol.ty;

        for (index, ty) in indices.iter().zip(&index_types) {
            if !ty.is_unknown() && *ty != StaticType::Basic(TypeName::Integer) {
                self.error(
                    DiagnosticCode::Sem028,
                    eco_format!("Array index must be INTEGER, not {ty}"),
                    index.span(),
                );
            }
        }

        match symbol_type {
            StaticType::Array {
                element,
                dimensions,
            } => {
                if indices.len() != dimensions {
                    self.error(
                        DiagnosticCode::Sem027,
                        eco_format!(
                            "'{}' has {dimensions} dimension(s) but {} index(es) were given",
                            array.name,
                            indices.len()
                        ),
                        span,
                    );
                }
                StaticType::Basic(element)
            }
            StaticType::Unknown => StaticType::Unknown,
            other => {
                self.error(
                    DiagnosticCode::Sem027,
                    eco_format!("'{}' is {other}, not an array", array.name),
                    span,
                );
                StaticType::Unknown
            }
        }
    }
}

/// The keyword spelling of a logical operator, for messages.
const fn op_keyword(op: crate::ast::BinaryOp) -> &'static str {
    match op {
        crate::ast::BinaryOp::And => "AND",
        crate::ast::BinaryOp::Or => "OR",
        _ => "operator",
    }
}

/// Whether a statement list textually contains a `RETURN`.
///
/// Looks through block statements but not into nested routine
/// definitions — their returns belong to them.
fn contains_return(statements: &[Statement]) -> bool {
    statements.iter().any(statement_contains_return)
}

fn statement_contains_return(statement: &Statement) -> bool {
    match statement {
        Statement::Return { .. } => true,
        Statement::If {
            then_branch,
            else_branch,
            ..
        } => {
            contains_return(then_branch)
                || else_branch.as_ref().is_some_and(|b| contains_return(b))
        }
        Statement::Case {
            clauses, otherwise, ..
        } => {
            clauses.iter().any(|c| statement_contains_return(&c.body))
                || otherwise
                    .as_deref()
                    .is_some_and(statement_contains_return)
        }
        Statement::For { body, .. }
        | Statement::Repeat { body, .. }
        | Statement::While { body, .. } => contains_return(body),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::{lex, parse};

    pub(crate) fn analyze_source(source: &str) -> AnalysisResult {
        let (tokens, lex_diagnostics) = lex(source);
        assert!(
            lex_diagnostics.is_empty(),
            "test source should lex clean: {lex_diagnostics:?}"
        );
        let (program, parse_diagnostics) = parse(tokens);
        assert!(
            parse_diagnostics.is_empty(),
            "test source should parse clean: {parse_diagnostics:?}"
        );
        analyze(&program)
    }

    fn codes(source: &str) -> Vec<DiagnosticCode> {
        analyze_source(source).diagnostics.iter().map(|d| d.code).collect()
    }

    #[test]
    fn clean_program_has_no_diagnostics() {
        let result = analyze_source(
            "DECLARE Total : INTEGER\nDECLARE Index : INTEGER\nFOR Index <- 1 TO 3\n    Total <- Total + Index\nNEXT Index\nOUTPUT Total",
        );
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn undeclared_identifier() {
        let result = analyze_source("Value <- 7");
        assert_eq!(result.diagnostics.len(), 1);
        let diagnostic = &result.diagnostics[0];
        assert_eq!(diagnostic.code, DiagnosticCode::Sem019);
        assert_eq!(diagnostic.span.start(), (1, 1));
    }

    #[test]
    fn duplicate_declaration_in_scope() {
        assert_eq!(
            codes("DECLARE X : INTEGER\nDECLARE x : REAL"),
            vec![DiagnosticCode::Sem002]
        );
    }

    #[test]
    fn shadowing_in_block_scope_is_allowed() {
        let result = analyze_source(
            "DECLARE X : INTEGER\nIF TRUE THEN\n    DECLARE X : STRING\n    X <- \"inner\"\nENDIF\nX <- 1",
        );
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn assignment_type_mismatch() {
        assert_eq!(
            codes("DECLARE N : INTEGER\nN <- \"text\""),
            vec![DiagnosticCode::Sem003]
        );
    }

    #[test]
    fn integer_feeds_real_target() {
        let result = analyze_source("DECLARE R : REAL\nR <- 3");
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn real_does_not_feed_integer_target() {
        assert_eq!(
            codes("DECLARE N : INTEGER\nN <- 3.5"),
            vec![DiagnosticCode::Sem003]
        );
    }

    #[test]
    fn division_always_yields_real() {
        assert_eq!(
            codes("DECLARE N : INTEGER\nN <- 4 / 2"),
            vec![DiagnosticCode::Sem003]
        );
        let clean = analyze_source("DECLARE R : REAL\nR <- 4 / 2");
        assert!(clean.diagnostics.is_empty());
    }

    #[test]
    fn constant_cannot_be_assigned_or_input() {
        assert_eq!(
            codes("CONSTANT Pi <- 3.14\nPi <- 3"),
            vec![DiagnosticCode::Sem025]
        );
        assert_eq!(
            codes("CONSTANT Pi <- 3.14\nINPUT Pi"),
            vec![DiagnosticCode::Sem025]
        );
    }

    #[test]
    fn constant_takes_its_value_type() {
        assert_eq!(
            codes("CONSTANT Limit <- 10\nDECLARE S : STRING\nS <- Limit"),
            vec![DiagnosticCode::Sem003]
        );
    }

    #[test]
    fn condition_checks() {
        assert_eq!(codes("IF 1 THEN\nENDIF"), vec![DiagnosticCode::Sem004]);
        assert_eq!(
            codes("WHILE 1 DO\nENDWHILE"),
            vec![DiagnosticCode::Sem009]
        );
        assert_eq!(codes("REPEAT\nUNTIL 1"), vec![DiagnosticCode::Sem008]);
    }

    #[test]
    fn for_iterator_must_be_declared_integer() {
        assert_eq!(
            codes("FOR I <- 1 TO 3\nNEXT I"),
            vec![DiagnosticCode::Sem005]
        );
        assert_eq!(
            codes("DECLARE I : STRING\nFOR I <- 1 TO 3\nNEXT I"),
            vec![DiagnosticCode::Sem006]
        );
    }

    #[test]
    fn for_bounds_must_be_numeric() {
        assert_eq!(
            codes("DECLARE I : INTEGER\nFOR I <- 1 TO \"x\"\nNEXT I"),
            vec![DiagnosticCode::Sem007]
        );
        assert_eq!(
            codes("DECLARE I : INTEGER\nFOR I <- 1 TO 9 STEP \"x\"\nNEXT I"),
            vec![DiagnosticCode::Sem007]
        );
    }

    #[test]
    fn for_iterator_assignment_warns() {
        let result = analyze_source(
            "DECLARE I : INTEGER\nFOR I <- 1 TO 3\n    I <- 9\nNEXT I",
        );
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].code, DiagnosticCode::Sem026);
        assert_eq!(
            result.diagnostics[0].severity,
            crate::diagnostics::Severity::Warning
        );
    }

    #[test]
    fn unary_operator_checks() {
        assert_eq!(
            codes("DECLARE B : BOOLEAN\nB <- NOT 1"),
            vec![DiagnosticCode::Sem020]
        );
        assert_eq!(
            codes("DECLARE N : INTEGER\nN <- -TRUE"),
            vec![DiagnosticCode::Sem021]
        );
    }

    #[test]
    fn arithmetic_requires_numeric_operands() {
        assert_eq!(
            codes("DECLARE N : INTEGER\nN <- 1 + \"x\""),
            vec![DiagnosticCode::Sem022]
        );
    }

    #[test]
    fn logical_requires_boolean_operands() {
        assert_eq!(
            codes("DECLARE B : BOOLEAN\nB <- TRUE AND 1"),
            vec![DiagnosticCode::Sem023]
        );
    }

    #[test]
    fn relational_operands_are_unrestricted() {
        let result = analyze_source("DECLARE B : BOOLEAN\nB <- \"a\" < 1");
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn unknown_type_suppresses_cascades() {
        // `Missing` is undeclared: one SEM019, but no SEM022/SEM003 cascade.
        assert_eq!(
            codes("DECLARE N : INTEGER\nN <- Missing + 1"),
            vec![DiagnosticCode::Sem019]
        );
    }

    #[test]
    fn builtin_signature_checks() {
        let clean = analyze_source("DECLARE N : INTEGER\nN <- DIV(7, 2)");
        assert!(clean.diagnostics.is_empty());

        assert_eq!(
            codes("DECLARE N : INTEGER\nN <- DIV(7)"),
            vec![DiagnosticCode::Sem017]
        );
        assert_eq!(
            codes("DECLARE N : INTEGER\nN <- LENGTH(5)"),
            vec![DiagnosticCode::Sem018]
        );
    }

    #[test]
    fn round_accepts_random() {
        let result = analyze_source("DECLARE R : REAL\nR <- ROUND(RANDOM(), 2)");
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn unknown_function_call() {
        assert_eq!(
            codes("DECLARE N : INTEGER\nN <- Mystery(1)"),
            vec![DiagnosticCode::Sem024]
        );
    }

    #[test]
    fn user_function_resolution_is_case_insensitive() {
        let result = analyze_source(
            "FUNCTION Twice(N : INTEGER) RETURNS INTEGER\n    RETURN N * 2\nENDFUNCTION\nDECLARE X : INTEGER\nX <- TWICE(4)",
        );
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn function_argument_contract() {
        assert_eq!(
            codes(
                "FUNCTION Twice(N : INTEGER) RETURNS INTEGER\n    RETURN N * 2\nENDFUNCTION\nDECLARE X : INTEGER\nX <- Twice(\"no\")"
            ),
            vec![DiagnosticCode::Sem018]
        );
    }

    #[test]
    fn duplicate_routine_names() {
        assert_eq!(
            codes(
                "PROCEDURE P\nENDPROCEDURE\nFUNCTION p RETURNS INTEGER\n    RETURN 1\nENDFUNCTION"
            ),
            vec![DiagnosticCode::Sem001]
        );
    }

    #[test]
    fn duplicate_parameters() {
        assert_eq!(
            codes("PROCEDURE P(A : INTEGER, a : REAL)\nENDPROCEDURE"),
            vec![DiagnosticCode::Sem010]
        );
    }

    #[test]
    fn call_checks() {
        let clean = analyze_source("PROCEDURE Hello\n    OUTPUT \"hi\"\nENDPROCEDURE\nCALL Hello");
        assert!(clean.diagnostics.is_empty());

        assert_eq!(codes("CALL Missing"), vec![DiagnosticCode::Sem012]);
        assert_eq!(
            codes("PROCEDURE P(N : INTEGER)\nENDPROCEDURE\nCALL P(1, 2)"),
            vec![DiagnosticCode::Sem017]
        );
    }

    #[test]
    fn call_works_before_definition() {
        let result = analyze_source("CALL Later\nPROCEDURE Later\nENDPROCEDURE");
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn return_outside_function() {
        assert_eq!(codes("RETURN 1"), vec![DiagnosticCode::Sem013]);
        assert_eq!(
            codes("PROCEDURE P\n    RETURN 1\nENDPROCEDURE"),
            vec![DiagnosticCode::Sem013]
        );
    }

    #[test]
    fn return_type_mismatch() {
        assert_eq!(
            codes("FUNCTION F RETURNS INTEGER\n    RETURN \"x\"\nENDFUNCTION"),
            vec![DiagnosticCode::Sem014]
        );
    }

    #[test]
    fn function_must_contain_return() {
        assert_eq!(
            codes("FUNCTION F RETURNS INTEGER\n    OUTPUT 1\nENDFUNCTION"),
            vec![DiagnosticCode::Sem011]
        );
    }

    #[test]
    fn return_inside_branch_satisfies_the_check() {
        let result = analyze_source(
            "FUNCTION Sign(N : INTEGER) RETURNS INTEGER\n    IF N < 0 THEN\n        RETURN -1\n    ELSE\n        RETURN 1\n    ENDIF\nENDFUNCTION",
        );
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn return_in_unreachable_branch_still_counts() {
        // Textual presence, not reachability.
        let result = analyze_source(
            "FUNCTION F RETURNS INTEGER\n    IF FALSE THEN\n        RETURN 0\n    ENDIF\nENDFUNCTION",
        );
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn array_dimension_mismatch() {
        assert_eq!(
            codes(
                "DECLARE Grid : ARRAY[1:3, 1:3] OF INTEGER\nDECLARE Value : INTEGER\nValue <- Grid[1]"
            ),
            vec![DiagnosticCode::Sem027]
        );
    }

    #[test]
    fn array_index_must_be_integer() {
        assert_eq!(
            codes("DECLARE A : ARRAY[1:5] OF INTEGER\nDECLARE V : INTEGER\nV <- A[\"x\"]"),
            vec![DiagnosticCode::Sem028]
        );
    }

    #[test]
    fn indexing_a_scalar_is_a_dimension_error() {
        assert_eq!(
            codes("DECLARE N : INTEGER\nDECLARE V : INTEGER\nV <- N[1]"),
            vec![DiagnosticCode::Sem027]
        );
    }

    #[test]
    fn file_mode_violations() {
        assert_eq!(
            codes(
                "DECLARE Line : STRING\nOPENFILE \"FileA.txt\" FOR WRITE\nREADFILE \"FileA.txt\", Line"
            ),
            vec![DiagnosticCode::Sem015]
        );
        assert_eq!(
            codes("OPENFILE \"F\" FOR READ\nWRITEFILE \"F\", \"x\""),
            vec![DiagnosticCode::Sem016]
        );
    }

    #[test]
    fn closefile_clears_mode_state() {
        let result = analyze_source(
            "DECLARE Line : STRING\nOPENFILE \"F\" FOR WRITE\nCLOSEFILE \"F\"\nOPENFILE \"F\" FOR READ\nREADFILE \"F\", Line",
        );
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn non_literal_file_names_skip_mode_checking() {
        let result = analyze_source(
            "DECLARE Name : STRING\nDECLARE Line : STRING\nName <- \"F\"\nOPENFILE Name FOR WRITE\nREADFILE Name, Line",
        );
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn block_file_state_does_not_leak() {
        // The OPENFILE inside the IF block is restored away at ENDIF, so
        // the later READFILE sees no WRITE-mode handle.
        let result = analyze_source(
            "DECLARE Line : STRING\nIF TRUE THEN\n    OPENFILE \"F\" FOR WRITE\nENDIF\nREADFILE \"F\", Line",
        );
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn readfile_target_must_accept_string() {
        assert_eq!(
            codes("DECLARE N : INTEGER\nOPENFILE \"F\" FOR READ\nREADFILE \"F\", N"),
            vec![DiagnosticCode::Sem003]
        );
    }

    #[test]
    fn input_coercions_recorded_for_known_types() {
        let result = analyze_source("DECLARE N : INTEGER\nINPUT N");
        assert_eq!(result.input_coercions.len(), 1);
        assert!(result
            .input_coercions
            .values()
            .all(|t| *t == TypeName::Integer));
    }

    #[test]
    fn spellings_keep_first_declaration() {
        let result = analyze_source("DECLARE Total : INTEGER\nTOTAL <- 1");
        assert!(result.diagnostics.is_empty());
        assert_eq!(
            result.spellings.get("total").map(EcoString::as_str),
            Some("Total")
        );
    }
}
