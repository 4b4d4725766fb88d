// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Scope tracking for semantic analysis.
//!
//! Scopes form a stack: the global scope at the bottom, a fresh level for
//! each routine body and each block statement (IF branches, CASE clauses,
//! loop bodies). Lookup is case-insensitive and searches innermost to
//! outermost; definition rejects duplicates within a single level.

use ecow::EcoString;
use std::collections::HashMap;

use crate::source_analysis::Span;

use super::types::StaticType;

/// The kind of a named symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    /// A `DECLARE`d variable.
    Variable,
    /// A `CONSTANT`.
    Constant,
    /// A routine parameter.
    Param,
    /// A `PROCEDURE`.
    Procedure,
    /// A `FUNCTION`.
    Function,
}

/// A named symbol in a scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// The name with the spelling of its definition.
    pub name: EcoString,
    /// What kind of symbol this is.
    pub kind: SymbolKind,
    /// Its static type (for routines, `Unknown`; signatures live in the
    /// analyzer's routine tables).
    pub ty: StaticType,
    /// Where the symbol was defined.
    pub defined_at: Span,
}

/// A stack of lexical scope levels.
#[derive(Debug, Clone, Default)]
pub struct ScopeStack {
    levels: Vec<HashMap<String, Symbol>>,
}

impl ScopeStack {
    /// Creates a scope stack holding only the global level.
    #[must_use]
    pub fn new() -> Self {
        Self {
            levels: vec![HashMap::new()],
        }
    }

    /// Enters a new nested scope.
    pub fn push(&mut self) {
        self.levels.push(HashMap::new());
    }

    /// Exits the current scope. Popping the global level is a no-op.
    pub fn pop(&mut self) {
        if self.levels.len() > 1 {
            self.levels.pop();
        }
    }

    /// Defines a symbol in the current scope.
    ///
    /// The key is the lowercased name, making resolution case-insensitive
    /// while the symbol keeps its written spelling. Returns `Err` with the
    /// existing symbol when the name is already defined at this level.
    pub fn define(&mut self, symbol: Symbol) -> Result<(), Symbol> {
        let key = symbol.name.to_ascii_lowercase().to_string();
        let level = self
            .levels
            .last_mut()
            .expect("scope stack always has a global level");
        if let Some(existing) = level.get(&key) {
            return Err(existing.clone());
        }
        level.insert(key, symbol);
        Ok(())
    }

    /// Looks up a name, searching from innermost to outermost scope.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        let key = name.to_ascii_lowercase();
        self.levels.iter().rev().find_map(|level| level.get(&key))
    }

    /// Current nesting depth (0 = global).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }
}
