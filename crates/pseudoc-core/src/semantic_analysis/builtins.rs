// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Built-in routine signatures.
//!
//! Built-ins are resolved by uppercase name before user functions, so a
//! user function cannot shadow one.

use crate::ast::TypeName;

/// The fixed signature of a built-in routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinSignature {
    /// The canonical name.
    pub name: &'static str,
    /// Positional parameter types.
    pub params: &'static [TypeName],
    /// The result type.
    pub returns: TypeName,
}

/// The built-in signature table.
pub const BUILTINS: &[BuiltinSignature] = &[
    BuiltinSignature {
        name: "DIV",
        params: &[TypeName::Integer, TypeName::Integer],
        returns: TypeName::Integer,
    },
    BuiltinSignature {
        name: "MOD",
        params: &[TypeName::Integer, TypeName::Integer],
        returns: TypeName::Integer,
    },
    BuiltinSignature {
        name: "LENGTH",
        params: &[TypeName::String],
        returns: TypeName::Integer,
    },
    BuiltinSignature {
        name: "LCASE",
        params: &[TypeName::String],
        returns: TypeName::String,
    },
    BuiltinSignature {
        name: "UCASE",
        params: &[TypeName::String],
        returns: TypeName::String,
    },
    BuiltinSignature {
        name: "SUBSTRING",
        params: &[TypeName::String, TypeName::Integer, TypeName::Integer],
        returns: TypeName::String,
    },
    BuiltinSignature {
        name: "ROUND",
        params: &[TypeName::Real, TypeName::Integer],
        returns: TypeName::Real,
    },
    BuiltinSignature {
        name: "RANDOM",
        params: &[],
        returns: TypeName::Real,
    },
];

/// Looks up a built-in by uppercase name.
#[must_use]
pub fn builtin_signature(uppercase_name: &str) -> Option<&'static BuiltinSignature> {
    BUILTINS.iter().find(|b| b.name == uppercase_name)
}
