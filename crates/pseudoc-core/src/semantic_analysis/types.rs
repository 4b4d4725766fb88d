// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Static types and the compatibility relation.
//!
//! The analyzer works over a small lattice: the five basic types, array
//! types (basic element, 1 or 2 dimensions), and [`StaticType::Unknown`].
//! `Unknown` arises from unresolved names or earlier type errors and
//! propagates without generating further diagnostics, so one mistake is
//! reported once.

use crate::ast::{TypeName, TypeSpec};

/// A type as the semantic analyzer sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaticType {
    /// Not derivable; suppresses cascading diagnostics.
    Unknown,
    /// One of the five basic types.
    Basic(TypeName),
    /// An array with a basic element type and 1 or 2 dimensions.
    Array {
        /// The element type.
        element: TypeName,
        /// Number of dimensions (1 or 2).
        dimensions: usize,
    },
}

impl StaticType {
    /// The static type a declared [`TypeSpec`] denotes.
    #[must_use]
    pub fn from_spec(spec: &TypeSpec) -> Self {
        match spec {
            TypeSpec::Basic { name, .. } => Self::Basic(*name),
            TypeSpec::Array {
                element,
                dimensions,
                ..
            } => Self::Array {
                element: *element,
                dimensions: dimensions.len(),
            },
        }
    }

    /// Returns `true` for INTEGER and REAL (and `Unknown`, which never
    /// fails a check).
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Unknown | Self::Basic(TypeName::Integer | TypeName::Real)
        )
    }

    /// Returns `true` for BOOLEAN (and `Unknown`).
    #[must_use]
    pub const fn is_boolean(self) -> bool {
        matches!(self, Self::Unknown | Self::Basic(TypeName::Boolean))
    }

    /// Returns `true` when this is the `Unknown` type.
    #[must_use]
    pub const fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Returns the basic type name, if this is a basic type.
    #[must_use]
    pub const fn basic(self) -> Option<TypeName> {
        match self {
            Self::Basic(name) => Some(name),
            _ => None,
        }
    }

    /// The compatibility relation: can a value of type `self` feed a
    /// position of type `target`?
    ///
    /// - `Unknown` feeds and accepts everything (cascade suppression)
    /// - basic names match exactly, except REAL accepts INTEGER
    /// - array types match iff element type and dimension count agree
    #[must_use]
    pub fn can_feed(self, target: Self) -> bool {
        match (self, target) {
            (Self::Unknown, _) | (_, Self::Unknown) => true,
            (Self::Basic(TypeName::Integer), Self::Basic(TypeName::Real)) => true,
            (Self::Basic(source), Self::Basic(target)) => source == target,
            (
                Self::Array {
                    element: source_element,
                    dimensions: source_dimensions,
                },
                Self::Array {
                    element: target_element,
                    dimensions: target_dimensions,
                },
            ) => source_element == target_element && source_dimensions == target_dimensions,
            _ => false,
        }
    }
}

impl std::fmt::Display for StaticType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => f.write_str("UNKNOWN"),
            Self::Basic(name) => f.write_str(name.as_str()),
            Self::Array {
                element,
                dimensions,
            } => write!(f, "ARRAY[{dimensions}D] OF {element}"),
        }
    }
}
