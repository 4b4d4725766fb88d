// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Document tree for Python code generation.
//!
//! Codegen functions return composable `Document` values instead of
//! writing to a string buffer with manual indentation tracking; a final
//! pass renders the tree. The tree is strictly deterministic — there is
//! no width-driven group breaking, because Python's indentation is
//! semantic and re-breaking a line would change the program.
//!
//! # Example
//!
//! ```
//! use pseudoc_core::codegen::python::document::{line, nest, INDENT};
//! use pseudoc_core::docvec;
//!
//! let doc = docvec![
//!     "while True:",
//!     nest(INDENT, docvec![line(), "break"]),
//! ];
//! assert_eq!(doc.render(), "while True:\n    break");
//! ```

/// Indentation width used throughout Python generation.
pub const INDENT: isize = 4;

/// A renderable document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document {
    /// A borrowed string literal.
    Str(&'static str),
    /// An owned string.
    String(String),
    /// A newline followed by the current indentation.
    Line,
    /// Increase indentation for nested content.
    Nest(isize, Box<Document>),
    /// A sequence of documents.
    Vec(Vec<Document>),
    /// Empty document.
    Nil,
}

/// Coerce a value into a `Document`.
pub trait Documentable {
    /// Converts this value into a `Document`.
    fn to_doc(self) -> Document;
}

impl Documentable for &'static str {
    fn to_doc(self) -> Document {
        Document::Str(self)
    }
}

impl Documentable for String {
    fn to_doc(self) -> Document {
        Document::String(self)
    }
}

impl Documentable for Document {
    fn to_doc(self) -> Document {
        self
    }
}

impl Documentable for Vec<Document> {
    fn to_doc(self) -> Document {
        Document::Vec(self)
    }
}

/// Join multiple documents together in a vector.
///
/// Each element is converted to a `Document` via the `Documentable`
/// trait. Documents are concatenated directly — no separator is inserted.
///
/// ```
/// use pseudoc_core::docvec;
///
/// let doc = docvec!["hello", " ", "world"];
/// assert_eq!(doc.render(), "hello world");
/// ```
#[macro_export]
macro_rules! docvec {
    () => {
        $crate::codegen::python::document::Document::Vec(Vec::new())
    };

    ($first:expr $(,)?) => {
        $crate::codegen::python::document::Document::Vec(
            vec![$crate::codegen::python::document::Documentable::to_doc($first)]
        )
    };

    ($first:expr, $($rest:expr),+ $(,)?) => {
        match $crate::codegen::python::document::Documentable::to_doc($first) {
            $crate::codegen::python::document::Document::Vec(mut vec) => {
                $(
                    vec.push($crate::codegen::python::document::Documentable::to_doc($rest));
                )*
                $crate::codegen::python::document::Document::Vec(vec)
            },
            first => {
                $crate::codegen::python::document::Document::Vec(
                    vec![first, $($crate::codegen::python::document::Documentable::to_doc($rest)),+]
                )
            }
        }
    };
}

/// Creates a `Line` document — a newline followed by indentation.
#[must_use]
pub fn line() -> Document {
    Document::Line
}

/// Creates a `Nil` document — an empty document.
#[must_use]
pub fn nil() -> Document {
    Document::Nil
}

/// Creates a `Nest` document — increases indentation for the inner document.
#[must_use]
pub fn nest(indent: isize, doc: Document) -> Document {
    Document::Nest(indent, Box::new(doc))
}

/// Joins documents with a separator between each pair.
#[must_use]
pub fn join(docs: impl IntoIterator<Item = Document>, separator: &Document) -> Document {
    let docs: Vec<_> = docs.into_iter().collect();
    if docs.is_empty() {
        return Document::Nil;
    }
    let mut result = Vec::with_capacity(docs.len() * 2 - 1);
    let mut first = true;
    for doc in docs {
        if !first {
            result.push(separator.clone());
        }
        result.push(doc);
        first = false;
    }
    Document::Vec(result)
}

/// Concatenates documents without any separator.
#[must_use]
pub fn concat(docs: impl IntoIterator<Item = Document>) -> Document {
    Document::Vec(docs.into_iter().collect())
}

impl Document {
    /// Renders the document to a string.
    ///
    /// Uses an iterative work-list to avoid recursion overflow on deeply
    /// nested documents. Trailing whitespace is stripped from every line
    /// (a `Line` inside a `Nest` writes its indentation before knowing
    /// whether content follows).
    #[must_use]
    pub fn render(&self) -> String {
        use std::collections::VecDeque;

        let mut output = String::new();

        // Work list of (indent, document) processed front-to-back.
        let mut work: VecDeque<(isize, &Document)> = VecDeque::new();
        work.push_back((0, self));

        while let Some((indent, doc)) = work.pop_front() {
            match doc {
                Document::Nil => {}
                Document::Str(s) => output.push_str(s),
                Document::String(s) => output.push_str(s),
                Document::Line => {
                    output.push('\n');
                    for _ in 0..indent {
                        output.push(' ');
                    }
                }
                Document::Nest(extra, inner) => {
                    work.push_front((indent + extra, inner));
                }
                Document::Vec(docs) => {
                    // Push in reverse so the first element is processed first.
                    for d in docs.iter().rev() {
                        work.push_front((indent, d));
                    }
                }
            }
        }

        let trimmed: Vec<&str> = output.split('\n').map(str::trim_end).collect();
        trimmed.join("\n")
    }
}
