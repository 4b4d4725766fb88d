// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Code generation.
//!
//! The only target is Python text with a fixed runtime prelude; see
//! [`python`] for the generator and [`python::prelude`] for the emitted
//! runtime.

pub mod python;


pub use python::generate;
