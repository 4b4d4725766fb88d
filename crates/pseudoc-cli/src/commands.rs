// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The `build` and `check` commands.

use camino::Utf8PathBuf;
use miette::{miette, IntoDiagnostic, Result};
use pseudoc_core::compiler::{compile, CompileRequest, CompileResult};
use tracing::debug;

use crate::diagnostic::CompileDiagnostic;

/// Compiles `path` and writes the emitted Python.
pub fn build(path: &str, output: Option<&str>, emit_ast: bool) -> Result<()> {
    let source_path = Utf8PathBuf::from(path);
    let source = read_source(&source_path)?;

    let result = compile_and_report(&source_path, &source);
    let Some(python_code) = result.python_code else {
        return Err(miette!("compilation of {source_path} failed"));
    };

    let output_path = match output {
        Some(output) => Utf8PathBuf::from(output),
        None => source_path.with_extension("py"),
    };
    std::fs::write(&output_path, python_code).into_diagnostic()?;
    debug!(%output_path, "wrote emitted Python");

    if emit_ast {
        let ast_path = output_path.with_extension("ast.json");
        std::fs::write(&ast_path, &result.ast_json).into_diagnostic()?;
        debug!(%ast_path, "wrote AST JSON");
    }

    println!("Compiled {source_path} -> {output_path}");
    Ok(())
}

/// Checks `path`, printing diagnostics without writing output.
pub fn check(path: &str) -> Result<()> {
    let source_path = Utf8PathBuf::from(path);
    let source = read_source(&source_path)?;

    let result = compile_and_report(&source_path, &source);
    if result.success {
        println!("{source_path}: no errors");
        Ok(())
    } else {
        Err(miette!("check of {source_path} failed"))
    }
}

fn read_source(path: &Utf8PathBuf) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|error| miette!("cannot read {path}: {error}"))
}

/// Runs the compiler and prints every diagnostic as a miette report.
fn compile_and_report(path: &Utf8PathBuf, source: &str) -> CompileResult {
    let request = CompileRequest::new(source, path.as_str());
    let result = compile(&request);
    debug!(
        diagnostics = result.diagnostics.len(),
        success = result.success,
        "compiled {path}"
    );

    for diagnostic in &result.diagnostics {
        let report = CompileDiagnostic::from_core_diagnostic(diagnostic, path.as_str(), source);
        eprintln!("{:?}", miette::Report::new(report));
    }

    result
}
