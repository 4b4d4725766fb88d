// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Pseudoc compiler command-line interface.
//!
//! This is the main entry point for the `pseudoc` command.

use clap::{Parser, Subcommand};
use miette::Result;

mod commands;
mod diagnostic;

/// Pseudoc: an IGCSE pseudocode to Python compiler
#[derive(Debug, Parser)]
#[command(name = "pseudoc")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compile a pseudocode source file to Python
    Build {
        /// Source file to compile
        path: String,

        /// Where to write the emitted Python (default: source with .py)
        #[arg(short, long)]
        output: Option<String>,

        /// Also write the AST as JSON next to the output
        #[arg(long)]
        emit_ast: bool,
    },

    /// Check a source file for errors without writing output
    Check {
        /// Source file to check
        path: String,
    },
}

fn main() -> Result<()> {
    // Initialize tracing subscriber only if RUST_LOG is explicitly set,
    // so normal runs keep stderr clean for diagnostics.
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .try_init();
    }

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))?;

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Build {
            path,
            output,
            emit_ast,
        } => commands::build(&path, output.as_deref(), emit_ast),
        Command::Check { path } => commands::check(&path),
    };

    match result {
        Ok(()) => Ok(()),
        Err(error) => {
            eprintln!("{error:?}");
            std::process::exit(1);
        }
    }
}
