//! nativelink CLI - Compiler and linker command synthesis

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use nativelink::core::manifest::ManifestError;
use nativelink::ops::SynthesizeError;
use nativelink::util::diagnostic::{self, suggestions, Diagnostic};

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color && std::io::stderr().is_terminal();

    if let Err(e) = run(cli, color) {
        if let Some(err) = e.downcast_ref::<SynthesizeError>() {
            diagnostic::emit(&err.to_diagnostic(), color);
        } else if let Some(err) = e.downcast_ref::<ManifestError>() {
            let diag = Diagnostic::error(err.to_string()).with_suggestion(suggestions::NO_MANIFEST);
            diagnostic::emit(&diag, color);
        } else {
            eprintln!("error: {:#}", e);
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli, color: bool) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("nativelink=debug")
    } else {
        EnvFilter::new("nativelink=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    match cli.command {
        Commands::Args(args) => commands::args::execute(args, cli.manifest_path, color),
        Commands::Libs(args) => commands::libs::execute(args, cli.manifest_path, color),
        Commands::Families(args) => commands::families::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
