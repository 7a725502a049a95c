//! `nativelink args` command

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::ArgsArgs;
use crate::commands::Project;
use nativelink::core::ProcessEnv;
use nativelink::ops::{synthesize, SynthesisInputs, SynthesizeOptions};
use nativelink::resolver::{FsScanner, LibraryPolicy};
use nativelink::util::diagnostic;
use nativelink::util::fs::ensure_dir;
use nativelink::{CommandSpec, FamilyId};

/// JSON form of `nativelink args --json`.
#[derive(Serialize)]
struct ArgsReport<'a> {
    family: FamilyId,
    invocations: &'a [CommandSpec],
    response_files: Vec<PathBuf>,
    include_path: &'a [PathBuf],
}

pub fn execute(args: ArgsArgs, manifest_path: Option<PathBuf>, color: bool) -> Result<()> {
    let project = Project::load(manifest_path, &args.select)?;
    let config = project.ctx.config();

    let library_policy = if args.require_files {
        LibraryPolicy::RequireFiles
    } else {
        config.library_policy()
    };
    let response_dir = match args.response_dir {
        Some(dir) => Some(dir),
        None => project.ctx.response_dir(),
    };
    if let Some(dir) = &response_dir {
        ensure_dir(dir)?;
    }

    let opts = SynthesizeOptions {
        library_policy,
        subsystem_flag: config.link.subsystem_flag,
        response_dir,
    };
    let inputs = SynthesisInputs {
        props: &project.props,
        env: &ProcessEnv,
        scanner: &FsScanner,
    };
    let mut synthesis = synthesize(&project.manifest, project.family, &inputs, &opts)?;
    for warning in &synthesis.warnings {
        diagnostic::emit(&warning.to_diagnostic(), color);
    }

    // The printed invocations refer to these; they must outlive the process.
    let response_files = synthesis
        .assembly
        .persist_response_files()
        .context("failed to keep response file")?;
    for path in &response_files {
        tracing::info!("wrote response file {}", path.display());
    }

    if args.json {
        let report = ArgsReport {
            family: synthesis.family,
            invocations: &synthesis.assembly.invocations,
            response_files,
            include_path: &synthesis.include_path,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for invocation in &synthesis.assembly.invocations {
            println!("{}", invocation.display());
        }
    }

    Ok(())
}
