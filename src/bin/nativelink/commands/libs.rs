//! `nativelink libs` command

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::LibsArgs;
use crate::commands::Project;
use nativelink::core::ProcessEnv;
use nativelink::ops::{list_libraries, SynthesisInputs};
use nativelink::resolver::FsScanner;
use nativelink::util::diagnostic;

pub fn execute(args: LibsArgs, manifest_path: Option<PathBuf>, color: bool) -> Result<()> {
    let project = Project::load(manifest_path, &args.select)?;

    let inputs = SynthesisInputs {
        props: &project.props,
        env: &ProcessEnv,
        scanner: &FsScanner,
    };
    let libraries = list_libraries(&project.manifest, project.family, &inputs)?;
    for warning in libraries.iter().flat_map(|lib| &lib.warnings) {
        diagnostic::emit(&warning.to_diagnostic(), color);
    }

    println!(
        "Libraries for `{}` ({}):",
        project.family,
        project.manifest_path.display()
    );
    println!();

    if libraries.is_empty() {
        println!("  (no active library references)");
        return Ok(());
    }

    for lib in &libraries {
        println!("  {}", lib.reference);
        if lib.names.is_empty() {
            println!("    (no library names)");
        }
        for name in &lib.names {
            let mut matched = lib.matches_for(name).peekable();
            if matched.peek().is_none() {
                println!("    {}: unresolved", name);
                continue;
            }
            for m in matched {
                println!("    {}: {}", name, m.path().display());
            }
        }
        println!();
    }

    Ok(())
}
