//! `nativelink families` command

use anyhow::Result;
use serde::Serialize;

use crate::cli::FamiliesArgs;
use nativelink::builder::toolchain::locate_command;
use nativelink::builder::ToolchainRegistry;
use nativelink::FamilyId;

#[derive(Serialize)]
struct FamilyRow {
    id: FamilyId,
    command: &'static str,
    max_command_length: Option<usize>,
    max_inputs_per_invocation: Option<usize>,
    case_sensitive: bool,
    response_files: bool,
    path: Option<String>,
}

pub fn execute(args: FamiliesArgs) -> Result<()> {
    let rows: Vec<FamilyRow> = ToolchainRegistry::global()
        .all()
        .map(|adapter| {
            let d = adapter.descriptor();
            FamilyRow {
                id: d.family,
                command: d.command,
                max_command_length: d.max_command_length.get(),
                max_inputs_per_invocation: d.max_inputs_per_invocation.get(),
                case_sensitive: d.case_sensitive,
                response_files: adapter.supports_response_files(),
                path: locate_command(d).map(|p| p.display().to_string()),
            }
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!(
        "{:<24} {:<8} {:>10} {:>7} {:<6} {:<4} {}",
        "FAMILY", "COMMAND", "MAX-LEN", "INPUTS", "CASE", "RSP", "PATH"
    );
    for row in &rows {
        let limit = |v: Option<usize>| v.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string());
        println!(
            "{:<24} {:<8} {:>10} {:>7} {:<6} {:<4} {}",
            row.id.as_str(),
            row.command,
            limit(row.max_command_length),
            limit(row.max_inputs_per_invocation),
            if row.case_sensitive { "exact" } else { "fold" },
            if row.response_files { "yes" } else { "no" },
            row.path.as_deref().unwrap_or("not found"),
        );
    }

    Ok(())
}
