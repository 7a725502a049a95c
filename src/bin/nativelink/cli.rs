//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use nativelink::FamilyId;

/// nativelink - Dialect-correct compiler and linker command lines
#[derive(Parser)]
#[command(name = "nativelink")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to nativelink.toml (default: search upward from the current directory)
    #[arg(long, global = true)]
    pub manifest_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the command line(s) for the manifest
    Args(ArgsArgs),

    /// Show how each library reference resolves
    Libs(LibsArgs),

    /// List the supported toolchain families
    Families(FamiliesArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Family and property selection shared by manifest commands.
#[derive(Args)]
pub struct SelectArgs {
    /// Toolchain family (overrides the manifest and config)
    #[arg(long, env = "NATIVELINK_FAMILY")]
    pub family: Option<FamilyId>,

    /// Define a property for if/unless conditions (name or name=value)
    #[arg(short = 'D', long = "define", value_name = "NAME[=VALUE]")]
    pub defines: Vec<String>,
}

#[derive(Args)]
pub struct ArgsArgs {
    #[command(flatten)]
    pub select: SelectArgs,

    /// Emit the invocations as JSON
    #[arg(long)]
    pub json: bool,

    /// Fail if any library resolves to no file
    #[arg(long)]
    pub require_files: bool,

    /// Directory for response files (overrides config)
    #[arg(long)]
    pub response_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct LibsArgs {
    #[command(flatten)]
    pub select: SelectArgs,
}

#[derive(Args)]
pub struct FamiliesArgs {
    /// Emit the family table as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
