//! `nativelink.toml` manifest parsing and schema.
//!
//! The manifest is a declarative description of one compile or link step:
//!
//! ```toml
//! inputs = ["obj/main.obj", "obj/util.obj"]
//! output = "bin/app.exe"
//!
//! [toolchain]
//! family = "msvc-linker"
//!
//! [link]
//! type = "executable"
//! subsystem = "console"
//! debug = true
//!
//! [properties]
//! windows = "1"
//!
//! [[library]]
//! libs = ["user32", "gdi32"]
//! if = "windows"
//!
//! [[search_path]]
//! dirs = ["C:/sdk/lib"]
//!
//! [[arg]]
//! value = "/WX"
//! location = "end"
//! ```
//!
//! Compiler families also take `[[define]]` (`name`, optional `value`) and
//! `[[include_path]]` (`dirs`) entries, gated like everything else.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use miette::Diagnostic as MietteDiagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::builder::toolchain::FamilyId;
use crate::core::argument::CommandArgument;
use crate::core::define::Define;
use crate::core::errors::EntityKind;
use crate::core::library::LibraryReference;
use crate::core::link_spec::LinkSpec;
use crate::core::search_path::SearchPath;
use crate::util::fs;

/// Manifest file name.
pub const MANIFEST_NAME: &str = "nativelink.toml";

/// Manifest discovery failed.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ManifestError {
    #[error("could not find `nativelink.toml` in `{}` or any parent directory", .dir.display())]
    #[diagnostic(
        code(nativelink::manifest::not_found),
        help("create a `nativelink.toml` describing the compile or link step")
    )]
    NotFound { dir: PathBuf },
}

/// `[toolchain]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainSection {
    /// Dialect family to synthesize for
    pub family: Option<FamilyId>,
}

/// A parsed manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    pub toolchain: ToolchainSection,

    pub link: LinkSpec,

    /// Properties consulted by if/unless gates
    pub properties: BTreeMap<String, String>,

    #[serde(rename = "library")]
    pub libraries: Vec<LibraryReference>,

    #[serde(rename = "search_path")]
    pub search_paths: Vec<SearchPath>,

    #[serde(rename = "arg")]
    pub arguments: Vec<CommandArgument>,

    /// Preprocessor definitions, compiler families only
    #[serde(rename = "define")]
    pub defines: Vec<Define>,

    /// Include directories, compiler families only
    #[serde(rename = "include_path")]
    pub include_paths: Vec<SearchPath>,

    /// Input files, in command-line order
    pub inputs: Vec<PathBuf>,

    /// Output file
    pub output: Option<PathBuf>,
}

impl Manifest {
    /// Load a manifest and anchor its relative paths at the manifest's
    /// directory.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let mut manifest: Manifest = toml::from_str(&contents)
            .with_context(|| format!("failed to parse manifest: {}", path.display()))?;

        if let Some(root) = path.parent() {
            manifest.anchor(root);
        }
        Ok(manifest)
    }

    /// Make every relative path in the manifest relative to `root`.
    pub fn anchor(&mut self, root: &Path) {
        let join = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = root.join(&*p);
            }
        };

        self.inputs.iter_mut().for_each(join);
        if let Some(output) = self.output.as_mut() {
            join(output);
        }
        for lib in &mut self.libraries {
            if let Some(dir) = lib.dir.as_mut() {
                join(dir);
            }
        }
        for path in self.search_paths.iter_mut().chain(self.include_paths.iter_mut()) {
            path.dirs.iter_mut().for_each(join);
        }
    }

    /// Ids declared by entities other than library references.
    ///
    /// Library aliases must never resolve to one of these.
    pub fn foreign_ids(&self) -> Vec<(String, EntityKind)> {
        let paths = self
            .search_paths
            .iter()
            .filter_map(|p| p.id.clone().map(|id| (id, EntityKind::SearchPath)));
        let includes = self
            .include_paths
            .iter()
            .filter_map(|p| p.id.clone().map(|id| (id, EntityKind::IncludePath)));
        let args = self
            .arguments
            .iter()
            .filter_map(|a| a.id.clone().map(|id| (id, EntityKind::Argument)));
        paths.chain(includes).chain(args).collect()
    }
}
