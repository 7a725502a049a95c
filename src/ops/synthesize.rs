//! Implementation of `nativelink args` and `nativelink libs`.
//!
//! Drives one manifest through the pipeline:
//!
//! 1. alias pre-pass over every library reference
//! 2. conditional selection of arguments, search paths and libraries
//! 3. option synthesis for the chosen family, then defines and include
//!    directories on compiler families
//! 4. library resolution, checked against the library policy
//! 5. argument assembly

use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::builder::assemble::{AssembleError, ArgumentAssembler, Assembly, AssemblyRequest};
use crate::builder::toolchain::{
    FamilyId, ToolchainAdapter, ToolchainRegistry, UnsupportedCapability,
};
use crate::core::condition::{select_active, PropertyLookup};
use crate::core::errors::ConfigError;
use crate::core::link_spec::SubsystemFlag;
use crate::core::manifest::Manifest;
use crate::core::search_path::active_dirs;
use crate::resolver::{
    effective_search_path, DirectoryScanner, LibraryCatalog, LibraryPolicy, LibraryResolver,
    ResolutionWarning, ResolveError, ResolvedLibrary,
};
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Options for synthesis.
#[derive(Debug, Clone, Default)]
pub struct SynthesizeOptions {
    /// Whether unresolved libraries are fatal
    pub library_policy: LibraryPolicy,

    /// Overrides the manifest's subsystem flag policy
    pub subsystem_flag: Option<SubsystemFlag>,

    /// Directory for response files (default: system temp dir)
    pub response_dir: Option<PathBuf>,
}

/// Top-level synthesis failure.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum SynthesizeError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Unsupported(#[from] UnsupportedCapability),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Assemble(#[from] AssembleError),

    #[error("toolchain family `{0}` is not registered")]
    #[diagnostic(code(nativelink::toolchain::unknown_family))]
    UnknownFamily(FamilyId),
}

impl SynthesizeError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            SynthesizeError::Config(err) => err.to_diagnostic(),
            SynthesizeError::Unsupported(err) => Diagnostic::error(err.to_string())
                .with_suggestion("Remove the option from `[link]` or pick another family"),
            SynthesizeError::Resolve(err) => err.to_diagnostic(),
            SynthesizeError::Assemble(err) => err.to_diagnostic(),
            SynthesizeError::UnknownFamily(_) => {
                Diagnostic::error(self.to_string()).with_suggestion(suggestions::NO_FAMILY)
            }
        }
    }
}

/// Result of synthesizing one manifest.
#[derive(Debug)]
pub struct Synthesis {
    pub family: FamilyId,
    pub assembly: Assembly,
    /// Every active library reference, resolved
    pub libraries: Vec<ResolvedLibrary>,
    /// Include directories the compiler will see: the manifest's, then the
    /// ones it reads from its environment
    pub include_path: Vec<PathBuf>,
    /// Non-fatal outcomes, in resolution order
    pub warnings: Vec<ResolutionWarning>,
}

/// Environment consulted by synthesis.
pub struct SynthesisInputs<'a> {
    /// Properties gating if/unless conditions
    pub props: &'a dyn PropertyLookup,
    /// Source of platform-default search paths
    pub env: &'a dyn PropertyLookup,
    pub scanner: &'a dyn DirectoryScanner,
}

fn adapter_for(family: FamilyId) -> Result<&'static dyn ToolchainAdapter, SynthesizeError> {
    ToolchainRegistry::global()
        .get(family)
        .ok_or(SynthesizeError::UnknownFamily(family))
}

/// Resolve every active library reference of `manifest`, without
/// applying a library policy.
pub fn list_libraries(
    manifest: &Manifest,
    family: FamilyId,
    inputs: &SynthesisInputs<'_>,
) -> Result<Vec<ResolvedLibrary>, SynthesizeError> {
    let adapter = adapter_for(family)?;
    let catalog = LibraryCatalog::build(&manifest.libraries, &manifest.foreign_ids())?;
    resolve_libraries(adapter, manifest, &catalog, inputs, LibraryPolicy::AllowUnresolved)
}

/// Define and include-dir switches for the active `[[define]]` and
/// `[[include_path]]` entries, in declaration order.
fn preprocessor_args(
    adapter: &dyn ToolchainAdapter,
    manifest: &Manifest,
    props: &dyn PropertyLookup,
) -> Result<(Vec<String>, Vec<PathBuf>), SynthesizeError> {
    let mut args = Vec::new();
    for define in select_active(&manifest.defines, props)? {
        args.push(adapter.define_switch(&define.name, define.value.as_deref())?);
    }
    let dirs = active_dirs(&manifest.include_paths, props)?.unwrap_or_default();
    for dir in &dirs {
        args.push(adapter.include_dir_switch(dir)?);
    }
    Ok((args, dirs))
}

fn resolve_libraries(
    adapter: &dyn ToolchainAdapter,
    manifest: &Manifest,
    catalog: &LibraryCatalog,
    inputs: &SynthesisInputs<'_>,
    policy: LibraryPolicy,
) -> Result<Vec<ResolvedLibrary>, SynthesizeError> {
    let active = catalog.active(inputs.props)?;
    if active.is_empty() {
        return Ok(Vec::new());
    }

    let search_path = effective_search_path(
        &manifest.search_paths,
        inputs.props,
        adapter.descriptor(),
        inputs.env,
    )?;
    let resolver = LibraryResolver::new(adapter, inputs.scanner, search_path);

    let mut libraries = Vec::with_capacity(active.len());
    for reference in active {
        let resolved = resolver.resolve(reference)?.collect();
        policy.check(&resolved)?;
        libraries.push(resolved);
    }
    Ok(libraries)
}

/// Turn `manifest` into the invocations for `family`.
pub fn synthesize(
    manifest: &Manifest,
    family: FamilyId,
    inputs: &SynthesisInputs<'_>,
    opts: &SynthesizeOptions,
) -> Result<Synthesis, SynthesizeError> {
    let adapter = adapter_for(family)?;
    let descriptor = adapter.descriptor();

    // Malformed aliases fail before anything is evaluated or scanned.
    let catalog = LibraryCatalog::build(&manifest.libraries, &manifest.foreign_ids())?;

    let arguments: Vec<_> = select_active(&manifest.arguments, inputs.props)?
        .into_iter()
        .cloned()
        .collect();

    let mut spec = manifest.link.clone();
    if let Some(flag) = opts.subsystem_flag {
        spec.subsystem_flag = flag;
    }
    let mut implied = adapter.synthesize(&spec)?;
    let (preprocessor, mut include_path) = preprocessor_args(adapter, manifest, inputs.props)?;
    implied.extend(preprocessor);
    include_path.extend(descriptor.default_include_path(inputs.env));

    let libraries = resolve_libraries(adapter, manifest, &catalog, inputs, opts.library_policy)?;
    let library_args = if libraries.is_empty() {
        Vec::new()
    } else {
        adapter.library_args(&libraries)?
    };

    let files: Vec<PathBuf> = manifest
        .inputs
        .iter()
        .filter(|path| {
            let ignored = descriptor.ignores_input(path);
            if ignored {
                tracing::debug!("ignoring {} for `{}`", path.display(), family);
            }
            !ignored
        })
        .cloned()
        .collect();

    let request = AssemblyRequest {
        arguments,
        implied,
        inputs: files,
        libraries: library_args,
        output: manifest.output.clone(),
    };
    let mut assembler = ArgumentAssembler::new(adapter);
    if let Some(dir) = &opts.response_dir {
        assembler = assembler.with_response_dir(dir);
    }
    let assembly = assembler.assemble(&request)?;

    tracing::debug!(
        "synthesized {} invocation(s) of `{}`",
        assembly.invocations.len(),
        descriptor.command
    );

    let warnings = libraries
        .iter()
        .flat_map(|lib| lib.warnings.iter().cloned())
        .collect();

    Ok(Synthesis {
        family,
        assembly,
        libraries,
        include_path,
        warnings,
    })
}
