//! Toolchain abstraction for compiler/linker dialects.
//!
//! Each dialect family is a stateless value implementing
//! [`ToolchainAdapter`]. Adapters describe themselves through an immutable
//! [`ToolchainDescriptor`] and map an abstract [`LinkSpec`] onto the
//! family's flag syntax. Operations a family does not model return
//! [`UnsupportedCapability`] instead of silently producing nothing.
//!
//! Families that share conventions share a struct (and free helper
//! functions); vendor variants are the same struct built from a different
//! descriptor.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use miette::Diagnostic as MietteDiagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::condition::PropertyLookup;
use crate::core::errors::ConfigError;
use crate::core::library::LibraryType;
use crate::core::link_spec::{FixedAddress, LinkSpec, LinkType};
use crate::core::search_path::SearchPath;
use crate::resolver::ResolvedLibrary;

mod detect;
mod gcc;
pub mod intel;
mod msvc;
pub mod os400;
mod registry;

pub use detect::{default_family, locate_command};
pub use gcc::{GccCompiler, GccLinker};
pub use msvc::{MsvcCompiler, MsvcLinker};
pub use os400::IccCompiler;
pub use registry::ToolchainRegistry;

/// Identifier of a dialect family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FamilyId {
    MsvcLinker,
    IntelWinLinker,
    MsvcCompiler,
    GccLinker,
    GccCompiler,
    IntelLinux64Compiler,
    Os400IccCompiler,
}

impl FamilyId {
    /// Every known family, in display order.
    pub const ALL: [FamilyId; 7] = [
        FamilyId::MsvcLinker,
        FamilyId::IntelWinLinker,
        FamilyId::MsvcCompiler,
        FamilyId::GccLinker,
        FamilyId::GccCompiler,
        FamilyId::IntelLinux64Compiler,
        FamilyId::Os400IccCompiler,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FamilyId::MsvcLinker => "msvc-linker",
            FamilyId::IntelWinLinker => "intel-win-linker",
            FamilyId::MsvcCompiler => "msvc-compiler",
            FamilyId::GccLinker => "gcc-linker",
            FamilyId::GccCompiler => "gcc-compiler",
            FamilyId::IntelLinux64Compiler => "intel-linux64-compiler",
            FamilyId::Os400IccCompiler => "os400-icc-compiler",
        }
    }
}

impl fmt::Display for FamilyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FamilyId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FamilyId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| ConfigError::InvalidValue {
                what: "toolchain family",
                value: s.to_string(),
                expected: "msvc-linker, intel-win-linker, msvc-compiler, gcc-linker, \
                           gcc-compiler, intel-linux64-compiler, os400-icc-compiler",
            })
    }
}

/// A numeric ceiling that may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Bounded(usize),
    Unbounded,
}

impl Limit {
    /// True if `n` does not exceed the limit.
    pub fn allows(&self, n: usize) -> bool {
        match self {
            Limit::Bounded(max) => n <= *max,
            Limit::Unbounded => true,
        }
    }

    pub fn get(&self) -> Option<usize> {
        match self {
            Limit::Bounded(max) => Some(*max),
            Limit::Unbounded => None,
        }
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Limit::Bounded(max) => write!(f, "{}", max),
            Limit::Unbounded => write!(f, "unbounded"),
        }
    }
}

/// Environment variable holding a family's default library search path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathEnv {
    pub var: &'static str,
    pub delimiter: char,
}

/// Immutable facts about one dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainDescriptor {
    pub family: FamilyId,
    /// Program name (e.g., "link", "gcc")
    pub command: &'static str,
    /// Extensions of files accepted as inputs
    pub input_extensions: &'static [&'static str],
    /// Extensions of files that are recognized but never passed as inputs
    pub ignored_extensions: &'static [&'static str],
    /// Suffix of the produced file
    pub output_suffix: &'static str,
    pub case_sensitive: bool,
    pub max_command_length: Limit,
    pub max_inputs_per_invocation: Limit,
    pub library_path_env: Option<PathEnv>,
    /// Environment variable the compiler reads extra include directories from
    pub include_path_env: Option<PathEnv>,
}

impl ToolchainDescriptor {
    /// True if `path` is a recognized file that is never passed as input.
    pub fn ignores_input(&self, path: &Path) -> bool {
        let name = path.to_string_lossy();
        self.ignored_extensions.iter().any(|ext| {
            if self.case_sensitive {
                name.ends_with(ext)
            } else {
                name.to_lowercase().ends_with(&ext.to_lowercase())
            }
        })
    }

    /// Platform-default search path, read from the family's environment
    /// variable. Empty if the family has none or the variable is unset.
    pub fn default_search_path(&self, env: &dyn PropertyLookup) -> Vec<PathBuf> {
        split_env(self.library_path_env, env)
    }

    /// Include directories the compiler picks up from its environment.
    pub fn default_include_path(&self, env: &dyn PropertyLookup) -> Vec<PathBuf> {
        split_env(self.include_path_env, env)
    }
}

fn split_env(path_env: Option<PathEnv>, env: &dyn PropertyLookup) -> Vec<PathBuf> {
    path_env
        .and_then(|pe| env.property(pe.var).map(|v| (v, pe.delimiter)))
        .map(|(value, delimiter)| SearchPath::from_delimited(&value, delimiter).dirs)
        .unwrap_or_default()
}

/// Operations a family may not model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Incremental,
    BaseAddress,
    StackSize,
    FixedAddress,
    EntryPoint,
    MapFile,
    LibraryPatterns,
    LibraryArgs,
    ResponseFile,
    StaticLibrary,
    Defines,
    IncludeDirs,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Capability::Incremental => "incremental linking",
            Capability::BaseAddress => "base addresses",
            Capability::StackSize => "stack sizes",
            Capability::FixedAddress => "fixed-address images",
            Capability::EntryPoint => "entry points",
            Capability::MapFile => "map files",
            Capability::LibraryPatterns => "library file patterns",
            Capability::LibraryArgs => "library arguments",
            Capability::ResponseFile => "response files",
            Capability::StaticLibrary => "building static libraries",
            Capability::Defines => "preprocessor definitions",
            Capability::IncludeDirs => "include directories",
        };
        f.write_str(s)
    }
}

/// A family was asked for something it does not model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, MietteDiagnostic)]
#[error("toolchain family `{family}` does not support {capability}")]
#[diagnostic(code(nativelink::toolchain::unsupported))]
pub struct UnsupportedCapability {
    pub family: FamilyId,
    pub capability: Capability,
}

pub type CapabilityResult<T> = Result<T, UnsupportedCapability>;

/// Trait for dialect family implementations.
///
/// Every operation is a pure function of the descriptor and its inputs.
pub trait ToolchainAdapter: Send + Sync {
    fn descriptor(&self) -> &ToolchainDescriptor;

    fn family(&self) -> FamilyId {
        self.descriptor().family
    }

    fn unsupported(&self, capability: Capability) -> UnsupportedCapability {
        UnsupportedCapability {
            family: self.family(),
            capability,
        }
    }

    /// Arguments implied by the build options.
    fn implied_args(&self, spec: &LinkSpec) -> Vec<String>;

    /// Whether the family can produce `link_type` at all.
    fn link_type(&self, _link_type: LinkType) -> CapabilityResult<()> {
        Ok(())
    }

    fn incremental(&self, _enabled: bool) -> CapabilityResult<Option<String>> {
        Err(self.unsupported(Capability::Incremental))
    }

    fn base(&self, _address: i64) -> CapabilityResult<Option<String>> {
        Err(self.unsupported(Capability::BaseAddress))
    }

    fn stack(&self, _size: i64) -> CapabilityResult<Option<String>> {
        Err(self.unsupported(Capability::StackSize))
    }

    fn fixed(&self, _fixed: FixedAddress) -> CapabilityResult<Option<String>> {
        Err(self.unsupported(Capability::FixedAddress))
    }

    fn entry(&self, _name: Option<&str>) -> CapabilityResult<Option<String>> {
        Err(self.unsupported(Capability::EntryPoint))
    }

    fn map(&self, _enabled: bool) -> CapabilityResult<Option<String>> {
        Err(self.unsupported(Capability::MapFile))
    }

    /// File name patterns that satisfy the given library names.
    fn library_patterns(
        &self,
        _names: &[String],
        _library_type: Option<LibraryType>,
    ) -> CapabilityResult<Vec<String>> {
        Err(self.unsupported(Capability::LibraryPatterns))
    }

    /// Command-line form of resolved libraries.
    fn library_args(&self, _libs: &[ResolvedLibrary]) -> CapabilityResult<Vec<String>> {
        Err(self.unsupported(Capability::LibraryArgs))
    }

    /// `name` or `name=value` as a preprocessor definition.
    fn define_switch(&self, _name: &str, _value: Option<&str>) -> CapabilityResult<String> {
        Err(self.unsupported(Capability::Defines))
    }

    fn include_dir_switch(&self, _dir: &Path) -> CapabilityResult<String> {
        Err(self.unsupported(Capability::IncludeDirs))
    }

    fn output_switch(&self, path: &Path) -> Vec<String>;

    /// Token that makes the tool read its arguments from `path`.
    fn command_file_switch(&self, _path: &Path) -> CapabilityResult<String> {
        Err(self.unsupported(Capability::ResponseFile))
    }

    fn supports_response_files(&self) -> bool {
        self.command_file_switch(Path::new("args.rsp")).is_ok()
    }

    /// Implied arguments followed by one token per set option.
    ///
    /// Options are consulted in the order incremental, base, stack, fixed,
    /// entry, map. Unset options never touch the capability, so a family
    /// without (say) base addresses still synthesizes specs that leave the
    /// base unset.
    fn synthesize(&self, spec: &LinkSpec) -> CapabilityResult<Vec<String>> {
        self.link_type(spec.link_type)?;
        let mut args = self.implied_args(spec);

        if let Some(enabled) = spec.incremental {
            args.extend(self.incremental(enabled)?);
        }
        if spec.base >= 0 {
            args.extend(self.base(spec.base)?);
        }
        if spec.stack >= 0 {
            args.extend(self.stack(spec.stack)?);
        }
        if spec.fixed != FixedAddress::Unset {
            args.extend(self.fixed(spec.fixed)?);
        }
        if let Some(entry) = spec.entry.as_deref() {
            args.extend(self.entry(Some(entry))?);
        }
        if spec.map {
            args.extend(self.map(true)?);
        }

        Ok(args)
    }
}

/// A command to execute: program and arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSpec {
    /// The program to run (e.g., "gcc", "link")
    pub program: String,
    /// Command arguments
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Create a new command spec.
    pub fn new(program: impl Into<String>) -> Self {
        CommandSpec {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Add an argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(|a| a.into()));
        self
    }

    /// Length of the command line with single-space separators.
    pub fn serialized_len(&self) -> usize {
        serialized_len(&self.program, &self.args)
    }

    /// Display the command on one line.
    pub fn display(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Length of `program` followed by `args`, single-space separated.
pub fn serialized_len(program: &str, args: &[String]) -> usize {
    program.len() + args.iter().map(|a| a.len() + 1).sum::<usize>()
}
