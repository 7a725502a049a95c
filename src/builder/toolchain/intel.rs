//! Intel compilers and linkers.
//!
//! Both are vendor variants of an existing dialect and differ only in their
//! descriptor: `xilink` takes `link.exe` switches, `ecc` takes GCC's and has
//! no practical command-length ceiling.

use super::gcc::{GCC_HEADER_EXTENSIONS, GCC_INCLUDE_ENV, GCC_SOURCE_EXTENSIONS};
use super::msvc::{MSVC_LIB_ENV, MSVC_MAX_COMMAND_LENGTH};
use super::{FamilyId, GccCompiler, Limit, MsvcLinker, ToolchainDescriptor};

static INTEL_WIN_LINKER: ToolchainDescriptor = ToolchainDescriptor {
    family: FamilyId::IntelWinLinker,
    command: "xilink",
    input_extensions: &[".obj", ".lib", ".res"],
    ignored_extensions: &[".map", ".pdb", ".lnk", ".dll", ".tlb", ".rc", ".h"],
    output_suffix: ".exe",
    case_sensitive: false,
    max_command_length: Limit::Bounded(MSVC_MAX_COMMAND_LENGTH),
    max_inputs_per_invocation: Limit::Unbounded,
    library_path_env: Some(MSVC_LIB_ENV),
    include_path_env: None,
};

static INTEL_LINUX64_COMPILER: ToolchainDescriptor = ToolchainDescriptor {
    family: FamilyId::IntelLinux64Compiler,
    command: "ecc",
    input_extensions: GCC_SOURCE_EXTENSIONS,
    ignored_extensions: GCC_HEADER_EXTENSIONS,
    output_suffix: ".o",
    case_sensitive: true,
    max_command_length: Limit::Unbounded,
    max_inputs_per_invocation: Limit::Unbounded,
    library_path_env: None,
    include_path_env: Some(GCC_INCLUDE_ENV),
};

/// Intel's `link.exe`-compatible linker for Windows.
pub fn windows_linker() -> MsvcLinker {
    MsvcLinker::compatible(&INTEL_WIN_LINKER)
}

/// Intel C compiler for Linux on IA-64.
pub fn linux64_compiler() -> GccCompiler {
    GccCompiler::compatible(&INTEL_LINUX64_COMPILER)
}
