//! IBM `icc` for OS/400.

use std::path::Path;

use crate::core::link_spec::LinkSpec;

use super::gcc::define_token;
use super::{CapabilityResult, FamilyId, Limit, PathEnv, ToolchainAdapter, ToolchainDescriptor};

static ICC_COMPILER: ToolchainDescriptor = ToolchainDescriptor {
    family: FamilyId::Os400IccCompiler,
    command: "icc",
    input_extensions: &[".c", ".cc", ".cpp", ".cxx", ".c++", ".s"],
    ignored_extensions: &[".h", ".hpp"],
    output_suffix: ".o",
    case_sensitive: false,
    max_command_length: Limit::Unbounded,
    // compiles one file per invocation
    max_inputs_per_invocation: Limit::Bounded(1),
    library_path_env: None,
    include_path_env: Some(PathEnv {
        var: "INCLUDE",
        delimiter: ':',
    }),
};

/// OS/400 `icc`. Compile-only; has no response-file syntax.
#[derive(Debug, Clone, Copy)]
pub struct IccCompiler {
    descriptor: &'static ToolchainDescriptor,
}

impl IccCompiler {
    pub fn ibm() -> Self {
        IccCompiler {
            descriptor: &ICC_COMPILER,
        }
    }
}

impl ToolchainAdapter for IccCompiler {
    fn descriptor(&self) -> &ToolchainDescriptor {
        self.descriptor
    }

    fn implied_args(&self, spec: &LinkSpec) -> Vec<String> {
        let mut args = vec!["-c".to_string()];
        if spec.debug {
            args.push("-g".to_string());
        }
        args
    }

    /// `-qNAME[=value]`
    fn define_switch(&self, name: &str, value: Option<&str>) -> CapabilityResult<String> {
        Ok(define_token("-q", name, value))
    }

    fn include_dir_switch(&self, dir: &Path) -> CapabilityResult<String> {
        Ok(format!("-I{}", dir.display()))
    }

    fn output_switch(&self, path: &Path) -> Vec<String> {
        vec!["-o".to_string(), path.display().to_string()]
    }
}
