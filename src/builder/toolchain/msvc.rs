//! MSVC-style dialects: `link.exe`-compatible linkers and `cl.exe`.

use std::path::Path;

use crate::core::library::LibraryType;
use crate::core::link_spec::{FixedAddress, LinkSpec, LinkType, Subsystem, SubsystemFlag};
use crate::resolver::ResolvedLibrary;

use super::gcc::define_token;
use super::{
    Capability, CapabilityResult, FamilyId, Limit, PathEnv, ToolchainAdapter, ToolchainDescriptor,
};

/// Conservative ceiling below the 32767 characters Windows accepts.
pub(super) const MSVC_MAX_COMMAND_LENGTH: usize = 32000;

pub(super) const MSVC_LIB_ENV: PathEnv = PathEnv {
    var: "LIB",
    delimiter: ';',
};

static MSVC_LINKER: ToolchainDescriptor = ToolchainDescriptor {
    family: FamilyId::MsvcLinker,
    command: "link",
    input_extensions: &[".obj", ".lib", ".res"],
    ignored_extensions: &[".map", ".pdb", ".lnk", ".dll", ".tlb", ".rc", ".h"],
    output_suffix: ".exe",
    case_sensitive: false,
    max_command_length: Limit::Bounded(MSVC_MAX_COMMAND_LENGTH),
    max_inputs_per_invocation: Limit::Unbounded,
    library_path_env: Some(MSVC_LIB_ENV),
    include_path_env: None,
};

static MSVC_COMPILER: ToolchainDescriptor = ToolchainDescriptor {
    family: FamilyId::MsvcCompiler,
    command: "cl",
    input_extensions: &[".c", ".cc", ".cpp", ".cxx", ".c++"],
    ignored_extensions: &[".h", ".hh", ".hpp", ".hxx", ".inl"],
    output_suffix: ".obj",
    case_sensitive: false,
    max_command_length: Limit::Bounded(MSVC_MAX_COMMAND_LENGTH),
    max_inputs_per_invocation: Limit::Unbounded,
    library_path_env: None,
    include_path_env: Some(PathEnv {
        var: "INCLUDE",
        delimiter: ';',
    }),
};

/// `/NAME:0x<hex>` for non-negative values, nothing otherwise.
pub(super) fn hex_switch(name: &str, value: i64) -> Option<String> {
    (value >= 0).then(|| format!("/{}:0x{:x}", name, value))
}

/// `name.lib` for every name, whatever the preferred type.
pub(super) fn lib_patterns(names: &[String]) -> Vec<String> {
    names.iter().map(|name| format!("{}.lib", name)).collect()
}

/// Linker that accepts the Microsoft incremental linker's switches.
#[derive(Debug, Clone, Copy)]
pub struct MsvcLinker {
    descriptor: &'static ToolchainDescriptor,
}

impl MsvcLinker {
    /// Microsoft `link.exe`.
    pub fn microsoft() -> Self {
        MsvcLinker {
            descriptor: &MSVC_LINKER,
        }
    }

    /// A vendor linker that mimics `link.exe` switches.
    pub(super) const fn compatible(descriptor: &'static ToolchainDescriptor) -> Self {
        MsvcLinker { descriptor }
    }
}

impl ToolchainAdapter for MsvcLinker {
    fn descriptor(&self) -> &ToolchainDescriptor {
        self.descriptor
    }

    fn implied_args(&self, spec: &LinkSpec) -> Vec<String> {
        let mut args = vec!["/NOLOGO".to_string()];
        if spec.debug {
            args.push("/DEBUG".to_string());
        }
        if spec.link_type.is_shared() {
            args.push("/DLL".to_string());
        }
        if spec.subsystem_flag == SubsystemFlag::Emit {
            match spec.subsystem {
                Subsystem::Gui => args.push("/SUBSYSTEM:WINDOWS".to_string()),
                Subsystem::Console => args.push("/SUBSYSTEM:CONSOLE".to_string()),
                Subsystem::Unspecified => {}
            }
        }
        args
    }

    /// Static libraries are the librarian's job (`lib.exe`).
    fn link_type(&self, link_type: LinkType) -> CapabilityResult<()> {
        if link_type.is_static() {
            return Err(self.unsupported(Capability::StaticLibrary));
        }
        Ok(())
    }

    fn incremental(&self, enabled: bool) -> CapabilityResult<Option<String>> {
        let flag = if enabled {
            "/INCREMENTAL:YES"
        } else {
            "/INCREMENTAL:NO"
        };
        Ok(Some(flag.to_string()))
    }

    fn base(&self, address: i64) -> CapabilityResult<Option<String>> {
        Ok(hex_switch("BASE", address))
    }

    fn stack(&self, size: i64) -> CapabilityResult<Option<String>> {
        Ok(hex_switch("STACK", size))
    }

    fn fixed(&self, fixed: FixedAddress) -> CapabilityResult<Option<String>> {
        Ok(match fixed {
            FixedAddress::Unset => None,
            FixedAddress::Enabled => Some("/FIXED".to_string()),
            FixedAddress::Disabled => Some("/FIXED:NO".to_string()),
        })
    }

    fn entry(&self, name: Option<&str>) -> CapabilityResult<Option<String>> {
        Ok(name.map(|n| format!("/ENTRY:{}", n)))
    }

    fn map(&self, enabled: bool) -> CapabilityResult<Option<String>> {
        Ok(enabled.then(|| "/MAP".to_string()))
    }

    fn library_patterns(
        &self,
        names: &[String],
        _library_type: Option<LibraryType>,
    ) -> CapabilityResult<Vec<String>> {
        Ok(lib_patterns(names))
    }

    /// Matched files go on the command line as inputs. A name with no match
    /// is passed as `name.lib` so the linker can search `LIB` itself.
    fn library_args(&self, libs: &[ResolvedLibrary]) -> CapabilityResult<Vec<String>> {
        let mut args = Vec::new();
        for lib in libs {
            for name in &lib.names {
                let mut matched = lib.matches_for(name).peekable();
                if matched.peek().is_none() {
                    args.push(format!("{}.lib", name));
                } else {
                    args.extend(matched.map(|m| m.path().display().to_string()));
                }
            }
        }
        Ok(args)
    }

    fn output_switch(&self, path: &Path) -> Vec<String> {
        vec![format!("/OUT:{}", path.display())]
    }

    fn command_file_switch(&self, path: &Path) -> CapabilityResult<String> {
        Ok(format!("@{}", path.display()))
    }
}

/// Microsoft `cl.exe` in compile-only mode.
#[derive(Debug, Clone, Copy)]
pub struct MsvcCompiler {
    descriptor: &'static ToolchainDescriptor,
}

impl MsvcCompiler {
    pub fn microsoft() -> Self {
        MsvcCompiler {
            descriptor: &MSVC_COMPILER,
        }
    }
}

impl ToolchainAdapter for MsvcCompiler {
    fn descriptor(&self) -> &ToolchainDescriptor {
        self.descriptor
    }

    fn implied_args(&self, spec: &LinkSpec) -> Vec<String> {
        let mut args = vec!["/nologo".to_string(), "/c".to_string()];
        if spec.debug {
            args.extend(["/Zi", "/Od", "/D_DEBUG"].map(String::from));
        } else {
            args.extend(["/O2", "/DNDEBUG"].map(String::from));
        }
        if spec.link_type.is_shared() {
            args.push("/D_USRDLL".to_string());
        }
        args
    }

    fn define_switch(&self, name: &str, value: Option<&str>) -> CapabilityResult<String> {
        Ok(define_token("/D", name, value))
    }

    fn include_dir_switch(&self, dir: &Path) -> CapabilityResult<String> {
        Ok(format!("/I{}", dir.display()))
    }

    fn output_switch(&self, path: &Path) -> Vec<String> {
        vec![format!("/Fo{}", path.display())]
    }

    fn command_file_switch(&self, path: &Path) -> CapabilityResult<String> {
        Ok(format!("@{}", path.display()))
    }
}
