//! GCC-style dialects: the `gcc` link driver and compiler, and vendor
//! compilers that accept GCC's switches.

use std::path::Path;

use crate::core::library::LibraryType;
use crate::core::link_spec::{LinkSpec, LinkType};
use crate::resolver::ResolvedLibrary;

use super::{
    Capability, CapabilityResult, FamilyId, Limit, PathEnv, ToolchainAdapter, ToolchainDescriptor,
};

/// Conservative stand-in for the host's `ARG_MAX`.
pub(super) const GCC_MAX_COMMAND_LENGTH: usize = 131_072;

pub(super) const GCC_SOURCE_EXTENSIONS: &[&str] = &[
    ".c", ".cc", ".cpp", ".cxx", ".c++", ".i", ".ii", ".m", ".mm", ".s", ".S",
];

pub(super) const GCC_HEADER_EXTENSIONS: &[&str] = &[".h", ".hh", ".hpp", ".hxx", ".inl"];

pub(super) const GCC_INCLUDE_ENV: PathEnv = PathEnv {
    var: "CPATH",
    delimiter: ':',
};

/// `<prefix>NAME` or `<prefix>NAME=value`; an empty value is dropped.
pub(super) fn define_token(prefix: &str, name: &str, value: Option<&str>) -> String {
    match value.filter(|v| !v.is_empty()) {
        Some(value) => format!("{}{}={}", prefix, name, value),
        None => format!("{}{}", prefix, name),
    }
}

static GCC_LINKER: ToolchainDescriptor = ToolchainDescriptor {
    family: FamilyId::GccLinker,
    command: "gcc",
    input_extensions: &[".o", ".a", ".so", ".dylib", ".lib", ".dll"],
    ignored_extensions: &[".map", ".def"],
    output_suffix: "",
    case_sensitive: true,
    max_command_length: Limit::Bounded(GCC_MAX_COMMAND_LENGTH),
    max_inputs_per_invocation: Limit::Unbounded,
    library_path_env: Some(PathEnv {
        var: "LIBRARY_PATH",
        delimiter: ':',
    }),
    include_path_env: None,
};

static GCC_COMPILER: ToolchainDescriptor = ToolchainDescriptor {
    family: FamilyId::GccCompiler,
    command: "gcc",
    input_extensions: GCC_SOURCE_EXTENSIONS,
    ignored_extensions: GCC_HEADER_EXTENSIONS,
    output_suffix: ".o",
    case_sensitive: true,
    max_command_length: Limit::Bounded(GCC_MAX_COMMAND_LENGTH),
    max_inputs_per_invocation: Limit::Unbounded,
    library_path_env: None,
    include_path_env: Some(GCC_INCLUDE_ENV),
};

/// `lib<name>.a` / `lib<name>.so` patterns for one name.
///
/// Without a preference, the shared form comes first, matching the link
/// driver's own search order.
pub(super) fn lib_patterns(name: &str, library_type: Option<LibraryType>) -> Vec<String> {
    let shared = format!("lib{}.so", name);
    let archive = format!("lib{}.a", name);
    match library_type {
        Some(LibraryType::Static) => vec![archive],
        Some(LibraryType::Shared) | Some(LibraryType::Framework) => vec![shared],
        None => vec![shared, archive],
    }
}

/// `-L<dir>` for every distinct matched directory, then `-l<name>`.
///
/// Static references are bracketed by `-Bstatic`/`-Bdynamic` so the driver
/// cannot pick a shared object sitting next to the archive.
pub(super) fn ld_library_args(libs: &[ResolvedLibrary]) -> Vec<String> {
    let mut args = Vec::new();
    for lib in libs {
        let mut dirs: Vec<String> = Vec::new();
        for m in &lib.matches {
            let dir = m
                .path()
                .parent()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| m.base.display().to_string());
            if !dirs.contains(&dir) {
                dirs.push(dir);
            }
        }
        args.extend(dirs.into_iter().map(|d| format!("-L{}", d)));

        let is_static = lib.library_type == Some(LibraryType::Static) && !lib.names.is_empty();
        if is_static {
            args.push("-Wl,-Bstatic".to_string());
        }
        args.extend(lib.names.iter().map(|n| format!("-l{}", n)));
        if is_static {
            args.push("-Wl,-Bdynamic".to_string());
        }
    }
    args
}

/// `gcc` used as a link driver.
#[derive(Debug, Clone, Copy)]
pub struct GccLinker {
    descriptor: &'static ToolchainDescriptor,
}

impl GccLinker {
    pub fn gnu() -> Self {
        GccLinker {
            descriptor: &GCC_LINKER,
        }
    }
}

impl ToolchainAdapter for GccLinker {
    fn descriptor(&self) -> &ToolchainDescriptor {
        self.descriptor
    }

    fn implied_args(&self, spec: &LinkSpec) -> Vec<String> {
        let mut args = Vec::new();
        if spec.debug {
            args.push("-g".to_string());
        }
        if spec.link_type.is_shared() {
            args.push("-shared".to_string());
        }
        args
    }

    /// Archives are built by `ar`, not the link driver.
    fn link_type(&self, link_type: LinkType) -> CapabilityResult<()> {
        if link_type.is_static() {
            return Err(self.unsupported(Capability::StaticLibrary));
        }
        Ok(())
    }

    fn entry(&self, name: Option<&str>) -> CapabilityResult<Option<String>> {
        Ok(name.map(|n| format!("-Wl,--entry={}", n)))
    }

    fn map(&self, enabled: bool) -> CapabilityResult<Option<String>> {
        Ok(enabled.then(|| "-Wl,--print-map".to_string()))
    }

    fn library_patterns(
        &self,
        names: &[String],
        library_type: Option<LibraryType>,
    ) -> CapabilityResult<Vec<String>> {
        Ok(names
            .iter()
            .flat_map(|name| lib_patterns(name, library_type))
            .collect())
    }

    fn library_args(&self, libs: &[ResolvedLibrary]) -> CapabilityResult<Vec<String>> {
        Ok(ld_library_args(libs))
    }

    fn output_switch(&self, path: &Path) -> Vec<String> {
        vec!["-o".to_string(), path.display().to_string()]
    }

    fn command_file_switch(&self, path: &Path) -> CapabilityResult<String> {
        Ok(format!("@{}", path.display()))
    }
}

/// `gcc -c` and GCC-compatible vendor compilers.
#[derive(Debug, Clone, Copy)]
pub struct GccCompiler {
    descriptor: &'static ToolchainDescriptor,
}

impl GccCompiler {
    pub fn gnu() -> Self {
        GccCompiler {
            descriptor: &GCC_COMPILER,
        }
    }

    pub(super) const fn compatible(descriptor: &'static ToolchainDescriptor) -> Self {
        GccCompiler { descriptor }
    }
}

impl ToolchainAdapter for GccCompiler {
    fn descriptor(&self) -> &ToolchainDescriptor {
        self.descriptor
    }

    fn implied_args(&self, spec: &LinkSpec) -> Vec<String> {
        let mut args = vec!["-c".to_string()];
        if spec.debug {
            args.push("-g".to_string());
        }
        if spec.link_type.is_shared() {
            args.push("-fPIC".to_string());
        }
        args
    }

    fn define_switch(&self, name: &str, value: Option<&str>) -> CapabilityResult<String> {
        Ok(define_token("-D", name, value))
    }

    fn include_dir_switch(&self, dir: &Path) -> CapabilityResult<String> {
        Ok(format!("-I{}", dir.display()))
    }

    fn output_switch(&self, path: &Path) -> Vec<String> {
        vec!["-o".to_string(), path.display().to_string()]
    }

    fn command_file_switch(&self, path: &Path) -> CapabilityResult<String> {
        Ok(format!("@{}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::link_spec::{FixedAddress, Subsystem};
    use crate::resolver::Match;

    fn foo() -> Vec<String> {
        vec!["foo".to_string()]
    }

    #[test]
    fn test_library_patterns_by_type() {
        let gcc = GccLinker::gnu();
        assert_eq!(
            gcc.library_patterns(&foo(), Some(LibraryType::Static)).unwrap(),
            vec!["libfoo.a"]
        );
        assert_eq!(
            gcc.library_patterns(&foo(), Some(LibraryType::Shared)).unwrap(),
            vec!["libfoo.so"]
        );
        assert_eq!(
            gcc.library_patterns(&foo(), Some(LibraryType::Framework)).unwrap(),
            vec!["libfoo.so"]
        );
        assert_eq!(
            gcc.library_patterns(&foo(), None).unwrap(),
            vec!["libfoo.so", "libfoo.a"]
        );
    }

    #[test]
    fn test_implied_args() {
        let gcc = GccLinker::gnu();
        let spec = LinkSpec::new(LinkType::Shared)
            .with_debug(true)
            .with_subsystem(Subsystem::Gui);
        assert_eq!(gcc.implied_args(&spec), vec!["-g", "-shared"]);
        assert!(gcc.implied_args(&LinkSpec::default()).is_empty());
    }

    #[test]
    fn test_static_library_link_rejected() {
        let gcc = GccLinker::gnu();
        let err = gcc.synthesize(&LinkSpec::new(LinkType::Static)).unwrap_err();
        assert_eq!(err.capability, Capability::StaticLibrary);
        assert!(gcc.implied_args(&LinkSpec::new(LinkType::Static)).is_empty());

        // compiling objects for an archive is fine
        assert_eq!(
            GccCompiler::gnu().synthesize(&LinkSpec::new(LinkType::Static)).unwrap(),
            vec!["-c"]
        );
    }

    #[test]
    fn test_capability_boundaries() {
        let gcc = GccLinker::gnu();
        assert_eq!(gcc.incremental(true).unwrap_err().capability, Capability::Incremental);
        assert_eq!(gcc.base(0x1000).unwrap_err().capability, Capability::BaseAddress);
        assert_eq!(gcc.stack(0x1000).unwrap_err().capability, Capability::StackSize);
        assert_eq!(
            gcc.fixed(FixedAddress::Enabled).unwrap_err().capability,
            Capability::FixedAddress
        );
        assert_eq!(gcc.entry(Some("start")).unwrap().as_deref(), Some("-Wl,--entry=start"));
    }

    #[test]
    fn test_synthesize_rejects_set_but_unsupported_option() {
        let gcc = GccLinker::gnu();
        let err = gcc
            .synthesize(&LinkSpec::default().with_base(0x10000))
            .unwrap_err();
        assert_eq!(err.family, FamilyId::GccLinker);
        assert_eq!(err.capability, Capability::BaseAddress);

        // unset options never consult the capability
        assert!(gcc.synthesize(&LinkSpec::default()).unwrap().is_empty());
    }

    #[test]
    fn test_library_args_raw_flags_when_unresolved() {
        let libs = vec![
            ResolvedLibrary {
                reference: "m".into(),
                names: vec!["m".into()],
                library_type: None,
                matches: Vec::new(),
                warnings: Vec::new(),
            },
            ResolvedLibrary {
                reference: "z".into(),
                names: vec!["z".into()],
                library_type: None,
                matches: vec![
                    Match {
                        base: "/opt/z/lib".into(),
                        relative: "libz.so".into(),
                        library: "z".into(),
                    },
                    Match {
                        base: "/opt/z/lib".into(),
                        relative: "libz.a".into(),
                        library: "z".into(),
                    },
                ],
                warnings: Vec::new(),
            },
        ];
        assert_eq!(
            GccLinker::gnu().library_args(&libs).unwrap(),
            vec!["-lm", "-L/opt/z/lib", "-lz"]
        );
    }

    #[test]
    fn test_static_preference_reaches_the_linker() {
        // libz.so sits next to libz.a; only the archive was matched
        let libs = vec![ResolvedLibrary {
            reference: "z".into(),
            names: vec!["z".into()],
            library_type: Some(LibraryType::Static),
            matches: vec![Match {
                base: "/opt/lib".into(),
                relative: "libz.a".into(),
                library: "z".into(),
            }],
            warnings: Vec::new(),
        }];
        assert_eq!(
            GccLinker::gnu().library_args(&libs).unwrap(),
            vec!["-L/opt/lib", "-Wl,-Bstatic", "-lz", "-Wl,-Bdynamic"]
        );
    }

    #[test]
    fn test_compiler() {
        let cc = GccCompiler::gnu();
        assert_eq!(
            cc.implied_args(&LinkSpec::new(LinkType::Shared).with_debug(true)),
            vec!["-c", "-g", "-fPIC"]
        );
        assert_eq!(
            cc.library_patterns(&foo(), None).unwrap_err().capability,
            Capability::LibraryPatterns
        );
        assert_eq!(cc.output_switch(Path::new("a.o")), vec!["-o", "a.o"]);
    }

    #[test]
    fn test_define_and_include_switches() {
        let cc = GccCompiler::gnu();
        assert_eq!(cc.define_switch("NDEBUG", None).unwrap(), "-DNDEBUG");
        assert_eq!(cc.define_switch("LEVEL", Some("2")).unwrap(), "-DLEVEL=2");
        assert_eq!(cc.define_switch("EMPTY", Some("")).unwrap(), "-DEMPTY");
        assert_eq!(cc.include_dir_switch(Path::new("/opt/inc")).unwrap(), "-I/opt/inc");

        let ld = GccLinker::gnu();
        assert_eq!(
            ld.define_switch("X", None).unwrap_err().capability,
            Capability::Defines
        );
        assert_eq!(
            ld.include_dir_switch(Path::new("inc")).unwrap_err().capability,
            Capability::IncludeDirs
        );
    }
}
