//! Test fixtures for common test scenarios.
//!
//! Pre-built manifests and project layouts shared by unit tests.

use std::fs;
use std::path::{Path, PathBuf};

/// A link step for `msvc-linker` exercising every entity kind.
pub const SAMPLE_MANIFEST: &str = r#"
inputs = ["obj/main.obj", "obj/util.obj"]
output = "bin/app.exe"

[toolchain]
family = "msvc-linker"

[link]
type = "executable"
subsystem = "console"
debug = true

[properties]
windows = "1"

[[library]]
id = "gui"
libs = ["user32", "gdi32"]
if = "windows"

[[library]]
refid = "gui"
unless = "headless"

[[search_path]]
id = "sdk"
dirs = ["lib"]

[[arg]]
value = "/WX"
location = "end"

[[arg]]
value = "/LTCG"
if = "release"
"#;

/// A link step for `gcc-linker` with a static and a shared library.
pub const GCC_MANIFEST: &str = r#"
inputs = ["obj/main.o"]
output = "bin/app"

[toolchain]
family = "gcc-linker"

[link]
type = "executable"

[[library]]
libs = ["z"]
type = "static"

[[library]]
libs = ["m"]

[[search_path]]
dirs = ["lib"]
"#;

/// A project directory on disk.
#[derive(Debug, Clone)]
pub struct ProjectFixture {
    /// Manifest contents
    pub manifest: String,
    /// Files to create, relative to the project root
    pub files: Vec<PathBuf>,
}

impl ProjectFixture {
    /// Project with the given manifest and no other files.
    pub fn new(manifest: impl Into<String>) -> Self {
        ProjectFixture {
            manifest: manifest.into(),
            files: Vec::new(),
        }
    }

    /// [`SAMPLE_MANIFEST`] with `lib/user32.lib` present.
    pub fn msvc() -> Self {
        ProjectFixture::new(SAMPLE_MANIFEST).with_file("lib/user32.lib")
    }

    /// [`GCC_MANIFEST`] with `lib/libz.a` and `lib/libm.so` present.
    pub fn gcc() -> Self {
        ProjectFixture::new(GCC_MANIFEST)
            .with_file("lib/libz.a")
            .with_file("lib/libm.so")
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push(path.into());
        self
    }

    /// Write the project under `root`.
    pub fn write_to(&self, root: &Path) -> std::io::Result<()> {
        fs::write(root.join(crate::core::manifest::MANIFEST_NAME), &self.manifest)?;
        for file in &self.files {
            let path = root.join(file);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, "")?;
        }
        Ok(())
    }
}
