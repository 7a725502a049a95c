//! Configuration file support for nativelink.
//!
//! nativelink supports two configuration file locations:
//! - Global: `~/.nativelink/config.toml` - User-wide defaults
//! - Project: `.nativelink/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::builder::toolchain::FamilyId;
use crate::core::link_spec::SubsystemFlag;
use crate::resolver::LibraryPolicy;

/// Directory holding config files, both in the home and project roots.
pub const CONFIG_DIR: &str = ".nativelink";

/// nativelink configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Toolchain settings
    pub toolchain: ToolchainConfig,

    /// Link settings
    pub link: LinkConfig,
}

/// Toolchain-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// Family used when neither the command line nor the manifest names one
    pub family: Option<FamilyId>,
}

/// Link-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Whether MSVC-style linkers get a `/SUBSYSTEM:` switch
    pub subsystem_flag: Option<SubsystemFlag>,

    /// Whether unresolved libraries are fatal
    pub library_policy: Option<LibraryPolicy>,

    /// Where response files are written (default: system temp dir)
    pub response_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.toolchain.family.is_some() {
            self.toolchain.family = other.toolchain.family;
        }

        if other.link.subsystem_flag.is_some() {
            self.link.subsystem_flag = other.link.subsystem_flag;
        }
        if other.link.library_policy.is_some() {
            self.link.library_policy = other.link.library_policy;
        }
        if other.link.response_dir.is_some() {
            self.link.response_dir = other.link.response_dir;
        }
    }

    pub fn subsystem_flag(&self) -> SubsystemFlag {
        self.link.subsystem_flag.unwrap_or_default()
    }

    pub fn library_policy(&self) -> LibraryPolicy {
        self.link.library_policy.unwrap_or_default()
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.nativelink/config.toml)
/// 2. Global config (~/.nativelink/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    // Load global config first
    if global_path.exists() {
        let global = Config::load_or_default(global_path);
        config.merge(global);
    }

    // Project config overrides global
    if project_path.exists() {
        let project = Config::load_or_default(project_path);
        config.merge(project);
    }

    config
}

/// Environment variable overriding the global config directory.
pub const HOME_ENV: &str = "NATIVELINK_HOME";

/// Get the global config directory (`$NATIVELINK_HOME`, else ~/.nativelink).
pub fn global_config_dir() -> Option<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV) {
        return Some(PathBuf::from(home));
    }
    directories::BaseDirs::new().map(|b| b.home_dir().join(CONFIG_DIR))
}

/// Get the global config path (~/.nativelink/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.nativelink/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_DIR).join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.toolchain.family.is_none());
        assert_eq!(config.subsystem_flag(), SubsystemFlag::Emit);
        assert_eq!(config.library_policy(), LibraryPolicy::AllowUnresolved);
    }

    #[test]
    fn test_config_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");

        std::fs::write(
            &config_path,
            r#"
[toolchain]
family = "gcc-linker"

[link]
subsystem_flag = "suppress"
library_policy = "require-files"
response_dir = "/tmp/rsp"
"#,
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.toolchain.family, Some(FamilyId::GccLinker));
        assert_eq!(config.subsystem_flag(), SubsystemFlag::Suppress);
        assert_eq!(config.library_policy(), LibraryPolicy::RequireFiles);
        assert_eq!(config.link.response_dir, Some(PathBuf::from("/tmp/rsp")));
    }

    #[test]
    fn test_config_rejects_unknown_family() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        std::fs::write(&config_path, "[toolchain]\nfamily = \"borland\"\n").unwrap();

        assert!(Config::load(&config_path).is_err());
        assert_eq!(Config::load_or_default(&config_path), Config::default());
    }

    #[test]
    fn test_config_merge() {
        let mut base = Config::default();
        base.toolchain.family = Some(FamilyId::MsvcLinker);
        base.link.library_policy = Some(LibraryPolicy::RequireFiles);

        let mut override_cfg = Config::default();
        override_cfg.toolchain.family = Some(FamilyId::IntelWinLinker);

        base.merge(override_cfg);

        assert_eq!(base.toolchain.family, Some(FamilyId::IntelWinLinker));
        assert_eq!(base.library_policy(), LibraryPolicy::RequireFiles); // Not overridden
    }

    #[test]
    fn test_load_config_precedence() {
        let tmp = TempDir::new().unwrap();
        let global_path = tmp.path().join("global.toml");
        let project_path = tmp.path().join("project.toml");

        std::fs::write(
            &global_path,
            "[toolchain]\nfamily = \"gcc-linker\"\n[link]\nsubsystem_flag = \"suppress\"\n",
        )
        .unwrap();
        std::fs::write(&project_path, "[toolchain]\nfamily = \"msvc-linker\"\n").unwrap();

        let config = load_config(&global_path, &project_path);
        assert_eq!(config.toolchain.family, Some(FamilyId::MsvcLinker));
        assert_eq!(config.subsystem_flag(), SubsystemFlag::Suppress);
    }
}
