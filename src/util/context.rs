//! Global context for nativelink operations.
//!
//! Provides centralized access to the working directory, merged
//! configuration and manifest discovery.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::manifest::{ManifestError, MANIFEST_NAME};
use crate::util::config::{self, Config};

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Global config merged with the project config
    config: Config,
}

impl GlobalContext {
    /// Create a new GlobalContext for the process working directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_cwd(cwd))
    }

    /// Create a GlobalContext with a specific working directory.
    ///
    /// The project config is read from the directory holding the nearest
    /// manifest, or from `cwd` when there is none.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        let mut ctx = GlobalContext {
            cwd,
            config: Config::default(),
        };

        let project_root = ctx
            .find_manifest()
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| ctx.cwd.clone());
        let global = config::global_config_path().unwrap_or_default();
        ctx.config = config::load_config(&global, &config::project_config_path(&project_root));
        ctx
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Find `nativelink.toml` starting from cwd and searching upward.
    pub fn find_manifest(&self) -> Result<PathBuf, ManifestError> {
        let mut current = self.cwd.clone();
        loop {
            let candidate = current.join(MANIFEST_NAME);
            if candidate.is_file() {
                return Ok(candidate);
            }
            if !current.pop() {
                return Err(ManifestError::NotFound {
                    dir: self.cwd.clone(),
                });
            }
        }
    }

    /// Resolve a response-file directory against cwd.
    pub fn response_dir(&self) -> Option<PathBuf> {
        self.config.link.response_dir.as_ref().map(|dir| {
            if dir.is_relative() {
                self.cwd.join(dir)
            } else {
                dir.clone()
            }
        })
    }
}
