//! Host defaults and command lookup.
//!
//! Family selection priority:
//! 1. Explicit family (CLI flag or manifest `[toolchain] family`)
//! 2. Tool config (`.nativelink/config.toml` or `~/.nativelink/config.toml`)
//! 3. Host default (MSVC linker on MSVC hosts, GCC linker elsewhere)

use std::path::PathBuf;

use crate::util::process::find_executable;

use super::{FamilyId, ToolchainDescriptor};

/// Pick a family, falling back to the host default.
pub fn default_family(explicit: Option<FamilyId>, configured: Option<FamilyId>) -> FamilyId {
    if let Some(id) = explicit {
        tracing::debug!("using explicit toolchain family {}", id);
        return id;
    }
    if let Some(id) = configured {
        tracing::debug!("using configured toolchain family {}", id);
        return id;
    }

    let host = if cfg!(target_env = "msvc") {
        FamilyId::MsvcLinker
    } else {
        FamilyId::GccLinker
    };
    tracing::debug!("using host default toolchain family {}", host);
    host
}

/// Find the family's command on `PATH`.
pub fn locate_command(descriptor: &ToolchainDescriptor) -> Option<PathBuf> {
    find_executable(descriptor.command)
}
