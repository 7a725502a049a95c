//! Library resolution.
//!
//! Expands symbolic library references into matched files:
//!
//! 1. [`alias`] collapses `refid` chains and rejects malformed references
//!    before anything touches the filesystem.
//! 2. [`resolve`] asks the toolchain for file name patterns and walks the
//!    search path (last-declared directory first) through a
//!    [`scan::DirectoryScanner`].
//!
//! Zero matches is a legitimate outcome reported as a warning; whether it
//! is fatal is decided by a [`LibraryPolicy`] held by the caller.

use std::path::PathBuf;

pub mod alias;
pub mod errors;
pub mod resolve;
pub mod scan;

pub use alias::{LibraryCatalog, ResolvedReference};
pub use errors::{ResolutionWarning, ResolveError};
pub use resolve::{
    LibraryPolicy, LibraryResolution, LibraryResolver, Match, Matches, ResolvedLibrary,
};
pub use scan::{DirectoryScanner, FsScanner};

use crate::builder::toolchain::ToolchainDescriptor;
use crate::core::condition::PropertyLookup;
use crate::core::errors::ConfigError;
use crate::core::search_path::{active_dirs, SearchPath};

/// Directories to resolve against, in declaration order.
///
/// Uses the active search path entities if any are active, otherwise the
/// descriptor's platform default read from `env`.
pub fn effective_search_path(
    paths: &[SearchPath],
    props: &dyn PropertyLookup,
    descriptor: &ToolchainDescriptor,
    env: &dyn PropertyLookup,
) -> Result<Vec<PathBuf>, ConfigError> {
    match active_dirs(paths, props)? {
        Some(dirs) => Ok(dirs),
        None => {
            let dirs = descriptor.default_search_path(env);
            tracing::debug!(
                "no search path configured, using {} platform default director(ies)",
                dirs.len()
            );
            Ok(dirs)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::toolchain::{FamilyId, ToolchainRegistry};
    use crate::core::condition::Condition;
    use crate::test_support::props;

    #[test]
    fn test_configured_search_path_wins_over_env() {
        let gcc = ToolchainRegistry::global()
            .get(FamilyId::GccLinker)
            .unwrap()
            .descriptor();
        let env = props(&[("LIBRARY_PATH", "/env/a:/env/b")]);

        let configured = vec![SearchPath::new(["/cfg"])];
        assert_eq!(
            effective_search_path(&configured, &props(&[]), gcc, &env).unwrap(),
            vec![PathBuf::from("/cfg")]
        );

        let inactive = vec![SearchPath::new(["/cfg"]).with_condition(Condition::when("x"))];
        assert_eq!(
            effective_search_path(&inactive, &props(&[]), gcc, &env).unwrap(),
            vec![PathBuf::from("/env/a"), PathBuf::from("/env/b")]
        );
    }
}
