//! Library resolution: symbolic names to matched files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::builder::toolchain::{ToolchainAdapter, UnsupportedCapability};
use crate::core::errors::ConfigError;
use crate::core::library::LibraryType;

use super::alias::ResolvedReference;
use super::errors::{ResolutionWarning, ResolveError};
use super::scan::DirectoryScanner;

/// A file that satisfies a library name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    /// Directory that was scanned
    pub base: PathBuf,
    /// File name relative to `base`
    pub relative: PathBuf,
    /// Symbolic name this file was matched for
    pub library: String,
}

impl Match {
    pub fn path(&self) -> PathBuf {
        self.base.join(&self.relative)
    }
}

/// Patterns computed for one symbolic name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePlan {
    pub name: String,
    pub patterns: Vec<String>,
}

/// Resolves library references against a search path.
pub struct LibraryResolver<'a> {
    adapter: &'a dyn ToolchainAdapter,
    scanner: &'a dyn DirectoryScanner,
    search_path: Vec<PathBuf>,
}

impl<'a> LibraryResolver<'a> {
    /// `search_path` is in declaration order; the last entry has priority.
    pub fn new(
        adapter: &'a dyn ToolchainAdapter,
        scanner: &'a dyn DirectoryScanner,
        search_path: Vec<PathBuf>,
    ) -> Self {
        LibraryResolver {
            adapter,
            scanner,
            search_path,
        }
    }

    /// Prepare the resolution of one reference.
    ///
    /// No directory is scanned here; patterns are computed eagerly so an
    /// unsupported family fails before any scan.
    pub fn resolve(
        &self,
        reference: &ResolvedReference,
    ) -> Result<LibraryResolution<'a>, UnsupportedCapability> {
        let mut plans = Vec::with_capacity(reference.names.len());
        for name in &reference.names {
            let patterns = self
                .adapter
                .library_patterns(std::slice::from_ref(name), reference.library_type)?;
            if patterns.is_empty() {
                continue;
            }
            plans.push(NamePlan {
                name: name.clone(),
                patterns,
            });
        }

        let case_sensitive = reference
            .case_sensitive
            .unwrap_or(self.adapter.descriptor().case_sensitive);

        let dirs = match &reference.dir {
            Some(dir) => vec![dir.clone()],
            None => self.search_path.iter().rev().cloned().collect(),
        };

        tracing::debug!(
            "resolving `{}` ({} name(s)) across {} director(ies)",
            reference.label,
            plans.len(),
            dirs.len()
        );

        Ok(LibraryResolution {
            reference: reference.label.clone(),
            names: reference.names.clone(),
            library_type: reference.library_type,
            plans,
            dirs,
            case_sensitive,
            scanner: self.scanner,
        })
    }
}

/// A prepared resolution. Scans happen only while iterating
/// [`LibraryResolution::matches`].
pub struct LibraryResolution<'a> {
    reference: String,
    names: Vec<String>,
    library_type: Option<LibraryType>,
    plans: Vec<NamePlan>,
    dirs: Vec<PathBuf>,
    case_sensitive: bool,
    scanner: &'a dyn DirectoryScanner,
}

impl<'a> LibraryResolution<'a> {
    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// A fresh, lazy sequence of matches: for each name, every directory in
    /// priority order. Matches are not deduplicated across directories.
    pub fn matches(&self) -> Matches<'_> {
        Matches {
            resolution: self,
            plan: 0,
            dir: 0,
            pending: Vec::new().into_iter(),
            pending_base: None,
        }
    }

    /// Drain every match and attach warnings for empty outcomes.
    pub fn collect(&self) -> ResolvedLibrary {
        let matches: Vec<Match> = self.matches().collect();
        let mut warnings = Vec::new();

        if self.names.is_empty() {
            warnings.push(ResolutionWarning::EmptyReference {
                reference: self.reference.clone(),
            });
        }
        for plan in &self.plans {
            if !matches.iter().any(|m| m.library == plan.name) {
                warnings.push(ResolutionWarning::NoMatches {
                    reference: self.reference.clone(),
                    library: plan.name.clone(),
                    patterns: plan.patterns.clone(),
                });
            }
        }
        for warning in &warnings {
            tracing::debug!("{}", warning);
        }

        ResolvedLibrary {
            reference: self.reference.clone(),
            names: self.names.clone(),
            library_type: self.library_type,
            matches,
            warnings,
        }
    }
}

/// Lazy iterator over the matches of one resolution.
pub struct Matches<'r> {
    resolution: &'r LibraryResolution<'r>,
    plan: usize,
    dir: usize,
    pending: std::vec::IntoIter<PathBuf>,
    pending_base: Option<(&'r Path, &'r str)>,
}

impl<'r> Iterator for Matches<'r> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        loop {
            if let Some(relative) = self.pending.next() {
                if let Some((base, library)) = self.pending_base {
                    return Some(Match {
                        base: base.to_path_buf(),
                        relative,
                        library: library.to_string(),
                    });
                }
            }

            let plan = self.resolution.plans.get(self.plan)?;
            let Some(dir) = self.resolution.dirs.get(self.dir) else {
                self.plan += 1;
                self.dir = 0;
                continue;
            };
            self.dir += 1;

            let found = self
                .resolution
                .scanner
                .scan(dir, &plan.patterns, self.resolution.case_sensitive);
            self.pending = found.into_iter();
            self.pending_base = Some((dir.as_path(), plan.name.as_str()));
        }
    }
}

/// Everything known about one resolved reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedLibrary {
    pub reference: String,
    pub names: Vec<String>,
    /// Preferred type of the reference, carried through to the link flags
    pub library_type: Option<LibraryType>,
    pub matches: Vec<Match>,
    #[serde(skip)]
    pub warnings: Vec<ResolutionWarning>,
}

impl ResolvedLibrary {
    /// True if no file matched at all.
    pub fn is_unresolved(&self) -> bool {
        self.matches.is_empty()
    }

    /// Matches for one symbolic name, in resolution order.
    pub fn matches_for<'s>(&'s self, name: &'s str) -> impl Iterator<Item = &'s Match> + 's {
        self.matches.iter().filter(move |m| m.library == name)
    }
}

/// What to do when a library resolves to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LibraryPolicy {
    /// Leave it to the linker (raw `-lname` style arguments)
    #[default]
    AllowUnresolved,
    /// Every name must match at least one file
    RequireFiles,
}

impl LibraryPolicy {
    pub fn check(&self, lib: &ResolvedLibrary) -> Result<(), ResolveError> {
        if *self == LibraryPolicy::AllowUnresolved {
            return Ok(());
        }
        for warning in &lib.warnings {
            match warning {
                ResolutionWarning::EmptyReference { reference } => {
                    return Err(ConfigError::EmptyReference {
                        reference: reference.clone(),
                    }
                    .into());
                }
                ResolutionWarning::NoMatches {
                    reference,
                    library,
                    patterns,
                } => {
                    return Err(ResolveError::Unresolved {
                        reference: reference.clone(),
                        library: library.clone(),
                        patterns: patterns.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
