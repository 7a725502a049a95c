//! Directory scanning.
//!
//! The resolver never touches the filesystem directly; it asks a
//! [`DirectoryScanner`] for the files under a root that match a set of
//! include patterns. Scans are best-effort snapshots.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use walkdir::WalkDir;

use crate::util::fs::relative_path;

/// Enumerate files under a root directory.
pub trait DirectoryScanner: Send + Sync {
    /// Files under `root` matching any of `patterns`, as paths relative to
    /// `root`, sorted. A missing root yields no files.
    fn scan(&self, root: &Path, patterns: &[String], case_sensitive: bool) -> Vec<PathBuf>;
}

/// Match options shared by every scanner.
pub fn match_options(case_sensitive: bool) -> MatchOptions {
    MatchOptions {
        case_sensitive,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    }
}

/// Compile include patterns, dropping (and logging) invalid ones.
pub fn compile_patterns(patterns: &[String]) -> Vec<Pattern> {
    patterns
        .iter()
        .filter_map(|p| match Pattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                tracing::warn!("ignoring invalid pattern `{}`: {}", p, e);
                None
            }
        })
        .collect()
}

/// Scanner over the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsScanner;

impl DirectoryScanner for FsScanner {
    fn scan(&self, root: &Path, patterns: &[String], case_sensitive: bool) -> Vec<PathBuf> {
        if !root.is_dir() {
            tracing::debug!("skipping missing library directory {}", root.display());
            return Vec::new();
        }

        let compiled = compile_patterns(patterns);
        if compiled.is_empty() {
            return Vec::new();
        }
        let options = match_options(case_sensitive);

        // Plain file names only ever match at the top level.
        let recursive = patterns.iter().any(|p| p.contains('/'));
        let mut walker = WalkDir::new(root).min_depth(1).follow_links(true);
        if !recursive {
            walker = walker.max_depth(1);
        }

        let mut found = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("error scanning {}: {}", root.display(), e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = relative_path(root, entry.path());
            let candidate = relative.to_string_lossy().replace('\\', "/");
            if compiled
                .iter()
                .any(|pattern| pattern.matches_with(&candidate, options))
            {
                found.push(relative);
            }
        }

        found.sort();
        found
    }
}
