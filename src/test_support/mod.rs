//! Test utilities and mocks for nativelink unit tests.
//!
//! This module provides an in-memory [`DirectoryScanner`] so resolution
//! can be tested without touching the real filesystem, plus helpers for
//! building property sets.
//!
//! # Example
//!
//! ```rust,ignore
//! use nativelink::test_support::{props, MockScanner};
//!
//! #[test]
//! fn test_example() {
//!     let mut scanner = MockScanner::new();
//!     scanner.add_file("/usr/lib", "libm.so");
//!
//!     let props = props(&[("debug", "1")]);
//!     // Use mocks in tests...
//! }
//! ```

pub mod fixtures;

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::resolver::scan::{compile_patterns, match_options, DirectoryScanner};

// Re-export fixtures for convenience
pub use fixtures::*;

/// Build a property set from string pairs.
pub fn props(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// In-memory directory scanner.
///
/// Files are registered per root directory. Every call to `scan` is
/// recorded so tests can assert which directories were visited, and in
/// what order.
#[derive(Debug, Clone, Default)]
pub struct MockScanner {
    files: BTreeMap<PathBuf, Vec<PathBuf>>,
    calls: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockScanner {
    /// Create a scanner with no files.
    pub fn new() -> Self {
        MockScanner::default()
    }

    /// Add a file (relative to `dir`).
    pub fn add_file(&mut self, dir: impl AsRef<Path>, name: impl AsRef<Path>) {
        self.files
            .entry(dir.as_ref().to_path_buf())
            .or_default()
            .push(name.as_ref().to_path_buf());
    }

    /// Roots scanned so far, in call order.
    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }
}

impl DirectoryScanner for MockScanner {
    fn scan(&self, root: &Path, patterns: &[String], case_sensitive: bool) -> Vec<PathBuf> {
        self.calls.lock().unwrap().push(root.to_path_buf());

        let compiled = compile_patterns(patterns);
        let options = match_options(case_sensitive);
        let mut found: Vec<PathBuf> = self
            .files
            .get(root)
            .map(|files| {
                files
                    .iter()
                    .filter(|f| {
                        let candidate = f.to_string_lossy().replace('\\', "/");
                        compiled
                            .iter()
                            .any(|p| p.matches_with(&candidate, options))
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        found.sort();
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_scanner_matches_and_records() {
        let mut scanner = MockScanner::new();
        scanner.add_file("/lib", "libm.so");
        scanner.add_file("/lib", "libm.a");
        scanner.add_file("/lib", "libz.a");

        let found = scanner.scan(Path::new("/lib"), &["libm.*".to_string()], true);
        assert_eq!(found, vec![PathBuf::from("libm.a"), PathBuf::from("libm.so")]);

        assert!(scanner
            .scan(Path::new("/other"), &["*".to_string()], true)
            .is_empty());
        assert_eq!(
            scanner.calls(),
            vec![PathBuf::from("/lib"), PathBuf::from("/other")]
        );
    }

    #[test]
    fn test_props() {
        let p = props(&[("a", "1")]);
        assert_eq!(p.get("a").map(String::as_str), Some("1"));
    }
}
