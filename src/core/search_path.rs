//! Ordered library search paths.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::condition::{select_active, Condition, Gated, PropertyLookup};
use crate::core::errors::ConfigError;

/// An ordered list of directories with an optional gate.
///
/// Later-declared directories take priority during library resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPath {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub dirs: Vec<PathBuf>,
    #[serde(flatten)]
    pub condition: Condition,
}

impl SearchPath {
    pub fn new<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        SearchPath {
            id: None,
            dirs: dirs.into_iter().map(Into::into).collect(),
            condition: Condition::always(),
        }
    }

    /// Split a delimited directory list, as found in `LIB` or `LIBRARY_PATH`.
    pub fn from_delimited(list: &str, delimiter: char) -> Self {
        SearchPath::new(
            list.split(delimiter)
                .map(str::trim)
                .filter(|s| !s.is_empty()),
        )
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }
}

impl Gated for SearchPath {
    fn condition(&self) -> &Condition {
        &self.condition
    }
}

/// Concatenate the directories of every active search path, in declaration
/// order. Returns `None` if no search path entity is active.
pub fn active_dirs(
    paths: &[SearchPath],
    props: &dyn PropertyLookup,
) -> Result<Option<Vec<PathBuf>>, ConfigError> {
    let active = select_active(paths, props)?;
    if active.is_empty() {
        return Ok(None);
    }
    Ok(Some(
        active.into_iter().flat_map(|p| p.dirs.iter().cloned()).collect(),
    ))
}
