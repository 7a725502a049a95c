//! Symbolic library references.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::core::condition::{Condition, Gated};
use crate::core::errors::ConfigError;

/// Preferred library type.
///
/// `Framework` is equivalent to `Shared` outside Darwin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryType {
    Static,
    Shared,
    Framework,
}

impl LibraryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LibraryType::Static => "static",
            LibraryType::Shared => "shared",
            LibraryType::Framework => "framework",
        }
    }
}

impl fmt::Display for LibraryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LibraryType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "static" => Ok(LibraryType::Static),
            "shared" => Ok(LibraryType::Shared),
            "framework" => Ok(LibraryType::Framework),
            _ => Err(ConfigError::InvalidValue {
                what: "library type",
                value: s.to_string(),
                expected: "static, shared, framework",
            }),
        }
    }
}

/// A request for one or more named libraries.
///
/// Either declares its own attributes, or aliases another reference via
/// `refid` and declares nothing but its own condition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryReference {
    /// Id other references can alias
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Library names without prefix or extension (`m`, not `libm.so`).
    /// Accepts a list or a comma-separated string.
    #[serde(default, deserialize_with = "deserialize_names")]
    pub libs: Vec<String>,

    /// Preferred library type
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub library_type: Option<LibraryType>,

    /// Directory to search instead of the search path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// Overrides the toolchain's case sensitivity when matching files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_sensitive: Option<bool>,

    #[serde(flatten)]
    pub condition: Condition,

    /// Id of the reference this one stands in for
    #[serde(default, rename = "refid", skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NameList {
    List(Vec<String>),
    Joined(String),
}

fn deserialize_names<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match NameList::deserialize(deserializer)? {
        NameList::List(names) => names,
        NameList::Joined(list) => LibraryReference::parse_names(&list),
    })
}

impl LibraryReference {
    /// Create a reference to the given library names.
    pub fn new<I, S>(libs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        LibraryReference {
            libs: libs.into_iter().map(Into::into).collect(),
            ..LibraryReference::default()
        }
    }

    /// Create a reference that stands in for `target`.
    pub fn alias_of(id: impl Into<String>, target: impl Into<String>) -> Self {
        LibraryReference {
            id: Some(id.into()),
            alias: Some(target.into()),
            ..LibraryReference::default()
        }
    }

    /// Parse a comma-separated list of names (`"kernel32, user32"`).
    pub fn parse_names(list: &str) -> Vec<String> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_type(mut self, library_type: LibraryType) -> Self {
        self.library_type = Some(library_type);
        self
    }

    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = Some(case_sensitive);
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }

    /// Name of the first explicit attribute set on this reference, if any.
    pub fn explicit_attribute(&self) -> Option<&'static str> {
        if !self.libs.is_empty() {
            Some("libs")
        } else if self.library_type.is_some() {
            Some("type")
        } else if self.dir.is_some() {
            Some("dir")
        } else if self.case_sensitive.is_some() {
            Some("case_sensitive")
        } else {
            None
        }
    }

    /// Human-readable label: the id if present, else the names.
    pub fn label(&self) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None if !self.libs.is_empty() => self.libs.join(","),
            None => "<anonymous>".to_string(),
        }
    }
}

impl Gated for LibraryReference {
    fn condition(&self) -> &Condition {
        &self.condition
    }
}
