//! Configuration errors.
//!
//! Everything in here is raised during setup, before any directory is
//! scanned or any argument list is assembled.

use std::fmt;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::Diagnostic;

/// Which half of an if/unless gate a property was named by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionKind {
    If,
    Unless,
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionKind::If => write!(f, "if"),
            ConditionKind::Unless => write!(f, "unless"),
        }
    }
}

/// Kind of a configuration entity that can carry an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Library,
    SearchPath,
    IncludePath,
    Argument,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Library => write!(f, "library reference"),
            EntityKind::SearchPath => write!(f, "search path"),
            EntityKind::IncludePath => write!(f, "include path"),
            EntityKind::Argument => write!(f, "command argument"),
        }
    }
}

/// Fatal configuration error.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
pub enum ConfigError {
    #[error("property `{property}` used as {kind} condition has value `{value}`")]
    #[diagnostic(
        code(nativelink::config::misleading_condition),
        help("if/unless only test whether a property is defined, not its value")
    )]
    MisleadingCondition {
        property: String,
        kind: ConditionKind,
        value: String,
    },

    #[error("alias cycle detected: {}", .chain.join(" -> "))]
    #[diagnostic(code(nativelink::config::alias_cycle))]
    AliasCycle { chain: Vec<String> },

    #[error("library reference `{id}` sets `{attribute}` and also aliases `{target}`")]
    #[diagnostic(
        code(nativelink::config::alias_with_attributes),
        help("an alias takes every attribute from the referenced library set")
    )]
    AliasWithAttributes {
        id: String,
        attribute: &'static str,
        target: String,
    },

    #[error("library reference `{id}` aliases unknown id `{target}`")]
    #[diagnostic(code(nativelink::config::unknown_alias))]
    UnknownAlias { id: String, target: String },

    #[error("library reference `{id}` aliases `{target}`, which is a {found}")]
    #[diagnostic(code(nativelink::config::wrong_alias_kind))]
    WrongAliasKind {
        id: String,
        target: String,
        found: EntityKind,
    },

    #[error("id `{id}` is declared more than once")]
    #[diagnostic(code(nativelink::config::duplicate_id))]
    DuplicateId { id: String },

    #[error("library reference `{reference}` has no library names")]
    #[diagnostic(code(nativelink::config::empty_reference))]
    EmptyReference { reference: String },

    #[error("invalid {what} `{value}`, expected one of: {expected}")]
    #[diagnostic(code(nativelink::config::invalid_value))]
    InvalidValue {
        what: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl ConfigError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string());
        match self {
            ConfigError::MisleadingCondition { property, kind, .. } => diag
                .with_context(format!(
                    "`{}` is active when `{}` is {}",
                    kind,
                    property,
                    match kind {
                        ConditionKind::If => "defined",
                        ConditionKind::Unless => "undefined",
                    }
                ))
                .with_suggestion(format!(
                    "Leave `{}` undefined instead of setting it to a false-like value",
                    property
                )),
            ConfigError::AliasCycle { .. } => diag.with_suggestion(
                "Point one of the aliases at a library set that declares `libs`",
            ),
            ConfigError::AliasWithAttributes { id, attribute, .. } => diag.with_suggestion(
                format!("Remove `{}` from `{}` or drop its `refid`", attribute, id),
            ),
            ConfigError::UnknownAlias { target, .. } => {
                diag.with_suggestion(format!("Declare a library set with id = \"{}\"", target))
            }
            ConfigError::WrongAliasKind { target, .. } => diag.with_suggestion(format!(
                "`refid` must name a [[library]] entry, `{}` is not one",
                target
            )),
            ConfigError::DuplicateId { .. } => {
                diag.with_suggestion("Ids are shared by libraries, search paths and arguments")
            }
            ConfigError::EmptyReference { .. } => {
                diag.with_suggestion("Add at least one name to `libs`")
            }
            ConfigError::InvalidValue { expected, .. } => {
                diag.with_context(format!("valid values: {}", expected))
            }
        }
    }
}
