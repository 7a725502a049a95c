//! Resolution errors and warnings.

use std::fmt;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::builder::toolchain::UnsupportedCapability;
use crate::core::errors::ConfigError;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Error during library resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
pub enum ResolveError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Unsupported(#[from] UnsupportedCapability),

    #[error("no file matching {} for library `{library}` (reference `{reference}`)", .patterns.join(", "))]
    #[diagnostic(code(nativelink::resolve::unresolved))]
    Unresolved {
        reference: String,
        library: String,
        patterns: Vec<String>,
    },
}

impl ResolveError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ResolveError::Config(err) => err.to_diagnostic(),
            ResolveError::Unsupported(err) => Diagnostic::error(err.to_string())
                .with_suggestion("Pick a toolchain family that models this option"),
            ResolveError::Unresolved { library, .. } => Diagnostic::error(self.to_string())
                .with_suggestion(format!(
                    "Add the directory containing `{}` to a [[search_path]]",
                    library
                ))
                .with_suggestion("Set `library_policy = \"allow-unresolved\"` to let the linker search")
                .with_suggestion(suggestions::UNRESOLVED_LIBRARY),
        }
    }
}

/// Non-fatal resolution outcome, returned as data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionWarning {
    /// An active reference names no libraries.
    EmptyReference { reference: String },
    /// No file matched any pattern for one library name.
    NoMatches {
        reference: String,
        library: String,
        patterns: Vec<String>,
    },
}

impl ResolutionWarning {
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::warning(self.to_string());
        match self {
            ResolutionWarning::EmptyReference { .. } => diag.with_suggestion("Add names to `libs`"),
            ResolutionWarning::NoMatches { .. } => {
                diag.with_context("the linker will be asked to find it on its own search path")
            }
        }
    }
}

impl fmt::Display for ResolutionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionWarning::EmptyReference { reference } => {
                write!(f, "library reference `{}` names no libraries", reference)
            }
            ResolutionWarning::NoMatches {
                reference,
                library,
                patterns,
            } => write!(
                f,
                "no file matching {} for library `{}` (reference `{}`)",
                patterns.join(", "),
                library,
                reference
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::diagnostic::Severity;

    #[test]
    fn test_warnings_render_as_warning_diagnostics() {
        let warning = ResolutionWarning::NoMatches {
            reference: "m".into(),
            library: "m".into(),
            patterns: vec!["libm.so".into(), "libm.a".into()],
        };
        let diag = warning.to_diagnostic();
        assert_eq!(diag.severity, Severity::Warning);
        let text = diag.format(false);
        assert!(text.starts_with("warning: no file matching libm.so, libm.a for library `m`"));
        assert!(text.contains("own search path"));

        let empty = ResolutionWarning::EmptyReference {
            reference: "gui".into(),
        }
        .to_diagnostic();
        assert_eq!(empty.suggestions, vec!["Add names to `libs`"]);
    }

    #[test]
    fn test_unresolved_error_points_at_libs_command() {
        let err = ResolveError::Unresolved {
            reference: "z".into(),
            library: "z".into(),
            patterns: vec!["libz.a".into()],
        };
        let diag = err.to_diagnostic();
        assert_eq!(diag.suggestions.len(), 3);
        assert!(diag.suggestions[2].contains("nativelink libs"));
    }
}
