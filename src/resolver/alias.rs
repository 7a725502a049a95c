//! Alias pre-pass.
//!
//! A library reference with a `refid` stands in for another reference.
//! Every alias is resolved here, once, before any directory is scanned:
//! chains are followed to a reference that declares its own attributes,
//! cycles and malformed aliases are rejected.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use crate::core::condition::{Gates, PropertyLookup};
use crate::core::errors::{ConfigError, EntityKind};
use crate::core::library::{LibraryReference, LibraryType};

/// A library reference with its alias chain collapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedReference {
    /// Id or names of the declaring reference
    pub label: String,
    pub names: Vec<String>,
    pub library_type: Option<LibraryType>,
    pub dir: Option<PathBuf>,
    pub case_sensitive: Option<bool>,
    /// The alias's own gate first, then each referenced gate along the chain
    pub gates: Gates,
}

impl ResolvedReference {
    fn from_reference(label: String, reference: &LibraryReference, gates: Gates) -> Self {
        ResolvedReference {
            label,
            names: reference.libs.clone(),
            library_type: reference.library_type,
            dir: reference.dir.clone(),
            case_sensitive: reference.case_sensitive,
            gates,
        }
    }

    pub fn is_active(&self, props: &dyn PropertyLookup) -> Result<bool, ConfigError> {
        self.gates.is_active(props)
    }
}

impl From<LibraryReference> for ResolvedReference {
    fn from(reference: LibraryReference) -> Self {
        let gates = Gates::new(vec![reference.condition.clone()]);
        ResolvedReference::from_reference(reference.label(), &reference, gates)
    }
}

/// Every library reference of a configuration, aliases resolved.
#[derive(Debug, Clone, Default)]
pub struct LibraryCatalog {
    references: Vec<ResolvedReference>,
}

impl LibraryCatalog {
    /// Resolve all aliases among `libraries`.
    ///
    /// `foreign` lists ids declared by other entity kinds; an alias that
    /// names one of them is rejected.
    pub fn build(
        libraries: &[LibraryReference],
        foreign: &[(String, EntityKind)],
    ) -> Result<Self, ConfigError> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut seen: HashSet<&str> = HashSet::new();

        for (id, _) in foreign {
            if !seen.insert(id.as_str()) {
                return Err(ConfigError::DuplicateId { id: id.clone() });
            }
        }
        for (i, lib) in libraries.iter().enumerate() {
            if let Some(id) = lib.id.as_deref() {
                if !seen.insert(id) {
                    return Err(ConfigError::DuplicateId { id: id.to_string() });
                }
                index.insert(id, i);
            }
        }

        let foreign_kinds: HashMap<&str, EntityKind> =
            foreign.iter().map(|(id, kind)| (id.as_str(), *kind)).collect();

        let references = libraries
            .iter()
            .enumerate()
            .map(|(i, lib)| resolve_one(libraries, &index, &foreign_kinds, i, lib))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("resolved {} library reference(s)", references.len());
        Ok(LibraryCatalog { references })
    }

    /// References in declaration order.
    pub fn references(&self) -> &[ResolvedReference] {
        &self.references
    }

    /// Active references in declaration order.
    pub fn active(
        &self,
        props: &dyn PropertyLookup,
    ) -> Result<Vec<&ResolvedReference>, ConfigError> {
        let mut active = Vec::new();
        for reference in &self.references {
            if reference.is_active(props)? {
                active.push(reference);
            }
        }
        Ok(active)
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }
}

fn resolve_one(
    libraries: &[LibraryReference],
    index: &HashMap<&str, usize>,
    foreign: &HashMap<&str, EntityKind>,
    position: usize,
    lib: &LibraryReference,
) -> Result<ResolvedReference, ConfigError> {
    let label = lib.label();
    let mut gates = Gates::new(vec![lib.condition.clone()]);

    let mut current = lib;
    let mut visited = HashSet::from([position]);
    let mut chain = vec![label.clone()];

    while let Some(target) = current.alias.as_deref() {
        let current_label = current.label();
        if let Some(attribute) = current.explicit_attribute() {
            return Err(ConfigError::AliasWithAttributes {
                id: current_label,
                attribute,
                target: target.to_string(),
            });
        }
        if let Some(kind) = foreign.get(target) {
            return Err(ConfigError::WrongAliasKind {
                id: current_label,
                target: target.to_string(),
                found: *kind,
            });
        }
        let next = *index.get(target).ok_or_else(|| ConfigError::UnknownAlias {
            id: current_label,
            target: target.to_string(),
        })?;

        chain.push(target.to_string());
        if !visited.insert(next) {
            return Err(ConfigError::AliasCycle { chain });
        }

        current = &libraries[next];
        gates = gates.and(current.condition.clone());
    }

    Ok(ResolvedReference::from_reference(label, current, gates))
}
