//! Presence-based if/unless gating for optional configuration entities.
//!
//! An entity is active when its `if` property is defined (if one is named)
//! and its `unless` property is undefined (if one is named). The value of a
//! defined property does not matter, except that `false` and `no` are
//! rejected: those values mean the author expected value-based gating.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use serde::{Deserialize, Serialize};

use crate::core::errors::{ConditionKind, ConfigError};

/// Read-only property lookup (`name -> optional value`).
pub trait PropertyLookup {
    fn property(&self, name: &str) -> Option<String>;
}

impl<S: BuildHasher> PropertyLookup for HashMap<String, String, S> {
    fn property(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl PropertyLookup for BTreeMap<String, String> {
    fn property(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl<T: PropertyLookup + ?Sized> PropertyLookup for &T {
    fn property(&self, name: &str) -> Option<String> {
        (**self).property(name)
    }
}

/// Properties backed by the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl PropertyLookup for ProcessEnv {
    fn property(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// An if/unless gate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Property that must be defined
    #[serde(rename = "if", default, skip_serializing_if = "Option::is_none")]
    pub if_prop: Option<String>,
    /// Property that must be undefined
    #[serde(rename = "unless", default, skip_serializing_if = "Option::is_none")]
    pub unless_prop: Option<String>,
}

impl Condition {
    /// A condition that is always active.
    pub fn always() -> Self {
        Condition::default()
    }

    /// Active only when `property` is defined.
    pub fn when(property: impl Into<String>) -> Self {
        Condition {
            if_prop: Some(property.into()),
            unless_prop: None,
        }
    }

    /// Active only when `property` is undefined.
    pub fn unless(property: impl Into<String>) -> Self {
        Condition {
            if_prop: None,
            unless_prop: Some(property.into()),
        }
    }

    /// Add an `unless` property to this condition.
    pub fn and_unless(mut self, property: impl Into<String>) -> Self {
        self.unless_prop = Some(property.into());
        self
    }

    /// Evaluate the gate.
    ///
    /// Both named properties are validated before either decides the
    /// outcome, so a misleading `unless` value is reported even when the
    /// `if` property is undefined.
    pub fn is_active(&self, props: &dyn PropertyLookup) -> Result<bool, ConfigError> {
        let if_value = match &self.if_prop {
            Some(name) => Some(lookup(props, name, ConditionKind::If)?),
            None => None,
        };
        let unless_value = match &self.unless_prop {
            Some(name) => Some(lookup(props, name, ConditionKind::Unless)?),
            None => None,
        };

        if let Some(None) = if_value {
            return Ok(false);
        }
        if let Some(Some(_)) = unless_value {
            return Ok(false);
        }
        Ok(true)
    }
}

fn lookup(
    props: &dyn PropertyLookup,
    name: &str,
    kind: ConditionKind,
) -> Result<Option<String>, ConfigError> {
    let value = props.property(name);
    if let Some(ref v) = value {
        if v == "false" || v == "no" {
            return Err(ConfigError::MisleadingCondition {
                property: name.to_string(),
                kind,
                value: v.clone(),
            });
        }
    }
    Ok(value)
}

/// A conjunction of conditions. Active only if every member is active.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Gates(Vec<Condition>);

impl Gates {
    pub fn new(conditions: Vec<Condition>) -> Self {
        Gates(conditions)
    }

    /// AND another condition onto this gate.
    pub fn and(mut self, condition: Condition) -> Self {
        self.0.push(condition);
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.0
    }

    /// Evaluate every condition, then AND the outcomes.
    ///
    /// A misleading value on a later gate is reported even when an earlier
    /// gate is already inactive.
    pub fn is_active(&self, props: &dyn PropertyLookup) -> Result<bool, ConfigError> {
        let mut active = true;
        for condition in &self.0 {
            active &= condition.is_active(props)?;
        }
        Ok(active)
    }
}

/// An entity that can be switched on or off by properties.
pub trait Gated {
    fn condition(&self) -> &Condition;

    fn is_active(&self, props: &dyn PropertyLookup) -> Result<bool, ConfigError> {
        self.condition().is_active(props)
    }
}

/// Keep only the active entities, preserving declaration order.
pub fn select_active<'a, T: Gated>(
    items: &'a [T],
    props: &dyn PropertyLookup,
) -> Result<Vec<&'a T>, ConfigError> {
    let mut active = Vec::with_capacity(items.len());
    for item in items {
        if item.is_active(props)? {
            active.push(item);
        }
    }
    Ok(active)
}
