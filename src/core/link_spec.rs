//! Abstract description of a link step.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::errors::ConfigError;

/// What the link step produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    #[default]
    #[serde(alias = "exe")]
    Executable,
    #[serde(alias = "shared-lib", alias = "dll")]
    Shared,
    #[serde(alias = "static-lib")]
    Static,
}

impl LinkType {
    pub fn is_shared(&self) -> bool {
        matches!(self, LinkType::Shared)
    }

    pub fn is_static(&self) -> bool {
        matches!(self, LinkType::Static)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LinkType::Executable => "executable",
            LinkType::Shared => "shared",
            LinkType::Static => "static",
        }
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "executable" | "exe" => Ok(LinkType::Executable),
            "shared" | "shared-lib" | "dll" => Ok(LinkType::Shared),
            "static" | "static-lib" => Ok(LinkType::Static),
            _ => Err(ConfigError::InvalidValue {
                what: "link type",
                value: s.to_string(),
                expected: "executable, shared, static",
            }),
        }
    }
}

/// Windowing subsystem of the produced image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subsystem {
    Gui,
    Console,
    #[default]
    #[serde(rename = "none")]
    Unspecified,
}

/// Whether dialects that model a subsystem switch should emit it.
///
/// Historical linker front ends disagreed on this, so it is an explicit
/// choice rather than a fixed behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubsystemFlag {
    #[default]
    Emit,
    Suppress,
}

impl FromStr for SubsystemFlag {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "emit" => Ok(SubsystemFlag::Emit),
            "suppress" => Ok(SubsystemFlag::Suppress),
            _ => Err(ConfigError::InvalidValue {
                what: "subsystem flag policy",
                value: s.to_string(),
                expected: "emit, suppress",
            }),
        }
    }
}

/// Fixed-address tri-state. `Unset` emits nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum FixedAddress {
    #[default]
    Unset,
    Enabled,
    Disabled,
}

impl From<Option<bool>> for FixedAddress {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => FixedAddress::Unset,
            Some(true) => FixedAddress::Enabled,
            Some(false) => FixedAddress::Disabled,
        }
    }
}

impl From<FixedAddress> for Option<bool> {
    fn from(value: FixedAddress) -> Self {
        match value {
            FixedAddress::Unset => None,
            FixedAddress::Enabled => Some(true),
            FixedAddress::Disabled => Some(false),
        }
    }
}

/// Per-invocation link settings.
///
/// Negative `base` and `stack` values mean "unset".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkSpec {
    #[serde(rename = "type")]
    pub link_type: LinkType,
    pub subsystem: Subsystem,
    pub subsystem_flag: SubsystemFlag,
    pub debug: bool,
    pub base: i64,
    pub stack: i64,
    pub fixed: FixedAddress,
    pub entry: Option<String>,
    pub map: bool,
    pub incremental: Option<bool>,
}

impl Default for LinkSpec {
    fn default() -> Self {
        LinkSpec {
            link_type: LinkType::Executable,
            subsystem: Subsystem::Unspecified,
            subsystem_flag: SubsystemFlag::Emit,
            debug: false,
            base: -1,
            stack: -1,
            fixed: FixedAddress::Unset,
            entry: None,
            map: false,
            incremental: None,
        }
    }
}

impl LinkSpec {
    pub fn new(link_type: LinkType) -> Self {
        LinkSpec {
            link_type,
            ..LinkSpec::default()
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_subsystem(mut self, subsystem: Subsystem) -> Self {
        self.subsystem = subsystem;
        self
    }

    pub fn with_subsystem_flag(mut self, flag: SubsystemFlag) -> Self {
        self.subsystem_flag = flag;
        self
    }

    pub fn with_base(mut self, base: i64) -> Self {
        self.base = base;
        self
    }

    pub fn with_stack(mut self, stack: i64) -> Self {
        self.stack = stack;
        self
    }

    pub fn with_fixed(mut self, fixed: FixedAddress) -> Self {
        self.fixed = fixed;
        self
    }

    pub fn with_entry(mut self, entry: impl Into<String>) -> Self {
        self.entry = Some(entry.into());
        self
    }

    pub fn with_map(mut self, map: bool) -> Self {
        self.map = map;
        self
    }

    pub fn with_incremental(mut self, incremental: bool) -> Self {
        self.incremental = Some(incremental);
        self
    }
}
