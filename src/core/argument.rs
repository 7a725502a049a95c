//! User-specified command-line arguments.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::condition::{Condition, Gated};
use crate::core::errors::ConfigError;

/// Where a literal argument lands on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgLocation {
    /// Before the implied arguments
    #[default]
    Start,
    /// After the input files and libraries, before the output switch
    Mid,
    /// After everything else
    End,
}

impl FromStr for ArgLocation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(ArgLocation::Start),
            "mid" => Ok(ArgLocation::Mid),
            "end" => Ok(ArgLocation::End),
            _ => Err(ConfigError::InvalidValue {
                what: "argument location",
                value: s.to_string(),
                expected: "start, mid, end",
            }),
        }
    }
}

/// A literal token with a location and an optional gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandArgument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub value: String,
    #[serde(default)]
    pub location: ArgLocation,
    #[serde(flatten)]
    pub condition: Condition,
}

impl CommandArgument {
    pub fn new(value: impl Into<String>, location: ArgLocation) -> Self {
        CommandArgument {
            id: None,
            value: value.into(),
            location,
            condition: Condition::always(),
        }
    }

    pub fn start(value: impl Into<String>) -> Self {
        Self::new(value, ArgLocation::Start)
    }

    pub fn mid(value: impl Into<String>) -> Self {
        Self::new(value, ArgLocation::Mid)
    }

    pub fn end(value: impl Into<String>) -> Self {
        Self::new(value, ArgLocation::End)
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }
}

impl Gated for CommandArgument {
    fn condition(&self) -> &Condition {
        &self.condition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::condition::select_active;
    use crate::test_support::props;

    #[test]
    fn test_location_parse() {
        assert_eq!("mid".parse::<ArgLocation>().unwrap(), ArgLocation::Mid);
        assert!("middle".parse::<ArgLocation>().is_err());
    }

    #[test]
    fn test_invalid_location_rejected_at_parse_time() {
        let parsed: Result<CommandArgument, _> =
            toml::from_str("value = \"/WX\"\nlocation = \"middle\"\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_select_active_arguments() {
        let args = vec![
            CommandArgument::start("/A"),
            CommandArgument::mid("/B").with_condition(Condition::when("b")),
            CommandArgument::end("/C").with_condition(Condition::unless("c")),
        ];
        let active = select_active(&args, &props(&[("c", "1")])).unwrap();
        let values: Vec<_> = active.iter().map(|a| a.value.as_str()).collect();
        assert_eq!(values, vec!["/A"]);
    }
}
