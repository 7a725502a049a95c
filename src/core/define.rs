//! Preprocessor definitions for the compiler families.

use serde::{Deserialize, Serialize};

use crate::core::condition::{Condition, Gated};

/// `NAME` or `NAME=value`, switched by an optional gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Define {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(flatten)]
    pub condition: Condition,
}

impl Define {
    pub fn new(name: impl Into<String>) -> Self {
        Define {
            name: name.into(),
            value: None,
            condition: Condition::always(),
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }
}

impl Gated for Define {
    fn condition(&self) -> &Condition {
        &self.condition
    }
}
