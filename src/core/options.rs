//! Option overrides: forced build-time settings on named dependencies.
//!
//! An override supersedes the target dependency's own default for one option.
//! It affects how the dependency is built, never which version is selected,
//! so the engine applies overrides after graph resolution and before the
//! dependency's build step.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The value an option is forced to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// Boolean toggle (the common case: `shared`, `no_dso`, ...)
    Bool(bool),
    /// Free-form value for enumerated options
    Text(String),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{b}"),
            OptionValue::Text(s) => f.write_str(s),
        }
    }
}

/// A forced build-time option on a named dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionOverride {
    /// Dependency the override targets
    package: String,

    /// Option name within that dependency
    option: String,

    /// Forced value
    value: OptionValue,
}

impl OptionOverride {
    /// Create an override.
    pub fn new(
        package: impl Into<String>,
        option: impl Into<String>,
        value: OptionValue,
    ) -> Self {
        OptionOverride {
            package: package.into(),
            option: option.into(),
            value,
        }
    }

    /// Create a boolean override.
    pub fn toggle(package: impl Into<String>, option: impl Into<String>, value: bool) -> Self {
        OptionOverride::new(package, option, OptionValue::Bool(value))
    }

    /// Get the target dependency name.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Get the option name.
    pub fn option(&self) -> &str {
        &self.option
    }

    /// Get the forced value.
    pub fn value(&self) -> &OptionValue {
        &self.value
    }
}

impl fmt::Display for OptionOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}={}", self.package, self.option, self.value)
    }
}
