//! Plugin category.

use super::ParsePluginCategoryError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which registry a plugin manifest belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PluginCategory {
    /// Computational unit executed by the solver manager.
    Solver,
    /// Data-model extension managed by the attribute manager.
    Attribute,
}

impl PluginCategory {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Solver => "solver",
            Self::Attribute => "attribute",
        }
    }
}

impl fmt::Display for PluginCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for PluginCategory {
    type Error = ParsePluginCategoryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "solver" => Ok(Self::Solver),
            "attribute" => Ok(Self::Attribute),
            _ => Err(ParsePluginCategoryError(value.to_owned())),
        }
    }
}
