//! Per-name lifecycle state tracked by a manager.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of one capability name inside a manager.
///
/// `Registered -> Instantiated -> Solved`; invalidation moves `Solved` back to
/// `Instantiated` and a full reset moves anything back to `Registered`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityState {
    /// The name is not in the registry.
    Unregistered,
    /// Registered, no live instance.
    Registered,
    /// A live instance exists but no result is cached.
    Instantiated,
    /// A result is cached.
    Solved,
}

impl CapabilityState {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unregistered => "unregistered",
            Self::Registered => "registered",
            Self::Instantiated => "instantiated",
            Self::Solved => "solved",
        }
    }
}

impl fmt::Display for CapabilityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
