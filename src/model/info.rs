//! Read-only capability summaries for tooling and diagnostics.

use crate::capability::domain::{
    CapabilityName, CapabilityState, ExtensionTarget, Locator, PluginCategory, PriorityTier,
};
use crate::capability::ports::CapabilityKind;
use crate::capability::services::RegistryEntry;
use serde::Serialize;

/// Snapshot of one registered capability and its state in a host model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilityInfo {
    /// Capability name.
    pub name: CapabilityName,
    /// Registry category.
    pub category: PluginCategory,
    /// Informational version.
    pub version: String,
    /// Priority tier.
    pub priority: PriorityTier,
    /// Declared dependencies, sorted.
    pub depends_on: Vec<CapabilityName>,
    /// Free-text description.
    pub description: String,
    /// Locator the factory was resolved from.
    pub locator: Locator,
    /// Extended targets; empty for solvers.
    pub extension_targets: Vec<ExtensionTarget>,
    /// Lifecycle state in this host model.
    pub state: CapabilityState,
}

impl CapabilityInfo {
    pub(crate) fn from_entry<K: CapabilityKind>(
        entry: &RegistryEntry<K>,
        state: CapabilityState,
    ) -> Self {
        let descriptor = entry.descriptor();
        let extension_targets = match K::CATEGORY {
            PluginCategory::Attribute => descriptor.extension_targets().into_iter().collect(),
            PluginCategory::Solver => Vec::new(),
        };
        Self {
            name: descriptor.name().clone(),
            category: K::CATEGORY,
            version: descriptor.version().to_owned(),
            priority: descriptor.priority(),
            depends_on: descriptor.depends_on().iter().cloned().collect(),
            description: descriptor.description().to_owned(),
            locator: entry.locator().clone(),
            extension_targets,
            state,
        }
    }
}
