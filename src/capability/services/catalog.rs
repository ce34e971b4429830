//! Locator-addressed table of factories available to a registry.

use crate::capability::domain::Locator;
use crate::capability::ports::{CapabilityKind, PluginFactory};
use std::collections::HashMap;
use std::fmt;

/// Factories linked into the process, addressed by locator.
///
/// Manifests name locators; the registry resolves them here. A manifest
/// whose locator has no entry fails discovery.
pub struct FactoryCatalog<K: CapabilityKind> {
    factories: HashMap<Locator, PluginFactory<K>>,
}

impl<K: CapabilityKind> FactoryCatalog<K> {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Adds a factory, returning any factory previously held under the
    /// locator.
    pub fn register(
        &mut self,
        locator: Locator,
        factory: PluginFactory<K>,
    ) -> Option<PluginFactory<K>> {
        self.factories.insert(locator, factory)
    }

    /// Adds a factory (builder form).
    #[must_use]
    pub fn with(mut self, locator: Locator, factory: PluginFactory<K>) -> Self {
        self.factories.insert(locator, factory);
        self
    }

    /// Looks up the factory for `locator`.
    #[must_use]
    pub fn resolve(&self, locator: &Locator) -> Option<&PluginFactory<K>> {
        self.factories.get(locator)
    }

    /// Returns the number of factories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl<K: CapabilityKind> Default for FactoryCatalog<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: CapabilityKind> Clone for FactoryCatalog<K> {
    fn clone(&self) -> Self {
        Self {
            factories: self.factories.clone(),
        }
    }
}

impl<K: CapabilityKind> fmt::Debug for FactoryCatalog<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut locators: Vec<&str> = self.factories.keys().map(Locator::as_str).collect();
        locators.sort_unstable();
        f.debug_struct("FactoryCatalog")
            .field("category", &K::CATEGORY)
            .field("locators", &locators)
            .finish()
    }
}
