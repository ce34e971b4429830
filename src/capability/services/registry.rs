//! Per-category registry of discovered plugin factories.

use super::catalog::FactoryCatalog;
use super::error::{DiscoveryError, NotFoundError, RegistryResult, ResolutionError};
use super::fingerprint::DiscoveryFingerprint;
use super::resolver::{ExecutionOrder, compute_order};
use crate::capability::domain::{
    CapabilityDescriptor, CapabilityName, ExtensionTarget, Locator, PluginCategory,
};
use crate::capability::ports::{CapabilityKind, PluginFactory, PluginSource};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use mockable::Clock;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One registered capability: the locator it came from and its factory.
pub struct RegistryEntry<K: CapabilityKind> {
    locator: Locator,
    factory: PluginFactory<K>,
}

impl<K: CapabilityKind> RegistryEntry<K> {
    /// Returns the locator the manifest named.
    #[must_use]
    pub const fn locator(&self) -> &Locator {
        &self.locator
    }

    /// Returns the factory.
    #[must_use]
    pub const fn factory(&self) -> &PluginFactory<K> {
        &self.factory
    }

    /// Returns the factory's descriptor.
    #[must_use]
    pub const fn descriptor(&self) -> &CapabilityDescriptor {
        self.factory.descriptor()
    }
}

impl<K: CapabilityKind> Clone for RegistryEntry<K> {
    fn clone(&self) -> Self {
        Self {
            locator: self.locator.clone(),
            factory: self.factory.clone(),
        }
    }
}

impl<K: CapabilityKind> fmt::Debug for RegistryEntry<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("locator", &self.locator)
            .field("descriptor", self.descriptor())
            .finish()
    }
}

/// Result of one discovery pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryOutcome {
    /// The plugin set matched the previous pass; nothing was replaced.
    Unchanged,
    /// The registry now holds a new plugin set.
    Replaced {
        /// Number of registered capabilities.
        registered: usize,
    },
}

impl DiscoveryOutcome {
    /// Returns whether the pass replaced the registry contents.
    #[must_use]
    pub const fn is_replaced(self) -> bool {
        matches!(self, Self::Replaced { .. })
    }
}

/// Immutable result of a discovery pass, shared by every clone of a registry.
struct RegistrySnapshot<K: CapabilityKind> {
    entries: IndexMap<CapabilityName, RegistryEntry<K>>,
    order: Result<ExecutionOrder, ResolutionError>,
    fingerprint: DiscoveryFingerprint,
    discovered_at: Option<DateTime<Utc>>,
}

impl<K: CapabilityKind> RegistrySnapshot<K> {
    fn empty() -> Self {
        Self {
            entries: IndexMap::new(),
            order: compute_order(std::iter::empty::<&CapabilityDescriptor>()),
            fingerprint: DiscoveryFingerprint::default(),
            discovered_at: None,
        }
    }
}

/// Name-to-factory table for one plugin category.
///
/// The table is filled by [`discover`](Self::discover) and replaced
/// atomically: a failed pass leaves the previous contents in place. Clones
/// share the current snapshot, so several host models can reuse one
/// discovery result.
pub struct CapabilityRegistry<K: CapabilityKind> {
    source: Arc<dyn PluginSource>,
    catalog: Arc<FactoryCatalog<K>>,
    clock: Arc<dyn Clock + Send + Sync>,
    snapshot: Arc<RegistrySnapshot<K>>,
}

impl<K: CapabilityKind> CapabilityRegistry<K> {
    /// Creates an undiscovered registry.
    pub fn new(
        source: Arc<dyn PluginSource>,
        catalog: FactoryCatalog<K>,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Self {
        Self {
            source,
            catalog: Arc::new(catalog),
            clock,
            snapshot: Arc::new(RegistrySnapshot::empty()),
        }
    }

    /// Returns the category served by this registry.
    #[must_use]
    pub const fn category(&self) -> PluginCategory {
        K::CATEGORY
    }

    /// Returns the clock used for discovery and execution timestamps.
    #[must_use]
    pub fn clock(&self) -> &Arc<dyn Clock + Send + Sync> {
        &self.clock
    }

    /// Enumerates the plugin source and registers every manifest of this
    /// category.
    ///
    /// Repeated manifests with identical locators collapse to one entry.
    /// When the resulting plugin set matches the current one the pass is a
    /// no-op and returns [`DiscoveryOutcome::Unchanged`].
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError`] when the source fails, a locator is not in
    /// the catalog, a factory declares a different name than its manifest,
    /// or one name is registered with two different locators.
    pub fn discover(&mut self) -> RegistryResult<DiscoveryOutcome> {
        let manifests = self.source.manifests().map_err(DiscoveryError::from)?;
        let mut entries: IndexMap<CapabilityName, RegistryEntry<K>> = IndexMap::new();

        for manifest in manifests
            .into_iter()
            .filter(|manifest| manifest.category() == K::CATEGORY)
        {
            if let Some(existing) = entries.get(manifest.name()) {
                if existing.locator() == manifest.locator() {
                    debug!(
                        category = %K::CATEGORY,
                        capability = %manifest.name(),
                        "duplicate manifest ignored"
                    );
                    continue;
                }
                return Err(DiscoveryError::ConflictingRegistration {
                    category: K::CATEGORY,
                    name: manifest.name().clone(),
                    existing: existing.locator().clone(),
                    incoming: manifest.locator().clone(),
                }
                .into());
            }

            let factory = self.catalog.resolve(manifest.locator()).ok_or_else(|| {
                DiscoveryError::UnknownLocator {
                    category: K::CATEGORY,
                    name: manifest.name().clone(),
                    locator: manifest.locator().clone(),
                }
            })?;
            let declared = factory.descriptor().name();
            if declared != manifest.name() {
                return Err(DiscoveryError::NameMismatch {
                    manifest: manifest.name().clone(),
                    declared: declared.clone(),
                }
                .into());
            }

            entries.insert(
                manifest.name().clone(),
                RegistryEntry {
                    locator: manifest.locator().clone(),
                    factory: factory.clone(),
                },
            );
        }

        let fingerprint = DiscoveryFingerprint::compute(entries.values().map(|entry| {
            (
                entry.descriptor().name(),
                entry.locator(),
                entry.descriptor().version(),
            )
        }));
        if self.is_discovered() && fingerprint == self.snapshot.fingerprint {
            info!(
                category = %K::CATEGORY,
                %fingerprint,
                "plugin set unchanged"
            );
            return Ok(DiscoveryOutcome::Unchanged);
        }

        let order = compute_order(entries.values().map(RegistryEntry::descriptor));
        if let Err(err) = &order {
            warn!(category = %K::CATEGORY, error = %err, "registered plugins cannot be ordered");
        }
        let registered = entries.len();
        self.snapshot = Arc::new(RegistrySnapshot {
            entries,
            order,
            fingerprint,
            discovered_at: Some(self.clock.utc()),
        });
        info!(
            category = %K::CATEGORY,
            registered,
            %fingerprint,
            "plugin discovery complete"
        );
        Ok(DiscoveryOutcome::Replaced { registered })
    }

    /// Returns whether at least one discovery pass has succeeded.
    #[must_use]
    pub fn is_discovered(&self) -> bool {
        self.snapshot.discovered_at.is_some()
    }

    /// Returns when the current contents were discovered.
    #[must_use]
    pub fn discovered_at(&self) -> Option<DateTime<Utc>> {
        self.snapshot.discovered_at
    }

    /// Returns the fingerprint of the current contents.
    #[must_use]
    pub fn fingerprint(&self) -> DiscoveryFingerprint {
        self.snapshot.fingerprint
    }

    /// Looks up a registered capability.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] when no capability is registered under
    /// `name`.
    pub fn get(&self, name: &CapabilityName) -> Result<&RegistryEntry<K>, NotFoundError> {
        self.snapshot
            .entries
            .get(name)
            .ok_or_else(|| NotFoundError {
                category: K::CATEGORY,
                name: name.as_str().to_owned(),
            })
    }

    /// Returns whether `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &CapabilityName) -> bool {
        self.snapshot.entries.contains_key(name)
    }

    /// Returns every entry in registration order.
    pub fn entries(&self) -> impl Iterator<Item = &RegistryEntry<K>> {
        self.snapshot.entries.values()
    }

    /// Returns every descriptor in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &CapabilityDescriptor> {
        self.entries().map(RegistryEntry::descriptor)
    }

    /// Returns every registered name in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<CapabilityName> {
        self.snapshot.entries.keys().cloned().collect()
    }

    /// Returns the number of registered capabilities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshot.entries.len()
    }

    /// Returns whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshot.entries.is_empty()
    }

    /// Returns descriptors whose extension targets include `target`.
    pub fn extending<'a>(
        &'a self,
        target: &'a ExtensionTarget,
    ) -> impl Iterator<Item = &'a CapabilityDescriptor> + 'a {
        self.descriptors()
            .filter(move |descriptor| descriptor.extends(target))
    }

    /// Returns the execution order of the current contents.
    ///
    /// # Errors
    ///
    /// Returns the [`ResolutionError`] found when the contents were
    /// discovered.
    pub fn execution_order(&self) -> Result<&ExecutionOrder, ResolutionError> {
        self.snapshot.order.as_ref().map_err(Clone::clone)
    }
}

impl<K: CapabilityKind> Clone for CapabilityRegistry<K> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            catalog: Arc::clone(&self.catalog),
            clock: Arc::clone(&self.clock),
            snapshot: Arc::clone(&self.snapshot),
        }
    }
}

impl<K: CapabilityKind> fmt::Debug for CapabilityRegistry<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityRegistry")
            .field("category", &K::CATEGORY)
            .field("names", &self.snapshot.entries.keys().collect::<Vec<_>>())
            .field("fingerprint", &self.snapshot.fingerprint.to_string())
            .finish_non_exhaustive()
    }
}
