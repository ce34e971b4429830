//! In-memory plugin source.

use crate::capability::domain::{CapabilityName, PluginManifest};
use crate::capability::ports::{PluginSource, PluginSourceError, PluginSourceResult};
use std::sync::{Arc, RwLock};

/// Thread-safe, mutable list of manifests.
///
/// Clones share the list, so a caller can keep a handle, install or remove
/// manifests, and have the next discovery pass see the change.
#[derive(Debug, Clone, Default)]
pub struct StaticPluginSource {
    manifests: Arc<RwLock<Vec<PluginManifest>>>,
}

impl StaticPluginSource {
    /// Creates a source holding `manifests`.
    #[must_use]
    pub fn new(manifests: Vec<PluginManifest>) -> Self {
        Self {
            manifests: Arc::new(RwLock::new(manifests)),
        }
    }

    /// Appends a manifest.
    ///
    /// # Errors
    ///
    /// Returns [`PluginSourceError::Unavailable`] when the lock is poisoned.
    pub fn install(&self, manifest: PluginManifest) -> PluginSourceResult<()> {
        let mut manifests = self.manifests.write().map_err(|err| {
            PluginSourceError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        manifests.push(manifest);
        Ok(())
    }

    /// Removes every manifest named `name`, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`PluginSourceError::Unavailable`] when the lock is poisoned.
    pub fn uninstall(&self, name: &CapabilityName) -> PluginSourceResult<usize> {
        let mut manifests = self.manifests.write().map_err(|err| {
            PluginSourceError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        let before = manifests.len();
        manifests.retain(|manifest| manifest.name() != name);
        Ok(before - manifests.len())
    }
}

impl PluginSource for StaticPluginSource {
    fn manifests(&self) -> PluginSourceResult<Vec<PluginManifest>> {
        let manifests = self.manifests.read().map_err(|err| {
            PluginSourceError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        Ok(manifests.clone())
    }
}
