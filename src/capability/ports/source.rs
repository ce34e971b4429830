//! Plugin source port: enumerates manifests supplied by the packaging system.

use crate::capability::domain::PluginManifest;
use std::sync::Arc;
use thiserror::Error;

/// Result type for plugin source operations.
pub type PluginSourceResult<T> = Result<T, PluginSourceError>;

/// Supplier of `(name, category, locator)` manifest triples.
///
/// Registries filter the enumerated list by their own category, so one
/// source can serve both the solver and the attribute registry.
#[cfg_attr(test, mockall::automock)]
pub trait PluginSource: Send + Sync {
    /// Enumerates every manifest currently installed.
    ///
    /// # Errors
    ///
    /// Returns [`PluginSourceError`] when the manifest list cannot be read or
    /// parsed.
    fn manifests(&self) -> PluginSourceResult<Vec<PluginManifest>>;
}

/// Errors returned by plugin source adapters.
#[derive(Debug, Clone, Error)]
pub enum PluginSourceError {
    /// The underlying manifest store could not be read.
    #[error("plugin source unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),

    /// A manifest entry could not be parsed or validated.
    #[error("malformed plugin manifest: {0}")]
    Malformed(Arc<dyn std::error::Error + Send + Sync>),
}

impl PluginSourceError {
    /// Wraps an I/O-level failure.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }

    /// Wraps a parse or validation failure.
    pub fn malformed(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Malformed(Arc::new(err))
    }
}
