//! Error taxonomy for discovery, resolution and execution.

use crate::capability::domain::{CapabilityName, ExtensionTarget, Locator, PluginCategory};
use crate::capability::ports::{CapabilityError, PluginSourceError};
use thiserror::Error;

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Result type for manager operations.
pub type ManagerResult<T> = Result<T, ManagerError>;

/// Errors raised while enumerating and registering plugins.
#[derive(Debug, Clone, Error)]
pub enum DiscoveryError {
    /// The plugin source failed.
    #[error(transparent)]
    Source(#[from] PluginSourceError),

    /// No factory is linked under the manifest's locator.
    #[error("{category} '{name}' references unknown locator '{locator}'")]
    UnknownLocator {
        /// Registry category.
        category: PluginCategory,
        /// Manifest name.
        name: CapabilityName,
        /// Locator that failed to resolve.
        locator: Locator,
    },

    /// The manifest name differs from the name the factory declares.
    #[error("manifest '{manifest}' resolves to a factory declaring '{declared}'")]
    NameMismatch {
        /// Name in the manifest.
        manifest: CapabilityName,
        /// Name in the factory's descriptor.
        declared: CapabilityName,
    },

    /// One name was registered twice with different locators.
    #[error("{category} '{name}' registered by both '{existing}' and '{incoming}'")]
    ConflictingRegistration {
        /// Registry category.
        category: PluginCategory,
        /// Conflicting name.
        name: CapabilityName,
        /// Locator registered first.
        existing: Locator,
        /// Locator seen later.
        incoming: Locator,
    },
}

/// A lookup named a capability the registry does not hold.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{category} '{name}' not found")]
pub struct NotFoundError {
    /// Registry category.
    pub category: PluginCategory,
    /// Requested name.
    pub name: String,
}

/// A descriptor depends on a name absent from the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{dependent}' depends on unknown '{missing}'")]
pub struct UnresolvedDependencyError {
    /// Capability declaring the dependency.
    pub dependent: CapabilityName,
    /// Dependency that is not registered.
    pub missing: CapabilityName,
}

/// The dependency graph, or a live execution chain, contains a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("circular dependency among: {}", join_names(.names))]
pub struct CircularDependencyError {
    /// Names left unordered, or the in-flight chain for runtime cycles.
    pub names: Vec<CapabilityName>,
}

fn join_names(names: &[CapabilityName]) -> String {
    names
        .iter()
        .map(CapabilityName::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Failures to derive an execution order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// A dependency is not registered.
    #[error(transparent)]
    Unresolved(#[from] UnresolvedDependencyError),

    /// The graph is cyclic.
    #[error(transparent)]
    Circular(#[from] CircularDependencyError),
}

/// A capability's own computation failed.
#[derive(Debug, Clone, Error)]
#[error("'{name}' failed: {source}")]
pub struct ExecutionError {
    /// Failing capability.
    pub name: CapabilityName,
    /// Underlying failure.
    #[source]
    pub source: CapabilityError,
}

/// Attribute data was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid data for attribute '{name}': {}", .messages.join("; "))]
pub struct ValidationError {
    /// Attribute that rejected the data.
    pub name: CapabilityName,
    /// Human-readable validation messages.
    pub messages: Vec<String>,
}

/// Errors raised by a registry.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// Discovery failed; the previous snapshot is kept.
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    /// Lookup failed.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
}

/// Errors raised by a capability manager.
#[derive(Debug, Clone, Error)]
pub enum ManagerError {
    /// Registry failure.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// No valid execution order exists.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// A capability failed while running.
    #[error(transparent)]
    Execution(#[from] ExecutionError),

    /// Attribute data was rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No attribute data is stored under the given key.
    #[error("no '{name}' data stored for {target} instance '{instance}'")]
    MissingData {
        /// Extension target.
        target: ExtensionTarget,
        /// Target instance identifier.
        instance: String,
        /// Attribute name.
        name: CapabilityName,
    },
}

impl From<NotFoundError> for ManagerError {
    fn from(err: NotFoundError) -> Self {
        Self::Registry(RegistryError::NotFound(err))
    }
}

impl From<CircularDependencyError> for ManagerError {
    fn from(err: CircularDependencyError) -> Self {
        Self::Resolution(ResolutionError::Circular(err))
    }
}
