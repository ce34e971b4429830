//! Services for discovering, ordering and executing capabilities.

mod catalog;
mod context;
mod error;
mod fingerprint;
mod manager;
mod registry;
mod resolver;

pub use catalog::FactoryCatalog;
pub use context::ExecutionContext;
pub use error::{
    CircularDependencyError, DiscoveryError, ExecutionError, ManagerError, ManagerResult,
    NotFoundError, RegistryError, RegistryResult, ResolutionError, UnresolvedDependencyError,
    ValidationError,
};
pub use fingerprint::DiscoveryFingerprint;
pub use manager::{CapabilityManager, ExecutionRecord};
pub use registry::{CapabilityRegistry, DiscoveryOutcome, RegistryEntry};
pub use resolver::{ExecutionOrder, compute_order, transitive_dependents};
