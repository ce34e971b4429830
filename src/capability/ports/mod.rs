//! Port contracts for plugin discovery and capability execution.
//!
//! Ports define the seams between the registry/manager services and the
//! outside world: where manifests come from, and what a pluggable unit must
//! look like to be instantiated and run.

pub mod kind;
pub mod source;

pub use kind::{CapabilityError, CapabilityKind, Constructor, ModelBinding, PluginFactory};
pub use source::{PluginSource, PluginSourceError, PluginSourceResult};

#[cfg(test)]
pub use source::MockPluginSource;
