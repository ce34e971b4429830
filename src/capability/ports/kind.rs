//! Capability kind contract, factories and the error capabilities return.

use crate::capability::domain::{
    CapabilityDescriptor, CapabilityDomainError, ModelData, ModelId, PluginCategory,
};
use crate::capability::services::{ExecutionContext, ManagerError};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// A family of pluggable units sharing one interface (solvers, attributes).
///
/// The registry, resolver and manager are generic over the kind; each kind
/// says what its live instances are and how one is run.
pub trait CapabilityKind: Sized + 'static {
    /// Registry this kind is discovered into.
    const CATEGORY: PluginCategory;

    /// Live instance type, usually a trait object.
    type Instance: ?Sized + 'static;

    /// Read-only view of sibling state handed to running instances.
    type Peer: ?Sized;

    /// Runs one instance and returns the value the manager caches.
    ///
    /// # Errors
    ///
    /// Returns the capability's own failure.
    fn invoke(
        instance: &mut Self::Instance,
        ctx: &mut ExecutionContext<'_, Self>,
    ) -> Result<Value, CapabilityError>;
}

/// Errors raised by a capability's own computation.
#[derive(Debug, Clone, Error)]
pub enum CapabilityError {
    /// The computation failed.
    #[error("{0}")]
    Failed(String),

    /// Required model data or upstream results are missing.
    #[error("missing input: {0}")]
    MissingInput(String),

    /// A name handed to the execution context was malformed.
    #[error(transparent)]
    Domain(#[from] CapabilityDomainError),

    /// A sibling executed through the context failed.
    #[error("upstream execution failed: {0}")]
    Upstream(Arc<ManagerError>),

    /// Any other error raised by plugin code.
    #[error("{0}")]
    Other(Arc<dyn std::error::Error + Send + Sync>),
}

impl CapabilityError {
    /// Creates a plain failure with a message.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    /// Wraps an arbitrary error raised by plugin code.
    #[must_use]
    pub fn other(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Other(Arc::new(err))
    }

    /// Wraps a manager error raised while executing a sibling.
    #[must_use]
    pub fn upstream(err: ManagerError) -> Self {
        Self::Upstream(Arc::new(err))
    }
}

/// What a factory receives: the model the new instance is bound to.
#[derive(Debug, Clone, Copy)]
pub struct ModelBinding<'a> {
    model_id: ModelId,
    data: &'a ModelData,
}

impl<'a> ModelBinding<'a> {
    /// Creates a binding to one host model.
    #[must_use]
    pub const fn new(model_id: ModelId, data: &'a ModelData) -> Self {
        Self { model_id, data }
    }

    /// Returns the identifier of the bound model.
    #[must_use]
    pub const fn model_id(&self) -> ModelId {
        self.model_id
    }

    /// Returns the bound model's data graph as it was at construction time.
    #[must_use]
    pub const fn data(&self) -> &'a ModelData {
        self.data
    }
}

/// Constructor signature stored by a factory.
pub type Constructor<K> = dyn Fn(&ModelBinding<'_>) -> Result<Box<<K as CapabilityKind>::Instance>, CapabilityError>
    + Send
    + Sync;

/// A descriptor paired with the constructor for its live instances.
///
/// Factories are stateless until invoked, so one factory can serve any number
/// of host models.
pub struct PluginFactory<K: CapabilityKind> {
    descriptor: CapabilityDescriptor,
    construct: Arc<Constructor<K>>,
}

impl<K: CapabilityKind> PluginFactory<K> {
    /// Creates a factory from a descriptor and a fallible constructor.
    pub fn new<F>(descriptor: CapabilityDescriptor, construct: F) -> Self
    where
        F: Fn(&ModelBinding<'_>) -> Result<Box<K::Instance>, CapabilityError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            descriptor,
            construct: Arc::new(construct),
        }
    }

    /// Returns the descriptor.
    #[must_use]
    pub const fn descriptor(&self) -> &CapabilityDescriptor {
        &self.descriptor
    }

    /// Builds a live instance bound to `binding`.
    ///
    /// # Errors
    ///
    /// Returns the constructor's failure.
    pub fn construct(
        &self,
        binding: &ModelBinding<'_>,
    ) -> Result<Box<K::Instance>, CapabilityError> {
        (self.construct)(binding)
    }
}

impl<K: CapabilityKind> Clone for PluginFactory<K> {
    fn clone(&self) -> Self {
        Self {
            descriptor: self.descriptor.clone(),
            construct: Arc::clone(&self.construct),
        }
    }
}

impl<K: CapabilityKind> fmt::Debug for PluginFactory<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginFactory")
            .field("category", &K::CATEGORY)
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}
