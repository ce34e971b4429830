//! Attributes: capabilities that attach typed data to parts of the model.
//!
//! An attribute extends one or more targets of the host data graph (the
//! model root, rooms, surfaces, ...). Executing an attribute yields its
//! default values; data stored per target instance is validated by the
//! attribute before it is accepted.

mod manager;
mod store;

pub use manager::AttributeManager;

use crate::capability::adapters::LinkedPlugin;
use crate::capability::domain::{CapabilityDescriptor, CapabilityDomainError, PluginCategory};
use crate::capability::ports::{CapabilityError, CapabilityKind, ModelBinding, PluginFactory};
use crate::capability::services::{
    CapabilityManager, CapabilityRegistry, ExecutionContext, FactoryCatalog,
};
use serde_json::{Map, Value};
use std::fmt;

/// Field map stored for one attribute on one target instance.
pub type AttributeData = Map<String, Value>;

/// A live attribute bound to one host model.
pub trait Attribute: Send {
    /// Returns the values used when no data has been stored.
    fn get_default_values(&self) -> AttributeData;

    /// Lists problems with `data`; an empty list accepts it.
    fn validate(&self, _data: &AttributeData) -> Vec<String> {
        Vec::new()
    }

    /// Encodes stored data for persistence.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError`] when encoding fails.
    fn serialize(&self, data: &AttributeData) -> Result<Vec<u8>, CapabilityError> {
        serde_json::to_vec(data).map_err(CapabilityError::other)
    }

    /// Decodes data produced by [`serialize`](Self::serialize).
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError`] when decoding fails.
    fn deserialize(&self, bytes: &[u8]) -> Result<AttributeData, CapabilityError> {
        serde_json::from_slice(bytes).map_err(CapabilityError::other)
    }
}

/// Marker for the attribute capability kind.
#[derive(Debug, Clone, Copy)]
pub enum AttributeKind {}

impl CapabilityKind for AttributeKind {
    const CATEGORY: PluginCategory = PluginCategory::Attribute;
    type Instance = dyn Attribute;
    type Peer = ();

    fn invoke(
        instance: &mut Self::Instance,
        _ctx: &mut ExecutionContext<'_, Self>,
    ) -> Result<Value, CapabilityError> {
        Ok(Value::Object(instance.get_default_values()))
    }
}

/// Factory producing attributes.
pub type AttributeFactory = PluginFactory<AttributeKind>;

/// Locator-addressed attribute factories.
pub type AttributeCatalog = FactoryCatalog<AttributeKind>;

/// Registry of discovered attributes.
pub type AttributeRegistry = CapabilityRegistry<AttributeKind>;

/// Per-model attribute pool and default-value cache.
pub type AttributeInstances = CapabilityManager<AttributeKind>;

/// Wraps an infallible constructor into an attribute factory.
pub fn factory<A, F>(descriptor: CapabilityDescriptor, make: F) -> AttributeFactory
where
    A: Attribute + 'static,
    F: Fn(&ModelBinding<'_>) -> A + Send + Sync + 'static,
{
    PluginFactory::new(descriptor, move |binding| {
        let attribute: Box<dyn Attribute> = Box::new(make(binding));
        Ok(attribute)
    })
}

/// Attribute definition linked into the binary with `inventory::submit!`.
#[derive(Clone, Copy)]
pub struct AttributePlugin {
    locator: &'static str,
    descriptor: fn() -> Result<CapabilityDescriptor, CapabilityDomainError>,
    construct: fn(&ModelBinding<'_>) -> Result<Box<dyn Attribute>, CapabilityError>,
}

impl AttributePlugin {
    /// Declares a linked attribute.
    #[must_use]
    pub const fn new(
        locator: &'static str,
        descriptor: fn() -> Result<CapabilityDescriptor, CapabilityDomainError>,
        construct: fn(&ModelBinding<'_>) -> Result<Box<dyn Attribute>, CapabilityError>,
    ) -> Self {
        Self {
            locator,
            descriptor,
            construct,
        }
    }
}

impl LinkedPlugin for AttributePlugin {
    type Kind = AttributeKind;

    fn locator(&self) -> &'static str {
        self.locator
    }

    fn descriptor(&self) -> Result<CapabilityDescriptor, CapabilityDomainError> {
        (self.descriptor)()
    }

    fn factory(&self) -> Result<AttributeFactory, CapabilityDomainError> {
        Ok(PluginFactory::new((self.descriptor)()?, self.construct))
    }
}

impl fmt::Debug for AttributePlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributePlugin")
            .field("locator", &self.locator)
            .finish_non_exhaustive()
    }
}

inventory::collect!(AttributePlugin);

/// Builds a catalog from every linked attribute definition.
///
/// # Errors
///
/// Returns the first malformed descriptor or locator.
pub fn linked_catalog() -> Result<AttributeCatalog, CapabilityDomainError> {
    crate::capability::adapters::linked_catalog(inventory::iter::<AttributePlugin>)
}

#[cfg(test)]
mod tests;
