//! Plugins linked into the binary and collected at start-up.
//!
//! Plugin crates declare a static definition with `inventory::submit!`;
//! [`LinkedPluginSource`] enumerates every definition as a manifest and
//! [`linked_catalog`] turns the same definitions into factories.

use crate::attribute::AttributePlugin;
use crate::capability::domain::{
    CapabilityDescriptor, CapabilityDomainError, Locator, PluginManifest,
};
use crate::capability::ports::{
    CapabilityKind, PluginFactory, PluginSource, PluginSourceError, PluginSourceResult,
};
use crate::capability::services::FactoryCatalog;
use crate::solver::SolverPlugin;

/// A statically declared plugin definition.
pub trait LinkedPlugin: Sync + 'static {
    /// Kind the plugin belongs to.
    type Kind: CapabilityKind;

    /// Returns the locator the definition is published under.
    fn locator(&self) -> &'static str;

    /// Builds the plugin's descriptor.
    ///
    /// # Errors
    ///
    /// Returns the descriptor's validation error.
    fn descriptor(&self) -> Result<CapabilityDescriptor, CapabilityDomainError>;

    /// Builds the plugin's factory.
    ///
    /// # Errors
    ///
    /// Returns the descriptor's validation error.
    fn factory(&self) -> Result<PluginFactory<Self::Kind>, CapabilityDomainError>;
}

/// Builds the manifests for `plugins`.
///
/// # Errors
///
/// Returns the first malformed descriptor or locator.
pub fn linked_manifests<'a, P, I>(plugins: I) -> Result<Vec<PluginManifest>, CapabilityDomainError>
where
    P: LinkedPlugin,
    I: IntoIterator<Item = &'a P>,
{
    plugins
        .into_iter()
        .map(|plugin| {
            let descriptor = plugin.descriptor()?;
            Ok(PluginManifest::new(
                descriptor.name().clone(),
                <P::Kind as CapabilityKind>::CATEGORY,
                Locator::new(plugin.locator())?,
            ))
        })
        .collect()
}

/// Builds a catalog holding the factory of every plugin in `plugins`.
///
/// # Errors
///
/// Returns the first malformed descriptor or locator.
pub fn linked_catalog<'a, P, I>(plugins: I) -> Result<FactoryCatalog<P::Kind>, CapabilityDomainError>
where
    P: LinkedPlugin,
    I: IntoIterator<Item = &'a P>,
{
    let mut catalog = FactoryCatalog::new();
    for plugin in plugins {
        catalog.register(Locator::new(plugin.locator())?, plugin.factory()?);
    }
    Ok(catalog)
}

/// Enumerates every solver and attribute definition linked into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkedPluginSource;

impl PluginSource for LinkedPluginSource {
    fn manifests(&self) -> PluginSourceResult<Vec<PluginManifest>> {
        let mut manifests =
            linked_manifests(inventory::iter::<SolverPlugin>).map_err(PluginSourceError::malformed)?;
        manifests.extend(
            linked_manifests(inventory::iter::<AttributePlugin>)
                .map_err(PluginSourceError::malformed)?,
        );
        Ok(manifests)
    }
}
