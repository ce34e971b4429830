//! The host model: domain data plus one solver and one attribute manager.

use super::config::HostConfig;
use super::error::HostModelResult;
use super::info::CapabilityInfo;
use crate::attribute::{self, AttributeData, AttributeManager, AttributeRegistry};
use crate::capability::adapters::{LinkedPluginSource, ManifestFilePluginSource};
use crate::capability::domain::{CapabilityName, ExtensionTarget, ModelData, ModelId};
use crate::capability::ports::PluginSource;
use crate::capability::services::{DiscoveryOutcome, ExecutionRecord, ManagerError};
use crate::solver::{self, SolverManager, SolverRegistry};
use indexmap::IndexMap;
use mockable::{Clock, DefaultClock};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Outcome of one discovery pass over both registries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryReport {
    /// Solver registry outcome.
    pub solvers: DiscoveryOutcome,
    /// Attribute registry outcome.
    pub attributes: DiscoveryOutcome,
}

/// Shared context for one building model.
///
/// Owns the data graph and the two managers. Solvers receive the data graph
/// and read-only access to stored attribute data while they run; they reach
/// sibling solvers only through the manager, so caching and ordering hold.
#[derive(Debug)]
pub struct HostModel {
    id: ModelId,
    config: HostConfig,
    data: ModelData,
    solvers: SolverManager,
    attributes: AttributeManager,
}

impl HostModel {
    /// Builds a host model over the given registries.
    ///
    /// Registries are discovered first when
    /// [`HostConfig::discover_on_build`] is set.
    ///
    /// # Errors
    ///
    /// Returns the discovery error of either registry.
    pub fn new(
        solvers: SolverRegistry,
        attributes: AttributeRegistry,
        config: HostConfig,
        data: ModelData,
    ) -> HostModelResult<Self> {
        let id = ModelId::new();
        let mut model = Self {
            id,
            solvers: SolverManager::new(solvers, id),
            attributes: AttributeManager::new(attributes, id)
                .with_validation(config.validate_attribute_data),
            config,
            data,
        };
        if model.config.discover_on_build {
            model.discover()?;
        }
        info!(model_id = %id, "host model built");
        Ok(model)
    }

    /// Builds a host model over the plugins linked into the binary, or the
    /// configured manifest file when one is set.
    ///
    /// # Errors
    ///
    /// Returns a malformed linked definition or a discovery error.
    pub fn linked(config: HostConfig, data: ModelData) -> HostModelResult<Self> {
        let source: Arc<dyn PluginSource> = match &config.manifest_path {
            Some(path) => Arc::new(ManifestFilePluginSource::new(path.clone())),
            None => Arc::new(LinkedPluginSource),
        };
        let clock: Arc<dyn Clock + Send + Sync> = Arc::new(DefaultClock);
        let solvers = SolverRegistry::new(
            Arc::clone(&source),
            solver::linked_catalog()?,
            Arc::clone(&clock),
        );
        let attributes = AttributeRegistry::new(source, attribute::linked_catalog()?, clock);
        Self::new(solvers, attributes, config, data)
    }

    /// Returns the model identifier.
    #[must_use]
    pub const fn id(&self) -> ModelId {
        self.id
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Returns the data graph.
    #[must_use]
    pub const fn data(&self) -> &ModelData {
        &self.data
    }

    /// Returns the data graph for editing.
    ///
    /// Edits do not invalidate cached results; call
    /// [`invalidate_solver`](Self::invalidate_solver) for the affected
    /// solvers.
    pub const fn data_mut(&mut self) -> &mut ModelData {
        &mut self.data
    }

    /// Returns the solver manager.
    #[must_use]
    pub const fn solvers(&self) -> &SolverManager {
        &self.solvers
    }

    /// Returns the attribute manager.
    #[must_use]
    pub const fn attributes(&self) -> &AttributeManager {
        &self.attributes
    }

    /// Re-runs discovery on both registries.
    ///
    /// # Errors
    ///
    /// Returns the first discovery error; the failing registry keeps its
    /// previous contents.
    pub fn discover(&mut self) -> HostModelResult<DiscoveryReport> {
        let solvers = self.solvers.discover()?;
        let attributes = self.attributes.discover()?;
        Ok(DiscoveryReport {
            solvers,
            attributes,
        })
    }

    /// Executes a solver and its dependencies, returning its result.
    ///
    /// # Errors
    ///
    /// Returns a malformed-name, lookup, resolution or execution error.
    pub fn solve(&mut self, name: &str) -> HostModelResult<Value> {
        let key = CapabilityName::new(name)?;
        Ok(self.solvers.execute(&key, &mut self.data, &self.attributes)?)
    }

    /// Executes every solver in execution order.
    ///
    /// # Errors
    ///
    /// Returns the resolution error or the first execution error.
    pub fn solve_all(&mut self) -> HostModelResult<IndexMap<CapabilityName, Value>> {
        Ok(self.solvers.execute_all(&mut self.data, &self.attributes)?)
    }

    /// Executes the requested solvers and their dependencies once each.
    ///
    /// # Errors
    ///
    /// Returns a malformed-name, lookup, resolution or execution error.
    pub fn solve_many(&mut self, names: &[&str]) -> HostModelResult<IndexMap<CapabilityName, Value>> {
        let keys = names
            .iter()
            .map(|name| CapabilityName::new(*name))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self
            .solvers
            .execute_many(&keys, &mut self.data, &self.attributes)?)
    }

    /// Discards the results of a solver and of every solver depending on it.
    ///
    /// # Errors
    ///
    /// Returns a malformed-name or lookup error.
    pub fn invalidate_solver(&mut self, name: &str) -> HostModelResult<Vec<CapabilityName>> {
        let key = CapabilityName::new(name)?;
        Ok(self.solvers.invalidate(&key)?)
    }

    /// Discards every solver result, dropping instances unless
    /// [`HostConfig::retain_instances_on_reset`] is set.
    pub fn reset_solvers(&mut self) {
        self.solvers
            .invalidate_all(!self.config.retain_instances_on_reset);
    }

    /// Returns the completed solver executions, oldest first.
    #[must_use]
    pub fn execution_history(&self) -> &[ExecutionRecord] {
        self.solvers.execution_history()
    }

    /// Returns registered solver names in registration order.
    #[must_use]
    pub fn list_solvers(&self) -> Vec<CapabilityName> {
        self.solvers.registry().names()
    }

    /// Returns registered attribute names in registration order.
    #[must_use]
    pub fn list_attributes(&self) -> Vec<CapabilityName> {
        self.attributes.registry().names()
    }

    /// Describes one solver.
    ///
    /// # Errors
    ///
    /// Returns a malformed-name or lookup error.
    pub fn solver_info(&self, name: &str) -> HostModelResult<CapabilityInfo> {
        let key = CapabilityName::new(name)?;
        let entry = self.solvers.registry().get(&key)?;
        Ok(CapabilityInfo::from_entry(entry, self.solvers.state(&key)))
    }

    /// Describes one attribute.
    ///
    /// # Errors
    ///
    /// Returns a malformed-name or lookup error.
    pub fn attribute_info(&self, name: &str) -> HostModelResult<CapabilityInfo> {
        let key = CapabilityName::new(name)?;
        let entry = self.attributes.registry().get(&key)?;
        Ok(CapabilityInfo::from_entry(entry, self.attributes.state(&key)))
    }

    /// Returns the solver execution order.
    ///
    /// # Errors
    ///
    /// Returns the resolution error found at discovery.
    pub fn get_execution_order(&self) -> HostModelResult<Vec<CapabilityName>> {
        let order = self
            .solvers
            .registry()
            .execution_order()
            .map_err(ManagerError::from)?;
        Ok(order.names().to_vec())
    }

    /// Returns the attributes extending `target`.
    ///
    /// # Errors
    ///
    /// Returns a malformed-target error.
    pub fn attributes_for_target(&self, target: &str) -> HostModelResult<Vec<CapabilityName>> {
        let target = ExtensionTarget::new(target)?;
        Ok(self.attributes.attributes_for_target(&target))
    }

    /// Stores attribute data on one target instance.
    ///
    /// # Errors
    ///
    /// Returns a malformed-argument, lookup or validation error.
    pub fn set_attribute_data(
        &mut self,
        target: &str,
        instance: &str,
        name: &str,
        values: AttributeData,
    ) -> HostModelResult<()> {
        let target = ExtensionTarget::new(target)?;
        let key = CapabilityName::new(name)?;
        Ok(self
            .attributes
            .set_data(&target, instance, &key, values, &self.data)?)
    }

    /// Returns stored attribute data, or the attribute's defaults.
    ///
    /// # Errors
    ///
    /// Returns a malformed-argument, lookup or execution error.
    pub fn get_attribute_data(
        &mut self,
        target: &str,
        instance: &str,
        name: &str,
    ) -> HostModelResult<AttributeData> {
        let target = ExtensionTarget::new(target)?;
        let key = CapabilityName::new(name)?;
        Ok(self
            .attributes
            .get_data(&target, instance, &key, &mut self.data)?)
    }

    /// Returns whether attribute data is stored for the key.
    ///
    /// # Errors
    ///
    /// Returns a malformed-argument error.
    pub fn has_attribute_data(
        &self,
        target: &str,
        instance: &str,
        name: &str,
    ) -> HostModelResult<bool> {
        let target = ExtensionTarget::new(target)?;
        let key = CapabilityName::new(name)?;
        Ok(self.attributes.has_data(&target, instance, &key))
    }

    /// Removes and returns stored attribute data.
    ///
    /// # Errors
    ///
    /// Returns a malformed-argument error or
    /// [`ManagerError::MissingData`].
    pub fn remove_attribute_data(
        &mut self,
        target: &str,
        instance: &str,
        name: &str,
    ) -> HostModelResult<AttributeData> {
        let target = ExtensionTarget::new(target)?;
        let key = CapabilityName::new(name)?;
        Ok(self.attributes.remove_data(&target, instance, &key)?)
    }

    /// Drops every attribute instance, memoised default and stored value.
    pub fn reset_attributes(&mut self) {
        self.attributes.reset();
    }

    /// Lists problems that make the model unusable; empty when valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        self.data
            .missing_sections(&self.config.required_sections)
            .into_iter()
            .map(|section| format!("missing required section '{section}'"))
            .collect()
    }

    /// Returns whether [`validate`](Self::validate) reports no problems.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}
