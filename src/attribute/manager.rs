//! Per-model attribute manager: instances, defaults and stored data.

use super::store::AttributeStore;
use super::{Attribute, AttributeData, AttributeInstances, AttributeRegistry};
use crate::capability::domain::{
    CapabilityName, CapabilityState, ExtensionTarget, ModelData, ModelId,
};
use crate::capability::services::{
    DiscoveryOutcome, ExecutionError, ManagerError, ManagerResult, ValidationError,
};
use crate::capability::ports::CapabilityError;
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::debug;

/// Attribute instances of one host model plus the data stored against the
/// model's targets.
#[derive(Debug)]
pub struct AttributeManager {
    instances: AttributeInstances,
    store: AttributeStore,
    validate_on_set: bool,
}

impl AttributeManager {
    /// Creates a manager bound to one model. Stored data is validated.
    #[must_use]
    pub fn new(registry: AttributeRegistry, model_id: ModelId) -> Self {
        Self {
            instances: AttributeInstances::new(registry, model_id),
            store: AttributeStore::default(),
            validate_on_set: true,
        }
    }

    /// Enables or disables attribute validation when data is stored.
    #[must_use]
    pub const fn with_validation(mut self, enabled: bool) -> Self {
        self.validate_on_set = enabled;
        self
    }

    /// Returns the underlying instance pool.
    #[must_use]
    pub const fn instances(&self) -> &AttributeInstances {
        &self.instances
    }

    /// Returns the attribute registry.
    #[must_use]
    pub const fn registry(&self) -> &AttributeRegistry {
        self.instances.registry()
    }

    /// Re-runs discovery. Stored data survives a changed plugin set.
    ///
    /// # Errors
    ///
    /// Returns the registry's discovery error.
    pub fn discover(&mut self) -> ManagerResult<DiscoveryOutcome> {
        self.instances.discover()
    }

    /// Returns the live attribute, constructing it on first use.
    ///
    /// # Errors
    ///
    /// Returns the manager's lookup or construction error.
    pub fn get_instance(
        &mut self,
        name: &CapabilityName,
        data: &ModelData,
    ) -> ManagerResult<&mut (dyn Attribute + 'static)> {
        self.instances.get_instance(name, data)
    }

    /// Executes `name`, memoising and returning its default values.
    ///
    /// # Errors
    ///
    /// Returns the manager's lookup, resolution or execution error.
    pub fn execute(&mut self, name: &CapabilityName, data: &mut ModelData) -> ManagerResult<Value> {
        self.instances.execute(name, data, &())
    }

    /// Executes every attribute in execution order.
    ///
    /// # Errors
    ///
    /// Returns the manager's resolution or execution error.
    pub fn execute_all(
        &mut self,
        data: &mut ModelData,
    ) -> ManagerResult<IndexMap<CapabilityName, Value>> {
        self.instances.execute_all(data, &())
    }

    /// Returns the memoised default values of `name`.
    ///
    /// # Errors
    ///
    /// Returns the manager's lookup, resolution or execution error.
    pub fn default_values(
        &mut self,
        name: &CapabilityName,
        data: &mut ModelData,
    ) -> ManagerResult<AttributeData> {
        match self.execute(name, data)? {
            Value::Object(values) => Ok(values),
            _ => Err(ExecutionError {
                name: name.clone(),
                source: CapabilityError::failed("default values are not an object"),
            }
            .into()),
        }
    }

    /// Stores `values` for `name` on one target instance.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when `name` does not extend `target` or
    /// the attribute rejects the values; nothing is stored in that case.
    pub fn set_data(
        &mut self,
        target: &ExtensionTarget,
        instance: &str,
        name: &CapabilityName,
        values: AttributeData,
        data: &ModelData,
    ) -> ManagerResult<()> {
        self.check(target, name, &values, data)?;
        self.store
            .insert(target.clone(), instance.to_owned(), name.clone(), values);
        debug!(%target, instance, attribute = %name, "attribute data stored");
        Ok(())
    }

    fn check(
        &mut self,
        target: &ExtensionTarget,
        name: &CapabilityName,
        values: &AttributeData,
        data: &ModelData,
    ) -> ManagerResult<()> {
        let extends = self.instances.registry().get(name)?.descriptor().extends(target);
        if !extends {
            return Err(ValidationError {
                name: name.clone(),
                messages: vec![format!("'{name}' does not extend target '{target}'")],
            }
            .into());
        }
        if self.validate_on_set {
            let messages = self.instances.get_instance(name, data)?.validate(values);
            if !messages.is_empty() {
                return Err(ValidationError {
                    name: name.clone(),
                    messages,
                }
                .into());
            }
        }
        Ok(())
    }

    /// Returns stored values, or the attribute's defaults when none are
    /// stored.
    ///
    /// # Errors
    ///
    /// Returns the manager's lookup or execution error.
    pub fn get_data(
        &mut self,
        target: &ExtensionTarget,
        instance: &str,
        name: &CapabilityName,
        data: &mut ModelData,
    ) -> ManagerResult<AttributeData> {
        if let Some(stored) = self.store.get(target, instance, name) {
            return Ok(stored.clone());
        }
        self.default_values(name, data)
    }

    /// Returns stored values without falling back to defaults.
    #[must_use]
    pub fn stored_data(
        &self,
        target: &ExtensionTarget,
        instance: &str,
        name: &CapabilityName,
    ) -> Option<&AttributeData> {
        self.store.get(target, instance, name)
    }

    /// Returns whether values are stored for the key.
    #[must_use]
    pub fn has_data(&self, target: &ExtensionTarget, instance: &str, name: &CapabilityName) -> bool {
        self.store.get(target, instance, name).is_some()
    }

    /// Removes and returns stored values.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::MissingData`] when nothing is stored.
    pub fn remove_data(
        &mut self,
        target: &ExtensionTarget,
        instance: &str,
        name: &CapabilityName,
    ) -> ManagerResult<AttributeData> {
        self.store
            .remove(target, instance, name)
            .ok_or_else(|| ManagerError::MissingData {
                target: target.clone(),
                instance: instance.to_owned(),
                name: name.clone(),
            })
    }

    /// Returns every attribute stored on one target instance.
    #[must_use]
    pub fn instance_data(
        &self,
        target: &ExtensionTarget,
        instance: &str,
    ) -> IndexMap<CapabilityName, AttributeData> {
        self.store
            .instance(target, instance)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns the target instances holding data for `name`.
    #[must_use]
    pub fn instances_with(&self, target: &ExtensionTarget, name: &CapabilityName) -> Vec<String> {
        self.store.instances_with(target, name)
    }

    /// Drops every value stored on one target instance, returning how many
    /// attributes were removed.
    pub fn clear_instance(&mut self, target: &ExtensionTarget, instance: &str) -> usize {
        self.store.clear_instance(target, instance)
    }

    /// Encodes every attribute stored on one target instance.
    ///
    /// # Errors
    ///
    /// Returns the manager's lookup error, or an [`ExecutionError`] when an
    /// attribute fails to encode.
    pub fn serialize_instance(
        &mut self,
        target: &ExtensionTarget,
        instance: &str,
        data: &ModelData,
    ) -> ManagerResult<IndexMap<CapabilityName, Vec<u8>>> {
        let Some(records) = self.store.instance(target, instance) else {
            return Ok(IndexMap::new());
        };
        let mut payload = IndexMap::with_capacity(records.len());
        for (name, values) in records {
            let bytes = self
                .instances
                .get_instance(name, data)?
                .serialize(values)
                .map_err(|source| ExecutionError {
                    name: name.clone(),
                    source,
                })?;
            payload.insert(name.clone(), bytes);
        }
        Ok(payload)
    }

    /// Decodes and stores a payload produced by
    /// [`serialize_instance`](Self::serialize_instance).
    ///
    /// Every entry is decoded and checked before anything is stored.
    ///
    /// # Errors
    ///
    /// Returns an [`ExecutionError`] when decoding fails or a
    /// [`ValidationError`] when a value is rejected.
    pub fn deserialize_instance(
        &mut self,
        target: &ExtensionTarget,
        instance: &str,
        payload: &IndexMap<CapabilityName, Vec<u8>>,
        data: &ModelData,
    ) -> ManagerResult<()> {
        let mut decoded = Vec::with_capacity(payload.len());
        for (name, bytes) in payload {
            let values = self
                .instances
                .get_instance(name, data)?
                .deserialize(bytes)
                .map_err(|source| ExecutionError {
                    name: name.clone(),
                    source,
                })?;
            self.check(target, name, &values, data)?;
            decoded.push((name.clone(), values));
        }
        for (name, values) in decoded {
            self.store
                .insert(target.clone(), instance.to_owned(), name, values);
        }
        Ok(())
    }

    /// Returns the attributes extending `target`, in registration order.
    #[must_use]
    pub fn attributes_for_target(&self, target: &ExtensionTarget) -> Vec<CapabilityName> {
        self.registry()
            .extending(target)
            .map(|descriptor| descriptor.name().clone())
            .collect()
    }

    /// Returns every target extended by a registered attribute.
    #[must_use]
    pub fn extended_targets(&self) -> BTreeSet<ExtensionTarget> {
        self.registry()
            .descriptors()
            .flat_map(|descriptor| descriptor.extension_targets())
            .collect()
    }

    /// Discards the memoised defaults of `name` and its dependents.
    ///
    /// # Errors
    ///
    /// Returns [`crate::capability::services::NotFoundError`] for an
    /// unregistered name.
    pub fn invalidate(&mut self, name: &CapabilityName) -> ManagerResult<Vec<CapabilityName>> {
        self.instances.invalidate(name)
    }

    /// Drops every instance, memoised default and stored value.
    pub fn reset(&mut self) {
        self.instances.reset();
        self.store.clear();
    }

    /// Returns the lifecycle state of `name`.
    #[must_use]
    pub fn state(&self, name: &CapabilityName) -> CapabilityState {
        self.instances.state(name)
    }
}
