//! Attribute data keyed by target, target instance and attribute name.

use super::AttributeData;
use crate::capability::domain::{CapabilityName, ExtensionTarget};
use indexmap::IndexMap;
use std::collections::BTreeMap;

type InstanceRecords = IndexMap<CapabilityName, AttributeData>;

#[derive(Debug, Clone, Default)]
pub(super) struct AttributeStore {
    records: BTreeMap<ExtensionTarget, IndexMap<String, InstanceRecords>>,
}

impl AttributeStore {
    pub(super) fn get(
        &self,
        target: &ExtensionTarget,
        instance: &str,
        name: &CapabilityName,
    ) -> Option<&AttributeData> {
        self.records.get(target)?.get(instance)?.get(name)
    }

    pub(super) fn insert(
        &mut self,
        target: ExtensionTarget,
        instance: String,
        name: CapabilityName,
        data: AttributeData,
    ) {
        self.records
            .entry(target)
            .or_default()
            .entry(instance)
            .or_default()
            .insert(name, data);
    }

    pub(super) fn remove(
        &mut self,
        target: &ExtensionTarget,
        instance: &str,
        name: &CapabilityName,
    ) -> Option<AttributeData> {
        let instances = self.records.get_mut(target)?;
        let records = instances.get_mut(instance)?;
        let removed = records.shift_remove(name);
        if records.is_empty() {
            instances.shift_remove(instance);
        }
        removed
    }

    pub(super) fn instance(
        &self,
        target: &ExtensionTarget,
        instance: &str,
    ) -> Option<&InstanceRecords> {
        self.records.get(target)?.get(instance)
    }

    pub(super) fn instances_with(
        &self,
        target: &ExtensionTarget,
        name: &CapabilityName,
    ) -> Vec<String> {
        self.records
            .get(target)
            .into_iter()
            .flatten()
            .filter(|(_, records)| records.contains_key(name))
            .map(|(instance, _)| instance.clone())
            .collect()
    }

    pub(super) fn clear_instance(&mut self, target: &ExtensionTarget, instance: &str) -> usize {
        self.records
            .get_mut(target)
            .and_then(|instances| instances.shift_remove(instance))
            .map_or(0, |records| records.len())
    }

    pub(super) fn clear(&mut self) {
        self.records.clear();
    }
}
