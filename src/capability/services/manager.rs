//! Per-model capability manager: lazy instantiation and memoised execution.

use super::context::ExecutionContext;
use super::error::{
    CircularDependencyError, ExecutionError, ManagerError, ManagerResult, NotFoundError,
};
use super::registry::{CapabilityRegistry, DiscoveryOutcome};
use super::resolver::transitive_dependents;
use crate::capability::domain::{CapabilityName, CapabilityState, ModelData, ModelId};
use crate::capability::ports::{CapabilityKind, ModelBinding};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use tracing::{debug, info};

/// One completed (non-cached) execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionRecord {
    /// Executed capability.
    pub name: CapabilityName,
    /// When the execution finished.
    pub completed_at: DateTime<Utc>,
}

struct Slot<K: CapabilityKind> {
    instance: Option<Box<K::Instance>>,
    result: Option<Value>,
}

impl<K: CapabilityKind> Default for Slot<K> {
    fn default() -> Self {
        Self {
            instance: None,
            result: None,
        }
    }
}

/// Instance pool and result cache of one category for one host model.
///
/// Instances are built on first use and live as long as the manager (or
/// until reset). A capability runs at most once between invalidations;
/// later requests return the cached value.
pub struct CapabilityManager<K: CapabilityKind> {
    registry: CapabilityRegistry<K>,
    model_id: ModelId,
    slots: HashMap<CapabilityName, Slot<K>>,
    in_flight: Vec<CapabilityName>,
    trail: Vec<CapabilityName>,
    history: Vec<ExecutionRecord>,
}

impl<K: CapabilityKind> CapabilityManager<K> {
    /// Creates a manager bound to one model.
    #[must_use]
    pub fn new(registry: CapabilityRegistry<K>, model_id: ModelId) -> Self {
        Self {
            registry,
            model_id,
            slots: HashMap::new(),
            in_flight: Vec::new(),
            trail: Vec::new(),
            history: Vec::new(),
        }
    }

    /// Returns the registry.
    #[must_use]
    pub const fn registry(&self) -> &CapabilityRegistry<K> {
        &self.registry
    }

    /// Returns the bound model identifier.
    #[must_use]
    pub const fn model_id(&self) -> ModelId {
        self.model_id
    }

    /// Re-runs discovery on the registry.
    ///
    /// When the plugin set changed, every instance, cached result and
    /// history record is dropped; an unchanged set keeps them.
    ///
    /// # Errors
    ///
    /// Returns the registry's discovery error; state is untouched.
    pub fn discover(&mut self) -> ManagerResult<DiscoveryOutcome> {
        let outcome = self.registry.discover()?;
        if outcome.is_replaced() {
            self.slots.clear();
            self.history.clear();
        }
        Ok(outcome)
    }

    /// Returns the live instance for `name`, constructing it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] for an unregistered name,
    /// [`CircularDependencyError`] while `name` is executing, or the
    /// constructor's failure as an [`ExecutionError`].
    pub fn get_instance(
        &mut self,
        name: &CapabilityName,
        data: &ModelData,
    ) -> ManagerResult<&mut K::Instance> {
        self.ensure_instance(name, data)?;
        self.slots
            .get_mut(name)
            .and_then(|slot| slot.instance.as_deref_mut())
            .ok_or_else(|| reentrant_chain(&self.trail, name).into())
    }

    /// Executes `name` and everything it depends on, returning its result.
    ///
    /// Capabilities already solved are not re-run.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] for an unregistered name, the registry's
    /// resolution error before anything runs, or the first
    /// [`ExecutionError`].
    pub fn execute(
        &mut self,
        name: &CapabilityName,
        data: &mut ModelData,
        peer: &K::Peer,
    ) -> ManagerResult<Value> {
        self.registry.get(name)?;
        if let Some(result) = self.cached_result(name) {
            debug!(category = %K::CATEGORY, capability = %name, "cache hit");
            return Ok(result.clone());
        }
        let chain = self
            .registry
            .execution_order()?
            .upstream_of(name)
            .ok_or_else(|| self.not_found(name))?;
        for step in &chain {
            if !self.is_solved(step) {
                self.run(step, data, peer)?;
            }
        }
        self.cached_result(name)
            .cloned()
            .ok_or_else(|| self.not_found(name).into())
    }

    /// Executes every registered capability in execution order.
    ///
    /// # Errors
    ///
    /// Returns the resolution error before anything runs, or the first
    /// [`ExecutionError`].
    pub fn execute_all(
        &mut self,
        data: &mut ModelData,
        peer: &K::Peer,
    ) -> ManagerResult<IndexMap<CapabilityName, Value>> {
        let names = self.registry.execution_order()?.names().to_vec();
        self.execute_ordered(&names, &names, data, peer)
    }

    /// Executes the union of the requested names' dependency closures once,
    /// in execution order, and returns the requested results.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] for the first unregistered name, the
    /// resolution error before anything runs, or the first
    /// [`ExecutionError`].
    pub fn execute_many(
        &mut self,
        names: &[CapabilityName],
        data: &mut ModelData,
        peer: &K::Peer,
    ) -> ManagerResult<IndexMap<CapabilityName, Value>> {
        for name in names {
            self.registry.get(name)?;
        }
        let order = self.registry.execution_order()?;
        let mut needed = BTreeSet::new();
        for name in names {
            needed.extend(order.upstream_of(name).into_iter().flatten());
        }
        let steps: Vec<CapabilityName> = order
            .names()
            .iter()
            .filter(|name| needed.contains(*name))
            .cloned()
            .collect();
        self.execute_ordered(&steps, names, data, peer)
    }

    fn execute_ordered(
        &mut self,
        steps: &[CapabilityName],
        requested: &[CapabilityName],
        data: &mut ModelData,
        peer: &K::Peer,
    ) -> ManagerResult<IndexMap<CapabilityName, Value>> {
        for step in steps {
            if !self.is_solved(step) {
                self.run(step, data, peer)?;
            }
        }
        requested
            .iter()
            .map(|name| {
                self.cached_result(name)
                    .cloned()
                    .map(|value| (name.clone(), value))
                    .ok_or_else(|| self.not_found(name).into())
            })
            .collect()
    }

    fn run(
        &mut self,
        name: &CapabilityName,
        data: &mut ModelData,
        peer: &K::Peer,
    ) -> ManagerResult<()> {
        self.ensure_instance(name, data)?;
        let mut instance = self
            .slots
            .get_mut(name)
            .and_then(|slot| slot.instance.take())
            .ok_or_else(|| reentrant_chain(&self.trail, name))?;

        self.in_flight.push(name.clone());
        let joined_trail = self.trail.last() != Some(name);
        if joined_trail {
            self.trail.push(name.clone());
        }
        let outcome = {
            let mut ctx = ExecutionContext::new(self, name, data, peer);
            K::invoke(&mut *instance, &mut ctx)
        };
        if joined_trail {
            self.trail.pop();
        }
        self.in_flight.pop();

        let slot = self.slots.entry(name.clone()).or_default();
        slot.instance = Some(instance);
        let value = outcome.map_err(|source| ExecutionError {
            name: name.clone(),
            source,
        })?;
        slot.result = Some(value);

        let completed_at = self.registry.clock().utc();
        self.history.push(ExecutionRecord {
            name: name.clone(),
            completed_at,
        });
        debug!(category = %K::CATEGORY, capability = %name, "executed");
        Ok(())
    }

    fn ensure_instance(&mut self, name: &CapabilityName, data: &ModelData) -> ManagerResult<()> {
        if self.in_flight.contains(name) {
            return Err(reentrant_chain(&self.trail, name).into());
        }
        let factory = self.registry.get(name)?.factory();
        let slot = self.slots.entry(name.clone()).or_default();
        if slot.instance.is_none() {
            let instance = factory
                .construct(&ModelBinding::new(self.model_id, data))
                .map_err(|source| ExecutionError {
                    name: name.clone(),
                    source,
                })?;
            slot.instance = Some(instance);
            debug!(category = %K::CATEGORY, capability = %name, "instantiated");
        }
        Ok(())
    }

    /// Discards the cached results of `name` and every capability that
    /// transitively depends on it. Instances are kept.
    ///
    /// Returns the names whose results were discarded, in name order.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] for an unregistered name.
    pub fn invalidate(&mut self, name: &CapabilityName) -> ManagerResult<Vec<CapabilityName>> {
        self.registry.get(name)?;
        let affected = transitive_dependents(self.registry.descriptors(), name);
        let mut invalidated = Vec::new();
        for dependent in affected {
            if let Some(slot) = self.slots.get_mut(&dependent)
                && slot.result.take().is_some()
            {
                invalidated.push(dependent);
            }
        }
        debug!(
            category = %K::CATEGORY,
            capability = %name,
            invalidated = invalidated.len(),
            "invalidated"
        );
        Ok(invalidated)
    }

    /// Discards every cached result, and every instance when
    /// `destroy_instances` is set.
    pub fn invalidate_all(&mut self, destroy_instances: bool) {
        if destroy_instances {
            self.slots.clear();
        } else {
            for slot in self.slots.values_mut() {
                slot.result = None;
            }
        }
        info!(category = %K::CATEGORY, destroy_instances, "all results invalidated");
    }

    /// Drops every instance, cached result and history record.
    pub fn reset(&mut self) {
        self.invalidate_all(true);
        self.history.clear();
    }

    /// Returns the lifecycle state of `name` for this model.
    #[must_use]
    pub fn state(&self, name: &CapabilityName) -> CapabilityState {
        if !self.registry.contains(name) {
            return CapabilityState::Unregistered;
        }
        if self.in_flight.contains(name) {
            return CapabilityState::Instantiated;
        }
        match self.slots.get(name) {
            Some(slot) if slot.result.is_some() => CapabilityState::Solved,
            Some(slot) if slot.instance.is_some() => CapabilityState::Instantiated,
            _ => CapabilityState::Registered,
        }
    }

    /// Returns whether `name` has a cached result.
    #[must_use]
    pub fn is_solved(&self, name: &CapabilityName) -> bool {
        self.cached_result(name).is_some()
    }

    /// Returns the cached result of `name`, if any.
    #[must_use]
    pub fn cached_result(&self, name: &CapabilityName) -> Option<&Value> {
        self.slots.get(name).and_then(|slot| slot.result.as_ref())
    }

    /// Returns the completed executions, oldest first.
    #[must_use]
    pub fn execution_history(&self) -> &[ExecutionRecord] {
        &self.history
    }

    /// Clears the execution history.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Records a sibling request made by the running capability.
    pub(super) fn push_request(&mut self, name: CapabilityName) {
        self.trail.push(name);
    }

    /// Drops the innermost sibling request.
    pub(super) fn pop_request(&mut self) {
        self.trail.pop();
    }

    fn not_found(&self, name: &CapabilityName) -> NotFoundError {
        NotFoundError {
            category: self.registry.category(),
            name: name.as_str().to_owned(),
        }
    }
}

fn reentrant_chain(trail: &[CapabilityName], name: &CapabilityName) -> CircularDependencyError {
    let mut names = trail.to_vec();
    names.push(name.clone());
    CircularDependencyError { names }
}

impl<K: CapabilityKind> fmt::Debug for CapabilityManager<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut states: Vec<(&CapabilityName, CapabilityState)> = self
            .slots
            .keys()
            .map(|name| (name, self.state(name)))
            .collect();
        states.sort_by(|left, right| left.0.cmp(right.0));
        f.debug_struct("CapabilityManager")
            .field("category", &K::CATEGORY)
            .field("model_id", &self.model_id)
            .field("states", &states)
            .finish_non_exhaustive()
    }
}
