//! Execution context handed to a running capability.

use super::manager::CapabilityManager;
use crate::capability::domain::{CapabilityName, ModelData, ModelId};
use crate::capability::ports::{CapabilityError, CapabilityKind};
use serde_json::Value;

/// What a running capability can see: the model data graph, the cached
/// results of its siblings and a read-only view of the peer category.
///
/// Siblings may be executed on demand through [`execute`](Self::execute);
/// asking for a capability that is itself mid-execution fails with a
/// circular dependency error instead of recursing.
pub struct ExecutionContext<'a, K: CapabilityKind> {
    manager: &'a mut CapabilityManager<K>,
    name: &'a CapabilityName,
    data: &'a mut ModelData,
    peer: &'a K::Peer,
}

impl<'a, K: CapabilityKind> ExecutionContext<'a, K> {
    pub(crate) const fn new(
        manager: &'a mut CapabilityManager<K>,
        name: &'a CapabilityName,
        data: &'a mut ModelData,
        peer: &'a K::Peer,
    ) -> Self {
        Self {
            manager,
            name,
            data,
            peer,
        }
    }

    /// Returns the name of the running capability.
    #[must_use]
    pub const fn name(&self) -> &CapabilityName {
        self.name
    }

    /// Returns the identifier of the model being solved.
    #[must_use]
    pub const fn model_id(&self) -> ModelId {
        self.manager.model_id()
    }

    /// Returns the model data graph.
    #[must_use]
    pub const fn data(&self) -> &ModelData {
        &*self.data
    }

    /// Returns the model data graph for writing derived sections.
    pub const fn data_mut(&mut self) -> &mut ModelData {
        &mut *self.data
    }

    /// Returns the read-only peer view.
    #[must_use]
    pub const fn peer(&self) -> &K::Peer {
        self.peer
    }

    /// Returns the cached result of an already-executed sibling.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError::Domain`] for a malformed name or
    /// [`CapabilityError::MissingInput`] when the sibling has no result yet.
    pub fn result_of(&self, name: &str) -> Result<&Value, CapabilityError> {
        let key = CapabilityName::new(name)?;
        self.manager
            .cached_result(&key)
            .ok_or_else(|| CapabilityError::MissingInput(format!("no result for '{key}'")))
    }

    /// Executes a sibling (and its dependencies) if needed and returns its
    /// result.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError::Domain`] for a malformed name or
    /// [`CapabilityError::Upstream`] wrapping the manager failure.
    pub fn execute(&mut self, name: &str) -> Result<Value, CapabilityError> {
        let key = CapabilityName::new(name)?;
        self.manager.push_request(key.clone());
        let outcome = self.manager.execute(&key, self.data, self.peer);
        self.manager.pop_request();
        outcome.map_err(CapabilityError::upstream)
    }
}
