//! Solvers: capabilities that compute results over the host model.
//!
//! A solver reads the model data graph and the results of the solvers it
//! depends on, and returns a JSON value that the manager caches until the
//! solver is invalidated.

use crate::attribute::AttributeManager;
use crate::capability::adapters::LinkedPlugin;
use crate::capability::domain::{
    CapabilityDescriptor, CapabilityDomainError, ModelData, PluginCategory,
};
use crate::capability::ports::{CapabilityError, CapabilityKind, ModelBinding, PluginFactory};
use crate::capability::services::{
    CapabilityManager, CapabilityRegistry, ExecutionContext, FactoryCatalog,
};
use serde_json::Value;
use std::fmt;

/// A live solver bound to one host model.
pub trait Solver: Send {
    /// Computes this solver's result.
    ///
    /// Upstream results are available through
    /// [`ExecutionContext::result_of`]; attribute data through
    /// [`ExecutionContext::peer`].
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError`] when the computation fails.
    fn solve(&mut self, ctx: &mut SolveContext<'_>) -> Result<Value, CapabilityError>;

    /// Lists model inputs that are missing or unusable.
    ///
    /// A non-empty list stops the solver before [`solve`](Self::solve) runs.
    fn check_inputs(&self, _data: &ModelData) -> Vec<String> {
        Vec::new()
    }
}

/// Marker for the solver capability kind.
#[derive(Debug, Clone, Copy)]
pub enum SolverKind {}

impl CapabilityKind for SolverKind {
    const CATEGORY: PluginCategory = PluginCategory::Solver;
    type Instance = dyn Solver;
    type Peer = AttributeManager;

    fn invoke(
        instance: &mut Self::Instance,
        ctx: &mut ExecutionContext<'_, Self>,
    ) -> Result<Value, CapabilityError> {
        let problems = instance.check_inputs(ctx.data());
        if !problems.is_empty() {
            return Err(CapabilityError::MissingInput(problems.join("; ")));
        }
        instance.solve(ctx)
    }
}

/// Context handed to [`Solver::solve`].
pub type SolveContext<'a> = ExecutionContext<'a, SolverKind>;

/// Factory producing solvers.
pub type SolverFactory = PluginFactory<SolverKind>;

/// Locator-addressed solver factories.
pub type SolverCatalog = FactoryCatalog<SolverKind>;

/// Registry of discovered solvers.
pub type SolverRegistry = CapabilityRegistry<SolverKind>;

/// Per-model solver pool and result cache.
pub type SolverManager = CapabilityManager<SolverKind>;

/// Wraps an infallible constructor into a solver factory.
pub fn factory<S, F>(descriptor: CapabilityDescriptor, make: F) -> SolverFactory
where
    S: Solver + 'static,
    F: Fn(&ModelBinding<'_>) -> S + Send + Sync + 'static,
{
    PluginFactory::new(descriptor, move |binding| {
        let solver: Box<dyn Solver> = Box::new(make(binding));
        Ok(solver)
    })
}

/// Solver definition linked into the binary with `inventory::submit!`.
#[derive(Clone, Copy)]
pub struct SolverPlugin {
    locator: &'static str,
    descriptor: fn() -> Result<CapabilityDescriptor, CapabilityDomainError>,
    construct: fn(&ModelBinding<'_>) -> Result<Box<dyn Solver>, CapabilityError>,
}

impl SolverPlugin {
    /// Declares a linked solver.
    #[must_use]
    pub const fn new(
        locator: &'static str,
        descriptor: fn() -> Result<CapabilityDescriptor, CapabilityDomainError>,
        construct: fn(&ModelBinding<'_>) -> Result<Box<dyn Solver>, CapabilityError>,
    ) -> Self {
        Self {
            locator,
            descriptor,
            construct,
        }
    }
}

impl LinkedPlugin for SolverPlugin {
    type Kind = SolverKind;

    fn locator(&self) -> &'static str {
        self.locator
    }

    fn descriptor(&self) -> Result<CapabilityDescriptor, CapabilityDomainError> {
        (self.descriptor)()
    }

    fn factory(&self) -> Result<SolverFactory, CapabilityDomainError> {
        Ok(PluginFactory::new((self.descriptor)()?, self.construct))
    }
}

impl fmt::Debug for SolverPlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolverPlugin")
            .field("locator", &self.locator)
            .finish_non_exhaustive()
    }
}

inventory::collect!(SolverPlugin);

/// Builds a catalog from every linked solver definition.
///
/// # Errors
///
/// Returns the first malformed descriptor or locator.
pub fn linked_catalog() -> Result<SolverCatalog, CapabilityDomainError> {
    crate::capability::adapters::linked_catalog(inventory::iter::<SolverPlugin>)
}

#[cfg(test)]
mod tests;
