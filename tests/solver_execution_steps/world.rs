//! Shared world state for solver execution BDD scenarios.

use std::sync::{Arc, Mutex};

use eyre::eyre;
use mockable::DefaultClock;
use rstest::fixture;
use serde_json::{Value, json};
use solverhost::attribute::{AttributeCatalog, AttributeRegistry};
use solverhost::capability::adapters::StaticPluginSource;
use solverhost::capability::domain::{
    CapabilityDescriptor, CapabilityName, Locator, ModelData, PluginCategory, PluginManifest,
};
use solverhost::capability::ports::{CapabilityError, PluginSource};
use solverhost::model::{HostConfig, HostModel, HostModelResult};
use solverhost::solver::{self, SolveContext, Solver, SolverCatalog, SolverRegistry};

/// Names of the solvers that ran, in run order.
pub type RunLog = Arc<Mutex<Vec<String>>>;

/// Solver whose result is one more than the deepest of its dependencies.
struct ChainSolver {
    name: String,
    depends_on: Vec<String>,
    runs: RunLog,
}

impl Solver for ChainSolver {
    fn solve(&mut self, ctx: &mut SolveContext<'_>) -> Result<Value, CapabilityError> {
        let mut depth = 0;
        for dependency in &self.depends_on {
            let upstream = ctx
                .result_of(dependency)?
                .get("depth")
                .and_then(Value::as_i64)
                .unwrap_or_default();
            depth = depth.max(upstream);
        }
        self.runs
            .lock()
            .map_err(|_| CapabilityError::failed("run log poisoned"))?
            .push(self.name.clone());
        Ok(json!({ "depth": depth + 1 }))
    }
}

/// Scenario world for solver execution behaviour tests.
pub struct SolverWorld {
    /// Solver declarations queued before the model is built.
    pub declared: Vec<(String, Vec<String>)>,
    /// The model under test, built on first use.
    pub model: Option<HostModel>,
    /// Shared log of solver runs.
    pub runs: RunLog,
    /// Result of the last solve.
    pub last_solve: Option<HostModelResult<Value>>,
    /// Names cleared by the last invalidation.
    pub last_invalidated: Vec<CapabilityName>,
}

impl SolverWorld {
    /// Creates a world with no declared solvers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            declared: Vec::new(),
            model: None,
            runs: Arc::new(Mutex::new(Vec::new())),
            last_solve: None,
            last_invalidated: Vec::new(),
        }
    }

    /// Returns the model, building it from the declared solvers first.
    pub fn model(&mut self) -> Result<&mut HostModel, eyre::Report> {
        if self.model.is_none() {
            self.model = Some(self.build()?);
        }
        self.model
            .as_mut()
            .ok_or_else(|| eyre!("model was not built"))
    }

    /// Returns the solver names recorded in the run log.
    pub fn ran(&self) -> Result<Vec<String>, eyre::Report> {
        let runs = self.runs.lock().map_err(|_| eyre!("run log poisoned"))?;
        Ok(runs.clone())
    }

    fn build(&self) -> Result<HostModel, eyre::Report> {
        let mut catalog = SolverCatalog::new();
        let mut manifests = Vec::with_capacity(self.declared.len());
        for (name, depends_on) in &self.declared {
            let locator = Locator::new(format!("bdd::{name}"))?;
            let descriptor =
                CapabilityDescriptor::named(name)?.with_dependencies(depends_on.iter().cloned())?;
            let (solver_name, deps, runs) =
                (name.clone(), depends_on.clone(), Arc::clone(&self.runs));
            catalog.register(
                locator.clone(),
                solver::factory(descriptor, move |_| ChainSolver {
                    name: solver_name.clone(),
                    depends_on: deps.clone(),
                    runs: Arc::clone(&runs),
                }),
            );
            manifests.push(PluginManifest::new(
                CapabilityName::new(name.as_str())?,
                PluginCategory::Solver,
                locator,
            ));
        }
        let source: Arc<dyn PluginSource> = Arc::new(StaticPluginSource::new(manifests));
        let solvers = SolverRegistry::new(Arc::clone(&source), catalog, Arc::new(DefaultClock));
        let attributes =
            AttributeRegistry::new(source, AttributeCatalog::new(), Arc::new(DefaultClock));
        Ok(HostModel::new(
            solvers,
            attributes,
            HostConfig::default(),
            ModelData::new(),
        )?)
    }
}

impl Default for SolverWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> SolverWorld {
    SolverWorld::default()
}

/// Splits a comma-separated list of names.
pub fn split_names(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect()
}
