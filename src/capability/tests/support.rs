//! Fake capabilities shared by the service tests.
//!
//! `FakeKind` is a minimal capability kind, independent of solvers and
//! attributes, whose instances record every construction and run.

use crate::capability::adapters::StaticPluginSource;
use crate::capability::domain::{
    CapabilityDescriptor, ModelId, PluginCategory, PluginManifest, PriorityTier,
};
use crate::capability::ports::{CapabilityError, CapabilityKind, PluginFactory};
use crate::capability::services::{
    CapabilityManager, CapabilityRegistry, ExecutionContext, FactoryCatalog,
};
use mockable::DefaultClock;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

pub trait FakeCapability: Send {
    fn run(&mut self, ctx: &mut ExecutionContext<'_, FakeKind>) -> Result<Value, CapabilityError>;
}

pub enum FakeKind {}

impl CapabilityKind for FakeKind {
    const CATEGORY: PluginCategory = PluginCategory::Solver;
    type Instance = dyn FakeCapability;
    type Peer = ();

    fn invoke(
        instance: &mut Self::Instance,
        ctx: &mut ExecutionContext<'_, Self>,
    ) -> Result<Value, CapabilityError> {
        instance.run(ctx)
    }
}

/// Thread-safe list of recorded names.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn record(&self, name: &str) {
        if let Ok(mut calls) = self.0.lock() {
            calls.push(name.to_owned());
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls().iter().filter(|call| *call == name).count()
    }

    pub fn clear(&self) {
        if let Ok(mut calls) = self.0.lock() {
            calls.clear();
        }
    }
}

/// Runs and constructions observed across one test.
#[derive(Debug, Clone, Default)]
pub struct Observed {
    pub runs: CallLog,
    pub builds: CallLog,
}

#[derive(Debug, Clone, Copy)]
pub enum Behaviour {
    Succeed,
    Fail,
    ExecuteSibling(&'static str),
    ReadUpstream(&'static str),
}

struct Recorder {
    name: &'static str,
    runs: CallLog,
    behaviour: Behaviour,
}

impl FakeCapability for Recorder {
    fn run(&mut self, ctx: &mut ExecutionContext<'_, FakeKind>) -> Result<Value, CapabilityError> {
        self.runs.record(self.name);
        match self.behaviour {
            Behaviour::Succeed => Ok(json!({ "solved": self.name })),
            Behaviour::Fail => Err(CapabilityError::failed(format!("{} failed", self.name))),
            Behaviour::ExecuteSibling(sibling) => {
                let value = ctx.execute(sibling)?;
                Ok(json!({ "solved": self.name, "sibling": value }))
            }
            Behaviour::ReadUpstream(upstream) => {
                let value = ctx.result_of(upstream)?.clone();
                Ok(json!({ "solved": self.name, "upstream": value }))
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FakeSpec {
    pub name: &'static str,
    pub tier: PriorityTier,
    pub depends_on: &'static [&'static str],
    pub behaviour: Behaviour,
}

impl FakeSpec {
    pub const fn new(name: &'static str, depends_on: &'static [&'static str]) -> Self {
        Self {
            name,
            tier: PriorityTier::Foundation,
            depends_on,
            behaviour: Behaviour::Succeed,
        }
    }

    pub const fn tier(mut self, tier: PriorityTier) -> Self {
        self.tier = tier;
        self
    }

    pub const fn behaviour(mut self, behaviour: Behaviour) -> Self {
        self.behaviour = behaviour;
        self
    }

    pub fn descriptor(&self) -> CapabilityDescriptor {
        CapabilityDescriptor::named(self.name)
            .expect("valid fake name")
            .with_priority(self.tier)
            .with_dependencies(self.depends_on.iter())
            .expect("valid fake dependencies")
    }

    pub fn locator(&self) -> String {
        format!("fake::{}", self.name)
    }

    pub fn manifest(&self) -> PluginManifest {
        PluginManifest::parse(self.name, PluginCategory::Solver, &self.locator())
            .expect("valid fake manifest")
    }

    fn factory(&self, observed: &Observed) -> PluginFactory<FakeKind> {
        let name = self.name;
        let behaviour = self.behaviour;
        let runs = observed.runs.clone();
        let builds = observed.builds.clone();
        PluginFactory::new(self.descriptor(), move |_binding| {
            builds.record(name);
            let fake: Box<dyn FakeCapability> = Box::new(Recorder {
                name,
                runs: runs.clone(),
                behaviour,
            });
            Ok(fake)
        })
    }
}

/// Ground/solar/heating set used throughout the tests.
pub const THERMAL: [FakeSpec; 3] = [
    FakeSpec::new("heating", &["ground", "solar"]).tier(PriorityTier::Demand),
    FakeSpec::new("solar", &[]),
    FakeSpec::new("ground", &[]),
];

pub fn catalog(specs: &[FakeSpec], observed: &Observed) -> FactoryCatalog<FakeKind> {
    specs.iter().fold(FactoryCatalog::new(), |catalog, spec| {
        catalog.with(
            crate::capability::domain::Locator::new(spec.locator()).expect("valid locator"),
            spec.factory(observed),
        )
    })
}

pub fn source(specs: &[FakeSpec]) -> StaticPluginSource {
    StaticPluginSource::new(specs.iter().map(FakeSpec::manifest).collect())
}

/// Registry over `specs`, already discovered.
pub fn registry(specs: &[FakeSpec], observed: &Observed) -> CapabilityRegistry<FakeKind> {
    registry_with_source(source(specs), specs, observed)
}

pub fn registry_with_source(
    source: StaticPluginSource,
    specs: &[FakeSpec],
    observed: &Observed,
) -> CapabilityRegistry<FakeKind> {
    let mut registry =
        CapabilityRegistry::new(Arc::new(source), catalog(specs, observed), Arc::new(DefaultClock));
    registry.discover().expect("fake discovery should succeed");
    registry
}

pub fn manager(specs: &[FakeSpec], observed: &Observed) -> CapabilityManager<FakeKind> {
    CapabilityManager::new(registry(specs, observed), ModelId::new())
}
