//! Dependency resolution: deterministic topological ordering.

use super::error::{CircularDependencyError, ResolutionError, UnresolvedDependencyError};
use crate::capability::domain::{CapabilityDescriptor, CapabilityName, PriorityTier};
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap, HashMap};

/// A total order over a registry in which every dependency precedes its
/// dependents.
///
/// Among capabilities whose dependencies are all satisfied, the one with the
/// lowest [`PriorityTier`] comes first, then the lexicographically smallest
/// name. The same descriptors therefore always produce the same order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOrder {
    names: Vec<CapabilityName>,
    dependencies: HashMap<CapabilityName, BTreeSet<CapabilityName>>,
}

impl ExecutionOrder {
    /// Returns the full order.
    #[must_use]
    pub fn names(&self) -> &[CapabilityName] {
        &self.names
    }

    /// Returns the number of ordered capabilities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns whether the order is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns whether `name` is part of the order.
    #[must_use]
    pub fn contains(&self, name: &CapabilityName) -> bool {
        self.dependencies.contains_key(name)
    }

    /// Returns the sub-order needed to execute `name`: its transitive
    /// dependencies followed by `name` itself, in full-order sequence.
    ///
    /// Returns `None` when `name` is not ordered.
    #[must_use]
    pub fn upstream_of(&self, name: &CapabilityName) -> Option<Vec<CapabilityName>> {
        if !self.contains(name) {
            return None;
        }
        let mut closure = BTreeSet::new();
        let mut pending = vec![name];
        while let Some(current) = pending.pop() {
            if !closure.insert(current) {
                continue;
            }
            if let Some(deps) = self.dependencies.get(current) {
                pending.extend(deps.iter());
            }
        }
        Some(
            self.names
                .iter()
                .filter(|candidate| closure.contains(candidate))
                .cloned()
                .collect(),
        )
    }
}

/// Computes the execution order of `descriptors`.
///
/// # Errors
///
/// Returns [`ResolutionError::Unresolved`] for the first dangling dependency
/// (in name order), or [`ResolutionError::Circular`] naming every capability
/// that could not be ordered.
pub fn compute_order<'a, I>(descriptors: I) -> Result<ExecutionOrder, ResolutionError>
where
    I: IntoIterator<Item = &'a CapabilityDescriptor>,
{
    let by_name: BTreeMap<&CapabilityName, &CapabilityDescriptor> = descriptors
        .into_iter()
        .map(|descriptor| (descriptor.name(), descriptor))
        .collect();

    for (name, descriptor) in &by_name {
        if let Some(missing) = descriptor
            .depends_on()
            .iter()
            .find(|dependency| !by_name.contains_key(dependency))
        {
            return Err(UnresolvedDependencyError {
                dependent: (*name).clone(),
                missing: missing.clone(),
            }
            .into());
        }
    }

    let mut remaining: HashMap<&CapabilityName, usize> = HashMap::new();
    let mut dependents: HashMap<&CapabilityName, Vec<&CapabilityName>> = HashMap::new();
    let mut ready: BinaryHeap<Reverse<(PriorityTier, &CapabilityName)>> = BinaryHeap::new();

    for (&name, descriptor) in &by_name {
        let deps = descriptor.depends_on();
        remaining.insert(name, deps.len());
        for dependency in deps {
            dependents.entry(dependency).or_default().push(name);
        }
        if deps.is_empty() {
            ready.push(Reverse((descriptor.priority(), name)));
        }
    }

    let mut names = Vec::with_capacity(by_name.len());
    while let Some(Reverse((_, name))) = ready.pop() {
        names.push(name.clone());
        for dependent in dependents.get(name).into_iter().flatten() {
            let Some(count) = remaining.get_mut(dependent) else {
                continue;
            };
            *count = count.saturating_sub(1);
            if *count == 0
                && let Some(descriptor) = by_name.get(dependent)
            {
                ready.push(Reverse((descriptor.priority(), *dependent)));
            }
        }
    }

    if names.len() < by_name.len() {
        let mut unordered: Vec<CapabilityName> = remaining
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .map(|(name, _)| name.clone())
            .collect();
        unordered.sort();
        return Err(CircularDependencyError { names: unordered }.into());
    }

    let dependencies = by_name
        .into_iter()
        .map(|(name, descriptor)| (name.clone(), descriptor.depends_on().clone()))
        .collect();
    Ok(ExecutionOrder {
        names,
        dependencies,
    })
}

/// Returns `name` plus every capability that transitively depends on it.
///
/// Works on any descriptor set, including cyclic ones, and follows declared
/// edges only.
pub fn transitive_dependents<'a, I>(
    descriptors: I,
    name: &CapabilityName,
) -> BTreeSet<CapabilityName>
where
    I: IntoIterator<Item = &'a CapabilityDescriptor>,
{
    let mut reverse: HashMap<&CapabilityName, Vec<&CapabilityName>> = HashMap::new();
    for descriptor in descriptors {
        for dependency in descriptor.depends_on() {
            reverse.entry(dependency).or_default().push(descriptor.name());
        }
    }

    let mut closure = BTreeSet::new();
    let mut pending = vec![name];
    while let Some(current) = pending.pop() {
        if !closure.insert(current.clone()) {
            continue;
        }
        if let Some(next) = reverse.get(current) {
            pending.extend(next.iter().copied());
        }
    }
    closure
}
