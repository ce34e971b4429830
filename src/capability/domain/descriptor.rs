//! Capability descriptor value type.

use super::{CapabilityDomainError, CapabilityName, PriorityTier};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Version reported when a plugin does not declare one.
const DEFAULT_VERSION: &str = "0.0.0";

/// Part of the host data graph an attribute augments (e.g. `model`, `room`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExtensionTarget(String);

impl ExtensionTarget {
    /// Target used when an attribute does not name one.
    pub const MODEL: &'static str = "model";

    /// Creates a validated extension target.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityDomainError::EmptyExtensionTarget`] when the value
    /// is empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, CapabilityDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CapabilityDomainError::EmptyExtensionTarget);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the model-root target.
    #[must_use]
    pub fn model() -> Self {
        Self(Self::MODEL.to_owned())
    }

    /// Returns the target as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExtensionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ExtensionTarget {
    type Error = CapabilityDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ExtensionTarget> for String {
    fn from(value: ExtensionTarget) -> Self {
        value.0
    }
}

/// Identity, version, ordering hints and dependencies of one pluggable unit.
///
/// Dependencies are stored as names, never as references to other
/// descriptors; the resolver looks them up when it computes an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DescriptorRecord")]
pub struct CapabilityDescriptor {
    name: CapabilityName,
    version: String,
    priority: PriorityTier,
    depends_on: BTreeSet<CapabilityName>,
    description: String,
    extension_targets: BTreeSet<ExtensionTarget>,
}

/// Unchecked wire form of a [`CapabilityDescriptor`].
#[derive(Deserialize)]
struct DescriptorRecord {
    name: CapabilityName,
    #[serde(default = "default_version")]
    version: String,
    #[serde(default)]
    priority: PriorityTier,
    #[serde(default)]
    depends_on: Vec<CapabilityName>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    extension_targets: BTreeSet<ExtensionTarget>,
}

fn default_version() -> String {
    DEFAULT_VERSION.to_owned()
}

impl TryFrom<DescriptorRecord> for CapabilityDescriptor {
    type Error = CapabilityDomainError;

    fn try_from(record: DescriptorRecord) -> Result<Self, Self::Error> {
        let mut descriptor = Self::new(record.name)
            .with_version(record.version)
            .with_priority(record.priority)
            .with_description(record.description)
            .with_dependencies(record.depends_on.iter().map(CapabilityName::as_str))?;
        descriptor.extension_targets = record.extension_targets;
        Ok(descriptor)
    }
}

impl CapabilityDescriptor {
    /// Creates a descriptor with no dependencies in the
    /// [`PriorityTier::Foundation`] tier.
    #[must_use]
    pub fn new(name: CapabilityName) -> Self {
        Self {
            name,
            version: DEFAULT_VERSION.to_owned(),
            priority: PriorityTier::default(),
            depends_on: BTreeSet::new(),
            description: String::new(),
            extension_targets: BTreeSet::new(),
        }
    }

    /// Parses the name and creates a descriptor.
    ///
    /// # Errors
    ///
    /// Returns the [`CapabilityName::new`] validation error.
    pub fn named(name: &str) -> Result<Self, CapabilityDomainError> {
        Ok(Self::new(CapabilityName::new(name)?))
    }

    /// Sets the informational version string.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Sets the priority tier.
    #[must_use]
    pub const fn with_priority(mut self, priority: PriorityTier) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the free-text description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Replaces the dependency set.
    ///
    /// # Errors
    ///
    /// Returns a name validation error for any malformed entry, or
    /// [`CapabilityDomainError::SelfDependency`] when the set contains the
    /// descriptor's own name.
    pub fn with_dependencies<I, S>(mut self, names: I) -> Result<Self, CapabilityDomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut depends_on = BTreeSet::new();
        for raw in names {
            let dependency = CapabilityName::new(raw.as_ref())?;
            if dependency == self.name {
                return Err(CapabilityDomainError::SelfDependency(
                    self.name.as_str().to_owned(),
                ));
            }
            depends_on.insert(dependency);
        }
        self.depends_on = depends_on;
        Ok(self)
    }

    /// Replaces the extension targets (attribute descriptors only).
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityDomainError::EmptyExtensionTarget`] for a blank
    /// entry.
    pub fn with_extension_targets<I, S>(mut self, targets: I) -> Result<Self, CapabilityDomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extension_targets = targets
            .into_iter()
            .map(ExtensionTarget::new)
            .collect::<Result<_, _>>()?;
        Ok(self)
    }

    /// Returns the capability name.
    #[must_use]
    pub const fn name(&self) -> &CapabilityName {
        &self.name
    }

    /// Returns the informational version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the priority tier.
    #[must_use]
    pub const fn priority(&self) -> PriorityTier {
        self.priority
    }

    /// Returns the names this capability depends on.
    #[must_use]
    pub const fn depends_on(&self) -> &BTreeSet<CapabilityName> {
        &self.depends_on
    }

    /// Returns the free-text description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the declared extension targets, or the model root when none
    /// were declared.
    #[must_use]
    pub fn extension_targets(&self) -> BTreeSet<ExtensionTarget> {
        if self.extension_targets.is_empty() {
            return BTreeSet::from([ExtensionTarget::model()]);
        }
        self.extension_targets.clone()
    }

    /// Returns whether this capability augments `target`.
    #[must_use]
    pub fn extends(&self, target: &ExtensionTarget) -> bool {
        if self.extension_targets.is_empty() {
            return target.as_str() == ExtensionTarget::MODEL;
        }
        self.extension_targets.contains(target)
    }
}
