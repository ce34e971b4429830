//! Plugin manifest entries supplied by the packaging system.

use super::{CapabilityDomainError, CapabilityName, PluginCategory};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque address of a factory (e.g. `thermal::ground`).
///
/// Two manifests naming the same capability are the same registration only
/// when their locators are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locator(String);

impl Locator {
    /// Creates a validated locator.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityDomainError::EmptyLocator`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, CapabilityDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CapabilityDomainError::EmptyLocator);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the locator as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Locator {
    type Error = CapabilityDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Locator> for String {
    fn from(value: Locator) -> Self {
        value.0
    }
}

/// One `(name, category, locator)` triple enumerated by a plugin source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PluginManifest {
    name: CapabilityName,
    category: PluginCategory,
    locator: Locator,
}

impl PluginManifest {
    /// Creates a manifest entry.
    #[must_use]
    pub const fn new(name: CapabilityName, category: PluginCategory, locator: Locator) -> Self {
        Self {
            name,
            category,
            locator,
        }
    }

    /// Parses raw fields into a manifest entry.
    ///
    /// # Errors
    ///
    /// Returns name or locator validation errors.
    pub fn parse(
        name: &str,
        category: PluginCategory,
        locator: &str,
    ) -> Result<Self, CapabilityDomainError> {
        Ok(Self::new(
            CapabilityName::new(name)?,
            category,
            Locator::new(locator)?,
        ))
    }

    /// Returns the declared capability name.
    #[must_use]
    pub const fn name(&self) -> &CapabilityName {
        &self.name
    }

    /// Returns the category.
    #[must_use]
    pub const fn category(&self) -> PluginCategory {
        self.category
    }

    /// Returns the factory locator.
    #[must_use]
    pub const fn locator(&self) -> &Locator {
        &self.locator
    }
}
