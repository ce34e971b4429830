//! Error types for capability domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing capability domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CapabilityDomainError {
    /// The capability name is empty after trimming.
    #[error("capability name must not be empty")]
    EmptyName,

    /// The capability name contains characters outside `[a-z0-9_]`.
    #[error(
        "capability name '{0}' contains invalid characters (only lowercase alphanumeric and underscores allowed)"
    )]
    InvalidName(String),

    /// The capability name exceeds the 100-character limit.
    #[error("capability name exceeds 100 character limit: {0}")]
    NameTooLong(String),

    /// A descriptor lists itself in its own dependency set.
    #[error("capability '{0}' must not depend on itself")]
    SelfDependency(String),

    /// A locator is empty after trimming.
    #[error("plugin locator must not be empty")]
    EmptyLocator,

    /// An attribute extension target is empty after trimming.
    #[error("extension target must not be empty")]
    EmptyExtensionTarget,
}

/// Error returned while parsing a plugin category.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown plugin category: {0}")]
pub struct ParsePluginCategoryError(pub String);

/// Error returned while parsing a priority tier.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown priority tier: {0}")]
pub struct ParsePriorityTierError(pub String);
