//! Host model configuration.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a [`HostConfig`].
#[derive(Debug, Error)]
pub enum HostConfigError {
    /// The JSON document could not be parsed.
    #[error("invalid host configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Behaviour switches for a [`HostModel`](super::HostModel).
///
/// Every field has a default, so a partial JSON document is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Discover both registries when the model is built.
    pub discover_on_build: bool,
    /// Run attribute validation before storing attribute data.
    pub validate_attribute_data: bool,
    /// Keep live solver instances when solvers are reset.
    pub retain_instances_on_reset: bool,
    /// Data-graph sections the model must contain to be valid.
    pub required_sections: Vec<String>,
    /// JSON manifest file replacing the linked plugin list.
    pub manifest_path: Option<Utf8PathBuf>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            discover_on_build: true,
            validate_attribute_data: true,
            retain_instances_on_reset: false,
            required_sections: Vec::new(),
            manifest_path: None,
        }
    }
}

impl HostConfig {
    /// Returns a configuration that stores attribute data unvalidated.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            validate_attribute_data: false,
            ..Self::default()
        }
    }

    /// Sets the sections required for the model to be valid.
    #[must_use]
    pub fn with_required_sections<I, S>(mut self, sections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_sections = sections.into_iter().map(Into::into).collect();
        self
    }

    /// Reads plugin manifests from `path` instead of the linked list.
    #[must_use]
    pub fn with_manifest_path(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.manifest_path = Some(path.into());
        self
    }

    /// Parses a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`HostConfigError::Parse`] for malformed JSON or mistyped
    /// fields.
    pub fn from_json_str(json: &str) -> Result<Self, HostConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}
