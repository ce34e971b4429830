//! Plugin source backed by a JSON manifest file.
//!
//! The file holds an array of `{"name", "category", "locator"}` objects.
//! It is re-read on every discovery pass.

use crate::capability::domain::PluginManifest;
use crate::capability::ports::{PluginSource, PluginSourceError, PluginSourceResult};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::io;

/// Reads manifests from a JSON file on disk.
#[derive(Debug, Clone)]
pub struct ManifestFilePluginSource {
    path: Utf8PathBuf,
}

impl ManifestFilePluginSource {
    /// Creates a source for the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the manifest file path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn read(&self) -> io::Result<String> {
        let parent = match self.path.parent() {
            Some(dir) if !dir.as_str().is_empty() => dir,
            _ => Utf8Path::new("."),
        };
        let file_name = self.path.file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("manifest path '{}' has no file name", self.path),
            )
        })?;
        let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
        dir.read_to_string(file_name)
    }
}

impl PluginSource for ManifestFilePluginSource {
    fn manifests(&self) -> PluginSourceResult<Vec<PluginManifest>> {
        let contents = self.read().map_err(PluginSourceError::unavailable)?;
        serde_json::from_str(&contents).map_err(PluginSourceError::malformed)
    }
}
