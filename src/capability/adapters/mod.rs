//! Plugin source adapters and link-time plugin collection.

pub mod linked;
pub mod manifest_file;
pub mod memory;

pub use linked::{LinkedPlugin, LinkedPluginSource, linked_catalog, linked_manifests};
pub use manifest_file::ManifestFilePluginSource;
pub use memory::StaticPluginSource;
