//! Domain model shared by solver and attribute capabilities.
//!
//! Descriptors, manifests and the per-name lifecycle are plain value types;
//! nothing here knows how plugins are found or executed.

mod category;
mod data;
mod descriptor;
mod error;
mod ids;
mod manifest;
mod name;
mod priority;
mod state;

pub use category::PluginCategory;
pub use data::ModelData;
pub use descriptor::{CapabilityDescriptor, ExtensionTarget};
pub use error::{CapabilityDomainError, ParsePluginCategoryError, ParsePriorityTierError};
pub use ids::ModelId;
pub use manifest::{Locator, PluginManifest};
pub use name::CapabilityName;
pub use priority::PriorityTier;
pub use state::CapabilityState;
