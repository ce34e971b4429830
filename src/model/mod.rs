//! Host model, its configuration and the inspection surface.

mod config;
mod error;
mod host;
mod info;

pub use crate::capability::domain::ModelData;
pub use config::{HostConfig, HostConfigError};
pub use error::{HostModelError, HostModelResult};
pub use host::{DiscoveryReport, HostModel};
pub use info::CapabilityInfo;

#[cfg(test)]
mod tests;
