//! Host model errors.

use super::config::HostConfigError;
use crate::capability::domain::CapabilityDomainError;
use crate::capability::services::{ManagerError, NotFoundError};
use thiserror::Error;

/// Result type for host model operations.
pub type HostModelResult<T> = Result<T, HostModelError>;

/// Errors raised by [`HostModel`](super::HostModel).
#[derive(Debug, Error)]
pub enum HostModelError {
    /// A name or target argument was malformed.
    #[error(transparent)]
    Domain(#[from] CapabilityDomainError),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] HostConfigError),

    /// A manager operation failed.
    #[error(transparent)]
    Manager(#[from] ManagerError),
}

impl From<NotFoundError> for HostModelError {
    fn from(err: NotFoundError) -> Self {
        Self::Manager(err.into())
    }
}
