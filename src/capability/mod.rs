//! Generic plugin machinery shared by every capability kind.
//!
//! A capability is a named, versioned unit discovered from a plugin source,
//! ordered by its declared dependencies and executed at most once per host
//! model between invalidations. Solvers and attributes are two kinds built
//! on this module. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Registry, resolver and manager services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
