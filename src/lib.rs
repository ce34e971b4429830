//! Solverhost: plugin host for building-model solvers and attributes.
//!
//! This crate discovers independently distributed computational units
//! ("solvers") and data-model extensions ("attributes"), orders them by their
//! declared dependencies, and executes them lazily against a host model,
//! caching each result until it is invalidated.
//!
//! # Architecture
//!
//! Solverhost follows hexagonal architecture principles:
//!
//! - **Domain**: Descriptors, names and the opaque model data graph
//! - **Ports**: The plugin source and capability-kind contracts
//! - **Adapters**: Linked, in-memory and manifest-file plugin sources
//! - **Services**: Registry, resolver and per-model manager
//!
//! # Modules
//!
//! - [`capability`]: Discovery, ordering and memoised execution shared by
//!   every capability kind
//! - [`solver`]: The solver interface and solver manager
//! - [`attribute`]: The attribute interface, manager and data store
//! - [`model`]: The host model, its configuration and inspection surface

pub mod attribute;
pub mod capability;
pub mod model;
pub mod solver;
