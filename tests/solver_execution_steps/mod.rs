//! Step definitions for solver execution BDD scenarios.

mod given;
mod then;
mod when;
pub mod world;
