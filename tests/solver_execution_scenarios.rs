//! Behaviour tests for dependency-ordered, memoised solver execution.

mod solver_execution_steps;

use rstest_bdd_macros::scenario;
use solver_execution_steps::world::{SolverWorld, world};

#[scenario(
    path = "tests/features/solver_execution.feature",
    name = "Solving a dependent runs its dependencies first"
)]
fn dependencies_run_first(world: SolverWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/solver_execution.feature",
    name = "Cached results are reused"
)]
fn cached_results_are_reused(world: SolverWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/solver_execution.feature",
    name = "Invalidation cascades to dependents"
)]
fn invalidation_cascades(world: SolverWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/solver_execution.feature",
    name = "Cyclic dependencies stop execution"
)]
fn cyclic_dependencies_stop_execution(world: SolverWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/solver_execution.feature",
    name = "Unregistered dependencies stop execution"
)]
fn unresolved_dependencies_stop_execution(world: SolverWorld) {
    let _ = world;
}
