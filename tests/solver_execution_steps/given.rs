//! Given steps for solver execution BDD scenarios.

use super::world::SolverWorld;
use rstest_bdd_macros::given;

#[given("a solver {name:string}")]
fn a_solver(world: &mut SolverWorld, name: String) {
    world.declared.push((name, Vec::new()));
}

#[given("a solver {name:string} depending on {dependency:string}")]
fn a_dependent_solver(world: &mut SolverWorld, name: String, dependency: String) {
    world.declared.push((name, vec![dependency]));
}
