//! When steps for solver execution BDD scenarios.

use super::world::SolverWorld;
use eyre::WrapErr;
use rstest_bdd_macros::when;

#[when(r#"the solver "{name}" is solved"#)]
fn solve_one(world: &mut SolverWorld, name: String) -> Result<(), eyre::Report> {
    let result = world.model()?.solve(&name);
    world.last_solve = Some(result);
    Ok(())
}

#[when("every solver is solved")]
fn solve_every(world: &mut SolverWorld) -> Result<(), eyre::Report> {
    world
        .model()?
        .solve_all()
        .wrap_err("solve every declared solver")?;
    Ok(())
}

#[when(r#"the solver "{name}" is invalidated"#)]
fn invalidate(world: &mut SolverWorld, name: String) -> Result<(), eyre::Report> {
    world.last_invalidated = world
        .model()?
        .invalidate_solver(&name)
        .wrap_err("invalidate solver")?;
    Ok(())
}
