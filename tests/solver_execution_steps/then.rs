//! Then steps for solver execution BDD scenarios.

use super::world::{SolverWorld, split_names};
use eyre::eyre;
use rstest_bdd_macros::then;
use serde_json::Value;
use solverhost::capability::domain::CapabilityState;
use solverhost::capability::services::{ManagerError, ResolutionError};
use solverhost::model::HostModelError;

#[then(r#"solvers ran in the order "{order}""#)]
fn ran_in_order(world: &SolverWorld, order: String) -> Result<(), eyre::Report> {
    let ran = world.ran()?;
    let expected = split_names(&order);
    if ran != expected {
        return Err(eyre!("expected run order {expected:?}, got {ran:?}"));
    }
    Ok(())
}

#[then(r#"the result of "{name}" has depth {depth:i64}"#)]
fn result_depth(world: &mut SolverWorld, name: String, depth: i64) -> Result<(), eyre::Report> {
    let result = world
        .model()?
        .solve(&name)
        .map_err(|err| eyre!("result of '{name}' unavailable: {err}"))?;
    let actual = result.get("depth").and_then(Value::as_i64);
    if actual != Some(depth) {
        return Err(eyre!("expected depth {depth} for '{name}', got {actual:?}"));
    }
    Ok(())
}

#[then(r#"the solver "{name}" ran {count:usize} times"#)]
fn ran_count(world: &SolverWorld, name: String, count: usize) -> Result<(), eyre::Report> {
    let runs = world.ran()?.iter().filter(|ran| **ran == name).count();
    if runs != count {
        return Err(eyre!("expected '{name}' to run {count} times, ran {runs}"));
    }
    Ok(())
}

#[then("no solver ran")]
fn nothing_ran(world: &SolverWorld) -> Result<(), eyre::Report> {
    let ran = world.ran()?;
    if !ran.is_empty() {
        return Err(eyre!("expected no runs, got {ran:?}"));
    }
    Ok(())
}

#[then(r#"the invalidated solvers are "{names}""#)]
fn invalidated_solvers(world: &SolverWorld, names: String) -> Result<(), eyre::Report> {
    let actual: Vec<String> = world
        .last_invalidated
        .iter()
        .map(|name| name.as_str().to_owned())
        .collect();
    let expected = split_names(&names);
    if actual != expected {
        return Err(eyre!("expected {expected:?} invalidated, got {actual:?}"));
    }
    Ok(())
}

#[then(r#"the solver "{name}" is still solved"#)]
fn still_solved(world: &mut SolverWorld, name: String) -> Result<(), eyre::Report> {
    let info = world
        .model()?
        .solver_info(&name)
        .map_err(|err| eyre!("solver '{name}' unavailable: {err}"))?;
    if info.state != CapabilityState::Solved {
        return Err(eyre!("expected '{name}' solved, found {}", info.state));
    }
    Ok(())
}

#[then("solving fails with a circular dependency")]
fn fails_with_cycle(world: &SolverWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_solve
        .as_ref()
        .ok_or_else(|| eyre!("missing solve result in scenario world"))?;
    if !matches!(
        result,
        Err(HostModelError::Manager(ManagerError::Resolution(
            ResolutionError::Circular(_)
        )))
    ) {
        return Err(eyre!("expected circular dependency error, got {result:?}"));
    }
    Ok(())
}

#[then(r#"solving fails with an unresolved dependency on "{missing}""#)]
fn fails_with_unresolved(world: &SolverWorld, missing: String) -> Result<(), eyre::Report> {
    let result = world
        .last_solve
        .as_ref()
        .ok_or_else(|| eyre!("missing solve result in scenario world"))?;
    match result {
        Err(HostModelError::Manager(ManagerError::Resolution(ResolutionError::Unresolved(
            err,
        )))) if err.missing.as_str() == missing => Ok(()),
        other => Err(eyre!(
            "expected unresolved dependency on '{missing}', got {other:?}"
        )),
    }
}
