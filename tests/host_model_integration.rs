//! End-to-end host model behaviour over plugins linked into this test binary.

use rstest::{fixture, rstest};
use serde_json::{Value, json};
use solverhost::attribute::{Attribute, AttributeData, AttributePlugin};
use solverhost::capability::domain::{
    CapabilityDescriptor, CapabilityDomainError, CapabilityName, CapabilityState, ExtensionTarget,
    ModelData, PriorityTier,
};
use solverhost::capability::ports::{CapabilityError, ModelBinding};
use solverhost::model::{HostConfig, HostModel, HostModelError};
use solverhost::solver::{SolveContext, Solver, SolverPlugin};

// ── Linked plugins ─────────────────────────────────────────────────

struct ClimateSolver;

impl Solver for ClimateSolver {
    fn check_inputs(&self, data: &ModelData) -> Vec<String> {
        match data.section("site").and_then(|site| site.get("design_temperature")) {
            Some(Value::Number(_)) => Vec::new(),
            _ => vec!["site.design_temperature must be a number".to_owned()],
        }
    }

    fn solve(&mut self, ctx: &mut SolveContext<'_>) -> Result<Value, CapabilityError> {
        let outdoor = ctx
            .data()
            .section("site")
            .and_then(|site| site.get("design_temperature"))
            .and_then(Value::as_i64)
            .ok_or_else(|| CapabilityError::MissingInput("design_temperature".to_owned()))?;
        Ok(json!({ "outdoor": outdoor }))
    }
}

struct HeatLossSolver;

impl Solver for HeatLossSolver {
    fn solve(&mut self, ctx: &mut SolveContext<'_>) -> Result<Value, CapabilityError> {
        let outdoor = ctx
            .result_of("climate")?
            .get("outdoor")
            .and_then(Value::as_i64)
            .ok_or_else(|| CapabilityError::failed("climate result lacks outdoor"))?;
        let rooms = ctx
            .data()
            .section("rooms")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let target = ExtensionTarget::new("room")?;
        let attribute = CapabilityName::new("setpoint")?;
        let mut total = 0;
        let mut per_room = serde_json::Map::new();
        for room in rooms.iter().filter_map(Value::as_str) {
            let setpoint = ctx
                .peer()
                .stored_data(&target, room, &attribute)
                .and_then(|data| data.get("celsius"))
                .and_then(Value::as_i64)
                .unwrap_or(20);
            let loss = (setpoint - outdoor) * 10;
            total += loss;
            per_room.insert(room.to_owned(), json!(loss));
        }
        ctx.data_mut()
            .insert_section("heat_loss", Value::Object(per_room));
        Ok(json!({ "total": total }))
    }
}

const SIZING_MARGIN_WATTS: i64 = 500;

struct BoilerSolver;

impl Solver for BoilerSolver {
    fn solve(&mut self, ctx: &mut SolveContext<'_>) -> Result<Value, CapabilityError> {
        let total = ctx
            .result_of("heat_loss")?
            .get("total")
            .and_then(Value::as_i64)
            .ok_or_else(|| CapabilityError::failed("heat loss result lacks total"))?;
        Ok(json!({ "boiler_watts": total + SIZING_MARGIN_WATTS }))
    }
}

struct SetpointAttribute;

impl Attribute for SetpointAttribute {
    fn get_default_values(&self) -> AttributeData {
        AttributeData::from_iter([("celsius".to_owned(), json!(20))])
    }

    fn validate(&self, data: &AttributeData) -> Vec<String> {
        match data.get("celsius").and_then(Value::as_i64) {
            Some(celsius) if (5..=30).contains(&celsius) => Vec::new(),
            _ => vec!["celsius must be an integer between 5 and 30".to_owned()],
        }
    }
}

fn climate_descriptor() -> Result<CapabilityDescriptor, CapabilityDomainError> {
    Ok(CapabilityDescriptor::named("climate")?
        .with_version("1.2.0")
        .with_description("Design outdoor conditions"))
}

fn heat_loss_descriptor() -> Result<CapabilityDescriptor, CapabilityDomainError> {
    Ok(CapabilityDescriptor::named("heat_loss")?
        .with_priority(PriorityTier::Demand)
        .with_dependencies(["climate"])?)
}

fn boiler_descriptor() -> Result<CapabilityDescriptor, CapabilityDomainError> {
    Ok(CapabilityDescriptor::named("boiler")?
        .with_priority(PriorityTier::Systems)
        .with_dependencies(["heat_loss"])?)
}

fn setpoint_descriptor() -> Result<CapabilityDescriptor, CapabilityDomainError> {
    CapabilityDescriptor::named("setpoint")?.with_extension_targets(["room"])
}

fn climate(_binding: &ModelBinding<'_>) -> Result<Box<dyn Solver>, CapabilityError> {
    Ok(Box::new(ClimateSolver))
}

fn heat_loss(_binding: &ModelBinding<'_>) -> Result<Box<dyn Solver>, CapabilityError> {
    Ok(Box::new(HeatLossSolver))
}

fn boiler(_binding: &ModelBinding<'_>) -> Result<Box<dyn Solver>, CapabilityError> {
    Ok(Box::new(BoilerSolver))
}

fn setpoint(_binding: &ModelBinding<'_>) -> Result<Box<dyn Attribute>, CapabilityError> {
    Ok(Box::new(SetpointAttribute))
}

inventory::submit! {
    SolverPlugin::new("hvac::climate", climate_descriptor, climate)
}

inventory::submit! {
    SolverPlugin::new("hvac::heat_loss", heat_loss_descriptor, heat_loss)
}

inventory::submit! {
    SolverPlugin::new("hvac::boiler", boiler_descriptor, boiler)
}

inventory::submit! {
    AttributePlugin::new("hvac::setpoint", setpoint_descriptor, setpoint)
}

// ── Fixtures ───────────────────────────────────────────────────────

fn building_data() -> ModelData {
    let mut data = ModelData::new();
    data.insert_section("site", json!({ "design_temperature": -5 }));
    data.insert_section("rooms", json!(["kitchen", "lounge"]));
    data
}

#[fixture]
fn model() -> HostModel {
    let config = HostConfig::from_json_str(r#"{"required_sections": ["site", "rooms"]}"#)
        .expect("config should parse");
    HostModel::linked(config, building_data()).expect("linked model should build")
}

// ── Scenarios ──────────────────────────────────────────────────────

#[rstest]
fn linked_plugins_resolve_into_tiered_order(model: HostModel) {
    assert!(model.is_valid());
    let order: Vec<String> = model
        .get_execution_order()
        .expect("order should resolve")
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(order, ["climate", "heat_loss", "boiler"]);
}

#[rstest]
fn stored_attribute_data_feeds_solvers(mut model: HostModel) {
    model
        .set_attribute_data(
            "room",
            "lounge",
            "setpoint",
            AttributeData::from_iter([("celsius".to_owned(), json!(22))]),
        )
        .expect("setpoint should store");

    let boiler = model.solve("boiler").expect("boiler should size");

    assert_eq!(boiler, json!({ "boiler_watts": 1020 }));
    assert_eq!(
        model.data().section("heat_loss"),
        Some(&json!({ "kitchen": 250, "lounge": 270 }))
    );
}

#[rstest]
fn editing_inputs_takes_effect_after_invalidation(mut model: HostModel) {
    model.solve_all().expect("every solver should run");
    model
        .data_mut()
        .insert_section("site", json!({ "design_temperature": -45 }));

    let stale = model.solve("boiler").expect("cached result");
    assert_eq!(stale, json!({ "boiler_watts": 1000 }));

    let cleared = model
        .invalidate_solver("climate")
        .expect("climate should invalidate");
    assert_eq!(cleared.len(), 3);
    let fresh = model.solve("boiler").expect("boiler should re-size");
    assert_eq!(fresh, json!({ "boiler_watts": 1800 }));
}

#[rstest]
fn out_of_range_attribute_data_is_rejected(mut model: HostModel) {
    let result = model.set_attribute_data(
        "room",
        "kitchen",
        "setpoint",
        AttributeData::from_iter([("celsius".to_owned(), json!(45))]),
    );
    assert!(matches!(result, Err(HostModelError::Manager(_))));
    assert!(!model
        .has_attribute_data("room", "kitchen", "setpoint")
        .expect("valid key"));
}

#[rstest]
fn missing_inputs_fail_without_caching() {
    let mut data = building_data();
    data.remove_section("site");
    let mut model = HostModel::linked(HostConfig::default(), data).expect("linked model");

    let result = model.solve("boiler");

    assert!(matches!(result, Err(HostModelError::Manager(_))));
    let info = model.solver_info("climate").expect("climate is registered");
    assert_ne!(info.state, CapabilityState::Solved);
    assert!(model.execution_history().is_empty());
}

#[rstest]
fn capability_info_serialises_for_tooling(model: HostModel) {
    let info = model.solver_info("climate").expect("climate is registered");
    let rendered = serde_json::to_value(&info).expect("info should serialise");
    assert_eq!(rendered.get("version"), Some(&json!("1.2.0")));
    assert_eq!(rendered.get("category"), Some(&json!("solver")));
    assert_eq!(rendered.get("priority"), Some(&json!("foundation")));
    assert_eq!(rendered.get("state"), Some(&json!("registered")));
    assert_eq!(rendered.get("locator"), Some(&json!("hvac::climate")));
}
