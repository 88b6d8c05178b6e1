//! Then steps for registry reconciliation BDD scenarios.

use super::world::ReconciliationWorld;
use eyre::WrapErr;
use rstest_bdd_macros::then;
use switchboard::discovery::domain::{Agent, AgentId, RegistryEntry};
use switchboard::routing::domain::{RoutingDecision, RoutingFailure};

fn registered(world: &ReconciliationWorld, id: &str) -> Result<Agent, eyre::Report> {
    let agent_id = AgentId::new(id).wrap_err("agent id should be valid")?;
    world
        .registry
        .by_id(&agent_id)
        .ok_or_else(|| eyre::eyre!("expected agent '{id}' to be registered"))
}

fn entry(world: &ReconciliationWorld, id: &str) -> Result<RegistryEntry, eyre::Report> {
    let agent_id = AgentId::new(id).wrap_err("agent id should be valid")?;
    world
        .registry
        .entry(&agent_id)
        .ok_or_else(|| eyre::eyre!("expected agent '{id}' to be registered"))
}

fn last_decision(world: &ReconciliationWorld) -> Result<&RoutingDecision, eyre::Report> {
    world
        .last_decision
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no request has been routed in this scenario"))
}

#[then("the registry holds {count:usize} agents")]
fn registry_holds(world: &ReconciliationWorld, count: usize) -> Result<(), eyre::Report> {
    let held = world.registry.len();
    if held != count {
        return Err(eyre::eyre!("expected {count} agents, found {held}"));
    }
    Ok(())
}

#[then(r#"agent "{id}" is healthy"#)]
fn agent_is_healthy(world: &ReconciliationWorld, id: String) -> Result<(), eyre::Report> {
    let agent = registered(world, &id)?;
    if !agent.is_healthy() {
        return Err(eyre::eyre!("expected '{id}' to be healthy, was {}", agent.status()));
    }
    Ok(())
}

#[then(r#"agent "{id}" advertises "{capability}""#)]
fn agent_advertises(
    world: &ReconciliationWorld,
    id: String,
    capability: String,
) -> Result<(), eyre::Report> {
    let agent = registered(world, &id)?;
    if !agent.has_capability(&capability) {
        return Err(eyre::eyre!(
            "expected '{id}' to advertise '{capability}', found {:?}",
            agent.capability_names()
        ));
    }
    Ok(())
}

#[then(r#"agent "{id}" has {count:usize} consecutive failures"#)]
fn agent_has_failures(
    world: &ReconciliationWorld,
    id: String,
    count: usize,
) -> Result<(), eyre::Report> {
    let failures = entry(world, &id)?.consecutive_failures();
    if usize::try_from(failures).ok() != Some(count) {
        return Err(eyre::eyre!("expected {count} failures for '{id}', found {failures}"));
    }
    Ok(())
}

#[then(r#"agent "{id}" is not registered"#)]
fn agent_not_registered(world: &ReconciliationWorld, id: String) -> Result<(), eyre::Report> {
    if registered(world, &id).is_ok() {
        return Err(eyre::eyre!("expected '{id}' to have been evicted"));
    }
    Ok(())
}

#[then(r#"the request is routed to "{id}""#)]
fn request_routed_to(world: &ReconciliationWorld, id: String) -> Result<(), eyre::Report> {
    let decision = last_decision(world)?;
    if !decision.is_successful() {
        return Err(eyre::eyre!("routing failed: {:?}", decision.failure()));
    }
    let selected = decision
        .selected_agent()
        .map(|agent| agent.id().as_str().to_owned())
        .unwrap_or_default();
    if selected != id {
        return Err(eyre::eyre!("expected routing to '{id}', got '{selected}'"));
    }
    Ok(())
}

#[then(r#"agent "{id}" has handled {count:usize} requests"#)]
fn agent_handled(world: &ReconciliationWorld, id: String, count: usize) -> Result<(), eyre::Report> {
    let handled = entry(world, &id)?.request_count();
    if usize::try_from(handled).ok() != Some(count) {
        return Err(eyre::eyre!("expected {count} requests for '{id}', found {handled}"));
    }
    Ok(())
}

#[then("routing fails because no healthy agents exist")]
fn routing_fails_no_healthy(world: &ReconciliationWorld) -> Result<(), eyre::Report> {
    let decision = last_decision(world)?;
    if decision.failure() != Some(&RoutingFailure::NoHealthyAgents) {
        return Err(eyre::eyre!(
            "expected no healthy agents failure, got {:?}",
            decision.failure()
        ));
    }
    Ok(())
}

#[then(r#"only agent "{id}" serves "{capability}""#)]
fn only_agent_serves(
    world: &ReconciliationWorld,
    id: String,
    capability: String,
) -> Result<(), eyre::Report> {
    let serving: Vec<String> = world
        .registry
        .by_capability(&capability)
        .iter()
        .map(|agent| agent.id().as_str().to_owned())
        .collect();
    if serving != [id.as_str()] {
        return Err(eyre::eyre!(
            "expected only '{id}' to serve '{capability}', found {serving:?}"
        ));
    }
    Ok(())
}

#[then(r#"no agent serves "{capability}""#)]
fn no_agent_serves(world: &ReconciliationWorld, capability: String) -> Result<(), eyre::Report> {
    let serving = world.registry.by_capability(&capability);
    if !serving.is_empty() {
        return Err(eyre::eyre!(
            "expected no agent to serve '{capability}', found {} agents",
            serving.len()
        ));
    }
    Ok(())
}
