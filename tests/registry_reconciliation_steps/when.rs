//! When steps for registry reconciliation BDD scenarios.

use super::world::{ReconciliationWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use switchboard::routing::domain::RouteRequest;

#[when("a discovery cycle runs")]
fn a_cycle_runs(world: &mut ReconciliationWorld) -> Result<(), eyre::Report> {
    run_async(world.reconciler.run_cycle()).wrap_err("cycle should succeed")?;
    Ok(())
}

#[when("{count:usize} discovery cycles run")]
fn cycles_run(world: &mut ReconciliationWorld, count: usize) -> Result<(), eyre::Report> {
    for _ in 0..count {
        run_async(world.reconciler.run_cycle()).wrap_err("cycle should succeed")?;
    }
    Ok(())
}

#[when(r#"agent "{id}" stops answering"#)]
fn agent_stops_answering(world: &mut ReconciliationWorld, id: String) -> Result<(), eyre::Report> {
    let candidate = world
        .candidates
        .iter()
        .find(|candidate| candidate.id().as_str() == id)
        .ok_or_else(|| eyre::eyre!("no candidate for agent '{id}'"))?;
    world.prober.clear_discovery(&candidate.location_label());
    Ok(())
}

#[when(r#"the request "{query}" is routed"#)]
fn request_is_routed(world: &mut ReconciliationWorld, query: String) -> Result<(), eyre::Report> {
    let request = RouteRequest::new(query).wrap_err("request should be valid")?;
    world.last_decision = Some(run_async(world.router.route(request)));
    Ok(())
}
