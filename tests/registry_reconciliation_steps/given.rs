//! Given steps for registry reconciliation BDD scenarios.

use super::world::{ReconciliationWorld, native_descriptor, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use switchboard::discovery::domain::{
    AgentEndpoint, AgentId, AgentProtocol, AgentStatus, CandidateLocation, DiscoveryCandidate,
};

#[given(r#"a candidate "{name}" speaking "{protocol}" tagged "{tag}""#)]
fn a_candidate(
    world: &mut ReconciliationWorld,
    name: String,
    protocol: String,
    tag: String,
) -> Result<(), eyre::Report> {
    let endpoint = AgentEndpoint::new(format!("http://{name}:8000"))
        .wrap_err("candidate endpoint should be valid")?;
    let candidate = DiscoveryCandidate::new(
        name.as_str(),
        AgentProtocol::from_declared(&protocol),
        CandidateLocation::Endpoint(endpoint),
    )
    .wrap_err("candidate should be valid")?
    .with_tags([tag]);
    world.candidates.push(candidate);
    world.source.set_candidates(world.candidates.clone());
    Ok(())
}

#[given("no candidates are configured")]
fn no_candidates(world: &mut ReconciliationWorld) {
    world.candidates.clear();
    world.source.set_candidates(Vec::new());
}

#[given("every candidate answers with a native descriptor")]
fn every_candidate_answers(world: &mut ReconciliationWorld) -> Result<(), eyre::Report> {
    for candidate in &world.candidates {
        world
            .prober
            .set_discovery(candidate.location_label(), native_descriptor(candidate)?);
    }
    Ok(())
}

#[given(r#"agent "{id}" reports "{status}""#)]
fn agent_reports(
    world: &mut ReconciliationWorld,
    id: String,
    status: String,
) -> Result<(), eyre::Report> {
    let agent_id = AgentId::new(id).wrap_err("agent id should be valid")?;
    let reported =
        AgentStatus::try_from(status.as_str()).wrap_err("status should be recognised")?;
    world.prober.set_health(agent_id, reported);
    Ok(())
}

#[given("a discovery cycle has run")]
fn a_cycle_has_run(world: &mut ReconciliationWorld) -> Result<(), eyre::Report> {
    run_async(world.reconciler.run_cycle()).wrap_err("initial cycle should succeed")?;
    Ok(())
}
