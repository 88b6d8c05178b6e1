//! Generic dialect for agents without a recognised protocol.

use super::{
    client::{ProbeClient, ProbePurpose},
    fallback::base_agent,
    health,
    strategy::NativeOutcome,
};
use crate::discovery::{
    domain::{Agent, AgentEndpoint, AgentStatus, Capability, DiscoveryCandidate, FallbackReason},
    ports::ProbeResult,
};
use chrono::{DateTime, Utc};
use tracing::debug;

pub(super) async fn discover(
    client: &ProbeClient,
    candidate: &DiscoveryCandidate,
    endpoint: &AgentEndpoint,
    now: DateTime<Utc>,
) -> ProbeResult<NativeOutcome> {
    let url = endpoint.join("");
    match client.get(&url, ProbePurpose::Discovery).await {
        Ok(reply) if reply.is_ok() => {}
        Ok(reply) => {
            debug!(candidate = %candidate.id(), status = reply.status(), "generic probe answered with error status");
            return Ok(NativeOutcome::Unavailable(FallbackReason::NativeProbesFailed));
        }
        Err(err) => {
            debug!(candidate = %candidate.id(), error = %err, "generic probe failed");
            return Ok(NativeOutcome::Unavailable(FallbackReason::NativeProbesFailed));
        }
    }

    let agent = base_agent(candidate, endpoint.clone(), candidate.display_label(), now)?
        .with_capabilities(hint_capabilities(candidate))
        .with_metadata("discovery_method", "generic")
        .with_metadata("declared_tags", candidate.tags().to_vec());
    Ok(NativeOutcome::Described(agent))
}

pub(super) async fn health_check(client: &ProbeClient, agent: &Agent) -> AgentStatus {
    health::probe_chain(client, agent, &["health", ""], health::no_extension).await
}

/// One capability per declared tag, plus one for the declared agent type when
/// no tag already names it.
fn hint_capabilities(candidate: &DiscoveryCandidate) -> Vec<Capability> {
    let mut capabilities: Vec<Capability> = candidate
        .tags()
        .iter()
        .filter_map(|tag| {
            Capability::new(tag.as_str(), format!("Capability: {tag}"))
                .ok()
                .map(|capability| capability.with_tags(["container-label"]))
        })
        .collect();

    if let Some(agent_type) = candidate.agent_type()
        && !capabilities.iter().any(|capability| capability.name() == agent_type)
        && let Ok(typed) = Capability::new(agent_type, format!("Agent type: {agent_type}"))
    {
        capabilities.push(typed.with_tags(["agent-type"]));
    }
    capabilities
}
