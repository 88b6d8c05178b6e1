//! Descriptors assembled from a candidate's static hints.

use super::strategy::ProtocolStrategy;
use crate::discovery::{
    domain::{Agent, AgentEndpoint, Capability, DiscoveredAgent, DiscoveryCandidate, FallbackReason},
    ports::ProbeResult,
};
use chrono::{DateTime, Utc};
use tracing::warn;

/// Creates a descriptor skeleton for `candidate` named `name`.
pub(super) fn base_agent(
    candidate: &DiscoveryCandidate,
    endpoint: AgentEndpoint,
    name: &str,
    now: DateTime<Utc>,
) -> ProbeResult<Agent> {
    let agent = Agent::new(candidate.id().clone(), name, candidate.protocol(), endpoint, now)?
        .with_version(candidate.version().map(str::to_owned));
    Ok(agent)
}

/// Builds the minimal descriptor used when native discovery is unavailable.
///
/// Each declared tag becomes a capability; a candidate without tags gets a
/// single `unknown` capability.
pub(super) fn minimal_agent(
    strategy: ProtocolStrategy,
    candidate: &DiscoveryCandidate,
    endpoint: AgentEndpoint,
    now: DateTime<Utc>,
    reason: FallbackReason,
) -> ProbeResult<DiscoveredAgent> {
    warn!(
        candidate = %candidate.id(),
        protocol = strategy.as_str(),
        reason = reason.as_str(),
        "native discovery unavailable, registering minimal descriptor"
    );

    let label = strategy.label();
    let mut capabilities: Vec<Capability> = candidate
        .tags()
        .iter()
        .filter_map(|tag| {
            Capability::new(tag.as_str(), format!("{label} capability: {tag}"))
                .ok()
                .map(|capability| capability.with_tags([strategy.as_str(), "label-fallback"]))
        })
        .collect();
    if capabilities.is_empty() {
        capabilities.push(
            Capability::new("unknown", format!("{label} agent with unknown capabilities"))?
                .with_tags([strategy.as_str(), "fallback"]),
        );
    }

    let agent = base_agent(candidate, endpoint, candidate.display_label(), now)?
        .with_capabilities(capabilities)
        .with_metadata("discovery_method", "fallback")
        .with_metadata("fallback_reason", reason.as_str());
    Ok(DiscoveredAgent::Minimal { agent, reason })
}
