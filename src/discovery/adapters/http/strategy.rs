//! Closed set of protocol strategies.

use super::{a2a, acp, client::ProbeClient, fallback, generic, mcp};
use crate::discovery::{
    domain::{
        Agent, AgentEndpoint, AgentProtocol, AgentStatus, DiscoveredAgent, DiscoveryCandidate,
        FallbackReason,
    },
    ports::ProbeResult,
};
use chrono::{DateTime, Utc};

/// Result of a dialect-native discovery attempt.
pub(super) enum NativeOutcome {
    /// The agent described itself.
    Described(Agent),
    /// Native discovery produced nothing usable.
    Unavailable(FallbackReason),
}

/// Probe strategy selected from an agent's declared dialect.
///
/// Every [`AgentProtocol`] maps to exactly one variant; unrecognised dialects
/// use [`ProtocolStrategy::Generic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolStrategy {
    /// Agent Connect Protocol: `/capabilities` and `/schema`.
    Acp,
    /// Agent-to-Agent protocol: `/agent-info`, `/query`, `/capabilities`, `/`.
    A2a,
    /// Model Context Protocol: `/tools`, `/resources`, `/`.
    Mcp,
    /// Plain HTTP reachability plus static hints.
    Generic,
}

impl ProtocolStrategy {
    /// Selects the strategy for `protocol`.
    #[must_use]
    pub const fn for_protocol(protocol: AgentProtocol) -> Self {
        match protocol {
            AgentProtocol::Acp => Self::Acp,
            AgentProtocol::A2a => Self::A2a,
            AgentProtocol::Mcp => Self::Mcp,
            AgentProtocol::Custom => Self::Generic,
        }
    }

    /// Returns the lowercase tag applied to capabilities this strategy builds.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Acp => "acp",
            Self::A2a => "a2a",
            Self::Mcp => "mcp",
            Self::Generic => "generic",
        }
    }

    /// Returns the label used in generated descriptions.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Acp => "ACP",
            Self::A2a => "A2A",
            Self::Mcp => "MCP",
            Self::Generic => "Generic",
        }
    }

    /// Discovers the agent at `endpoint`.
    ///
    /// Falls back to a minimal descriptor when no dialect-native call
    /// succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Descriptor`](crate::discovery::ports::ProbeError::Descriptor)
    /// when the resulting descriptor is invalid.
    pub async fn discover(
        self,
        client: &ProbeClient,
        candidate: &DiscoveryCandidate,
        endpoint: AgentEndpoint,
        now: DateTime<Utc>,
    ) -> ProbeResult<DiscoveredAgent> {
        let outcome = match self {
            Self::Acp => acp::discover(client, candidate, &endpoint, now).await,
            Self::A2a => a2a::discover(client, candidate, &endpoint, now).await,
            Self::Mcp => mcp::discover(client, candidate, &endpoint, now).await,
            Self::Generic => generic::discover(client, candidate, &endpoint, now).await,
        }?;
        match outcome {
            NativeOutcome::Described(agent) => Ok(DiscoveredAgent::Rich(agent)),
            NativeOutcome::Unavailable(reason) => {
                fallback::minimal_agent(self, candidate, endpoint, now, reason)
            }
        }
    }

    /// Runs the dialect's liveness probe.
    pub async fn health_check(self, client: &ProbeClient, agent: &Agent, now: DateTime<Utc>) -> AgentStatus {
        match self {
            Self::Acp => acp::health_check(client, agent).await,
            Self::A2a => a2a::health_check(client, agent, now).await,
            Self::Mcp => mcp::health_check(client, agent).await,
            Self::Generic => generic::health_check(client, agent).await,
        }
    }
}
