//! `AgentProber` implementation over HTTP.

use super::{client::ProbeClient, strategy::ProtocolStrategy};
use crate::discovery::{
    domain::{Agent, AgentStatus, DiscoveredAgent, DiscoveryCandidate},
    ports::{AgentProber, ProbeResult},
};
use async_trait::async_trait;
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, warn};

/// Probes agents over HTTP using the strategy matching their dialect.
#[derive(Debug, Clone)]
pub struct HttpAgentProber<C>
where
    C: Clock + Send + Sync,
{
    client: ProbeClient,
    clock: Arc<C>,
}

impl<C> HttpAgentProber<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a prober.
    #[must_use]
    pub const fn new(client: ProbeClient, clock: Arc<C>) -> Self {
        Self { client, clock }
    }

    /// Returns the underlying HTTP client.
    #[must_use]
    pub const fn client(&self) -> &ProbeClient {
        &self.client
    }
}

#[async_trait]
impl<C> AgentProber for HttpAgentProber<C>
where
    C: Clock + Send + Sync,
{
    async fn discover(&self, candidate: &DiscoveryCandidate) -> ProbeResult<Option<DiscoveredAgent>> {
        let Some(endpoint) = candidate.resolve_endpoint() else {
            warn!(
                candidate = %candidate.id(),
                location = %candidate.location_label(),
                "candidate has no port, skipping"
            );
            return Ok(None);
        };

        let strategy = ProtocolStrategy::for_protocol(candidate.protocol());
        debug!(candidate = %candidate.id(), protocol = strategy.as_str(), endpoint = %endpoint, "probing candidate");
        let discovered = strategy
            .discover(&self.client, candidate, endpoint, self.clock.utc())
            .await?;
        Ok(Some(discovered))
    }

    async fn health_check(&self, agent: &Agent) -> AgentStatus {
        ProtocolStrategy::for_protocol(agent.protocol())
            .health_check(&self.client, agent, self.clock.utc())
            .await
    }
}
