//! Scriptable in-memory prober.

use crate::discovery::{
    domain::{Agent, AgentId, AgentStatus, DiscoveredAgent, DiscoveryCandidate},
    ports::{AgentProber, ProbeError, ProbeResult},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

/// In-memory prober driven by scripted outcomes.
///
/// Discovery outcomes are keyed by the candidate's location label; health
/// statuses by agent identifier. Unscripted locations yield no agent and
/// unscripted agents report healthy. Clones share state, so a test can keep a
/// handle and re-script between cycles.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAgentProber {
    state: Arc<RwLock<ProberState>>,
}

#[derive(Debug, Default)]
struct ProberState {
    discoveries: HashMap<String, ProbeResult<Option<DiscoveredAgent>>>,
    health: HashMap<AgentId, AgentStatus>,
    delays: HashMap<String, Duration>,
    discover_calls: usize,
}

impl InMemoryAgentProber {
    /// Creates a prober with nothing scripted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the candidate at `location` answer with `outcome`.
    pub fn set_discovery(&self, location: impl Into<String>, outcome: DiscoveredAgent) {
        self.write_state()
            .discoveries
            .insert(location.into(), Ok(Some(outcome)));
    }

    /// Makes probing `location` fail with `error`.
    pub fn set_discovery_error(&self, location: impl Into<String>, error: ProbeError) {
        self.write_state()
            .discoveries
            .insert(location.into(), Err(error));
    }

    /// Delays the discovery answer for `location`.
    pub fn set_discovery_delay(&self, location: impl Into<String>, delay: Duration) {
        self.write_state().delays.insert(location.into(), delay);
    }

    /// Removes the scripted outcome, so the location yields no agent.
    pub fn clear_discovery(&self, location: &str) {
        self.write_state().discoveries.remove(location);
    }

    /// Removes every scripted discovery outcome.
    pub fn clear_all_discoveries(&self) {
        self.write_state().discoveries.clear();
    }

    /// Sets the status returned by health checks of `agent_id`.
    pub fn set_health(&self, agent_id: AgentId, status: AgentStatus) {
        self.write_state().health.insert(agent_id, status);
    }

    /// Returns how many discovery probes have been served.
    #[must_use]
    pub fn discover_calls(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .discover_calls
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, ProberState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl AgentProber for InMemoryAgentProber {
    async fn discover(&self, candidate: &DiscoveryCandidate) -> ProbeResult<Option<DiscoveredAgent>> {
        let location = candidate.location_label();
        let (outcome, delay) = {
            let mut state = self.write_state();
            state.discover_calls = state.discover_calls.saturating_add(1);
            (
                state.discoveries.get(&location).cloned().unwrap_or(Ok(None)),
                state.delays.get(&location).copied(),
            )
        };

        if let Some(pause) = delay {
            tokio::time::sleep(pause).await;
        }
        outcome
    }

    async fn health_check(&self, agent: &Agent) -> AgentStatus {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .health
            .get(agent.id())
            .copied()
            .unwrap_or(AgentStatus::Healthy)
    }
}
