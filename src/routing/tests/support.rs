//! Shared fixtures for routing unit tests.

use crate::discovery::{
    domain::{Agent, AgentEndpoint, AgentId, AgentProtocol, AgentStatus, Capability, RegistryEntry},
    services::AgentRegistry,
};
use crate::routing::ports::{
    BackendDecision, DecisionBackend, DecisionBackendResult, DecisionRequest,
};
use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use mockall::mock;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

mock! {
    pub Backend {}

    #[async_trait]
    impl DecisionBackend for Backend {
        fn name(&self) -> &str;
        async fn decide(&self, request: &DecisionRequest) -> DecisionBackendResult<BackendDecision>;
    }
}

/// Backend that answers only after a delay.
pub(super) struct SlowBackend {
    pub(super) delay: Duration,
}

#[async_trait]
impl DecisionBackend for SlowBackend {
    fn name(&self) -> &str {
        "slow"
    }

    async fn decide(&self, _request: &DecisionRequest) -> DecisionBackendResult<BackendDecision> {
        tokio::time::sleep(self.delay).await;
        Ok(BackendDecision::decline("too late"))
    }
}

pub(super) fn agent_id(value: &str) -> AgentId {
    AgentId::new(value).expect("valid agent id")
}

pub(super) fn agent(
    name: &str,
    protocol: AgentProtocol,
    tags: &[&str],
    status: AgentStatus,
) -> Agent {
    let capabilities = tags
        .iter()
        .map(|tag| {
            Capability::new(*tag, format!("Handles {tag}"))
                .expect("valid capability")
                .with_tags([*tag])
        })
        .collect();
    Agent::new(
        AgentId::derive(protocol, name).expect("valid id"),
        name,
        protocol,
        AgentEndpoint::new(format!("http://{name}:8000")).expect("valid endpoint"),
        DefaultClock.utc(),
    )
    .expect("valid agent")
    .with_capabilities(capabilities)
    .with_status(status)
}

pub(super) fn registry_with(agents: Vec<Agent>) -> Arc<AgentRegistry> {
    let registry = Arc::new(AgentRegistry::new());
    publish(&registry, agents);
    registry
}

pub(super) fn publish(registry: &AgentRegistry, agents: Vec<Agent>) {
    let entries: BTreeMap<AgentId, RegistryEntry> = agents
        .into_iter()
        .map(|agent| (agent.id().clone(), RegistryEntry::new(agent, DefaultClock.utc())))
        .collect();
    registry.replace(entries);
}

pub(super) fn greeter() -> Agent {
    agent("greet", AgentProtocol::Acp, &["greeting"], AgentStatus::Healthy)
}

pub(super) fn math() -> Agent {
    agent("math", AgentProtocol::A2a, &["arithmetic", "add"], AgentStatus::Healthy)
}
