//! Shared world state for registry reconciliation BDD scenarios.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use rstest::fixture;
use switchboard::discovery::{
    adapters::memory::{InMemoryAgentProber, InMemoryCandidateSource},
    domain::{Agent, Capability, DiscoveredAgent, DiscoveryCandidate},
    services::{AgentRegistry, RegistryReconciler},
};
use switchboard::routing::{
    adapters::KeywordDecisionBackend, domain::RoutingDecision, services::RoutingService,
};

/// Reconciler type used by the BDD world.
pub type TestReconciler =
    RegistryReconciler<InMemoryCandidateSource, InMemoryAgentProber, DefaultClock>;

/// Routing service type used by the BDD world.
pub type TestRouter = RoutingService<KeywordDecisionBackend, DefaultClock>;

/// Scenario world for reconciliation behaviour tests.
pub struct ReconciliationWorld {
    /// Scripted candidate source.
    pub source: Arc<InMemoryCandidateSource>,
    /// Scripted prober.
    pub prober: Arc<InMemoryAgentProber>,
    /// Registry under test.
    pub registry: Arc<AgentRegistry>,
    /// Reconciler publishing to the registry.
    pub reconciler: TestReconciler,
    /// Router reading from the registry.
    pub router: TestRouter,
    /// Candidates declared by the scenario so far.
    pub candidates: Vec<DiscoveryCandidate>,
    /// Outcome of the last routed request.
    pub last_decision: Option<RoutingDecision>,
}

impl ReconciliationWorld {
    /// Creates a world with no candidates.
    #[must_use]
    pub fn new() -> Self {
        let source = Arc::new(InMemoryCandidateSource::new(Vec::new()));
        let prober = Arc::new(InMemoryAgentProber::new());
        let registry = Arc::new(AgentRegistry::new());
        let reconciler = RegistryReconciler::new(
            Arc::clone(&source),
            Arc::clone(&prober),
            Arc::clone(&registry),
            Arc::new(DefaultClock),
        );
        let router = RoutingService::new(
            Arc::clone(&registry),
            Arc::new(KeywordDecisionBackend::new()),
            Arc::new(DefaultClock),
        );
        Self {
            source,
            prober,
            registry,
            reconciler,
            router,
            candidates: Vec::new(),
            last_decision: None,
        }
    }
}

impl Default for ReconciliationWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ReconciliationWorld {
    ReconciliationWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Builds the descriptor an agent at `candidate` would publish about itself.
pub fn native_descriptor(candidate: &DiscoveryCandidate) -> Result<DiscoveredAgent, eyre::Report> {
    let endpoint = candidate
        .resolve_endpoint()
        .ok_or_else(|| eyre::eyre!("candidate {} has no endpoint", candidate.id()))?;
    let capabilities = candidate
        .tags()
        .iter()
        .map(|tag| {
            Capability::new(tag.as_str(), format!("Handles {tag}"))
                .map(|capability| capability.with_tags([tag.as_str()]))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let agent = Agent::new(
        candidate.id().clone(),
        candidate.display_label(),
        candidate.protocol(),
        endpoint,
        DefaultClock.utc(),
    )?
    .with_capabilities(capabilities);
    Ok(DiscoveredAgent::Rich(agent))
}
