//! Shared fixtures for discovery unit tests.

use crate::discovery::{
    adapters::memory::{InMemoryAgentProber, InMemoryCandidateSource},
    domain::{
        Agent, AgentEndpoint, AgentProtocol, CandidateLocation, Capability, DiscoveredAgent,
        DiscoveryCandidate,
    },
    services::{AgentRegistry, RegistryReconciler},
};
use chrono::{DateTime, Duration as ChronoDuration, Local, TimeZone, Utc};
use mockable::Clock;
use std::sync::{Arc, Mutex, PoisonError};

/// Clock whose time only moves when told to.
#[derive(Debug, Clone)]
pub(super) struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub(super) fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub(super) fn advance(&self, step: ChronoDuration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += step;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(
            Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0)
                .single()
                .expect("fixed start time should be valid"),
        )
    }
}

impl Clock for ManualClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub(super) type TestReconciler =
    RegistryReconciler<InMemoryCandidateSource, InMemoryAgentProber, ManualClock>;

/// Reconciler over in-memory adapters with handles kept for scripting.
pub(super) struct Harness {
    pub(super) source: Arc<InMemoryCandidateSource>,
    pub(super) prober: Arc<InMemoryAgentProber>,
    pub(super) registry: Arc<AgentRegistry>,
    pub(super) clock: Arc<ManualClock>,
    pub(super) reconciler: Arc<TestReconciler>,
}

impl Harness {
    pub(super) fn new(candidates: Vec<DiscoveryCandidate>) -> Self {
        Self::configured(candidates, |reconciler| reconciler)
    }

    pub(super) fn configured(
        candidates: Vec<DiscoveryCandidate>,
        configure: impl FnOnce(TestReconciler) -> TestReconciler,
    ) -> Self {
        let source = Arc::new(InMemoryCandidateSource::new(candidates));
        let prober = Arc::new(InMemoryAgentProber::new());
        let registry = Arc::new(AgentRegistry::new());
        let clock = Arc::new(ManualClock::default());
        let reconciler = Arc::new(configure(RegistryReconciler::new(
            Arc::clone(&source),
            Arc::clone(&prober),
            Arc::clone(&registry),
            Arc::clone(&clock),
        )));
        Self {
            source,
            prober,
            registry,
            clock,
            reconciler,
        }
    }
}

pub(super) fn endpoint_candidate(name: &str, protocol: AgentProtocol, url: &str) -> DiscoveryCandidate {
    DiscoveryCandidate::new(
        name,
        protocol,
        CandidateLocation::Endpoint(AgentEndpoint::new(url).expect("valid endpoint")),
    )
    .expect("valid candidate")
}

pub(super) fn agent_for(candidate: &DiscoveryCandidate, tags: &[&str]) -> Agent {
    let endpoint = candidate.resolve_endpoint().expect("candidate should resolve");
    let capability = Capability::new(
        tags.first().copied().unwrap_or("generic"),
        format!("{} capability", candidate.stable_name()),
    )
    .expect("valid capability")
    .with_tags(tags);
    Agent::new(
        candidate.id().clone(),
        candidate.display_label(),
        candidate.protocol(),
        endpoint,
        ManualClock::default().utc(),
    )
    .expect("valid agent")
    .with_capabilities(vec![capability])
}

pub(super) fn rich(candidate: &DiscoveryCandidate, tags: &[&str]) -> DiscoveredAgent {
    DiscoveredAgent::Rich(agent_for(candidate, tags))
}
