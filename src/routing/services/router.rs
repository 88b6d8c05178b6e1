//! Routing service.

use crate::discovery::{domain::Agent, services::AgentRegistry};
use crate::routing::{
    domain::{RouteRequest, RoutingDecision, RoutingFailure, RoutingMetrics},
    ports::{BackendDecision, CandidateSummary, DecisionBackend, DecisionRequest},
};
use mockable::Clock;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Default time allowed for the decision backend.
pub const DEFAULT_ROUTING_TIMEOUT: Duration = Duration::from_secs(30);

/// Routes requests to healthy agents through a [`DecisionBackend`].
pub struct RoutingService<B, C>
where
    B: DecisionBackend,
    C: Clock + Send + Sync,
{
    registry: Arc<AgentRegistry>,
    backend: Arc<B>,
    clock: Arc<C>,
    default_timeout: Duration,
    metrics: Mutex<RoutingMetrics>,
}

impl<B, C> RoutingService<B, C>
where
    B: DecisionBackend,
    C: Clock + Send + Sync,
{
    /// Creates a routing service with the default timeout.
    #[must_use]
    pub fn new(registry: Arc<AgentRegistry>, backend: Arc<B>, clock: Arc<C>) -> Self {
        Self {
            registry,
            backend,
            clock,
            default_timeout: DEFAULT_ROUTING_TIMEOUT,
            metrics: Mutex::new(RoutingMetrics::default()),
        }
    }

    /// Replaces the timeout applied when a request carries none.
    #[must_use]
    pub const fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Returns a copy of the accumulated metrics.
    #[must_use]
    pub fn metrics(&self) -> RoutingMetrics {
        self.metrics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Routes `request`.
    ///
    /// Never fails: backend errors, timeouts, invalid answers and agents that
    /// disappear mid-decision are all reported as failed decisions. A
    /// successful decision records one request against the selected agent.
    pub async fn route(&self, request: RouteRequest) -> RoutingDecision {
        let started = Instant::now();
        let decision = self
            .decide(&request)
            .await
            .with_decision_time(started.elapsed());

        if decision.is_successful()
            && let Some(agent) = decision.selected_agent()
        {
            self.registry.mark_request(agent.id(), &*self.clock);
        }
        self.metrics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record(&decision);

        match decision.failure() {
            None => info!(
                request_id = %request.request_id(),
                agent_id = %decision.selected_agent().map(|agent| agent.id().as_str()).unwrap_or_default(),
                confidence = decision.confidence(),
                "request routed"
            ),
            Some(failure) => warn!(
                request_id = %request.request_id(),
                failure = %failure,
                "request not routed"
            ),
        }
        decision
    }

    async fn decide(&self, request: &RouteRequest) -> RoutingDecision {
        let candidates = ordered_candidates(self.registry.healthy(), request);
        if candidates.is_empty() {
            return RoutingDecision::failed(
                request.request_id(),
                RoutingFailure::NoHealthyAgents,
                "no healthy agents are registered",
            );
        }

        let backend_name = self.backend.name().to_owned();
        let decision_request = DecisionRequest {
            request_id: request.request_id(),
            query: request.query().to_owned(),
            context: request.context().cloned(),
            candidates: candidates.iter().map(CandidateSummary::from).collect(),
        };
        let timeout = request.timeout().unwrap_or(self.default_timeout);
        debug!(
            request_id = %request.request_id(),
            backend = %backend_name,
            candidates = decision_request.candidates.len(),
            "asking decision backend"
        );

        let answer = match tokio::time::timeout(timeout, self.backend.decide(&decision_request)).await {
            Ok(Ok(answer)) => answer,
            Ok(Err(err)) => {
                return RoutingDecision::failed(
                    request.request_id(),
                    RoutingFailure::BackendFailed(err.to_string()),
                    "decision backend failed",
                )
                .with_backend(backend_name);
            }
            Err(_) => {
                return RoutingDecision::failed(
                    request.request_id(),
                    RoutingFailure::BackendTimedOut(timeout),
                    "decision backend did not answer in time",
                )
                .with_backend(backend_name);
            }
        };

        self.validate(request, &candidates, answer)
            .with_backend(backend_name)
    }

    /// Checks the backend's answer against the offered candidates and the
    /// current healthy set.
    fn validate(&self, request: &RouteRequest, offered: &[Agent], answer: BackendDecision) -> RoutingDecision {
        let request_id = request.request_id();
        if !(0.0..=1.0).contains(&answer.confidence) {
            return RoutingDecision::failed(
                request_id,
                RoutingFailure::MalformedDecision(format!(
                    "confidence {} is outside [0, 1]",
                    answer.confidence
                )),
                answer.reasoning,
            );
        }

        let Some(selected_id) = answer.selected else {
            return RoutingDecision::failed(request_id, RoutingFailure::NoAgentSelected, answer.reasoning);
        };

        let healthy = self.registry.healthy();
        let Some(agent) = healthy.iter().find(|agent| agent.id() == &selected_id).cloned() else {
            let failure = if offered.iter().any(|agent| agent.id() == &selected_id) {
                RoutingFailure::AgentNoLongerAvailable(selected_id)
            } else {
                RoutingFailure::MalformedDecision(format!(
                    "selected agent {selected_id} was not offered"
                ))
            };
            return RoutingDecision::failed(request_id, failure, answer.reasoning);
        };

        let alternatives = answer
            .alternatives
            .iter()
            .filter(|id| **id != selected_id)
            .filter_map(|id| healthy.iter().find(|candidate| candidate.id() == id))
            .cloned()
            .collect();
        let decision = RoutingDecision::selected(request_id, agent, answer.reasoning, answer.confidence)
            .with_alternatives(alternatives);
        let Some(caveat) = answer.caveat else {
            return decision;
        };
        decision.with_failure(RoutingFailure::BackendCaveat(caveat))
    }
}

/// Orders healthy agents by the request's hints: the preferred agent first,
/// then agents speaking the preferred protocol, then the rest in registry
/// order.
fn ordered_candidates(mut healthy: Vec<Agent>, request: &RouteRequest) -> Vec<Agent> {
    healthy.sort_by_key(|agent| {
        let preferred_agent = request.preferred_agent() == Some(agent.id());
        let preferred_protocol = request.preferred_protocol() == Some(agent.protocol());
        (!preferred_agent, !preferred_protocol)
    });
    healthy
}
