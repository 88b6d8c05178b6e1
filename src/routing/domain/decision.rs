//! Outcome of routing a request.

use super::RoutingFailure;
use crate::discovery::domain::Agent;
use std::time::Duration;
use uuid::Uuid;

/// Result of routing one request.
///
/// A decision is successful only when an agent was selected and no failure
/// was recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingDecision {
    request_id: Uuid,
    selected_agent: Option<Agent>,
    reasoning: String,
    confidence: f64,
    alternatives: Vec<Agent>,
    failure: Option<RoutingFailure>,
    decision_time: Duration,
    backend: Option<String>,
}

impl RoutingDecision {
    /// Creates a decision that selected `agent`.
    #[must_use]
    pub fn selected(request_id: Uuid, agent: Agent, reasoning: impl Into<String>, confidence: f64) -> Self {
        Self {
            request_id,
            selected_agent: Some(agent),
            reasoning: reasoning.into(),
            confidence,
            alternatives: Vec::new(),
            failure: None,
            decision_time: Duration::ZERO,
            backend: None,
        }
    }

    /// Creates a failed decision with zero confidence and no agent.
    #[must_use]
    pub fn failed(request_id: Uuid, failure: RoutingFailure, reasoning: impl Into<String>) -> Self {
        Self {
            request_id,
            selected_agent: None,
            reasoning: reasoning.into(),
            confidence: 0.0,
            alternatives: Vec::new(),
            failure: Some(failure),
            decision_time: Duration::ZERO,
            backend: None,
        }
    }

    /// Records a failure while keeping the selected agent, if any.
    #[must_use]
    pub fn with_failure(mut self, failure: RoutingFailure) -> Self {
        self.failure = Some(failure);
        self
    }

    /// Replaces the alternative agents.
    #[must_use]
    pub fn with_alternatives(mut self, alternatives: Vec<Agent>) -> Self {
        self.alternatives = alternatives;
        self
    }

    /// Records how long the decision took.
    #[must_use]
    pub const fn with_decision_time(mut self, decision_time: Duration) -> Self {
        self.decision_time = decision_time;
        self
    }

    /// Records which backend produced the decision.
    #[must_use]
    pub fn with_backend(mut self, backend: impl Into<String>) -> Self {
        self.backend = Some(backend.into());
        self
    }

    /// Returns whether an agent was selected and no failure was recorded.
    #[must_use]
    pub const fn is_successful(&self) -> bool {
        self.selected_agent.is_some() && self.failure.is_none()
    }

    /// Returns the request identifier.
    #[must_use]
    pub const fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Returns the selected agent.
    #[must_use]
    pub const fn selected_agent(&self) -> Option<&Agent> {
        self.selected_agent.as_ref()
    }

    /// Returns the explanation for the decision.
    #[must_use]
    pub fn reasoning(&self) -> &str {
        &self.reasoning
    }

    /// Returns the confidence in `[0, 1]`.
    #[must_use]
    pub const fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Returns other agents that could have handled the request.
    #[must_use]
    pub fn alternatives(&self) -> &[Agent] {
        &self.alternatives
    }

    /// Returns the failure, if any.
    #[must_use]
    pub const fn failure(&self) -> Option<&RoutingFailure> {
        self.failure.as_ref()
    }

    /// Returns how long the decision took.
    #[must_use]
    pub const fn decision_time(&self) -> Duration {
        self.decision_time
    }

    /// Returns the name of the backend that produced the decision.
    #[must_use]
    pub fn backend(&self) -> Option<&str> {
        self.backend.as_deref()
    }
}
