//! Decision backend port.

use crate::discovery::domain::{Agent, AgentId, AgentProtocol, AgentStatus, Capability};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Result type for decision backend operations.
pub type DecisionBackendResult<T> = Result<T, DecisionBackendError>;

/// Reasoning component that picks an agent for a query.
#[async_trait]
pub trait DecisionBackend: Send + Sync {
    /// Returns a short name recorded on decisions.
    fn name(&self) -> &str;

    /// Chooses among `request.candidates`.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionBackendError`] when no decision can be produced.
    async fn decide(&self, request: &DecisionRequest) -> DecisionBackendResult<BackendDecision>;
}

/// Errors returned by decision backends.
#[derive(Debug, Clone, Error)]
pub enum DecisionBackendError {
    /// The backend could not be reached.
    #[error("decision backend unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),

    /// The backend refused the request.
    #[error("decision backend rejected the request: {0}")]
    Rejected(String),
}

impl DecisionBackendError {
    /// Wraps a backend failure.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}

/// Capability as presented to a decision backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilitySummary {
    /// Normalized capability name.
    pub name: String,
    /// Capability description.
    pub description: String,
    /// Normalized tags.
    pub tags: Vec<String>,
}

impl From<&Capability> for CapabilitySummary {
    fn from(capability: &Capability) -> Self {
        Self {
            name: capability.name().to_owned(),
            description: capability.description().to_owned(),
            tags: capability.tags().iter().cloned().collect(),
        }
    }
}

/// Agent as presented to a decision backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateSummary {
    /// Registry key.
    pub id: AgentId,
    /// Human-readable name.
    pub name: String,
    /// Communication dialect.
    pub protocol: AgentProtocol,
    /// Health at the time the request was prepared.
    pub status: AgentStatus,
    /// Advertised capabilities.
    pub capabilities: Vec<CapabilitySummary>,
}

impl From<&Agent> for CandidateSummary {
    fn from(agent: &Agent) -> Self {
        Self {
            id: agent.id().clone(),
            name: agent.name().to_owned(),
            protocol: agent.protocol(),
            status: agent.status(),
            capabilities: agent
                .capabilities()
                .iter()
                .map(CapabilitySummary::from)
                .collect(),
        }
    }
}

/// Input handed to a decision backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionRequest {
    /// Request identifier.
    pub request_id: Uuid,
    /// Trimmed query text.
    pub query: String,
    /// Caller context.
    pub context: Option<Value>,
    /// Healthy agents in preference order.
    pub candidates: Vec<CandidateSummary>,
}

/// Answer returned by a decision backend.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendDecision {
    /// Selected agent, if any.
    pub selected: Option<AgentId>,
    /// Confidence; valid decisions lie in `[0, 1]`.
    pub confidence: f64,
    /// Explanation for the choice.
    pub reasoning: String,
    /// Other suitable agents, best first.
    pub alternatives: Vec<AgentId>,
    /// Reservation attached to an otherwise valid selection.
    pub caveat: Option<String>,
}

impl BackendDecision {
    /// Creates a decision selecting `agent_id`.
    #[must_use]
    pub fn select(agent_id: AgentId, confidence: f64, reasoning: impl Into<String>) -> Self {
        Self {
            selected: Some(agent_id),
            confidence,
            reasoning: reasoning.into(),
            alternatives: Vec::new(),
            caveat: None,
        }
    }

    /// Creates a decision that selects nothing.
    #[must_use]
    pub fn decline(reasoning: impl Into<String>) -> Self {
        Self {
            selected: None,
            confidence: 0.0,
            reasoning: reasoning.into(),
            alternatives: Vec::new(),
            caveat: None,
        }
    }

    /// Replaces the alternatives.
    #[must_use]
    pub fn with_alternatives(mut self, alternatives: Vec<AgentId>) -> Self {
        self.alternatives = alternatives;
        self
    }

    /// Attaches a caveat.
    #[must_use]
    pub fn with_caveat(mut self, caveat: impl Into<String>) -> Self {
        self.caveat = Some(caveat.into());
        self
    }
}
