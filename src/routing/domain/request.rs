//! Routing request.

use super::RoutingDomainError;
use crate::discovery::domain::{AgentId, AgentProtocol};
use serde_json::Value;
use std::time::Duration;
use uuid::Uuid;

/// A free-text request to be routed to one agent.
///
/// Preferences are hints: they reorder the candidates offered to the
/// decision backend but never make an unhealthy agent eligible.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    request_id: Uuid,
    query: String,
    context: Option<Value>,
    preferred_protocol: Option<AgentProtocol>,
    preferred_agent: Option<AgentId>,
    timeout: Option<Duration>,
}

impl RouteRequest {
    /// Creates a request with a fresh identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingDomainError::EmptyQuery`] when the query is empty
    /// after trimming.
    pub fn new(query: impl Into<String>) -> Result<Self, RoutingDomainError> {
        let normalized = query.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(RoutingDomainError::EmptyQuery);
        }
        Ok(Self {
            request_id: Uuid::new_v4(),
            query: normalized,
            context: None,
            preferred_protocol: None,
            preferred_agent: None,
            timeout: None,
        })
    }

    /// Replaces the request identifier.
    #[must_use]
    pub const fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }

    /// Attaches caller context forwarded to the decision backend.
    #[must_use]
    pub fn with_context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self
    }

    /// Prefers agents speaking `protocol`.
    #[must_use]
    pub const fn with_preferred_protocol(mut self, protocol: AgentProtocol) -> Self {
        self.preferred_protocol = Some(protocol);
        self
    }

    /// Prefers the agent registered under `agent_id`.
    #[must_use]
    pub fn with_preferred_agent(mut self, agent_id: AgentId) -> Self {
        self.preferred_agent = Some(agent_id);
        self
    }

    /// Overrides the decision timeout.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingDomainError::ZeroTimeout`] for a zero duration.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, RoutingDomainError> {
        if timeout.is_zero() {
            return Err(RoutingDomainError::ZeroTimeout);
        }
        self.timeout = Some(timeout);
        Ok(self)
    }

    /// Returns the request identifier.
    #[must_use]
    pub const fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Returns the trimmed query.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Returns the caller context.
    #[must_use]
    pub const fn context(&self) -> Option<&Value> {
        self.context.as_ref()
    }

    /// Returns the preferred protocol.
    #[must_use]
    pub const fn preferred_protocol(&self) -> Option<AgentProtocol> {
        self.preferred_protocol
    }

    /// Returns the preferred agent.
    #[must_use]
    pub const fn preferred_agent(&self) -> Option<&AgentId> {
        self.preferred_agent.as_ref()
    }

    /// Returns the timeout override.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}
