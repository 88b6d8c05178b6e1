//! Registry bookkeeping for a single agent.

use super::Agent;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Registry record wrapping the last known descriptor of an agent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistryEntry {
    agent: Agent,
    last_seen: DateTime<Utc>,
    consecutive_failures: u32,
    request_count: u64,
    last_request: Option<DateTime<Utc>>,
}

impl RegistryEntry {
    /// Creates an entry for a newly discovered agent.
    #[must_use]
    pub const fn new(agent: Agent, seen_at: DateTime<Utc>) -> Self {
        Self {
            agent,
            last_seen: seen_at,
            consecutive_failures: 0,
            request_count: 0,
            last_request: None,
        }
    }

    /// Records a cycle in which the agent was found and reported healthy.
    pub(crate) const fn mark_success(&mut self, seen_at: DateTime<Utc>) {
        self.consecutive_failures = 0;
        self.last_seen = seen_at;
    }

    /// Records a cycle in which the agent was missing or not healthy.
    pub(crate) const fn mark_failure(&mut self) {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
    }

    /// Replaces the descriptor with a fresher one.
    pub(crate) fn replace_agent(&mut self, agent: Agent) {
        self.agent = agent;
    }

    /// Records that a request was routed to the agent.
    pub(crate) const fn mark_request(&mut self, at: DateTime<Utc>) {
        self.request_count = self.request_count.saturating_add(1);
        self.last_request = Some(at);
    }

    /// Copies usage counters from `other`, keeping the most recent values.
    pub(crate) fn carry_usage_from(&mut self, other: &Self) {
        self.request_count = self.request_count.max(other.request_count);
        self.last_request = self.last_request.max(other.last_request);
    }

    /// Returns the last known descriptor.
    #[must_use]
    pub const fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Returns when the agent last completed a healthy cycle.
    #[must_use]
    pub const fn last_seen(&self) -> DateTime<Utc> {
        self.last_seen
    }

    /// Returns the number of consecutive failed cycles.
    #[must_use]
    pub const fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Returns how many requests were routed to the agent.
    #[must_use]
    pub const fn request_count(&self) -> u64 {
        self.request_count
    }

    /// Returns when a request was last routed to the agent.
    #[must_use]
    pub const fn last_request(&self) -> Option<DateTime<Utc>> {
        self.last_request
    }
}
