//! Cumulative routing counters.

use super::RoutingDecision;
use crate::discovery::domain::{AgentId, AgentProtocol};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Counters accumulated over every routed request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoutingMetrics {
    /// Requests routed.
    pub total_requests: u64,
    /// Requests that produced a successful decision.
    pub successful_requests: u64,
    /// Requests that produced a failed decision.
    pub failed_requests: u64,
    /// Successful decisions per selected agent.
    pub by_agent: BTreeMap<AgentId, u64>,
    /// Successful decisions per selected agent's protocol.
    pub by_protocol: BTreeMap<AgentProtocol, u64>,
    /// Time spent deciding, summed over every request.
    pub total_decision_time: Duration,
}

impl RoutingMetrics {
    /// Adds `decision` to the counters.
    pub fn record(&mut self, decision: &RoutingDecision) {
        self.total_requests = self.total_requests.saturating_add(1);
        self.total_decision_time = self
            .total_decision_time
            .saturating_add(decision.decision_time());

        match decision.selected_agent() {
            Some(agent) if decision.is_successful() => {
                self.successful_requests = self.successful_requests.saturating_add(1);
                let per_agent = self.by_agent.entry(agent.id().clone()).or_insert(0);
                *per_agent = per_agent.saturating_add(1);
                let per_protocol = self.by_protocol.entry(agent.protocol()).or_insert(0);
                *per_protocol = per_protocol.saturating_add(1);
            }
            _ => self.failed_requests = self.failed_requests.saturating_add(1),
        }
    }

    /// Returns the mean decision time, or `None` before the first request.
    #[must_use]
    pub fn average_decision_time(&self) -> Option<Duration> {
        let count = u32::try_from(self.total_requests).unwrap_or(u32::MAX);
        self.total_decision_time.checked_div(count)
    }

    /// Returns the percentage of successful requests, or `None` before the
    /// first request.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_precision_loss,
        reason = "a success rate is a ratio of counters"
    )]
    pub fn success_rate(&self) -> Option<f64> {
        (self.total_requests > 0)
            .then(|| self.successful_requests as f64 / self.total_requests as f64 * 100.0)
    }
}
