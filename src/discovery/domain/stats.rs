//! Aggregate registry statistics.

use super::{AgentProtocol, AgentStatus, RegistryEntry};
use serde::Serialize;
use std::collections::BTreeMap;

/// Counts of registered agents by status and protocol.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    /// Total number of registered agents.
    pub total: usize,
    /// Agents whose last health check reported healthy.
    pub healthy: usize,
    /// Agents reporting degraded service.
    pub degraded: usize,
    /// Agents that answered with an error or reported unhealthy.
    pub unhealthy: usize,
    /// Agents whose health could not be determined.
    pub unknown: usize,
    /// Agents per protocol; protocols with no agents are omitted.
    pub by_protocol: BTreeMap<AgentProtocol, usize>,
}

impl RegistryStats {
    /// Computes statistics over registry entries.
    #[must_use]
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a RegistryEntry>,
    {
        let mut stats = Self::default();
        for entry in entries {
            let agent = entry.agent();
            stats.total += 1;
            let counter = match agent.status() {
                AgentStatus::Healthy => &mut stats.healthy,
                AgentStatus::Degraded => &mut stats.degraded,
                AgentStatus::Unhealthy => &mut stats.unhealthy,
                AgentStatus::Unknown => &mut stats.unknown,
            };
            *counter += 1;
            *stats.by_protocol.entry(agent.protocol()).or_insert(0) += 1;
        }
        stats
    }
}
