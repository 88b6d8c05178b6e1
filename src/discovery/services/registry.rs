//! Shared agent registry with copy-on-write snapshots.

use crate::discovery::domain::{
    Agent, AgentId, AgentProtocol, RegistryEntry, RegistryStats,
};
use mockable::Clock;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

type Snapshot = Arc<BTreeMap<AgentId, RegistryEntry>>;

/// Registry of discovered agents, keyed by [`AgentId`].
///
/// The registry is written by a single reconciler and read by any number of
/// callers. Reads clone the current snapshot pointer and never hold the lock
/// while filtering. A reconciliation cycle publishes its result by swapping
/// the snapshot in one assignment.
#[derive(Debug, Default)]
pub struct AgentRegistry {
    snapshot: RwLock<Snapshot>,
}

impl AgentRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every registered agent, ordered by identifier.
    #[must_use]
    pub fn all(&self) -> Vec<Agent> {
        self.collect_agents(|_| true)
    }

    /// Returns the agents whose last health check reported healthy.
    #[must_use]
    pub fn healthy(&self) -> Vec<Agent> {
        self.collect_agents(Agent::is_healthy)
    }

    /// Returns the agents speaking `protocol`.
    #[must_use]
    pub fn by_protocol(&self, protocol: AgentProtocol) -> Vec<Agent> {
        self.collect_agents(|agent| agent.protocol() == protocol)
    }

    /// Returns the agent registered under `id`.
    #[must_use]
    pub fn by_id(&self, id: &AgentId) -> Option<Agent> {
        self.current().get(id).map(|entry| entry.agent().clone())
    }

    /// Returns the agents with a capability named or tagged `token`.
    ///
    /// Matching is case-insensitive.
    #[must_use]
    pub fn by_capability(&self, token: &str) -> Vec<Agent> {
        self.collect_agents(|agent| agent.has_capability(token))
    }

    /// Returns the registry entry for `id`.
    #[must_use]
    pub fn entry(&self, id: &AgentId) -> Option<RegistryEntry> {
        self.current().get(id).cloned()
    }

    /// Returns every registry entry, ordered by identifier.
    #[must_use]
    pub fn entries(&self) -> Vec<RegistryEntry> {
        self.current().values().cloned().collect()
    }

    /// Records that a request was routed to `id`.
    ///
    /// Returns `false` without changing anything when `id` is not registered.
    pub fn mark_request(&self, id: &AgentId, clock: &impl Clock) -> bool {
        let mut guard = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
        if !guard.contains_key(id) {
            return false;
        }
        if let Some(entry) = Arc::make_mut(&mut *guard).get_mut(id) {
            entry.mark_request(clock.utc());
            return true;
        }
        false
    }

    /// Returns aggregate counts by status and protocol.
    #[must_use]
    pub fn stats(&self) -> RegistryStats {
        RegistryStats::from_entries(self.current().values())
    }

    /// Returns the number of registered agents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.current().len()
    }

    /// Returns whether no agents are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current().is_empty()
    }

    /// Returns the current snapshot.
    pub(crate) fn current(&self) -> Snapshot {
        Arc::clone(&*self.snapshot.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Publishes `next` as the new snapshot.
    ///
    /// Usage recorded through [`AgentRegistry::mark_request`] after `next` was
    /// derived from an earlier snapshot is carried over.
    pub(crate) fn replace(&self, mut next: BTreeMap<AgentId, RegistryEntry>) {
        let mut guard = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
        for (id, entry) in &mut next {
            if let Some(published) = guard.get(id) {
                entry.carry_usage_from(published);
            }
        }
        *guard = Arc::new(next);
    }

    fn collect_agents(&self, predicate: impl Fn(&Agent) -> bool) -> Vec<Agent> {
        self.current()
            .values()
            .map(RegistryEntry::agent)
            .filter(|agent| predicate(agent))
            .cloned()
            .collect()
    }
}
