//! Periodic reconciliation of the agent registry against live probes.

use super::AgentRegistry;
use crate::discovery::{
    domain::{AgentId, AgentStatus, DiscoveredAgent, DiscoveryCandidate, EvictionPolicy, EvictionReason, RegistryEntry},
    ports::{AgentProber, CandidateSource, CandidateSourceError},
};
use futures::FutureExt;
use futures::future::join_all;
use mockable::Clock;
use std::collections::BTreeSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Default upper bound on probing a single candidate.
pub const DEFAULT_CANDIDATE_TIMEOUT: Duration = Duration::from_secs(20);

/// Errors that abort a reconciliation cycle.
///
/// An aborted cycle leaves the registry unchanged.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Candidates could not be enumerated.
    #[error(transparent)]
    Source(#[from] CandidateSourceError),
}

/// Summary of one reconciliation cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Agents found this cycle, after deduplication.
    pub discovered: usize,
    /// How many of those were built from static hints.
    pub minimal: usize,
    /// Agents registered for the first time.
    pub added: Vec<AgentId>,
    /// Known agents found again.
    pub refreshed: Vec<AgentId>,
    /// Known agents not found this cycle.
    pub missing: Vec<AgentId>,
    /// Agents removed, with the reason.
    pub evicted: Vec<(AgentId, EvictionReason)>,
}

/// Runs discovery cycles and publishes their result to the registry.
///
/// The reconciler is the only writer of agent health and failure counters.
/// Cycles are serialised: a cycle requested while another is in flight waits
/// for it to finish.
pub struct RegistryReconciler<S, P, C>
where
    S: CandidateSource,
    P: AgentProber,
    C: Clock + Send + Sync,
{
    source: Arc<S>,
    prober: Arc<P>,
    registry: Arc<AgentRegistry>,
    clock: Arc<C>,
    policy: EvictionPolicy,
    candidate_timeout: Duration,
    cycle_lock: Mutex<()>,
}

impl<S, P, C> RegistryReconciler<S, P, C>
where
    S: CandidateSource,
    P: AgentProber,
    C: Clock + Send + Sync,
{
    /// Creates a reconciler with the default eviction policy and candidate
    /// timeout.
    #[must_use]
    pub fn new(source: Arc<S>, prober: Arc<P>, registry: Arc<AgentRegistry>, clock: Arc<C>) -> Self {
        Self {
            source,
            prober,
            registry,
            clock,
            policy: EvictionPolicy::default(),
            candidate_timeout: DEFAULT_CANDIDATE_TIMEOUT,
            cycle_lock: Mutex::new(()),
        }
    }

    /// Replaces the eviction policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: EvictionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replaces the per-candidate probe timeout.
    #[must_use]
    pub const fn with_candidate_timeout(mut self, timeout: Duration) -> Self {
        self.candidate_timeout = timeout;
        self
    }

    /// Returns the registry this reconciler publishes to.
    #[must_use]
    pub const fn registry(&self) -> &Arc<AgentRegistry> {
        &self.registry
    }

    /// Returns the eviction policy.
    #[must_use]
    pub const fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    /// Runs one discovery, health-check, merge and eviction cycle.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::Source`] when candidates cannot be
    /// enumerated. The registry is left untouched in that case.
    pub async fn run_cycle(&self) -> Result<CycleReport, ReconcileError> {
        let _cycle = self.cycle_lock.lock().await;

        let candidates = self.source.candidates().await.inspect_err(|err| {
            warn!(error = %err, "candidate enumeration failed, registry left unchanged");
        })?;

        let discovered = self.discover_all(&candidates).await;
        let minimal = discovered.iter().filter(|found| found.is_minimal()).count();
        let checked = join_all(discovered.into_iter().map(|found| async move {
            let mut agent = found.into_agent();
            let status = AssertUnwindSafe(self.prober.health_check(&agent))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| {
                    warn!(agent_id = %agent.id(), "health check panicked, status unknown");
                    AgentStatus::Unknown
                });
            agent.record_health(status, self.clock.utc());
            agent
        }))
        .await;

        let now = self.clock.utc();
        let mut next = (*self.registry.current()).clone();
        let mut report = CycleReport {
            discovered: checked.len(),
            minimal,
            ..CycleReport::default()
        };

        let mut found_ids = BTreeSet::new();
        for agent in checked {
            let id = agent.id().clone();
            found_ids.insert(id.clone());
            let healthy = agent.is_healthy();
            if let Some(entry) = next.get_mut(&id) {
                entry.replace_agent(agent);
                if healthy {
                    entry.mark_success(now);
                } else {
                    entry.mark_failure();
                }
                report.refreshed.push(id);
            } else {
                next.insert(id.clone(), RegistryEntry::new(agent, now));
                report.added.push(id);
            }
        }

        for (id, entry) in &mut next {
            if !found_ids.contains(id) {
                entry.mark_failure();
                report.missing.push(id.clone());
            }
        }

        next.retain(|id, entry| {
            let Some(reason) = self.policy.eviction_reason(entry, now) else {
                return true;
            };
            info!(
                agent_id = %id,
                reason = %reason,
                consecutive_failures = entry.consecutive_failures(),
                last_seen = %entry.last_seen(),
                "evicting agent"
            );
            report.evicted.push((id.clone(), reason));
            false
        });

        self.registry.replace(next);
        info!(
            discovered = report.discovered,
            minimal = report.minimal,
            added = report.added.len(),
            missing = report.missing.len(),
            evicted = report.evicted.len(),
            registered = self.registry.len(),
            "discovery cycle complete"
        );
        Ok(report)
    }

    /// Probes every candidate concurrently and keeps the first agent found
    /// per identifier, in candidate order.
    ///
    /// A probe that errors, times out or panics only loses its own candidate.
    async fn discover_all(&self, candidates: &[DiscoveryCandidate]) -> Vec<DiscoveredAgent> {
        let probes = candidates.iter().map(|candidate| async move {
            let probe = AssertUnwindSafe(self.prober.discover(candidate)).catch_unwind();
            match tokio::time::timeout(self.candidate_timeout, probe).await {
                Ok(Ok(Ok(Some(found)))) => Some(found),
                Ok(Ok(Ok(None))) => {
                    debug!(candidate = %candidate.id(), location = %candidate.location_label(), "no agent found");
                    None
                }
                Ok(Ok(Err(err))) => {
                    warn!(
                        candidate = %candidate.id(),
                        location = %candidate.location_label(),
                        error = %err,
                        "candidate probe failed"
                    );
                    None
                }
                Ok(Err(_)) => {
                    warn!(
                        candidate = %candidate.id(),
                        location = %candidate.location_label(),
                        "candidate probe panicked"
                    );
                    None
                }
                Err(_) => {
                    warn!(
                        candidate = %candidate.id(),
                        location = %candidate.location_label(),
                        timeout_ms = u64::try_from(self.candidate_timeout.as_millis()).unwrap_or(u64::MAX),
                        "candidate probe timed out"
                    );
                    None
                }
            }
        });

        let mut seen = BTreeSet::new();
        join_all(probes)
            .await
            .into_iter()
            .flatten()
            .filter(|found| seen.insert(found.agent().id().clone()))
            .collect()
    }
}
