//! Background lifecycle for periodic discovery.

use super::{CycleReport, ReconcileError, RegistryReconciler};
use crate::discovery::ports::{AgentProber, CandidateSource};
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Default period between discovery cycles.
pub const DEFAULT_DISCOVERY_INTERVAL: Duration = Duration::from_secs(30);

const MIN_INTERVAL: Duration = Duration::from_millis(1);

struct RunningLoop {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Drives a [`RegistryReconciler`] on a fixed period.
///
/// [`DiscoveryService::start`] runs one cycle eagerly and then spawns the
/// background loop. [`DiscoveryService::stop`] cancels the loop and waits for
/// it; a cycle already in flight completes first. Both calls are idempotent.
pub struct DiscoveryService<S, P, C>
where
    S: CandidateSource + 'static,
    P: AgentProber + 'static,
    C: Clock + Send + Sync + 'static,
{
    reconciler: Arc<RegistryReconciler<S, P, C>>,
    interval: Duration,
    running: Mutex<Option<RunningLoop>>,
}

impl<S, P, C> DiscoveryService<S, P, C>
where
    S: CandidateSource + 'static,
    P: AgentProber + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a stopped service running a cycle every `interval`.
    ///
    /// A zero interval is raised to one millisecond.
    #[must_use]
    pub fn new(reconciler: Arc<RegistryReconciler<S, P, C>>, interval: Duration) -> Self {
        Self {
            reconciler,
            interval: interval.max(MIN_INTERVAL),
            running: Mutex::new(None),
        }
    }

    /// Returns the reconciler driven by this service.
    #[must_use]
    pub const fn reconciler(&self) -> &Arc<RegistryReconciler<S, P, C>> {
        &self.reconciler
    }

    /// Returns the period between cycles.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Runs an eager cycle and starts the background loop.
    ///
    /// Returns `false` when the loop was already running. A failed eager
    /// cycle is logged and does not prevent the loop from starting.
    pub async fn start(&self) -> bool {
        let mut running = self.running.lock().await;
        if running.is_some() {
            debug!("discovery loop already running");
            return false;
        }

        if let Err(err) = self.reconciler.run_cycle().await {
            warn!(error = %err, "initial discovery cycle failed");
        }

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_loop(
            Arc::clone(&self.reconciler),
            self.interval,
            cancel.clone(),
        ));
        *running = Some(RunningLoop { cancel, handle });
        info!(interval_secs = self.interval.as_secs(), "discovery loop started");
        true
    }

    /// Stops the background loop and waits for it to exit.
    ///
    /// Returns `false` when the loop was not running.
    pub async fn stop(&self) -> bool {
        let Some(running_loop) = self.running.lock().await.take() else {
            return false;
        };
        running_loop.cancel.cancel();
        if let Err(err) = running_loop.handle.await {
            warn!(error = %err, "discovery loop ended abnormally");
        }
        info!("discovery loop stopped");
        true
    }

    /// Runs a cycle now, outside the periodic schedule.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError`] when the cycle is aborted.
    pub async fn refresh(&self) -> Result<CycleReport, ReconcileError> {
        self.reconciler.run_cycle().await
    }

    /// Returns whether the background loop is running.
    ///
    /// A loop task that has exited on its own counts as stopped.
    pub async fn is_running(&self) -> bool {
        self.running
            .lock()
            .await
            .as_ref()
            .is_some_and(|running_loop| !running_loop.handle.is_finished())
    }
}

impl<S, P, C> Drop for DiscoveryService<S, P, C>
where
    S: CandidateSource + 'static,
    P: AgentProber + 'static,
    C: Clock + Send + Sync + 'static,
{
    fn drop(&mut self) {
        if let Some(running_loop) = self.running.get_mut().take() {
            running_loop.cancel.cancel();
        }
    }
}

async fn run_loop<S, P, C>(
    reconciler: Arc<RegistryReconciler<S, P, C>>,
    period: Duration,
    cancel: CancellationToken,
) where
    S: CandidateSource,
    P: AgentProber,
    C: Clock + Send + Sync,
{
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {
                if let Err(err) = reconciler.run_cycle().await {
                    debug!(error = %err, "scheduled discovery cycle aborted");
                }
            }
        }
    }
}
