//! Probe port for discovering and health-checking remote agents.

use crate::discovery::domain::{Agent, AgentDomainError, AgentStatus, DiscoveredAgent, DiscoveryCandidate};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for probe operations.
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Dialect-aware contract for talking to candidate agents.
#[async_trait]
pub trait AgentProber: Send + Sync {
    /// Probes a candidate location.
    ///
    /// Returns `Ok(None)` when nothing can be discovered there, for example
    /// when the location cannot be resolved to a URL.
    async fn discover(&self, candidate: &DiscoveryCandidate) -> ProbeResult<Option<DiscoveredAgent>>;

    /// Runs a single liveness probe.
    ///
    /// Probe failures are folded into the returned status; this method never
    /// fails.
    async fn health_check(&self, agent: &Agent) -> AgentStatus;
}

/// Errors raised while probing a candidate.
///
/// These errors are logged by the reconciler and otherwise treated as "no
/// agent found"; they never abort a cycle.
#[derive(Debug, Clone, Error)]
pub enum ProbeError {
    /// The request could not be sent or the connection failed.
    #[error("probe transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),

    /// The agent answered with an unexpected HTTP status.
    #[error("probe of {url} returned HTTP {status}")]
    UnexpectedStatus {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The agent answered with a body that could not be interpreted.
    #[error("probe of {url} returned an unreadable body")]
    InvalidBody {
        /// Requested URL.
        url: String,
    },

    /// The self-description produced an invalid descriptor.
    #[error(transparent)]
    Descriptor(#[from] AgentDomainError),
}

impl ProbeError {
    /// Wraps a transport-level error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
