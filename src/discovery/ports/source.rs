//! Source port enumerating discovery candidates.

use crate::discovery::domain::DiscoveryCandidate;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for candidate enumeration.
pub type CandidateSourceResult<T> = Result<T, CandidateSourceError>;

/// Contract for enumerating the locations probed each cycle.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Returns the candidates for the next cycle, in priority order.
    async fn candidates(&self) -> CandidateSourceResult<Vec<DiscoveryCandidate>>;
}

/// Errors returned while enumerating candidates.
#[derive(Debug, Clone, Error)]
pub enum CandidateSourceError {
    /// The candidate source is not reachable.
    #[error("candidate source unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl CandidateSourceError {
    /// Wraps an enumeration failure.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}
