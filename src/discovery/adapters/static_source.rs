//! Candidate source backed by a fixed list.

use crate::discovery::{
    domain::DiscoveryCandidate,
    ports::{CandidateSource, CandidateSourceResult},
};
use async_trait::async_trait;

/// Candidate source returning the same candidates every cycle.
///
/// Built from configuration at startup.
#[derive(Debug, Clone, Default)]
pub struct StaticCandidateSource {
    candidates: Vec<DiscoveryCandidate>,
}

impl StaticCandidateSource {
    /// Creates a source over `candidates`, probed in the given order.
    #[must_use]
    pub const fn new(candidates: Vec<DiscoveryCandidate>) -> Self {
        Self { candidates }
    }

    /// Returns the configured candidates.
    #[must_use]
    pub fn as_slice(&self) -> &[DiscoveryCandidate] {
        &self.candidates
    }
}

#[async_trait]
impl CandidateSource for StaticCandidateSource {
    async fn candidates(&self) -> CandidateSourceResult<Vec<DiscoveryCandidate>> {
        Ok(self.candidates.clone())
    }
}
