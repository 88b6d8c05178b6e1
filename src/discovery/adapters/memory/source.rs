//! Mutable in-memory candidate source.

use crate::discovery::{
    domain::DiscoveryCandidate,
    ports::{CandidateSource, CandidateSourceError, CandidateSourceResult},
};
use async_trait::async_trait;
use std::sync::{Arc, PoisonError, RwLock};

/// Candidate source whose contents can change between cycles.
///
/// Clones share state. [`InMemoryCandidateSource::set_unavailable`] makes
/// enumeration fail until candidates are set again.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCandidateSource {
    state: Arc<RwLock<SourceState>>,
}

#[derive(Debug, Default)]
struct SourceState {
    candidates: Vec<DiscoveryCandidate>,
    unavailable: Option<String>,
}

impl InMemoryCandidateSource {
    /// Creates a source over `candidates`.
    #[must_use]
    pub fn new(candidates: Vec<DiscoveryCandidate>) -> Self {
        let source = Self::default();
        source.set_candidates(candidates);
        source
    }

    /// Replaces the candidates and clears any unavailability.
    pub fn set_candidates(&self, candidates: Vec<DiscoveryCandidate>) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.candidates = candidates;
        state.unavailable = None;
    }

    /// Makes enumeration fail with `message`.
    pub fn set_unavailable(&self, message: impl Into<String>) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .unavailable = Some(message.into());
    }
}

#[async_trait]
impl CandidateSource for InMemoryCandidateSource {
    async fn candidates(&self) -> CandidateSourceResult<Vec<DiscoveryCandidate>> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(message) = &state.unavailable {
            return Err(CandidateSourceError::unavailable(std::io::Error::other(
                message.clone(),
            )));
        }
        Ok(state.candidates.clone())
    }
}
