//! In-memory adapters for discovery ports.

mod prober;
mod source;

pub use prober::InMemoryAgentProber;
pub use source::InMemoryCandidateSource;
