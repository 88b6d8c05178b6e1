//! Port contracts for agent discovery.

mod prober;
mod source;

pub use prober::{AgentProber, ProbeError, ProbeResult};
pub use source::{CandidateSource, CandidateSourceError, CandidateSourceResult};
