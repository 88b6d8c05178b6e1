//! Domain model for agent discovery and the agent registry.
//!
//! The discovery domain models agent descriptors, their advertised
//! capabilities, health status, the candidate locations they are probed at,
//! and the bookkeeping the registry keeps per agent. All network concerns are
//! kept outside the domain boundary.

mod agent;
mod candidate;
mod capability;
mod endpoint;
mod entry;
mod error;
mod eviction;
mod ids;
mod outcome;
mod protocol;
mod stats;
mod status;

pub use agent::Agent;
pub use candidate::{CandidateLocation, DiscoveryCandidate};
pub use capability::{Capability, CapabilityExample};
pub use endpoint::AgentEndpoint;
pub use entry::RegistryEntry;
pub use error::{AgentDomainError, ParseAgentStatusError};
pub use eviction::{DEFAULT_MAX_FAILURES, DEFAULT_STALE_WINDOW, EvictionPolicy, EvictionReason};
pub use ids::AgentId;
pub use outcome::{DiscoveredAgent, FallbackReason};
pub use protocol::AgentProtocol;
pub use stats::RegistryStats;
pub use status::AgentStatus;
