//! HTTP probe adapter for remote agents.
//!
//! [`HttpAgentProber`] implements the [`AgentProber`](crate::discovery::ports::AgentProber)
//! port by dispatching each candidate to a [`ProtocolStrategy`] chosen from
//! its declared dialect. Strategies that cannot reach any dialect-native
//! endpoint degrade to a minimal descriptor built from the candidate's static
//! hints.

mod a2a;
mod acp;
mod client;
mod descriptor;
mod fallback;
mod generic;
mod health;
mod mcp;
mod prober;
mod strategy;

pub use client::{DEFAULT_DISCOVERY_TIMEOUT, DEFAULT_HEALTH_TIMEOUT, ProbeClient, ProbePurpose, ProbeReply};
pub use prober::HttpAgentProber;
pub use strategy::ProtocolStrategy;
