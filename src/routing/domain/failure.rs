//! Reasons a routing decision did not succeed.

use crate::discovery::domain::AgentId;
use std::time::Duration;
use thiserror::Error;

/// Why a routing decision is not successful.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingFailure {
    /// No healthy agent was registered when the request arrived.
    #[error("no healthy agents available")]
    NoHealthyAgents,

    /// The decision backend declined to pick an agent.
    #[error("no agent selected")]
    NoAgentSelected,

    /// The selected agent left the healthy set before the decision completed.
    #[error("selected agent {0} is no longer available")]
    AgentNoLongerAvailable(AgentId),

    /// The decision backend returned an error.
    #[error("decision backend failed: {0}")]
    BackendFailed(String),

    /// The decision backend did not answer in time.
    #[error("decision backend timed out after {}ms", .0.as_millis())]
    BackendTimedOut(Duration),

    /// The decision backend answered with an invalid decision.
    #[error("malformed decision: {0}")]
    MalformedDecision(String),

    /// The decision backend selected an agent but attached a caveat.
    #[error("decision backend caveat: {0}")]
    BackendCaveat(String),
}
