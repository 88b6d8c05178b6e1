//! Error types for discovery domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing discovery domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AgentDomainError {
    /// The agent identifier is empty after trimming.
    #[error("agent identifier must not be empty")]
    EmptyAgentId,

    /// The stable name used to derive an agent identifier is empty.
    #[error("agent stable name must not be empty")]
    EmptyStableName,

    /// The human-readable agent name is empty after trimming.
    #[error("agent name must not be empty")]
    EmptyAgentName,

    /// A capability name is empty after trimming.
    #[error("capability name must not be empty")]
    EmptyCapabilityName,

    /// The agent endpoint is empty after trimming.
    #[error("agent endpoint must not be empty")]
    EmptyEndpoint,

    /// The agent endpoint does not have an `http://` or `https://` prefix.
    #[error("agent endpoint '{0}' must start with 'http://' or 'https://'")]
    InvalidEndpoint(String),

    /// A candidate host name is empty after trimming.
    #[error("candidate host must not be empty")]
    EmptyCandidateHost,
}

/// Error returned while parsing an agent status from its canonical form.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown agent status: {0}")]
pub struct ParseAgentStatusError(pub String);
