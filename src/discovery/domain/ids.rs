//! Identifier types for the discovery domain.

use super::{AgentDomainError, AgentProtocol};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Registry key for a discovered agent.
///
/// Identifiers are derived from the protocol and the agent's stable name, so
/// the same physical agent always maps to the same key across discovery
/// cycles, whichever network location it was reached through.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    /// Creates an identifier from an existing value.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDomainError::EmptyAgentId`] when the value is empty after
    /// trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, AgentDomainError> {
        let normalized = value.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(AgentDomainError::EmptyAgentId);
        }
        Ok(Self(normalized))
    }

    /// Derives the identifier for `stable_name` reached over `protocol`.
    ///
    /// The stable name is trimmed and lowercased, producing identifiers such
    /// as `acp-greeter` or `mcp-filesystem`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDomainError::EmptyStableName`] when the stable name is
    /// empty after trimming.
    pub fn derive(protocol: AgentProtocol, stable_name: &str) -> Result<Self, AgentDomainError> {
        let normalized = stable_name.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(AgentDomainError::EmptyStableName);
        }
        Ok(Self(format!("{}-{normalized}", protocol.as_str())))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for AgentId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}
