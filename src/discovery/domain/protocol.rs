//! Agent communication dialects.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Communication dialect spoken by a remote agent.
///
/// The set is closed: any declared dialect the registry does not recognise is
/// classified as [`AgentProtocol::Custom`] and probed with the generic
/// strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentProtocol {
    /// Agent Connect Protocol.
    Acp,
    /// Agent-to-Agent protocol.
    A2a,
    /// Model Context Protocol.
    Mcp,
    /// Any other or undeclared dialect.
    Custom,
}

impl AgentProtocol {
    /// Every protocol variant, in display order.
    pub const ALL: [Self; 4] = [Self::Acp, Self::A2a, Self::Mcp, Self::Custom];

    /// Returns the canonical lowercase representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Acp => "acp",
            Self::A2a => "a2a",
            Self::Mcp => "mcp",
            Self::Custom => "custom",
        }
    }

    /// Classifies a declared dialect label.
    ///
    /// Matching is case-insensitive. Unrecognised or empty labels map to
    /// [`AgentProtocol::Custom`].
    #[must_use]
    pub fn from_declared(value: &str) -> Self {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "acp" => Self::Acp,
            "a2a" => Self::A2a,
            "mcp" => Self::Mcp,
            _ => Self::Custom,
        }
    }
}

impl fmt::Display for AgentProtocol {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
