//! Agent health status.

use super::ParseAgentStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Health status of a discovered agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    /// The agent answered its liveness probe and reports itself healthy.
    Healthy,
    /// The agent is reachable but reports reduced service.
    Degraded,
    /// The agent answered with an error or reports itself unhealthy.
    Unhealthy,
    /// Health could not be determined.
    #[default]
    Unknown,
}

impl AgentStatus {
    /// Returns the canonical lowercase representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Degraded => "degraded",
            Self::Unhealthy => "unhealthy",
            Self::Unknown => "unknown",
        }
    }

    /// Maps a self-reported status string onto the shared vocabulary.
    ///
    /// `healthy` maps to [`AgentStatus::Healthy`], `degraded` and `warning` to
    /// [`AgentStatus::Degraded`], `unhealthy` and `error` to
    /// [`AgentStatus::Unhealthy`]. Anything else yields `None` so that each
    /// dialect can apply its own extensions and defaults.
    #[must_use]
    pub fn from_reported(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "healthy" => Some(Self::Healthy),
            "degraded" | "warning" => Some(Self::Degraded),
            "unhealthy" | "error" => Some(Self::Unhealthy),
            _ => None,
        }
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AgentStatus {
    type Error = ParseAgentStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "healthy" => Ok(Self::Healthy),
            "degraded" => Ok(Self::Degraded),
            "unhealthy" => Ok(Self::Unhealthy),
            "unknown" => Ok(Self::Unknown),
            _ => Err(ParseAgentStatusError(value.to_owned())),
        }
    }
}
