//! Two-tier discovery outcome.

use super::Agent;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a probe fell back to a minimal descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// Every dialect-native call failed.
    NativeProbesFailed,
    /// The agent answered but with a descriptor the dialect does not recognise.
    DescriptorUnrecognised,
}

impl FallbackReason {
    /// Returns the canonical representation, stored in agent metadata.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NativeProbesFailed => "native_probes_failed",
            Self::DescriptorUnrecognised => "descriptor_unrecognised",
        }
    }
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Result of probing a candidate that turned out to host an agent.
///
/// `Rich` descriptors come from the agent's own self-description. `Minimal`
/// descriptors are assembled from the static hints configured for the
/// candidate and are registered all the same; the distinction is kept so
/// callers can tell how much of the descriptor to trust.
#[derive(Debug, Clone, PartialEq)]
pub enum DiscoveredAgent {
    /// Descriptor built from dialect-native self-description.
    Rich(Agent),
    /// Descriptor built from static hints only.
    Minimal {
        /// The hint-derived descriptor.
        agent: Agent,
        /// Why native discovery was not used.
        reason: FallbackReason,
    },
}

impl DiscoveredAgent {
    /// Returns the descriptor.
    #[must_use]
    pub const fn agent(&self) -> &Agent {
        match self {
            Self::Rich(agent) | Self::Minimal { agent, .. } => agent,
        }
    }

    /// Consumes the outcome and returns the descriptor.
    #[must_use]
    pub fn into_agent(self) -> Agent {
        match self {
            Self::Rich(agent) | Self::Minimal { agent, .. } => agent,
        }
    }

    /// Returns the fallback reason for minimal descriptors.
    #[must_use]
    pub const fn fallback_reason(&self) -> Option<FallbackReason> {
        match self {
            Self::Rich(_) => None,
            Self::Minimal { reason, .. } => Some(*reason),
        }
    }

    /// Returns whether the descriptor came from static hints.
    #[must_use]
    pub const fn is_minimal(&self) -> bool {
        matches!(self, Self::Minimal { .. })
    }
}
