//! Network locations probed during discovery.

use super::{AgentDomainError, AgentEndpoint, AgentId, AgentProtocol};
use serde::{Deserialize, Serialize};

/// Where a candidate agent may be reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateLocation {
    /// Explicit base URL.
    Endpoint(AgentEndpoint),
    /// Host name with an optional port.
    Host {
        /// Host name or address.
        host: String,
        /// Port, if known.
        port: Option<u16>,
    },
}

/// A network location that may host an agent, plus the static hints declared
/// for it.
///
/// The candidate identifier is derived up front from the protocol and stable
/// name, so every location configured for the same agent yields the same
/// registry key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryCandidate {
    id: AgentId,
    stable_name: String,
    protocol: AgentProtocol,
    location: CandidateLocation,
    display_name: Option<String>,
    tags: Vec<String>,
    agent_type: Option<String>,
    version: Option<String>,
}

impl DiscoveryCandidate {
    /// Creates a candidate without hints.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDomainError::EmptyStableName`] when the stable name is
    /// blank, or [`AgentDomainError::EmptyCandidateHost`] for a blank host.
    pub fn new(
        stable_name: impl Into<String>,
        protocol: AgentProtocol,
        location: CandidateLocation,
    ) -> Result<Self, AgentDomainError> {
        let name = stable_name.into().trim().to_lowercase();
        let id = AgentId::derive(protocol, &name)?;
        let normalized_location = match location {
            CandidateLocation::Host { host, port } => {
                let trimmed = host.trim();
                if trimmed.is_empty() {
                    return Err(AgentDomainError::EmptyCandidateHost);
                }
                CandidateLocation::Host {
                    host: trimmed.to_owned(),
                    port,
                }
            }
            endpoint @ CandidateLocation::Endpoint(_) => endpoint,
        };
        Ok(Self {
            id,
            stable_name: name,
            protocol,
            location: normalized_location,
            display_name: None,
            tags: Vec::new(),
            agent_type: None,
            version: None,
        })
    }

    /// Sets the display name used for agents built from hints.
    #[must_use]
    pub fn with_display_name(mut self, display_name: Option<String>) -> Self {
        self.display_name = non_blank(display_name);
        self
    }

    /// Sets the declared tags. Tags are trimmed and lowercased, blanks and
    /// duplicates are dropped, and declaration order is kept.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for tag in tags {
            let value = tag.as_ref().trim().to_lowercase();
            if !value.is_empty() && !normalized.contains(&value) {
                normalized.push(value);
            }
        }
        self.tags = normalized;
        self
    }

    /// Sets the declared agent type.
    #[must_use]
    pub fn with_agent_type(mut self, agent_type: Option<String>) -> Self {
        self.agent_type = non_blank(agent_type).map(|value| value.to_lowercase());
        self
    }

    /// Sets the declared version.
    #[must_use]
    pub fn with_version(mut self, version: Option<String>) -> Self {
        self.version = non_blank(version);
        self
    }

    /// Returns the identifier any agent found here will be registered under.
    #[must_use]
    pub const fn id(&self) -> &AgentId {
        &self.id
    }

    /// Returns the normalized stable name.
    #[must_use]
    pub fn stable_name(&self) -> &str {
        &self.stable_name
    }

    /// Returns the declared protocol.
    #[must_use]
    pub const fn protocol(&self) -> AgentProtocol {
        self.protocol
    }

    /// Returns the network location.
    #[must_use]
    pub const fn location(&self) -> &CandidateLocation {
        &self.location
    }

    /// Returns the declared tags in declaration order.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns the declared agent type.
    #[must_use]
    pub fn agent_type(&self) -> Option<&str> {
        self.agent_type.as_deref()
    }

    /// Returns the declared version.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Returns the display name, falling back to the stable name.
    #[must_use]
    pub fn display_label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.stable_name)
    }

    /// Resolves the base URL to probe.
    ///
    /// Returns `None` for a host without a port.
    #[must_use]
    pub fn resolve_endpoint(&self) -> Option<AgentEndpoint> {
        match &self.location {
            CandidateLocation::Endpoint(endpoint) => Some(endpoint.clone()),
            CandidateLocation::Host { host, port } => port
                .and_then(|value| AgentEndpoint::from_host_port(host, value).ok()),
        }
    }

    /// Returns a printable form of the location, used in logs and as a key
    /// for scripted probes.
    #[must_use]
    pub fn location_label(&self) -> String {
        match &self.location {
            CandidateLocation::Endpoint(endpoint) => endpoint.as_str().to_owned(),
            CandidateLocation::Host {
                host,
                port: Some(port),
            } => format!("{host}:{port}"),
            CandidateLocation::Host { host, port: None } => host.clone(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}
