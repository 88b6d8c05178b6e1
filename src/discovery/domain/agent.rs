//! Agent descriptor.

use super::{AgentDomainError, AgentEndpoint, AgentId, AgentProtocol, AgentStatus, Capability};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Descriptor of a remote agent as last observed by discovery.
///
/// `status` and `last_health_check` are owned by the reconciler; callers
/// outside the crate can only read them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    id: AgentId,
    name: String,
    protocol: AgentProtocol,
    endpoint: AgentEndpoint,
    capabilities: Vec<Capability>,
    status: AgentStatus,
    metadata: BTreeMap<String, Value>,
    discovered_at: DateTime<Utc>,
    last_health_check: Option<DateTime<Utc>>,
    version: Option<String>,
}

impl Agent {
    /// Creates a descriptor with no capabilities and `Unknown` status.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDomainError::EmptyAgentName`] when the name is empty
    /// after trimming.
    pub fn new(
        id: AgentId,
        name: impl Into<String>,
        protocol: AgentProtocol,
        endpoint: AgentEndpoint,
        discovered_at: DateTime<Utc>,
    ) -> Result<Self, AgentDomainError> {
        let normalized = name.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(AgentDomainError::EmptyAgentName);
        }
        Ok(Self {
            id,
            name: normalized,
            protocol,
            endpoint,
            capabilities: Vec::new(),
            status: AgentStatus::Unknown,
            metadata: BTreeMap::new(),
            discovered_at,
            last_health_check: None,
            version: None,
        })
    }

    /// Replaces the advertised capabilities.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: Vec<Capability>) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Inserts a metadata value, replacing any previous value for `key`.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Sets the self-reported version. Blank versions are ignored.
    #[must_use]
    pub fn with_version(mut self, version: Option<String>) -> Self {
        self.version = version
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());
        self
    }

    /// Sets the initial status.
    #[must_use]
    pub fn with_status(mut self, status: AgentStatus) -> Self {
        self.status = status;
        self
    }

    /// Stores the outcome of a liveness probe.
    pub(crate) fn record_health(&mut self, status: AgentStatus, checked_at: DateTime<Utc>) {
        self.status = status;
        self.last_health_check = Some(checked_at);
    }

    /// Returns the registry key.
    #[must_use]
    pub const fn id(&self) -> &AgentId {
        &self.id
    }

    /// Returns the human-readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the communication dialect.
    #[must_use]
    pub const fn protocol(&self) -> AgentProtocol {
        self.protocol
    }

    /// Returns the base URL.
    #[must_use]
    pub const fn endpoint(&self) -> &AgentEndpoint {
        &self.endpoint
    }

    /// Returns the advertised capabilities.
    #[must_use]
    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    /// Returns the latest known health status.
    #[must_use]
    pub const fn status(&self) -> AgentStatus {
        self.status
    }

    /// Returns dialect-specific metadata.
    #[must_use]
    pub const fn metadata(&self) -> &BTreeMap<String, Value> {
        &self.metadata
    }

    /// Returns when this descriptor was produced.
    #[must_use]
    pub const fn discovered_at(&self) -> DateTime<Utc> {
        self.discovered_at
    }

    /// Returns when health was last probed.
    #[must_use]
    pub const fn last_health_check(&self) -> Option<DateTime<Utc>> {
        self.last_health_check
    }

    /// Returns the self-reported version.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Returns whether the agent is currently healthy.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status == AgentStatus::Healthy
    }

    /// Returns whether any capability matches `token` by name or tag.
    #[must_use]
    pub fn has_capability(&self, token: &str) -> bool {
        self.capabilities
            .iter()
            .any(|capability| capability.matches(token))
    }

    /// Returns the capability names in advertised order.
    #[must_use]
    pub fn capability_names(&self) -> Vec<&str> {
        self.capabilities.iter().map(Capability::name).collect()
    }
}
