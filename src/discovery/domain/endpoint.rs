//! Validated agent endpoint URL.

use super::AgentDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Base URL an agent is reachable at.
///
/// Only `http://` and `https://` URLs are accepted. Trailing slashes are
/// removed so that paths can be joined uniformly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentEndpoint(String);

impl AgentEndpoint {
    /// Creates a validated endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDomainError::EmptyEndpoint`] when the value is blank, or
    /// [`AgentDomainError::InvalidEndpoint`] when it is not an HTTP(S) URL.
    pub fn new(value: impl Into<String>) -> Result<Self, AgentDomainError> {
        let raw = value.into();
        let normalized = raw.trim().trim_end_matches('/');
        if normalized.is_empty() {
            return Err(AgentDomainError::EmptyEndpoint);
        }

        let authority = normalized
            .strip_prefix("http://")
            .or_else(|| normalized.strip_prefix("https://"));
        match authority {
            Some(rest) if !rest.is_empty() => Ok(Self(normalized.to_owned())),
            _ => Err(AgentDomainError::InvalidEndpoint(raw.trim().to_owned())),
        }
    }

    /// Builds the endpoint for an `http://host:port` location.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDomainError::EmptyCandidateHost`] when `host` is blank.
    pub fn from_host_port(host: &str, port: u16) -> Result<Self, AgentDomainError> {
        let trimmed = host.trim();
        if trimmed.is_empty() {
            return Err(AgentDomainError::EmptyCandidateHost);
        }
        Self::new(format!("http://{trimmed}:{port}"))
    }

    /// Returns the base URL without a trailing slash.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the URL of `path` below this endpoint.
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        format!("{}/{}", self.0, path.trim_start_matches('/'))
    }
}

impl fmt::Display for AgentEndpoint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}
