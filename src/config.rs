//! Daemon configuration.
//!
//! Configuration is read from a TOML file with a `[discovery]` table, a
//! `[routing]` table and any number of `[[candidates]]`. A missing file
//! yields the defaults. Selected settings can be overridden from the
//! environment with `SWITCHBOARD_*` variables.

use crate::discovery::domain::{
    AgentDomainError, AgentEndpoint, AgentProtocol, CandidateLocation, DEFAULT_MAX_FAILURES,
    DiscoveryCandidate, EvictionPolicy,
};
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Environment variable overriding `discovery.interval_secs`.
pub const ENV_DISCOVERY_INTERVAL_SECS: &str = "SWITCHBOARD_DISCOVERY_INTERVAL_SECS";
/// Environment variable overriding `discovery.max_failures`.
pub const ENV_MAX_FAILURES: &str = "SWITCHBOARD_MAX_FAILURES";
/// Environment variable overriding `discovery.stale_window_secs`.
pub const ENV_STALE_WINDOW_SECS: &str = "SWITCHBOARD_STALE_WINDOW_SECS";
/// Environment variable overriding `routing.timeout_secs`.
pub const ENV_ROUTING_TIMEOUT_SECS: &str = "SWITCHBOARD_ROUTING_TIMEOUT_SECS";

/// Smallest accepted discovery interval, in seconds.
pub const MIN_DISCOVERY_INTERVAL_SECS: u64 = 10;

/// Errors raised while loading or validating configuration.
///
/// These are the only fatal errors in the daemon.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),

    /// A candidate entry is invalid.
    #[error("invalid candidate '{name}': {reason}")]
    InvalidCandidate {
        /// Candidate name as written.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A setting is out of range or an override is not a number.
    #[error("invalid setting '{key}': {reason}")]
    InvalidSetting {
        /// Setting or environment variable name.
        key: String,
        /// What is wrong with it.
        reason: String,
    },
}

impl ConfigError {
    fn setting(key: &str, reason: impl Into<String>) -> Self {
        Self::InvalidSetting {
            key: key.to_owned(),
            reason: reason.into(),
        }
    }

    fn candidate(name: &str, reason: impl ToString) -> Self {
        Self::InvalidCandidate {
            name: name.to_owned(),
            reason: reason.to_string(),
        }
    }
}

// ── Root ────────────────────────────────────────────────────────────

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SwitchboardConfig {
    /// Discovery loop settings.
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    /// Routing settings.
    #[serde(default)]
    pub routing: RoutingConfig,
    /// Locations probed for agents.
    #[serde(default)]
    pub candidates: Vec<CandidateConfig>,
}

/// Discovery loop settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiscoveryConfig {
    /// Seconds between cycles; at least ten.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Per-request timeout for discovery calls.
    #[serde(default = "default_discovery_timeout_secs")]
    pub discovery_timeout_secs: u64,
    /// Per-request timeout for liveness probes.
    #[serde(default = "default_health_timeout_secs")]
    pub health_timeout_secs: u64,
    /// Upper bound on probing one candidate, across all its requests.
    #[serde(default = "default_candidate_timeout_secs")]
    pub candidate_timeout_secs: u64,
    /// Consecutive failed cycles before an agent is evicted.
    #[serde(default = "default_max_failures")]
    pub max_failures: u32,
    /// Seconds without a healthy cycle before an agent is evicted.
    #[serde(default = "default_stale_window_secs")]
    pub stale_window_secs: u64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            discovery_timeout_secs: default_discovery_timeout_secs(),
            health_timeout_secs: default_health_timeout_secs(),
            candidate_timeout_secs: default_candidate_timeout_secs(),
            max_failures: default_max_failures(),
            stale_window_secs: default_stale_window_secs(),
        }
    }
}

/// Routing settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    /// Seconds allowed for the decision backend.
    #[serde(default = "default_routing_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_routing_timeout_secs(),
        }
    }
}

/// One `[[candidates]]` entry.
///
/// Exactly one of `endpoints` or `host` must be given. Every endpoint becomes its own
/// discovery candidate sharing the entry's name, so the first reachable one
/// wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CandidateConfig {
    /// Stable name; the agent identifier is derived from it.
    pub name: String,
    /// Declared dialect; unrecognised values use the generic strategy.
    #[serde(default)]
    pub protocol: Option<String>,
    /// Base URLs, in priority order.
    #[serde(default)]
    pub endpoints: Vec<String>,
    /// Host name, used when no endpoints are given.
    #[serde(default)]
    pub host: Option<String>,
    /// Port for `host`.
    #[serde(default)]
    pub port: Option<u16>,
    /// Name used when the agent does not advertise one.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Capability hints.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Declared agent type.
    #[serde(default)]
    pub agent_type: Option<String>,
    /// Declared version.
    #[serde(default)]
    pub version: Option<String>,
}

impl CandidateConfig {
    fn to_candidates(&self) -> Result<Vec<DiscoveryCandidate>, ConfigError> {
        if !self.endpoints.is_empty() && (self.host.is_some() || self.port.is_some()) {
            return Err(ConfigError::candidate(
                &self.name,
                "endpoints cannot be combined with host or port",
            ));
        }
        let protocol = AgentProtocol::from_declared(self.protocol.as_deref().unwrap_or_default());
        let locations = if self.endpoints.is_empty() {
            let host = self
                .host
                .as_ref()
                .ok_or_else(|| ConfigError::candidate(&self.name, "either endpoints or host is required"))?;
            vec![CandidateLocation::Host {
                host: host.clone(),
                port: self.port,
            }]
        } else {
            self.endpoints
                .iter()
                .map(|endpoint| AgentEndpoint::new(endpoint.as_str()).map(CandidateLocation::Endpoint))
                .collect::<Result<Vec<_>, AgentDomainError>>()
                .map_err(|err| ConfigError::candidate(&self.name, err))?
        };

        locations
            .into_iter()
            .map(|location| {
                DiscoveryCandidate::new(self.name.as_str(), protocol, location)
                    .map(|candidate| {
                        candidate
                            .with_display_name(self.display_name.clone())
                            .with_tags(&self.tags)
                            .with_agent_type(self.agent_type.clone())
                            .with_version(self.version.clone())
                    })
                    .map_err(|err| ConfigError::candidate(&self.name, err))
            })
            .collect()
    }
}

// ── Loading ─────────────────────────────────────────────────────────

impl SwitchboardConfig {
    /// Loads configuration from `path`, falling back to the defaults when the
    /// file does not exist.
    ///
    /// The result is not validated; see [`SwitchboardConfig::validate`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read and
    /// [`ConfigError::Toml`] when it does not parse.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = match tokio::fs::read_to_string(path.as_ref()).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => return Err(ConfigError::Io(err)),
        };
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] when the text does not parse.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Applies the process environment's `SWITCHBOARD_*` overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSetting`] when an override is not a
    /// number.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides read through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSetting`] when an override is not a
    /// number.
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(value) = parse_override::<u64>(&lookup, ENV_DISCOVERY_INTERVAL_SECS)? {
            self.discovery.interval_secs = value;
        }
        if let Some(value) = parse_override::<u32>(&lookup, ENV_MAX_FAILURES)? {
            self.discovery.max_failures = value;
        }
        if let Some(value) = parse_override::<u64>(&lookup, ENV_STALE_WINDOW_SECS)? {
            self.discovery.stale_window_secs = value;
        }
        if let Some(value) = parse_override::<u64>(&lookup, ENV_ROUTING_TIMEOUT_SECS)? {
            self.routing.timeout_secs = value;
        }
        Ok(self)
    }

    /// Checks ranges and candidate entries.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSetting`] for out-of-range settings and
    /// [`ConfigError::InvalidCandidate`] for malformed candidates.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let discovery = &self.discovery;
        if discovery.interval_secs < MIN_DISCOVERY_INTERVAL_SECS {
            return Err(ConfigError::setting(
                "discovery.interval_secs",
                format!("must be at least {MIN_DISCOVERY_INTERVAL_SECS}"),
            ));
        }
        if discovery.max_failures == 0 {
            return Err(ConfigError::setting("discovery.max_failures", "must be at least 1"));
        }
        for (key, value) in [
            ("discovery.discovery_timeout_secs", discovery.discovery_timeout_secs),
            ("discovery.health_timeout_secs", discovery.health_timeout_secs),
            ("discovery.candidate_timeout_secs", discovery.candidate_timeout_secs),
            ("discovery.stale_window_secs", discovery.stale_window_secs),
            ("routing.timeout_secs", self.routing.timeout_secs),
        ] {
            if value == 0 {
                return Err(ConfigError::setting(key, "must be greater than zero"));
            }
        }
        self.candidates().map(|_| ())
    }

    /// Expands the `[[candidates]]` entries into discovery candidates.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCandidate`] for the first malformed
    /// entry.
    pub fn candidates(&self) -> Result<Vec<DiscoveryCandidate>, ConfigError> {
        let mut expanded = Vec::new();
        for entry in &self.candidates {
            expanded.extend(entry.to_candidates()?);
        }
        Ok(expanded)
    }

    /// Returns the eviction thresholds.
    #[must_use]
    pub fn eviction_policy(&self) -> EvictionPolicy {
        EvictionPolicy::new(
            self.discovery.max_failures,
            Duration::from_secs(self.discovery.stale_window_secs),
        )
    }

    /// Returns the period between discovery cycles.
    #[must_use]
    pub const fn discovery_interval(&self) -> Duration {
        Duration::from_secs(self.discovery.interval_secs)
    }

    /// Returns the per-request discovery timeout.
    #[must_use]
    pub const fn discovery_timeout(&self) -> Duration {
        Duration::from_secs(self.discovery.discovery_timeout_secs)
    }

    /// Returns the per-request liveness probe timeout.
    #[must_use]
    pub const fn health_timeout(&self) -> Duration {
        Duration::from_secs(self.discovery.health_timeout_secs)
    }

    /// Returns the bound on probing one candidate.
    #[must_use]
    pub const fn candidate_timeout(&self) -> Duration {
        Duration::from_secs(self.discovery.candidate_timeout_secs)
    }

    /// Returns the decision backend timeout.
    #[must_use]
    pub const fn routing_timeout(&self) -> Duration {
        Duration::from_secs(self.routing.timeout_secs)
    }
}

fn parse_override<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|err| ConfigError::setting(key, format!("'{raw}' is not a number: {err}")))
        })
        .transpose()
}

// ── Serde defaults ──────────────────────────────────────────────────

const fn default_interval_secs() -> u64 {
    30
}

const fn default_discovery_timeout_secs() -> u64 {
    5
}

const fn default_health_timeout_secs() -> u64 {
    3
}

const fn default_candidate_timeout_secs() -> u64 {
    20
}

const fn default_max_failures() -> u32 {
    DEFAULT_MAX_FAILURES
}

const fn default_stale_window_secs() -> u64 {
    3600
}

const fn default_routing_timeout_secs() -> u64 {
    30
}
