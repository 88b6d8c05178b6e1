//! Thin `reqwest` wrapper shared by every protocol strategy.

use crate::discovery::ports::{ProbeError, ProbeResult};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Default per-request timeout for discovery calls.
pub const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Default per-request timeout for liveness probes.
pub const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_secs(3);

/// Selects which timeout applies to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbePurpose {
    /// Self-description calls made while discovering an agent.
    Discovery,
    /// Liveness probes.
    Health,
}

/// HTTP status and decoded JSON body of a probe response.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeReply {
    status: u16,
    body: Option<Value>,
}

impl ProbeReply {
    /// Creates a reply.
    #[must_use]
    pub const fn new(status: u16, body: Option<Value>) -> Self {
        Self { status, body }
    }

    /// Returns the HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Returns whether the agent answered `200 OK`.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Returns the JSON body, if it decoded.
    #[must_use]
    pub const fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Returns the lowercase `status` field of the body, if non-empty.
    #[must_use]
    pub fn reported_status(&self) -> Option<String> {
        self.body
            .as_ref()
            .and_then(|body| body.get("status"))
            .and_then(Value::as_str)
            .map(|status| status.trim().to_ascii_lowercase())
            .filter(|status| !status.is_empty())
    }
}

/// HTTP client used to probe agents.
///
/// Connection pooling is shared across strategies; each request carries the
/// timeout matching its [`ProbePurpose`].
#[derive(Debug, Clone)]
pub struct ProbeClient {
    http: Client,
    discovery_timeout: Duration,
    health_timeout: Duration,
}

impl ProbeClient {
    /// Creates a client with the given timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Transport`] when the HTTP client cannot be
    /// initialised.
    pub fn new(discovery_timeout: Duration, health_timeout: Duration) -> ProbeResult<Self> {
        let http = Client::builder()
            .user_agent(concat!("switchboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ProbeError::transport)?;
        Ok(Self {
            http,
            discovery_timeout,
            health_timeout,
        })
    }

    /// Creates a client with the default timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Transport`] when the HTTP client cannot be
    /// initialised.
    pub fn with_defaults() -> ProbeResult<Self> {
        Self::new(DEFAULT_DISCOVERY_TIMEOUT, DEFAULT_HEALTH_TIMEOUT)
    }

    /// Returns the timeout used for `purpose`.
    #[must_use]
    pub const fn timeout(&self, purpose: ProbePurpose) -> Duration {
        match purpose {
            ProbePurpose::Discovery => self.discovery_timeout,
            ProbePurpose::Health => self.health_timeout,
        }
    }

    /// Issues a `GET` request.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Transport`] when the request fails or times out.
    pub async fn get(&self, url: &str, purpose: ProbePurpose) -> ProbeResult<ProbeReply> {
        let request = self.http.get(url).timeout(self.timeout(purpose));
        Self::send(request).await
    }

    /// Issues a `POST` request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Transport`] when the request fails or times out.
    pub async fn post(&self, url: &str, body: &Value, purpose: ProbePurpose) -> ProbeResult<ProbeReply> {
        let request = self.http.post(url).json(body).timeout(self.timeout(purpose));
        Self::send(request).await
    }

    /// Issues a discovery `GET` and returns the JSON body of a `200` reply.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Transport`] on transport failure,
    /// [`ProbeError::UnexpectedStatus`] for non-200 replies, and
    /// [`ProbeError::InvalidBody`] when the body is not JSON.
    pub async fn fetch_json(&self, url: &str) -> ProbeResult<Value> {
        let reply = self.get(url, ProbePurpose::Discovery).await?;
        Self::into_json(url, reply)
    }

    /// Issues a discovery `POST` and returns the JSON body of a `200` reply.
    ///
    /// # Errors
    ///
    /// Same as [`ProbeClient::fetch_json`].
    pub async fn post_json(&self, url: &str, body: &Value) -> ProbeResult<Value> {
        let reply = self.post(url, body, ProbePurpose::Discovery).await?;
        Self::into_json(url, reply)
    }

    async fn send(request: reqwest::RequestBuilder) -> ProbeResult<ProbeReply> {
        let response = request.send().await.map_err(ProbeError::transport)?;
        let status = response.status().as_u16();
        let body = response.json::<Value>().await.ok();
        Ok(ProbeReply::new(status, body))
    }

    fn into_json(url: &str, reply: ProbeReply) -> ProbeResult<Value> {
        if !reply.is_ok() {
            return Err(ProbeError::UnexpectedStatus {
                url: url.to_owned(),
                status: reply.status,
            });
        }
        reply.body.ok_or_else(|| ProbeError::InvalidBody {
            url: url.to_owned(),
        })
    }
}
