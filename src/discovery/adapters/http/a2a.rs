//! Agent-to-Agent protocol dialect.

use super::{
    client::{ProbeClient, ProbePurpose},
    descriptor::{
        advertised_name, array_field, example_field, name_or_unknown, schema_field, string_capability,
        tag_field, text_field,
    },
    fallback::base_agent,
    health::{self, status_from_reply},
    strategy::NativeOutcome,
};
use crate::discovery::{
    domain::{Agent, AgentEndpoint, AgentStatus, Capability, DiscoveryCandidate, FallbackReason},
    ports::{ProbeError, ProbeResult},
};
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use tracing::debug;

/// Self-description methods, tried in order.
#[derive(Debug, Clone, Copy)]
enum DescribeMethod {
    AgentInfo,
    Query,
    Capabilities,
    Root,
}

impl DescribeMethod {
    const ALL: [Self; 4] = [Self::AgentInfo, Self::Query, Self::Capabilities, Self::Root];

    async fn fetch(self, client: &ProbeClient, endpoint: &AgentEndpoint) -> ProbeResult<Value> {
        match self {
            Self::AgentInfo => client.fetch_json(&endpoint.join("agent-info")).await,
            Self::Query => {
                client
                    .post_json(&endpoint.join("query"), &json!({"action": "describe_agent"}))
                    .await
            }
            Self::Capabilities => client.fetch_json(&endpoint.join("capabilities")).await,
            Self::Root => client.fetch_json(&endpoint.join("")).await,
        }
    }

    /// Returns whether `document` is usable as a self-description.
    fn accepts(self, document: &Value) -> bool {
        match self {
            Self::Root => ["agent_id", "services", "supported_actions"]
                .iter()
                .any(|key| document.get(key).is_some()),
            Self::AgentInfo | Self::Query | Self::Capabilities => document.is_object(),
        }
    }
}

pub(super) async fn discover(
    client: &ProbeClient,
    candidate: &DiscoveryCandidate,
    endpoint: &AgentEndpoint,
    now: DateTime<Utc>,
) -> ProbeResult<NativeOutcome> {
    let info = match query_agent(client, candidate, endpoint).await {
        Ok(info) => info,
        Err(reason) => return Ok(NativeOutcome::Unavailable(reason)),
    };

    let name = advertised_name(&info).unwrap_or_else(|| candidate.display_label());
    let agent = base_agent(candidate, endpoint.clone(), name, now)?
        .with_capabilities(parse_capabilities(&info))
        .with_metadata(
            "a2a_version",
            info.get("protocol_version").cloned().unwrap_or_else(|| "1.0".into()),
        )
        .with_metadata(
            "peer_discovery",
            info.get("supports_peer_discovery")
                .and_then(Value::as_bool)
                .unwrap_or(true),
        )
        .with_metadata(
            "message_formats",
            info.get("message_formats")
                .cloned()
                .unwrap_or_else(|| json!(["json"])),
        )
        .with_metadata("discovery_method", "a2a_native");
    Ok(NativeOutcome::Described(agent))
}

/// Tries each self-description method in turn and returns the first
/// document.
///
/// When every method fails, the reason records whether the agent answered at
/// all.
async fn query_agent(
    client: &ProbeClient,
    candidate: &DiscoveryCandidate,
    endpoint: &AgentEndpoint,
) -> Result<Value, FallbackReason> {
    let mut answered = false;
    for method in DescribeMethod::ALL {
        match method.fetch(client, endpoint).await {
            Ok(document) if method.accepts(&document) => return Ok(document),
            Ok(_) => answered = true,
            Err(err) => {
                debug!(candidate = %candidate.id(), method = ?method, error = %err, "A2A discovery attempt failed");
                answered |= !matches!(err, ProbeError::Transport(_));
            }
        }
    }

    if answered {
        Err(FallbackReason::DescriptorUnrecognised)
    } else {
        Err(FallbackReason::NativeProbesFailed)
    }
}

pub(super) async fn health_check(client: &ProbeClient, agent: &Agent, now: DateTime<Utc>) -> AgentStatus {
    let ping = json!({
        "from": "switchboard",
        "type": "health_check",
        "timestamp": now.to_rfc3339(),
    });
    match client
        .post(&agent.endpoint().join("ping"), &ping, ProbePurpose::Health)
        .await
    {
        Ok(reply) => status_from_reply(&reply, status_extension),
        Err(err) => {
            debug!(agent_id = %agent.id(), error = %err, "A2A ping failed, trying health endpoint");
            health::probe_chain(client, agent, &["health"], health::no_extension).await
        }
    }
}

fn status_extension(reported: &str) -> Option<AgentStatus> {
    match reported {
        "alive" | "active" | "ready" => Some(AgentStatus::Healthy),
        "busy" => Some(AgentStatus::Degraded),
        "dead" | "inactive" => Some(AgentStatus::Unhealthy),
        _ => None,
    }
}

/// Parses `services`, `supported_actions` and `capabilities`, in that order.
fn parse_capabilities(info: &Value) -> Vec<Capability> {
    let services = array_field(info, "services").iter().filter_map(|entry| match entry {
        Value::Object(object) => Capability::new(
            name_or_unknown(object),
            text_field(object, "description").unwrap_or_default(),
        )
        .ok()
        .map(|capability| {
            capability
                .with_input_schema(schema_field(object, &["input_format"]))
                .with_output_schema(schema_field(object, &["output_format"]))
                .with_examples(example_field(object))
                .with_tags(["a2a", "service"])
                .with_tags(tag_field(object))
        }),
        Value::String(name) => {
            string_capability(name, format!("A2A service: {name}"), &["a2a", "service"])
        }
        _ => None,
    });

    let actions = array_field(info, "supported_actions")
        .iter()
        .filter_map(|entry| match entry {
            Value::Object(object) => {
                let name = name_or_unknown(object);
                let description = text_field(object, "description")
                    .map_or_else(|| format!("Action: {name}"), str::to_owned);
                Capability::new(name, description).ok().map(|capability| {
                    capability
                        .with_input_schema(schema_field(object, &["parameters"]))
                        .with_output_schema(schema_field(object, &["response"]))
                        .with_tags(["a2a", "action"])
                })
            }
            Value::String(name) => {
                string_capability(name, format!("A2A action: {name}"), &["a2a", "action"])
            }
            _ => None,
        });

    let declared = array_field(info, "capabilities")
        .iter()
        .filter_map(|entry| match entry {
            Value::Object(object) => Capability::new(
                name_or_unknown(object),
                text_field(object, "description").unwrap_or_default(),
            )
            .ok()
            .map(|capability| {
                capability
                    .with_input_schema(schema_field(object, &["input_schema"]))
                    .with_output_schema(schema_field(object, &["output_schema"]))
                    .with_examples(example_field(object))
                    .with_tags(["a2a"])
                    .with_tags(tag_field(object))
            }),
            Value::String(name) => {
                string_capability(name, format!("A2A capability: {name}"), &["a2a"])
            }
            _ => None,
        });

    services.chain(actions).chain(declared).collect()
}
