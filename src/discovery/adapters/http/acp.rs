//! Agent Connect Protocol dialect.

use super::{
    client::{ProbeClient, ProbePurpose},
    descriptor::{
        advertised_name, array_field, example_field, name_or_unknown, schema_field, string_capability,
        tag_field, text_field,
    },
    fallback::base_agent,
    health::status_from_reply,
    strategy::NativeOutcome,
};
use crate::discovery::{
    domain::{Agent, AgentEndpoint, AgentStatus, Capability, DiscoveryCandidate, FallbackReason},
    ports::ProbeResult,
};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;

pub(super) async fn discover(
    client: &ProbeClient,
    candidate: &DiscoveryCandidate,
    endpoint: &AgentEndpoint,
    now: DateTime<Utc>,
) -> ProbeResult<NativeOutcome> {
    let capabilities_url = endpoint.join("capabilities");
    let schema_url = endpoint.join("schema");
    let (capabilities_doc, schema_doc) = futures::join!(
        client.fetch_json(&capabilities_url),
        client.fetch_json(&schema_url)
    );

    if let (Err(capabilities_err), Err(schema_err)) = (&capabilities_doc, &schema_doc) {
        debug!(
            candidate = %candidate.id(),
            capabilities_error = %capabilities_err,
            schema_error = %schema_err,
            "ACP self-description unavailable"
        );
        return Ok(NativeOutcome::Unavailable(FallbackReason::NativeProbesFailed));
    }

    let document = capabilities_doc.unwrap_or_default();
    let schema = schema_doc.unwrap_or_default();
    let name = advertised_name(&document).unwrap_or_else(|| candidate.display_label());

    let agent = base_agent(candidate, endpoint.clone(), name, now)?
        .with_capabilities(parse_capabilities(&document, &schema))
        .with_metadata(
            "acp_version",
            document.get("acp_version").cloned().unwrap_or_else(|| "unknown".into()),
        )
        .with_metadata(
            "auth_required",
            document
                .pointer("/auth/required")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        )
        .with_metadata(
            "streaming_supported",
            document.get("streaming").and_then(Value::as_bool).unwrap_or(false),
        )
        .with_metadata("discovery_method", "acp_native");
    Ok(NativeOutcome::Described(agent))
}

pub(super) async fn health_check(client: &ProbeClient, agent: &Agent) -> AgentStatus {
    let url = agent.endpoint().join("health");
    match client.get(&url, ProbePurpose::Health).await {
        Ok(reply) => status_from_reply(&reply, status_extension),
        Err(err) => {
            debug!(agent_id = %agent.id(), error = %err, "ACP health check failed");
            AgentStatus::Unknown
        }
    }
}

fn status_extension(reported: &str) -> Option<AgentStatus> {
    (reported == "critical").then_some(AgentStatus::Unhealthy)
}

/// Parses `capabilities` entries, which may be objects or bare strings.
///
/// Schemas missing from an entry are taken from the `/schema` document. An
/// agent listing no capabilities but publishing a schema gets one `generic`
/// capability.
fn parse_capabilities(document: &Value, schema: &Value) -> Vec<Capability> {
    let shared_input = schema.get("input_schema").filter(|value| !value.is_null());
    let shared_output = schema.get("output_schema").filter(|value| !value.is_null());

    let mut capabilities: Vec<Capability> = array_field(document, "capabilities")
        .iter()
        .filter_map(|entry| match entry {
            Value::Object(object) => {
                let capability = Capability::new(
                    name_or_unknown(object),
                    text_field(object, "description").unwrap_or_default(),
                )
                .ok()?
                .with_input_schema(schema_field(object, &["input_schema"]).or_else(|| shared_input.cloned()))
                .with_output_schema(schema_field(object, &["output_schema"]).or_else(|| shared_output.cloned()))
                .with_examples(example_field(object))
                .with_tags(["acp"])
                .with_tags(tag_field(object));
                Some(capability)
            }
            Value::String(name) => string_capability(
                name,
                format!("ACP capability: {name}"),
                &["acp", "string-capability"],
            )
            .map(|capability| {
                capability
                    .with_input_schema(shared_input.cloned())
                    .with_output_schema(shared_output.cloned())
            }),
            _ => None,
        })
        .collect();

    let has_schema = schema.as_object().is_some_and(|object| !object.is_empty());
    if capabilities.is_empty()
        && has_schema
        && let Ok(inferred) = Capability::new("generic", "Generic ACP agent capability")
    {
        capabilities.push(
            inferred
                .with_input_schema(shared_input.cloned())
                .with_output_schema(shared_output.cloned())
                .with_tags(["acp", "schema-inferred"]),
        );
    }
    capabilities
}
