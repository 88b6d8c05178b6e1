//! Model Context Protocol dialect.

use super::{
    client::ProbeClient,
    descriptor::{advertised_name, example_field, name_or_unknown, schema_field, tag_field, text_field},
    fallback::base_agent,
    health,
    strategy::NativeOutcome,
};
use crate::discovery::{
    domain::{Agent, AgentEndpoint, AgentStatus, Capability, DiscoveryCandidate, FallbackReason},
    ports::ProbeResult,
};
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use tracing::debug;

pub(super) async fn discover(
    client: &ProbeClient,
    candidate: &DiscoveryCandidate,
    endpoint: &AgentEndpoint,
    now: DateTime<Utc>,
) -> ProbeResult<NativeOutcome> {
    let tools_url = endpoint.join("tools");
    let resources_url = endpoint.join("resources");
    let root_url = endpoint.join("");
    let (tools_doc, resources_doc, server_doc) = futures::join!(
        client.fetch_json(&tools_url),
        client.fetch_json(&resources_url),
        client.fetch_json(&root_url)
    );

    if tools_doc.is_err() && resources_doc.is_err() && server_doc.is_err() {
        debug!(candidate = %candidate.id(), "MCP server exposed no tools, resources or server info");
        return Ok(NativeOutcome::Unavailable(FallbackReason::NativeProbesFailed));
    }

    let tools = listing(tools_doc.ok(), "tools");
    let resources = listing(resources_doc.ok(), "resources");
    let server_info = server_doc.unwrap_or_default();
    let name = advertised_name(&server_info).unwrap_or_else(|| candidate.display_label());

    let agent = base_agent(candidate, endpoint.clone(), name, now)?
        .with_capabilities(parse_capabilities(&tools, &resources))
        .with_metadata(
            "mcp_version",
            server_info.get("version").cloned().unwrap_or_else(|| "unknown".into()),
        )
        .with_metadata("tools_count", tools.len())
        .with_metadata("resources_count", resources.len())
        .with_metadata(
            "supports_streaming",
            server_info
                .get("supports_streaming")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        )
        .with_metadata("discovery_method", "mcp_native");
    Ok(NativeOutcome::Described(agent))
}

pub(super) async fn health_check(client: &ProbeClient, agent: &Agent) -> AgentStatus {
    health::probe_chain(client, agent, &["health", "tools", ""], health::no_extension).await
}

/// Accepts both a bare array and an object wrapping the array under `key`.
fn listing(document: Option<Value>, key: &str) -> Vec<Value> {
    match document {
        Some(Value::Array(items)) => items,
        Some(Value::Object(mut object)) => match object.remove(key) {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

fn parse_capabilities(tools: &[Value], resources: &[Value]) -> Vec<Capability> {
    let tool_capabilities = tools.iter().filter_map(Value::as_object).filter_map(|tool| {
        let name = name_or_unknown(tool);
        let description = text_field(tool, "description")
            .map_or_else(|| format!("MCP tool: {name}"), str::to_owned);
        Capability::new(format!("tool:{name}"), description)
            .ok()
            .map(|capability| {
                capability
                    .with_input_schema(schema_field(tool, &["parameters", "inputSchema"]))
                    .with_output_schema(schema_field(tool, &["returns"]))
                    .with_examples(example_field(tool))
                    .with_tags(["mcp", "tool"])
                    .with_tags(tag_field(tool))
            })
    });

    let resource_capabilities = resources
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|resource| {
            let name = name_or_unknown(resource);
            let description = text_field(resource, "description")
                .map_or_else(|| format!("MCP resource: {name}"), str::to_owned);
            Capability::new(format!("resource:{name}"), description)
                .ok()
                .map(|capability| {
                    capability
                        .with_input_schema(Some(json!({"resource_id": "string"})))
                        .with_output_schema(schema_field(resource, &["schema"]))
                        .with_examples(example_field(resource))
                        .with_tags(["mcp", "resource"])
                        .with_tags(tag_field(resource))
                })
        });

    let mut capabilities: Vec<Capability> = tool_capabilities.chain(resource_capabilities).collect();
    if capabilities.is_empty()
        && let Ok(server) = Capability::new("mcp-server", "MCP server with unknown tools/resources")
    {
        capabilities.push(server.with_tags(["mcp", "generic"]));
    }
    capabilities
}
