//! End-to-end discovery and routing against mock agents over HTTP.

use mockable::DefaultClock;
use rstest::rstest;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use switchboard::config::SwitchboardConfig;
use switchboard::discovery::{
    adapters::{
        StaticCandidateSource,
        http::{HttpAgentProber, ProbeClient},
    },
    domain::{AgentId, AgentStatus},
    services::{AgentRegistry, RegistryReconciler},
};
use switchboard::routing::{
    adapters::KeywordDecisionBackend, domain::RouteRequest, services::RoutingService,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

type HttpReconciler = RegistryReconciler<StaticCandidateSource, HttpAgentProber<DefaultClock>, DefaultClock>;

fn reconciler_for(config: &SwitchboardConfig) -> (HttpReconciler, Arc<AgentRegistry>) {
    config.validate().expect("configuration should be valid");
    let registry = Arc::new(AgentRegistry::new());
    let client = ProbeClient::new(config.discovery_timeout(), config.health_timeout())
        .expect("HTTP client should build");
    let reconciler = RegistryReconciler::new(
        Arc::new(StaticCandidateSource::new(
            config.candidates().expect("candidates should expand"),
        )),
        Arc::new(HttpAgentProber::new(client, Arc::new(DefaultClock))),
        Arc::clone(&registry),
        Arc::new(DefaultClock),
    )
    .with_policy(config.eviction_policy())
    .with_candidate_timeout(config.candidate_timeout());
    (reconciler, registry)
}

fn id(value: &str) -> AgentId {
    AgentId::new(value).expect("valid agent id")
}

/// ACP greeter that describes itself natively.
async fn acp_greeter() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/capabilities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Greeter",
            "capabilities": [{"name": "greet", "tags": ["greeting"]}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "healthy"})))
        .mount(&server)
        .await;
    server
}

/// A2A agent that answers pings but publishes no self-description.
async fn silent_a2a() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "alive"})))
        .mount(&server)
        .await;
    server
}

fn config_for(greeter_url: &str, math_url: &str) -> SwitchboardConfig {
    SwitchboardConfig::from_toml_str(&format!(
        r#"
[discovery]
discovery_timeout_secs = 2
health_timeout_secs = 2
candidate_timeout_secs = 10

[[candidates]]
name = "greet"
protocol = "acp"
endpoints = ["{greeter_url}"]
tags = ["greeting"]

[[candidates]]
name = "math"
protocol = "a2a"
endpoints = ["{math_url}"]
tags = ["arithmetic"]
"#
    ))
    .expect("configuration should parse")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn configured_agents_are_discovered_and_routed() {
    let greeter = acp_greeter().await;
    let math = silent_a2a().await;
    let (reconciler, registry) = reconciler_for(&config_for(&greeter.uri(), &math.uri()));

    let report = reconciler.run_cycle().await.expect("cycle should succeed");

    assert_eq!(report.discovered, 2);
    assert_eq!(report.minimal, 1);
    let greet = registry.by_id(&id("acp-greet")).expect("greeter registered");
    assert_eq!(greet.name(), "Greeter");
    assert_eq!(greet.status(), AgentStatus::Healthy);
    let math_agent = registry.by_id(&id("a2a-math")).expect("math agent registered");
    assert!(math_agent.has_capability("arithmetic"));
    assert!(math_agent.is_healthy());

    let routing = RoutingService::new(
        Arc::clone(&registry),
        Arc::new(KeywordDecisionBackend::new()),
        Arc::new(DefaultClock),
    )
    .with_default_timeout(Duration::from_secs(5));
    let decision = routing
        .route(RouteRequest::new("arithmetic please").expect("valid request"))
        .await;

    assert!(decision.is_successful());
    assert_eq!(
        decision.selected_agent().map(|agent| agent.id().clone()),
        Some(id("a2a-math"))
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unreachable_agent_is_registered_from_hints_but_never_routed() {
    let greeter = acp_greeter().await;
    let (reconciler, registry) = reconciler_for(&config_for(&greeter.uri(), "http://127.0.0.1:1"));

    let report = reconciler.run_cycle().await.expect("cycle should succeed");

    assert_eq!(report.minimal, 1);
    let math_agent = registry.by_id(&id("a2a-math")).expect("math agent registered");
    assert_eq!(math_agent.status(), AgentStatus::Unknown);

    let routing = RoutingService::new(
        Arc::clone(&registry),
        Arc::new(KeywordDecisionBackend::new()),
        Arc::new(DefaultClock),
    );
    let decision = routing
        .route(RouteRequest::new("arithmetic").expect("valid request"))
        .await;
    assert!(!decision.is_successful());
    assert!(decision.selected_agent().is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_configuration_yields_empty_registry_and_no_route() {
    let config = SwitchboardConfig::default();
    let (reconciler, registry) = reconciler_for(&config);

    let report = reconciler.run_cycle().await.expect("cycle should succeed");

    assert_eq!(report.discovered, 0);
    assert!(registry.is_empty());
    let routing = RoutingService::new(
        registry,
        Arc::new(KeywordDecisionBackend::new()),
        Arc::new(DefaultClock),
    );
    let decision = routing
        .route(RouteRequest::new("hello").expect("valid request"))
        .await;
    assert!(!decision.is_successful());
}
