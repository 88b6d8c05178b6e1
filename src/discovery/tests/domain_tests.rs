//! Tests for discovery value types and eviction rules.

use super::support::{ManualClock, agent_for, endpoint_candidate};
use crate::discovery::domain::{
    AgentDomainError, AgentEndpoint, AgentId, AgentProtocol, AgentStatus, CandidateLocation,
    Capability, DiscoveryCandidate, EvictionPolicy, EvictionReason, RegistryEntry, RegistryStats,
};
use chrono::Duration as ChronoDuration;
use mockable::Clock;
use rstest::rstest;
use std::time::Duration;

#[rstest]
#[case(AgentProtocol::Acp, "greeter", "acp-greeter")]
#[case(AgentProtocol::A2a, " Math-Service ", "a2a-math-service")]
#[case(AgentProtocol::Custom, "legacy", "custom-legacy")]
fn agent_id_is_derived_from_protocol_and_stable_name(
    #[case] protocol: AgentProtocol,
    #[case] stable_name: &str,
    #[case] expected: &str,
) {
    let id = AgentId::derive(protocol, stable_name).expect("derivation should succeed");
    assert_eq!(id.as_str(), expected);
}

#[rstest]
fn agent_id_derivation_rejects_blank_names() {
    assert_eq!(
        AgentId::derive(AgentProtocol::Mcp, "   "),
        Err(AgentDomainError::EmptyStableName)
    );
}

#[rstest]
#[case("http://localhost:8080/", "http://localhost:8080")]
#[case("  https://agents.example.com  ", "https://agents.example.com")]
fn endpoint_is_normalised(#[case] raw: &str, #[case] expected: &str) {
    let endpoint = AgentEndpoint::new(raw).expect("endpoint should be valid");
    assert_eq!(endpoint.as_str(), expected);
    assert_eq!(endpoint.join("/health"), format!("{expected}/health"));
}

#[rstest]
#[case("ftp://files.example.com")]
#[case("http://")]
#[case("localhost:8080")]
fn endpoint_rejects_unsupported_schemes(#[case] raw: &str) {
    assert!(matches!(
        AgentEndpoint::new(raw),
        Err(AgentDomainError::InvalidEndpoint(_))
    ));
}

#[rstest]
fn host_without_port_cannot_be_resolved() {
    let candidate = DiscoveryCandidate::new(
        "worker",
        AgentProtocol::A2a,
        CandidateLocation::Host {
            host: "worker".to_owned(),
            port: None,
        },
    )
    .expect("valid candidate");

    assert_eq!(candidate.resolve_endpoint(), None);
    assert_eq!(candidate.location_label(), "worker");
}

#[rstest]
fn host_with_port_resolves_to_http_endpoint() {
    let candidate = DiscoveryCandidate::new(
        "worker",
        AgentProtocol::A2a,
        CandidateLocation::Host {
            host: "worker".to_owned(),
            port: Some(9000),
        },
    )
    .expect("valid candidate")
    .with_tags(["Arithmetic", "arithmetic", " "]);

    assert_eq!(
        candidate.resolve_endpoint().map(|endpoint| endpoint.as_str().to_owned()),
        Some("http://worker:9000".to_owned())
    );
    assert_eq!(candidate.tags(), ["arithmetic".to_owned()]);
    assert_eq!(candidate.id().as_str(), "a2a-worker");
}

#[rstest]
#[case("math")]
#[case("MATH")]
#[case(" Math ")]
#[case("arithmetic")]
fn capability_matches_names_and_tags_case_insensitively(#[case] token: &str) {
    let capability = Capability::new("Math", "Evaluates expressions")
        .expect("valid capability")
        .with_tags(["Arithmetic"]);

    assert!(capability.matches(token));
}

#[rstest]
fn capability_does_not_match_unrelated_tokens() {
    let capability = Capability::new("math", "Evaluates expressions").expect("valid capability");
    assert!(!capability.matches("greeting"));
}

#[rstest]
#[case("ACP", AgentProtocol::Acp)]
#[case("a2a", AgentProtocol::A2a)]
#[case("mcp", AgentProtocol::Mcp)]
#[case("grpc", AgentProtocol::Custom)]
fn declared_protocols_map_to_dialects(#[case] declared: &str, #[case] expected: AgentProtocol) {
    assert_eq!(AgentProtocol::from_declared(declared), expected);
}

#[rstest]
#[case("healthy", Some(AgentStatus::Healthy))]
#[case("WARNING", Some(AgentStatus::Degraded))]
#[case("error", Some(AgentStatus::Unhealthy))]
#[case("sleepy", None)]
fn reported_statuses_use_shared_vocabulary(
    #[case] reported: &str,
    #[case] expected: Option<AgentStatus>,
) {
    assert_eq!(AgentStatus::from_reported(reported), expected);
}

#[rstest]
fn strict_status_parsing_rejects_aliases() {
    assert!(AgentStatus::try_from("warning").is_err());
    assert_eq!(AgentStatus::try_from("unknown"), Ok(AgentStatus::Unknown));
}

fn entry_with_failures(failures: u32) -> (RegistryEntry, ManualClock) {
    let clock = ManualClock::default();
    let candidate = endpoint_candidate("greeter", AgentProtocol::Acp, "http://greeter:8000");
    let mut entry = RegistryEntry::new(agent_for(&candidate, &["greeting"]), clock.utc());
    for _ in 0..failures {
        entry.mark_failure();
    }
    (entry, clock)
}

#[rstest]
#[case(4, None)]
#[case(5, Some(EvictionReason::TooManyFailures))]
#[case(9, Some(EvictionReason::TooManyFailures))]
fn failure_threshold_evicts_at_max_failures(
    #[case] failures: u32,
    #[case] expected: Option<EvictionReason>,
) {
    let (entry, clock) = entry_with_failures(failures);
    assert_eq!(EvictionPolicy::default().eviction_reason(&entry, clock.utc()), expected);
}

#[rstest]
fn entries_outside_stale_window_are_evicted() {
    let (entry, clock) = entry_with_failures(0);
    let policy = EvictionPolicy::new(5, Duration::from_secs(60));

    clock.advance(ChronoDuration::seconds(60));
    assert_eq!(policy.eviction_reason(&entry, clock.utc()), None);

    clock.advance(ChronoDuration::seconds(1));
    assert_eq!(
        policy.eviction_reason(&entry, clock.utc()),
        Some(EvictionReason::Stale)
    );
}

#[rstest]
fn clock_moving_backwards_never_counts_as_stale() {
    let (entry, clock) = entry_with_failures(0);
    let policy = EvictionPolicy::new(5, Duration::from_secs(1));

    clock.advance(ChronoDuration::hours(-2));
    assert_eq!(policy.eviction_reason(&entry, clock.utc()), None);
}

#[rstest]
fn zero_failure_threshold_is_raised_to_one() {
    assert_eq!(EvictionPolicy::new(0, Duration::from_secs(1)).max_failures(), 1);
}

#[rstest]
fn stats_count_status_and_protocol() {
    let clock = ManualClock::default();
    let greeter = endpoint_candidate("greeter", AgentProtocol::Acp, "http://greeter:8000");
    let math = endpoint_candidate("math", AgentProtocol::A2a, "http://math:9000");
    let tools = endpoint_candidate("tools", AgentProtocol::Mcp, "http://tools:7000");
    let entries = [
        RegistryEntry::new(
            agent_for(&greeter, &["greeting"]).with_status(AgentStatus::Healthy),
            clock.utc(),
        ),
        RegistryEntry::new(
            agent_for(&math, &["arithmetic"]).with_status(AgentStatus::Degraded),
            clock.utc(),
        ),
        RegistryEntry::new(agent_for(&tools, &["files"]), clock.utc()),
    ];

    let stats = RegistryStats::from_entries(&entries);

    assert_eq!(stats.total, 3);
    assert_eq!(stats.healthy, 1);
    assert_eq!(stats.degraded, 1);
    assert_eq!(stats.unknown, 1);
    assert_eq!(stats.unhealthy, 0);
    assert_eq!(stats.by_protocol.get(&AgentProtocol::Mcp), Some(&1));
    assert_eq!(stats.by_protocol.get(&AgentProtocol::Custom), None);
}
