//! Status mapping shared by liveness probes.

use super::client::{ProbeClient, ProbePurpose, ProbeReply};
use crate::discovery::domain::{Agent, AgentStatus};
use tracing::debug;

/// Dialect-specific extension to the shared status vocabulary.
pub(super) type StatusExtension = fn(&str) -> Option<AgentStatus>;

/// Shared vocabulary only.
pub(super) const fn no_extension(_: &str) -> Option<AgentStatus> {
    None
}

/// Maps a reply onto a status.
///
/// `200` replies use the self-reported status when it is recognised and count
/// as healthy otherwise; any other HTTP status is unhealthy.
pub(super) fn status_from_reply(reply: &ProbeReply, extension: StatusExtension) -> AgentStatus {
    if !reply.is_ok() {
        return AgentStatus::Unhealthy;
    }
    reply
        .reported_status()
        .and_then(|reported| extension(&reported).or_else(|| AgentStatus::from_reported(&reported)))
        .unwrap_or(AgentStatus::Healthy)
}

/// Probes `paths` in order, moving on after a transport error or a non-200
/// reply.
///
/// The first `200` reply decides the status. When every path fails, the
/// agent is unhealthy if at least one probe got an answer and unknown
/// otherwise.
pub(super) async fn probe_chain(
    client: &ProbeClient,
    agent: &Agent,
    paths: &[&str],
    extension: StatusExtension,
) -> AgentStatus {
    let mut answered = false;
    for path in paths {
        let url = agent.endpoint().join(path);
        match client.get(&url, ProbePurpose::Health).await {
            Ok(reply) if reply.is_ok() => return status_from_reply(&reply, extension),
            Ok(reply) => {
                debug!(agent_id = %agent.id(), url = %url, status = reply.status(), "health probe answered with error status");
                answered = true;
            }
            Err(err) => {
                debug!(agent_id = %agent.id(), url = %url, error = %err, "health probe failed");
            }
        }
    }

    if answered {
        AgentStatus::Unhealthy
    } else {
        AgentStatus::Unknown
    }
}
