//! Runs the discovery loop as a standalone daemon.
//!
//! Usage:
//!
//! ```text
//! switchboardd [config-path]
//! ```
//!
//! The configuration path defaults to `switchboard.toml`; a missing file runs
//! with the built-in defaults and no candidates. The daemon runs an eager
//! discovery cycle, keeps reconciling on the configured interval, and shuts
//! down cleanly on Ctrl-C.

use mockable::DefaultClock;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use switchboard::config::{ConfigError, SwitchboardConfig};
use switchboard::discovery::{
    adapters::{
        StaticCandidateSource,
        http::{HttpAgentProber, ProbeClient},
    },
    ports::ProbeError,
    services::{AgentRegistry, DiscoveryService, RegistryReconciler},
};
use switchboard::telemetry;
use thiserror::Error;
use tracing::{error, info};

const DEFAULT_CONFIG_PATH: &str = "switchboard.toml";

#[derive(Debug, Error)]
enum DaemonError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to build probe client: {0}")]
    Probe(#[from] ProbeError),
    #[error("failed to wait for shutdown signal: {0}")]
    Signal(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    if telemetry::init().is_err() {
        return ExitCode::FAILURE;
    }

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "switchboard failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), DaemonError> {
    let config_path = env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let config = SwitchboardConfig::load(&config_path)
        .await?
        .with_env_overrides()?;
    config.validate()?;
    let candidates = config.candidates()?;
    info!(
        config = %config_path.display(),
        candidates = candidates.len(),
        interval_secs = config.discovery.interval_secs,
        "configuration loaded"
    );

    let clock = Arc::new(DefaultClock);
    let registry = Arc::new(AgentRegistry::new());
    let client = ProbeClient::new(config.discovery_timeout(), config.health_timeout())?;
    let reconciler = RegistryReconciler::new(
        Arc::new(StaticCandidateSource::new(candidates)),
        Arc::new(HttpAgentProber::new(client, Arc::clone(&clock))),
        Arc::clone(&registry),
        clock,
    )
    .with_policy(config.eviction_policy())
    .with_candidate_timeout(config.candidate_timeout());

    let service = DiscoveryService::new(Arc::new(reconciler), config.discovery_interval());
    service.start().await;
    tokio::signal::ctrl_c().await?;
    service.stop().await;

    let stats = registry.stats();
    info!(
        registered = stats.total,
        healthy = stats.healthy,
        "switchboard stopped"
    );
    Ok(())
}
