//! Switchboard: agent discovery and capability-based routing.
//!
//! Switchboard keeps track of a fleet of independently running agents
//! reachable over HTTP. It classifies them by communication dialect (ACP,
//! A2A, MCP or custom), verifies continuously that they are alive, and routes
//! incoming requests to the best-matching healthy agent.
//!
//! # Architecture
//!
//! Switchboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (HTTP probes, in-memory
//!   test doubles, decision backends)
//!
//! # Modules
//!
//! - [`discovery`]: Agent descriptors, protocol probes and registry
//!   reconciliation
//! - [`routing`]: Request routing over the healthy part of the registry
//! - [`config`]: TOML configuration with environment overrides
//! - [`telemetry`]: Logging setup

pub mod config;
pub mod discovery;
pub mod routing;
pub mod telemetry;
