//! Agent discovery and registry reconciliation for Switchboard.
//!
//! This module tracks a fleet of remote agents reachable over HTTP. It probes
//! candidate network locations with a dialect-specific strategy, merges the
//! results into an in-memory registry, ages out agents that stop answering, and
//! exposes read-side lookups to the routing layer. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
