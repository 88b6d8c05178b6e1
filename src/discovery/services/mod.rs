//! Orchestration services for agent discovery.

mod lifecycle;
mod reconciler;
mod registry;

pub use lifecycle::{DEFAULT_DISCOVERY_INTERVAL, DiscoveryService};
pub use reconciler::{CycleReport, DEFAULT_CANDIDATE_TIMEOUT, ReconcileError, RegistryReconciler};
pub use registry::AgentRegistry;
