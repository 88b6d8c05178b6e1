//! Orchestration services for routing.

mod router;

pub use router::{DEFAULT_ROUTING_TIMEOUT, RoutingService};
