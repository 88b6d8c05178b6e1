//! Domain model for routing requests and decisions.

mod decision;
mod error;
mod failure;
mod metrics;
mod request;

pub use decision::RoutingDecision;
pub use error::RoutingDomainError;
pub use failure::RoutingFailure;
pub use metrics::RoutingMetrics;
pub use request::RouteRequest;
