//! Capability-based request routing over the agent registry.
//!
//! Routing picks a healthy agent for a free-text request. The choice itself
//! is delegated to a [`ports::DecisionBackend`]; [`services::RoutingService`]
//! owns everything around it: candidate selection, timeouts, validation of
//! the backend's answer against the live registry, usage accounting and
//! metrics. Routing never fails with an error; every outcome is a
//! [`domain::RoutingDecision`].

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
