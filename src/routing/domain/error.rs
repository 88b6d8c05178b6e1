//! Error types for routing domain validation.

use thiserror::Error;

/// Errors returned while constructing routing domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoutingDomainError {
    /// The request query is empty after trimming.
    #[error("routing query must not be empty")]
    EmptyQuery,

    /// The request timeout is zero.
    #[error("routing timeout must be greater than zero")]
    ZeroTimeout,
}
