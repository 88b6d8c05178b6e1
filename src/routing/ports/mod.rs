//! Port contracts for routing.

mod backend;

pub use backend::{
    BackendDecision, CandidateSummary, CapabilitySummary, DecisionBackend, DecisionBackendError,
    DecisionBackendResult, DecisionRequest,
};
