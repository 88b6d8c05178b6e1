//! Adapter implementations for discovery ports.

pub mod http;
pub mod memory;

mod static_source;

pub use static_source::StaticCandidateSource;
