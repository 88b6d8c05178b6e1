//! Adapter implementations for routing ports.

mod keyword;

pub use keyword::KeywordDecisionBackend;
