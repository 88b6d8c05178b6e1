//! Unit tests for the discovery context.

mod domain_tests;
mod support;
