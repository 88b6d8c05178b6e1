//! Unit tests for the routing context.

mod support;
