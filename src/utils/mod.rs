//! Utility modules for common functionality.
//!
//! - logging: Logging utilities and traceable error contexts
//! - metrics: Prometheus metrics for resolution cycles
//! - parsing: Parsing utilities for CLI arguments and chain payloads
//! - tests: Test utilities

pub mod logging;
pub mod metrics;
pub mod parsing;
pub mod tests;

pub use parsing::*;
