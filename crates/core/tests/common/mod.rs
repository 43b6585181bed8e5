//! Shared test infrastructure.

/// Engine harness and reference configurations.
pub mod harness;

pub use harness::{TestContext, example_config, init_tracing};
