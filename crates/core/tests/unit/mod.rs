//! # Unit Components
//!
//! Fine-grained tests for each building block of the simulator.




/// Unit tests for main memory.
pub mod memory;

/// Unit tests for statistics counters and derived rates.
pub mod stats;
