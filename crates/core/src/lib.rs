//! Set-associative cache simulator library.
//!
//! This crate implements a deterministic, steppable model of a single CPU cache in
//! front of a flat main memory:
//! 1. **Addressing:** Tag/index/offset decoding and block address reconstruction.
//! 2. **Cache:** Set/way storage, tagged lookup, and LRU victim selection driven by a
//!    logical clock.
//! 3. **Memory:** A flat array of words backing misses and write-backs.
//! 4. **Simulation:** A pure request planner that emits an ordered event trace, and an
//!    engine that replays the trace one event at a time.
//! 5. **Statistics:** Hit, miss, and eviction counters.
//!
//! # Example
//!
//! ```
//! use cachesim_core::{AccessKind, CacheConfig, Engine};
//!
//! let mut engine = Engine::new(CacheConfig::default()).unwrap();
//! engine.process_request(AccessKind::Read, 0x34, None).unwrap();
//! while engine.step() {}
//! assert_eq!(engine.stats().misses, 1);
//! ```

/// Common types (address decoding, errors, access kinds).
pub mod common;
/// Cache geometry and policy configuration.
pub mod config;
/// Cache storage (sets, ways, lines) and replacement policies.
pub mod cache;
/// Flat main memory backing the cache.
pub mod memory;
/// Request planning, event traces, and the stepping engine.
pub mod sim;
/// Hit/miss/eviction statistics.
pub mod stats;

pub use crate::common::{AccessKind, AddressBreakdown, AddressLayout, CacheError, ConfigError, Word};
pub use crate::config::{AllocationPolicy, CacheConfig, ConfigUpdate, WritePolicy};
pub use crate::sim::{CacheEvent, Engine, EngineState, EventTrace};
pub use crate::stats::CacheStats;
