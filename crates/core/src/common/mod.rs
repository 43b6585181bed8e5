//! Common utilities and types used throughout the cache simulator.
//!
//! This module provides the building blocks shared by every other component:
//! 1. **Address Decoding:** Splitting addresses into tag, index, and offset fields.
//! 2. **Access Types:** Read/write request kinds and the simulated word type.
//! 3. **Error Handling:** Configuration and request errors.

/// Address decoding (tag/index/offset) and formatting helpers.
pub mod addr;

/// Request kinds and the simulated data word.
pub mod data;

/// Error types for configuration and request handling.
pub mod error;

pub use addr::{AddressBreakdown, AddressLayout};
pub use data::{AccessKind, Word};
pub use error::{CacheError, ConfigError, Result};
