//! Error definitions for the cache simulator.
//!
//! This module defines the error taxonomy shared by configuration and request handling:
//! 1. **Configuration Errors:** Geometry that is not a power of two, or bit fields that
//!    do not fit in the address width.
//! 2. **Request Errors:** Addresses outside the simulated address space and requests
//!    issued while another trace is still being replayed.
//!
//! Errors never leave the engine partially mutated: planning is read-only and state only
//! changes when an event is stepped.

use thiserror::Error;

/// Invalid cache configuration.
///
/// Raised synchronously by validation, engine construction, or decoding. The operation
/// that raised it has no effect on existing state.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A geometry dimension is zero or not a power of two.
    #[error("{field} must be a positive power of two (got {value})")]
    NotPowerOfTwo {
        /// Name of the offending field (`set_count`, `associativity`, `block_size`).
        field: &'static str,
        /// The rejected value.
        value: usize,
    },

    /// Offset and index bits together exceed the address width.
    #[error("offset and index need {required} bits but the address is only {width} bits wide")]
    AddressWidthTooSmall {
        /// Bits needed for offset plus index.
        required: u32,
        /// Configured address width.
        width: u32,
    },

    /// The address width would require an unreasonably large main memory.
    #[error("address width {width} exceeds the supported maximum of {max} bits")]
    AddressWidthTooLarge {
        /// Configured address width.
        width: u32,
        /// Largest supported width.
        max: u32,
    },
}

/// Errors returned by engine entry points.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CacheError {
    /// The configuration is invalid.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The requested address lies outside `[0, 2^width)`.
    #[error("address {address:#x} is outside the {width}-bit address space")]
    AddressOutOfRange {
        /// The rejected address.
        address: u64,
        /// Configured address width in bits.
        width: u32,
    },

    /// A request was issued while another trace is mid-playback.
    #[error("engine is busy replaying a trace ({remaining} events remaining at cursor {cursor})")]
    Busy {
        /// Cursor position of the pending trace.
        cursor: usize,
        /// Events not yet applied.
        remaining: usize,
    },
}

/// Result alias used throughout the crate.
pub type Result<T, E = CacheError> = std::result::Result<T, E>;
