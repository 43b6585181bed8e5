//! Configuration for the cache simulator.
//!
//! This module defines the cache geometry and policy parameters. It provides:
//! 1. **Defaults:** The baseline teaching configuration (4 sets, 4 ways, 4-byte blocks,
//!    write-back, write-allocate, 8-bit addresses).
//! 2. **Structures:** [`CacheConfig`] and its partial form [`ConfigUpdate`].
//! 3. **Enums:** Write and allocation policies.
//!
//! Configuration can be built in code, starting from `CacheConfig::default()`, or
//! deserialized from JSON.

use serde::{Deserialize, Serialize};

use crate::common::addr::AddressLayout;
use crate::common::error::ConfigError;

/// Default configuration constants for the simulator.
mod defaults {
    /// Default number of sets.
    pub const SET_COUNT: usize = 4;

    /// Default associativity (ways per set).
    pub const ASSOCIATIVITY: usize = 4;

    /// Default block size in bytes.
    pub const BLOCK_SIZE: usize = 4;

    /// Default address width in bits.
    ///
    /// Eight bits keeps main memory at 256 cells, small enough to display in full.
    pub const ADDRESS_WIDTH: u32 = 8;
}

/// Largest address width the engine accepts.
///
/// Main memory materialises one cell per address, so the width bounds its allocation.
/// Decoding alone only needs the width to fit in a `u64`.
pub const MAX_ADDRESS_WIDTH: u32 = 24;

/// What happens to main memory when the cache is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WritePolicy {
    /// Every write hit is propagated to memory immediately; lines never become dirty.
    #[serde(alias = "WriteThrough")]
    WriteThrough,
    /// Write hits only mark the line dirty; memory is updated when the line is evicted.
    #[default]
    #[serde(alias = "WriteBack")]
    WriteBack,
}

/// What happens on a write miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AllocationPolicy {
    /// The block is installed in the cache, then written.
    #[default]
    #[serde(alias = "WriteAllocate")]
    WriteAllocate,
    /// The write bypasses the cache and goes straight to memory.
    #[serde(alias = "NoWriteAllocate")]
    NoWriteAllocate,
}

/// Cache geometry and policies.
///
/// `set_count`, `associativity`, and `block_size` must be positive powers of two, and
/// `log2(block_size) + log2(set_count)` must not exceed `address_width`. The remaining
/// high-order bits form the tag.
///
/// # Examples
///
/// ```
/// use cachesim_core::config::{CacheConfig, WritePolicy};
///
/// let json = r#"{
///     "set_count": 8,
///     "associativity": 2,
///     "block_size": 16,
///     "write_policy": "write-through",
///     "address_width": 12
/// }"#;
///
/// let config = CacheConfig::from_json(json).unwrap();
/// assert_eq!(config.write_policy, WritePolicy::WriteThrough);
/// assert_eq!(config.total_bytes(), 256);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Number of sets (S).
    #[serde(default = "CacheConfig::default_set_count", alias = "setCount")]
    pub set_count: usize,

    /// Ways per set (E).
    #[serde(default = "CacheConfig::default_associativity")]
    pub associativity: usize,

    /// Bytes per block (B).
    #[serde(default = "CacheConfig::default_block_size", alias = "blockSize")]
    pub block_size: usize,

    /// Write-hit policy.
    #[serde(default, alias = "writePolicy")]
    pub write_policy: WritePolicy,

    /// Write-miss policy.
    #[serde(default, alias = "allocationPolicy")]
    pub allocation_policy: AllocationPolicy,

    /// Address width in bits; main memory has `2^address_width` cells.
    #[serde(default = "CacheConfig::default_address_width", alias = "addressWidth")]
    pub address_width: u32,
}

impl CacheConfig {
    const fn default_set_count() -> usize {
        defaults::SET_COUNT
    }

    const fn default_associativity() -> usize {
        defaults::ASSOCIATIVITY
    }

    const fn default_block_size() -> usize {
        defaults::BLOCK_SIZE
    }

    const fn default_address_width() -> u32 {
        defaults::ADDRESS_WIDTH
    }

    /// Parses a configuration from JSON. Missing fields take their defaults.
    ///
    /// The result is not validated; call [`validate`](Self::validate) or hand it to
    /// [`Engine::new`](crate::Engine::new).
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if `json` is malformed.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Checks every constraint the engine needs: the address geometry plus the main memory
    /// size limit ([`MAX_ADDRESS_WIDTH`]).
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_geometry()?;
        if self.address_width > MAX_ADDRESS_WIDTH {
            return Err(ConfigError::AddressWidthTooLarge {
                width: self.address_width,
                max: MAX_ADDRESS_WIDTH,
            });
        }
        Ok(())
    }

    /// Checks only what address decoding needs: power-of-two dimensions, offset and index
    /// fitting in the address width, and the width fitting in a `u64`.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate_geometry(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("set_count", self.set_count),
            ("associativity", self.associativity),
            ("block_size", self.block_size),
        ] {
            if !value.is_power_of_two() {
                return Err(ConfigError::NotPowerOfTwo { field, value });
            }
        }

        if self.address_width > u64::BITS {
            return Err(ConfigError::AddressWidthTooLarge {
                width: self.address_width,
                max: u64::BITS,
            });
        }

        let required = self.block_size.trailing_zeros() + self.set_count.trailing_zeros();
        if required > self.address_width {
            return Err(ConfigError::AddressWidthTooSmall {
                required,
                width: self.address_width,
            });
        }
        Ok(())
    }

    /// Field layout of addresses under this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration is invalid.
    pub fn layout(&self) -> Result<AddressLayout, ConfigError> {
        AddressLayout::new(self)
    }

    /// Number of addressable cells in main memory (`2^address_width`).
    pub const fn memory_size(&self) -> usize {
        match 1usize.checked_shl(self.address_width) {
            Some(size) => size,
            None => usize::MAX,
        }
    }

    /// Total number of cache lines.
    pub const fn total_lines(&self) -> usize {
        self.set_count * self.associativity
    }

    /// Cache capacity in bytes (`S * E * B`).
    pub const fn total_bytes(&self) -> usize {
        self.total_lines() * self.block_size
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            set_count: defaults::SET_COUNT,
            associativity: defaults::ASSOCIATIVITY,
            block_size: defaults::BLOCK_SIZE,
            write_policy: WritePolicy::default(),
            allocation_policy: AllocationPolicy::default(),
            address_width: defaults::ADDRESS_WIDTH,
        }
    }
}

/// A partial configuration: only the fields that are `Some` are changed.
///
/// # Examples
///
/// ```
/// use cachesim_core::config::{CacheConfig, ConfigUpdate};
///
/// let update: ConfigUpdate = serde_json::from_str(r#"{ "associativity": 1 }"#).unwrap();
/// let merged = update.merge_into(&CacheConfig::default());
/// assert_eq!(merged.associativity, 1);
/// assert_eq!(merged.set_count, 4);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigUpdate {
    /// New set count.
    #[serde(alias = "setCount")]
    pub set_count: Option<usize>,
    /// New associativity.
    pub associativity: Option<usize>,
    /// New block size.
    #[serde(alias = "blockSize")]
    pub block_size: Option<usize>,
    /// New write policy.
    #[serde(alias = "writePolicy")]
    pub write_policy: Option<WritePolicy>,
    /// New allocation policy.
    #[serde(alias = "allocationPolicy")]
    pub allocation_policy: Option<AllocationPolicy>,
    /// New address width.
    #[serde(alias = "addressWidth")]
    pub address_width: Option<u32>,
}

impl ConfigUpdate {
    /// Returns `base` with every `Some` field of `self` applied.
    pub fn merge_into(&self, base: &CacheConfig) -> CacheConfig {
        CacheConfig {
            set_count: self.set_count.unwrap_or(base.set_count),
            associativity: self.associativity.unwrap_or(base.associativity),
            block_size: self.block_size.unwrap_or(base.block_size),
            write_policy: self.write_policy.unwrap_or(base.write_policy),
            allocation_policy: self.allocation_policy.unwrap_or(base.allocation_policy),
            address_width: self.address_width.unwrap_or(base.address_width),
        }
    }

    /// Returns `true` if no field is set.
    pub const fn is_empty(&self) -> bool {
        self.set_count.is_none()
            && self.associativity.is_none()
            && self.block_size.is_none()
            && self.write_policy.is_none()
            && self.allocation_policy.is_none()
            && self.address_width.is_none()
    }
}

impl From<CacheConfig> for ConfigUpdate {
    fn from(config: CacheConfig) -> Self {
        Self {
            set_count: Some(config.set_count),
            associativity: Some(config.associativity),
            block_size: Some(config.block_size),
            write_policy: Some(config.write_policy),
            allocation_policy: Some(config.allocation_policy),
            address_width: Some(config.address_width),
        }
    }
}
