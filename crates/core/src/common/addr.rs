//! Address decoding.
//!
//! This module splits a flat address into the three fields a set-associative cache
//! works with. It provides the following:
//! 1. **Layout:** Bit widths of the tag, index, and offset fields for a configuration.
//! 2. **Decoding:** Extraction of each field from an address.
//! 3. **Reconstruction:** The inverse mapping from `(tag, index)` back to the
//!    block-aligned address, used to write back evicted lines.
//! 4. **Formatting:** Fixed-width binary and hex rendering of field values.
//!
//! Addresses are laid out most-significant first as `| tag | index | offset |`.

use serde::Serialize;

use super::error::ConfigError;
use crate::config::CacheConfig;

/// Returns a mask with the low `bits` bits set.
#[inline]
const fn low_mask(bits: u32) -> u64 {
    if bits >= u64::BITS {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// Extracts `length` bits of `value` starting at bit `start`.
///
/// # Examples
///
/// ```
/// use cachesim_core::common::addr::bit_range;
///
/// assert_eq!(bit_range(0b1101_0100, 2, 2), 0b01);
/// ```
#[inline]
pub const fn bit_range(value: u64, start: u32, length: u32) -> u64 {
    if start >= u64::BITS {
        0
    } else {
        (value >> start) & low_mask(length)
    }
}

/// Formats `value` as a zero-padded binary string of at least `width` digits.
///
/// A zero-width field renders as the empty string.
pub fn format_binary(value: u64, width: u32) -> String {
    if width == 0 {
        return String::new();
    }
    format!("{value:0width$b}", width = width as usize)
}

/// Formats `value` as a zero-padded, upper-case hex string of at least `width` digits.
pub fn format_hex(value: u64, width: usize) -> String {
    format!("{value:0width$X}")
}

/// Bit widths of the tag, index, and offset fields.
///
/// Always satisfies `offset_bits + index_bits + tag_bits == address_width`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct AddressLayout {
    /// `log2(block_size)`.
    pub offset_bits: u32,
    /// `log2(set_count)`.
    pub index_bits: u32,
    /// Remaining high-order bits.
    pub tag_bits: u32,
}

/// A decoded address: field values together with their widths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct AddressBreakdown {
    /// Tag field value.
    pub tag: u64,
    /// Set index field value.
    pub index: usize,
    /// Offset within the block.
    pub offset: u64,
    /// Width of the tag field.
    pub tag_bits: u32,
    /// Width of the index field.
    pub index_bits: u32,
    /// Width of the offset field.
    pub offset_bits: u32,
}

impl AddressLayout {
    /// Computes the field layout for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any dimension is not a positive power of two, if the
    /// offset and index fields do not fit in the address width, or if the width exceeds
    /// 64 bits. The engine's memory size limit is not applied here.
    pub fn new(config: &CacheConfig) -> Result<Self, ConfigError> {
        config.validate_geometry()?;
        let offset_bits = config.block_size.trailing_zeros();
        let index_bits = config.set_count.trailing_zeros();
        Ok(Self {
            offset_bits,
            index_bits,
            tag_bits: config.address_width - offset_bits - index_bits,
        })
    }

    /// Total address width covered by the three fields.
    #[inline]
    pub const fn address_width(&self) -> u32 {
        self.offset_bits + self.index_bits + self.tag_bits
    }

    /// Splits `address` into its tag, index, and offset.
    ///
    /// Bits above the address width are ignored.
    pub fn decode(&self, address: u64) -> AddressBreakdown {
        let offset = bit_range(address, 0, self.offset_bits);
        let index = bit_range(address, self.offset_bits, self.index_bits);
        let tag = bit_range(address, self.offset_bits + self.index_bits, self.tag_bits);
        AddressBreakdown {
            tag,
            index: index as usize,
            offset,
            tag_bits: self.tag_bits,
            index_bits: self.index_bits,
            offset_bits: self.offset_bits,
        }
    }

    /// Rebuilds the block-aligned address of the line holding `tag` in set `index`.
    ///
    /// Exact inverse of [`decode`](Self::decode) for block-aligned addresses.
    pub const fn reconstruct(&self, tag: u64, index: usize) -> u64 {
        let tag_shift = self.index_bits + self.offset_bits;
        let tag_part = if tag_shift >= u64::BITS { 0 } else { tag << tag_shift };
        tag_part | ((index as u64) << self.offset_bits)
    }
}

impl AddressBreakdown {
    /// Renders each field as a zero-padded binary string: `(tag, index, offset)`.
    pub fn binary_fields(&self) -> (String, String, String) {
        (
            format_binary(self.tag, self.tag_bits),
            format_binary(self.index as u64, self.index_bits),
            format_binary(self.offset, self.offset_bits),
        )
    }
}

/// Decodes `address` under `config`.
///
/// # Errors
///
/// Returns [`ConfigError`] if `config`'s geometry is invalid.
pub fn decode(address: u64, config: &CacheConfig) -> Result<AddressBreakdown, ConfigError> {
    Ok(AddressLayout::new(config)?.decode(address))
}
