//! Cache Replacement Policies.
//!
//! Implements the algorithm for selecting victim lines in a full cache set.
//!
//! # Policies
//!
//! - `Lru`: Least Recently Used, ordered by a logical clock.

/// Least Recently Used replacement policy.
pub mod lru;

pub use lru::LruPolicy;

use super::CacheLine;

/// Trait for cache replacement policies.
///
/// Defines the interface for updating usage state and selecting victim lines.
pub trait ReplacementPolicy: Send + Sync {
    /// Records an access (install or hit) to `line`.
    fn update(&mut self, line: &mut CacheLine);

    /// Selects the way to evict among `ways`, all of which are valid.
    ///
    /// # Arguments
    ///
    /// * `ways` - The lines of one set, in way order. Must not be empty.
    ///
    /// # Returns
    ///
    /// The index of the way to evict.
    fn get_victim(&self, ways: &[CacheLine]) -> usize;
}
