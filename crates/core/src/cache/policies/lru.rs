//! Least Recently Used (LRU) Replacement Policy.
//!
//! This policy evicts the cache line that has not been accessed for the longest time.
//! Instead of wall-clock timestamps it stamps each accessed line with a logical clock
//! that advances by exactly one on every install or touch, so eviction order depends
//! only on the sequence of accesses and traces replay identically.
//!
//! Ties on the stamp (only possible between lines that were never accessed) go to the
//! lowest way index.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `update()`: O(1)
//!   - `get_victim()`: O(W) where W is the number of ways (associativity)
//! - **Space Complexity:** O(S × W) stamps stored in the lines themselves

use serde::Serialize;

use super::ReplacementPolicy;
use crate::cache::CacheLine;

/// LRU Policy state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LruPolicy {
    /// Logical time of the most recent access; `0` before any access.
    clock: u64,
}

impl LruPolicy {
    /// Creates a new LRU policy with the clock at zero.
    pub const fn new() -> Self {
        Self { clock: 0 }
    }

    /// Current logical time.
    pub const fn now(&self) -> u64 {
        self.clock
    }
}

impl ReplacementPolicy for LruPolicy {
    /// Advances the clock and stamps `line` with the new time.
    fn update(&mut self, line: &mut CacheLine) {
        self.clock += 1;
        line.last_used = self.clock;
    }

    /// Returns the way with the smallest stamp.
    ///
    /// Scans in way order and only replaces the candidate on a strictly smaller stamp,
    /// so earlier ways win ties.
    fn get_victim(&self, ways: &[CacheLine]) -> usize {
        let mut victim = 0;
        let mut oldest = u64::MAX;
        for (way, line) in ways.iter().enumerate() {
            if line.last_used < oldest {
                oldest = line.last_used;
                victim = way;
            }
        }
        victim
    }
}
