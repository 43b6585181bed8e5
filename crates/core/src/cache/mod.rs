//! Set-Associative Cache Storage.
//!
//! This module owns the set/way grid of a single cache. It provides tagged lookup,
//! victim selection, line installation, and LRU promotion. It does not decide *when*
//! any of these happen: the request planner reads the store to build a trace, and the
//! engine mutates it while replaying that trace.

/// Cache replacement policy implementations (LRU).
pub mod policies;

use serde::Serialize;

use self::policies::{LruPolicy, ReplacementPolicy};
use crate::common::Word;
use crate::config::CacheConfig;

/// Cache line entry.
///
/// `dirty` implies `valid`; `tag` and `data` are only meaningful while `valid`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheLine {
    /// Line holds a block.
    pub valid: bool,
    /// Line was written and memory has not been updated yet.
    pub dirty: bool,
    /// Tag of the resident block.
    pub tag: u64,
    /// The block's value, `None` until the line is first filled.
    pub data: Option<Word>,
    /// Logical time of the last install or hit.
    pub last_used: u64,
}

/// One set: `associativity` lines in stable way order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CacheSet {
    /// Lines of the set, indexed by way.
    pub ways: Vec<CacheLine>,
}

impl CacheSet {
    fn new(associativity: usize) -> Self {
        Self {
            ways: vec![CacheLine::default(); associativity],
        }
    }
}

/// Set-associative cache storage with LRU replacement.
///
/// Coordinates outside the configured geometry are reported, never indexed: lookups and
/// victim selection return `None`, mutations return `false` and change nothing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CacheStore {
    sets: Vec<CacheSet>,
    policy: LruPolicy,
}

impl CacheStore {
    /// Creates an empty store (every line invalid) for `config`'s geometry.
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            sets: (0..config.set_count)
                .map(|_| CacheSet::new(config.associativity))
                .collect(),
            policy: LruPolicy::new(),
        }
    }

    /// All sets, in index order.
    pub fn sets(&self) -> &[CacheSet] {
        &self.sets
    }

    /// The line at `(set, way)`, if it exists.
    pub fn line(&self, set: usize, way: usize) -> Option<&CacheLine> {
        self.sets.get(set).and_then(|s| s.ways.get(way))
    }

    /// Number of ways per set.
    pub fn associativity(&self) -> usize {
        self.sets.first().map_or(0, |s| s.ways.len())
    }

    /// Current value of the LRU logical clock.
    pub const fn clock(&self) -> u64 {
        self.policy.now()
    }

    /// Number of valid lines across all sets.
    pub fn valid_lines(&self) -> usize {
        self.sets
            .iter()
            .flat_map(|s| s.ways.iter())
            .filter(|l| l.valid)
            .count()
    }

    /// Finds the way of set `index` holding `tag`.
    ///
    /// # Returns
    ///
    /// The matching way, or `None` on a miss (or if `index` is out of range). At most one
    /// way can match because a tag is never installed twice in the same set.
    pub fn lookup(&self, index: usize, tag: u64) -> Option<usize> {
        self.sets
            .get(index)?
            .ways
            .iter()
            .position(|line| line.valid && line.tag == tag)
    }

    /// Chooses the way of set `index` to fill on a miss.
    ///
    /// Prefers the lowest-numbered invalid way; if the set is full, defers to the
    /// replacement policy. Returns `None` if `index` is out of range or the set has no ways.
    pub fn select_victim(&self, index: usize) -> Option<usize> {
        let ways = &self.sets.get(index)?.ways;
        if ways.is_empty() {
            return None;
        }
        Some(
            ways.iter()
                .position(|line| !line.valid)
                .unwrap_or_else(|| self.policy.get_victim(ways)),
        )
    }

    /// Fills `(set, way)` with a block and marks it most recently used.
    ///
    /// Returns `false` (and changes nothing, including the LRU clock) if the coordinates
    /// are out of range.
    pub fn install(&mut self, set: usize, way: usize, tag: u64, data: Word, dirty: bool) -> bool {
        let Some(line) = self.sets.get_mut(set).and_then(|s| s.ways.get_mut(way)) else {
            return false;
        };
        line.valid = true;
        line.tag = tag;
        line.data = Some(data);
        line.dirty = dirty;
        self.policy.update(line);
        true
    }

    /// Marks `(set, way)` most recently used without touching its contents.
    ///
    /// Returns `false` if the coordinates are out of range.
    pub fn touch(&mut self, set: usize, way: usize) -> bool {
        match self.sets.get_mut(set).and_then(|s| s.ways.get_mut(way)) {
            Some(line) => {
                self.policy.update(line);
                true
            }
            None => false,
        }
    }
}
