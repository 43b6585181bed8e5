//! Simulation statistics collection and reporting.
//!
//! Counters only ever grow while a configuration is live; they are cleared by
//! `Engine::reset` and `Engine::update_config`.

use serde::Serialize;
use std::fmt;

/// Hit, miss, and eviction counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Requests satisfied by a resident line.
    pub hits: u64,
    /// Requests whose tag was not resident.
    pub misses: u64,
    /// Valid lines displaced to make room for a new block.
    pub evictions: u64,
}

impl CacheStats {
    /// Total requests resolved (`hits + misses`).
    pub const fn accesses(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of accesses that hit, in `[0, 1]`; `0.0` before any access.
    pub fn hit_rate(&self) -> f64 {
        match self.accesses() {
            0 => 0.0,
            total => self.hits as f64 / total as f64,
        }
    }

    /// Fraction of accesses that missed; `0.0` before any access.
    pub fn miss_rate(&self) -> f64 {
        match self.accesses() {
            0 => 0.0,
            total => self.misses as f64 / total as f64,
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "----------------------------------------------------------")?;
        writeln!(f, "CACHE STATISTICS")?;
        writeln!(f, "  cache.accesses         {}", self.accesses())?;
        writeln!(f, "  cache.hits             {}", self.hits)?;
        writeln!(f, "  cache.misses           {}", self.misses)?;
        writeln!(f, "  cache.evictions        {}", self.evictions)?;
        writeln!(f, "  cache.hit_rate         {:.2}%", self.hit_rate() * 100.0)?;
        write!(f, "----------------------------------------------------------")
    }
}
