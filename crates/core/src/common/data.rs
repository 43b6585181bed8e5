//! Memory access kinds and the simulated data word.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The value stored in a memory cell or cache line.
///
/// Each block holds a single scalar; byte-granular access inside a block is not modelled.
pub type Word = u64;

/// Type of memory request issued to the cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccessKind {
    /// Load: data is returned from the cache, filling the line on a miss.
    Read,
    /// Store: data is written according to the write and allocation policies.
    Write,
}

impl AccessKind {
    /// Returns `true` for [`AccessKind::Write`].
    #[inline]
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Write)
    }
}

impl fmt::Display for AccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "READ"),
            Self::Write => write!(f, "WRITE"),
        }
    }
}
