//! Cache events and event traces.
//!
//! Every request is resolved into an ordered list of micro-steps. Each step is one
//! [`CacheEvent`] variant carrying only the fields that step needs; the engine matches on
//! the variant exhaustively when applying it.

use serde::Serialize;
use std::fmt;

use crate::common::addr::format_hex;
use crate::common::{AccessKind, AddressBreakdown, Word};

/// Where the value of a newly installed line comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum LineFill {
    /// The value being written by the request.
    Value {
        /// Value stored in the line.
        data: Word,
    },
    /// Whatever main memory holds at `address` when the event is applied.
    Memory {
        /// Address read to fill the line.
        address: u64,
    },
}

/// Discriminant of a [`CacheEvent`], for counting and filtering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// See [`CacheEvent::Start`].
    Start,
    /// See [`CacheEvent::Decode`].
    Decode,
    /// See [`CacheEvent::CheckSet`].
    CheckSet,
    /// See [`CacheEvent::CheckHit`].
    CheckHit,
    /// See [`CacheEvent::Hit`].
    Hit,
    /// See [`CacheEvent::Miss`].
    Miss,
    /// See [`CacheEvent::Evict`].
    Evict,
    /// See [`CacheEvent::WriteBack`].
    WriteBack,
    /// See [`CacheEvent::NoAllocateWrite`].
    NoAllocateWrite,
    /// See [`CacheEvent::FetchMemory`].
    FetchMemory,
    /// See [`CacheEvent::InstallLine`].
    InstallLine,
    /// See [`CacheEvent::TouchLru`].
    TouchLru,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "START",
            Self::Decode => "DECODE",
            Self::CheckSet => "CHECK_SET",
            Self::CheckHit => "CHECK_HIT",
            Self::Hit => "HIT",
            Self::Miss => "MISS",
            Self::Evict => "EVICT",
            Self::WriteBack => "WRITE_BACK",
            Self::NoAllocateWrite => "NO_ALLOCATE_WRITE",
            Self::FetchMemory => "FETCH_MEMORY",
            Self::InstallLine => "INSTALL_LINE",
            Self::TouchLru => "TOUCH_LRU",
        };
        f.pad(name)
    }
}

/// One micro-step in resolving a request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CacheEvent {
    /// A request entered the cache.
    Start {
        /// Read or write.
        kind: AccessKind,
        /// Requested address.
        address: u64,
        /// Value to write, for writes.
        data: Option<Word>,
    },
    /// The address was split into tag, index, and offset.
    Decode {
        /// Field values and widths.
        breakdown: AddressBreakdown,
    },
    /// The set selected by the index field.
    CheckSet {
        /// Set index.
        set: usize,
    },
    /// The ways of the set are compared against the tag.
    CheckHit {
        /// Set index.
        set: usize,
        /// Tag being searched for.
        tag: u64,
    },
    /// The tag is resident.
    Hit {
        /// Set index.
        set: usize,
        /// Way holding the tag.
        way: usize,
    },
    /// The tag is not resident.
    Miss {
        /// Set index.
        set: usize,
    },
    /// A valid line is displaced.
    Evict {
        /// Set index.
        set: usize,
        /// Victim way.
        way: usize,
        /// Tag of the displaced block.
        tag: u64,
        /// Whether the displaced block must be written back.
        dirty: bool,
    },
    /// A value is written to main memory (write-through, or a dirty victim).
    WriteBack {
        /// Memory address written.
        address: u64,
        /// Value written.
        data: Word,
    },
    /// A write miss goes straight to memory without allocating a line.
    NoAllocateWrite {
        /// Memory address written.
        address: u64,
        /// Value written.
        data: Word,
    },
    /// The requested block is read from main memory.
    FetchMemory {
        /// Memory address read.
        address: u64,
    },
    /// A line is filled or updated.
    InstallLine {
        /// Set index.
        set: usize,
        /// Way being written.
        way: usize,
        /// Tag stored in the line.
        tag: u64,
        /// Source of the line's value.
        fill: LineFill,
        /// Dirty bit after the install.
        dirty: bool,
    },
    /// A line is promoted to most recently used.
    TouchLru {
        /// Set index.
        set: usize,
        /// Way promoted.
        way: usize,
    },
}

impl CacheEvent {
    /// Discriminant of this event.
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Start { .. } => EventKind::Start,
            Self::Decode { .. } => EventKind::Decode,
            Self::CheckSet { .. } => EventKind::CheckSet,
            Self::CheckHit { .. } => EventKind::CheckHit,
            Self::Hit { .. } => EventKind::Hit,
            Self::Miss { .. } => EventKind::Miss,
            Self::Evict { .. } => EventKind::Evict,
            Self::WriteBack { .. } => EventKind::WriteBack,
            Self::NoAllocateWrite { .. } => EventKind::NoAllocateWrite,
            Self::FetchMemory { .. } => EventKind::FetchMemory,
            Self::InstallLine { .. } => EventKind::InstallLine,
            Self::TouchLru { .. } => EventKind::TouchLru,
        }
    }

    /// One-line human readable caption for the event.
    pub fn describe(&self) -> String {
        match self {
            Self::Start { kind, address, .. } => {
                format!("Request: {kind} at Address {address} (0x{})", format_hex(*address, 2))
            }
            Self::Decode { breakdown } => format!(
                "Tag: {}, Index: {}, Offset: {}",
                breakdown.tag, breakdown.index, breakdown.offset
            ),
            Self::CheckSet { set } => format!("Check Set {set}"),
            Self::CheckHit { tag, .. } => format!("Checking ways for Tag {tag}..."),
            Self::Hit { set, way } => format!("Hit in Set {set}, Way {way}"),
            Self::Miss { set } => format!("Miss in Set {set}"),
            Self::Evict { way, dirty, .. } => {
                let state = if *dirty { "dirty" } else { "clean" };
                format!("Evicting Way {way} (LRU, {state})")
            }
            Self::WriteBack { address, data } => {
                format!("Write {data} to Memory 0x{}", format_hex(*address, 2))
            }
            Self::NoAllocateWrite { address, data } => format!(
                "Write {data} direct to Memory 0x{} (No-Allocate)",
                format_hex(*address, 2)
            ),
            Self::FetchMemory { address } => {
                format!("Fetch block from Memory 0x{}", format_hex(*address, 2))
            }
            Self::InstallLine {
                set, way, dirty, ..
            } => {
                let mark = if *dirty { " - Mark Dirty" } else { "" };
                format!("Update Cache Set {set}, Way {way}{mark}")
            }
            Self::TouchLru { set, way } => format!("Update LRU for Set {set}, Way {way}"),
        }
    }
}

impl fmt::Display for CacheEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<17} {}", self.kind(), self.describe())
    }
}

/// Ordered, immutable list of events produced by planning one request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EventTrace {
    events: Vec<CacheEvent>,
}

impl EventTrace {
    pub(crate) const fn new(events: Vec<CacheEvent>) -> Self {
        Self { events }
    }

    /// Events in replay order.
    pub fn events(&self) -> &[CacheEvent] {
        &self.events
    }

    /// Event at position `index`.
    pub fn get(&self, index: usize) -> Option<&CacheEvent> {
        self.events.get(index)
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if the trace has no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterates over the events in order.
    pub fn iter(&self) -> std::slice::Iter<'_, CacheEvent> {
        self.events.iter()
    }

    /// Number of events of `kind`.
    pub fn count(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }

    /// Returns `true` if any event is of `kind`.
    pub fn contains(&self, kind: EventKind) -> bool {
        self.events.iter().any(|e| e.kind() == kind)
    }

    /// Event kinds in order.
    pub fn kinds(&self) -> Vec<EventKind> {
        self.events.iter().map(CacheEvent::kind).collect()
    }
}

impl<'a> IntoIterator for &'a EventTrace {
    type Item = &'a CacheEvent;
    type IntoIter = std::slice::Iter<'a, CacheEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
