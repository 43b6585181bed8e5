//! Request planning.
//!
//! The planner resolves a request against a read-only view of the cache and produces
//! the complete [`EventTrace`] for it. It never mutates anything, so planning the same
//! request against the same snapshot always yields the same trace.
//!
//! # Protocol
//!
//! 1. `START`, `DECODE`, `CHECK_SET`, `CHECK_HIT`.
//! 2. Hit: `HIT`, `TOUCH_LRU`; a write then updates the line (`INSTALL_LINE`) and, under
//!    write-through, also memory (`WRITE_BACK`).
//! 3. Miss: `MISS`; a write under no-write-allocate ends with `NO_ALLOCATE_WRITE`.
//!    Otherwise a victim is chosen (`EVICT`, plus `WRITE_BACK` if it was dirty), the block
//!    is fetched (`FETCH_MEMORY`), and the line is filled (`INSTALL_LINE`).

use tracing::warn;

use super::event::{CacheEvent, EventTrace, LineFill};
use crate::cache::CacheStore;
use crate::common::{AccessKind, AddressLayout, Word};
use crate::config::{AllocationPolicy, CacheConfig, WritePolicy};

/// Read-only view of the state a request is planned against.
#[derive(Clone, Copy, Debug)]
pub struct RequestPlanner<'a> {
    config: &'a CacheConfig,
    layout: &'a AddressLayout,
    cache: &'a CacheStore,
}

impl<'a> RequestPlanner<'a> {
    /// Creates a planner over a snapshot.
    ///
    /// `layout` must be the layout of `config`, and `cache` must have `config`'s geometry.
    /// If the geometries disagree and a miss lands on a set the cache does not have, the
    /// trace ends after `MISS`.
    pub const fn new(
        config: &'a CacheConfig,
        layout: &'a AddressLayout,
        cache: &'a CacheStore,
    ) -> Self {
        Self {
            config,
            layout,
            cache,
        }
    }

    /// Plans one request.
    ///
    /// `data` is only used for writes; a write without data stores `0`. The caller is
    /// responsible for rejecting addresses outside the address space.
    pub fn plan(&self, kind: AccessKind, address: u64, data: Option<Word>) -> EventTrace {
        let breakdown = self.layout.decode(address);
        let (set, tag) = (breakdown.index, breakdown.tag);
        let value = data.unwrap_or_default();

        let mut events = vec![
            CacheEvent::Start {
                kind,
                address,
                data: kind.is_write().then_some(value),
            },
            CacheEvent::Decode { breakdown },
            CacheEvent::CheckSet { set },
            CacheEvent::CheckHit { set, tag },
        ];

        match self.cache.lookup(set, tag) {
            Some(way) => self.plan_hit(&mut events, kind, address, value, set, way, tag),
            None => self.plan_miss(&mut events, kind, address, value, set, tag),
        }

        EventTrace::new(events)
    }

    #[allow(clippy::too_many_arguments)]
    fn plan_hit(
        &self,
        events: &mut Vec<CacheEvent>,
        kind: AccessKind,
        address: u64,
        value: Word,
        set: usize,
        way: usize,
        tag: u64,
    ) {
        events.push(CacheEvent::Hit { set, way });
        events.push(CacheEvent::TouchLru { set, way });

        if kind == AccessKind::Read {
            return;
        }

        let fill = LineFill::Value { data: value };
        match self.config.write_policy {
            WritePolicy::WriteThrough => {
                events.push(CacheEvent::InstallLine {
                    set,
                    way,
                    tag,
                    fill,
                    dirty: false,
                });
                events.push(CacheEvent::WriteBack {
                    address,
                    data: value,
                });
            }
            WritePolicy::WriteBack => events.push(CacheEvent::InstallLine {
                set,
                way,
                tag,
                fill,
                dirty: true,
            }),
        }
    }

    fn plan_miss(
        &self,
        events: &mut Vec<CacheEvent>,
        kind: AccessKind,
        address: u64,
        value: Word,
        set: usize,
        tag: u64,
    ) {
        events.push(CacheEvent::Miss { set });

        if kind.is_write() && self.config.allocation_policy == AllocationPolicy::NoWriteAllocate {
            events.push(CacheEvent::NoAllocateWrite {
                address,
                data: value,
            });
            return;
        }

        let Some(way) = self.cache.select_victim(set) else {
            warn!(set, "set is outside the cache geometry; nothing to fill");
            return;
        };
        if let Some(victim) = self.cache.line(set, way).filter(|line| line.valid) {
            events.push(CacheEvent::Evict {
                set,
                way,
                tag: victim.tag,
                dirty: victim.dirty,
            });
            if victim.dirty {
                events.push(CacheEvent::WriteBack {
                    address: self.layout.reconstruct(victim.tag, set),
                    data: victim.data.unwrap_or_default(),
                });
            }
        }

        events.push(CacheEvent::FetchMemory { address });

        let fill = match kind {
            AccessKind::Write => LineFill::Value { data: value },
            AccessKind::Read => LineFill::Memory { address },
        };
        events.push(CacheEvent::InstallLine {
            set,
            way,
            tag,
            fill,
            dirty: kind.is_write() && self.config.write_policy == WritePolicy::WriteBack,
        });
    }
}
