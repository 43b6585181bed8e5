//! Stepping engine.
//!
//! The engine owns the configuration, cache, main memory, statistics, and at most one
//! pending [`EventTrace`]. It moves through three states:
//!
//! - **Idle:** no trace outstanding; requests are accepted.
//! - **Planning:** transient, inside [`Engine::process_request`]; nothing is mutated.
//! - **Stepping:** a trace is outstanding; each [`Engine::step`] applies one event.
//!
//! Only `reset`, `update_config`, and `step` mutate state. A request issued while
//! stepping is rejected with [`CacheError::Busy`] and leaves the pending trace untouched,
//! because its victim choices were made against the snapshot it was planned on.

use serde::Serialize;
use tracing::{debug, info, trace, warn};

use super::event::{CacheEvent, EventTrace, LineFill};
use super::planner::RequestPlanner;
use crate::cache::CacheStore;
use crate::common::{AccessKind, AddressBreakdown, AddressLayout, CacheError, Result, Word};
use crate::config::{CacheConfig, ConfigUpdate};
use crate::memory::MainMemory;
use crate::stats::CacheStats;

/// Observable engine state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum EngineState {
    /// No trace outstanding.
    Idle,
    /// A trace is being replayed.
    Stepping,
}

/// Deterministic cache simulator driven one event at a time.
///
/// # Examples
///
/// ```
/// use cachesim_core::{AccessKind, CacheConfig, Engine, EngineState};
/// use cachesim_core::sim::EventKind;
///
/// let mut engine = Engine::new(CacheConfig::default()).unwrap();
/// engine.process_request(AccessKind::Write, 0x10, Some(99)).unwrap();
/// assert_eq!(engine.state(), EngineState::Stepping);
///
/// let applied = engine.run_to_completion();
/// assert!(applied > 0);
/// assert_eq!(engine.state(), EngineState::Idle);
///
/// let last = engine.last_trace().unwrap();
/// assert_eq!(last.count(EventKind::Miss), 1);
/// ```
#[derive(Clone, Debug)]
pub struct Engine {
    config: CacheConfig,
    layout: AddressLayout,
    cache: CacheStore,
    memory: MainMemory,
    stats: CacheStats,
    state: EngineState,
    pending: EventTrace,
    cursor: usize,
    last: Option<EventTrace>,
}

impl Engine {
    /// Creates an engine with an empty cache and freshly initialised memory.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Config`] if `config` is invalid.
    pub fn new(config: CacheConfig) -> Result<Self> {
        config.validate()?;
        let layout = AddressLayout::new(&config)?;
        info!(
            sets = config.set_count,
            ways = config.associativity,
            block = config.block_size,
            width = config.address_width,
            "cache engine created"
        );
        Ok(Self {
            config,
            layout,
            cache: CacheStore::new(&config),
            memory: MainMemory::new(config.memory_size()),
            stats: CacheStats::default(),
            state: EngineState::Idle,
            pending: EventTrace::default(),
            cursor: 0,
            last: None,
        })
    }

    /// Invalidates every line, restores memory to its initial contents, clears the
    /// statistics, and drops any pending trace.
    pub fn reset(&mut self) {
        self.cache = CacheStore::new(&self.config);
        self.memory = MainMemory::new(self.config.memory_size());
        self.clear_session();
        info!("cache engine reset");
    }

    /// Merges `update` into the configuration and rebuilds the cache.
    ///
    /// Main memory is only rebuilt if the address width changed. Statistics and any
    /// pending trace are discarded.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Config`] if the merged configuration is invalid; the engine
    /// is left exactly as it was.
    pub fn update_config(&mut self, update: ConfigUpdate) -> Result<()> {
        let next = update.merge_into(&self.config);
        next.validate()?;
        let layout = AddressLayout::new(&next)?;

        if next.address_width != self.config.address_width {
            self.memory = MainMemory::new(next.memory_size());
        }
        self.config = next;
        self.layout = layout;
        self.cache = CacheStore::new(&self.config);
        self.clear_session();
        info!(?update, "cache configuration updated");
        Ok(())
    }

    /// Plans a request and makes its trace pending.
    ///
    /// # Errors
    ///
    /// - [`CacheError::Busy`] if another trace is still being stepped.
    /// - [`CacheError::AddressOutOfRange`] if `address >= 2^address_width`.
    ///
    /// Neither error changes any state.
    pub fn process_request(
        &mut self,
        kind: AccessKind,
        address: u64,
        data: Option<Word>,
    ) -> Result<()> {
        if self.state == EngineState::Stepping {
            let err = CacheError::Busy {
                cursor: self.cursor,
                remaining: self.pending.len() - self.cursor,
            };
            warn!(%kind, address, "request rejected: {err}");
            return Err(err);
        }

        if address >= self.memory.len() as u64 {
            let err = CacheError::AddressOutOfRange {
                address,
                width: self.config.address_width,
            };
            warn!(%kind, address, "request rejected: {err}");
            return Err(err);
        }

        let planned = RequestPlanner::new(&self.config, &self.layout, &self.cache)
            .plan(kind, address, data);
        debug!(
            %kind,
            address,
            events = planned.len(),
            kinds = ?planned.kinds(),
            "request planned"
        );

        self.pending = planned;
        self.cursor = 0;
        self.state = EngineState::Stepping;
        Ok(())
    }

    /// Applies the next pending event.
    ///
    /// # Returns
    ///
    /// `true` if more events remain. When idle this is a no-op returning `false`.
    pub fn step(&mut self) -> bool {
        if self.state == EngineState::Idle {
            return false;
        }

        let Some(event) = self.pending.get(self.cursor).cloned() else {
            self.finish();
            return false;
        };
        trace!(cursor = self.cursor, "{event}");
        self.apply(&event);
        self.cursor += 1;

        if self.cursor >= self.pending.len() {
            self.finish();
            false
        } else {
            true
        }
    }

    /// Steps until the pending trace is exhausted.
    ///
    /// # Returns
    ///
    /// The number of events applied (zero when idle).
    pub fn run_to_completion(&mut self) -> usize {
        let mut applied = 0;
        while self.state == EngineState::Stepping {
            let more = self.step();
            applied += 1;
            if !more {
                break;
            }
        }
        applied
    }

    /// Discards the pending trace without applying the remaining events.
    ///
    /// Events already stepped stay applied.
    ///
    /// # Returns
    ///
    /// The number of events dropped.
    pub fn abandon(&mut self) -> usize {
        if self.state == EngineState::Idle {
            return 0;
        }
        let dropped = self.pending.len() - self.cursor;
        debug!(cursor = self.cursor, dropped, "pending trace abandoned");
        self.finish();
        dropped
    }

    /// Current configuration.
    pub const fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Address field layout of the current configuration.
    pub const fn layout(&self) -> &AddressLayout {
        &self.layout
    }

    /// Decodes `address` under the current configuration.
    pub fn decode(&self, address: u64) -> AddressBreakdown {
        self.layout.decode(address)
    }

    /// Snapshot of the cache.
    pub const fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Snapshot of main memory.
    pub const fn memory(&self) -> &MainMemory {
        &self.memory
    }

    /// Statistics since the last reset or configuration change.
    pub const fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Current state.
    pub const fn state(&self) -> EngineState {
        self.state
    }

    /// Returns `true` while a trace is being stepped.
    pub fn is_processing(&self) -> bool {
        self.state == EngineState::Stepping
    }

    /// The trace being stepped, if any.
    pub fn pending_trace(&self) -> Option<&EventTrace> {
        (self.state == EngineState::Stepping).then_some(&self.pending)
    }

    /// Index of the next event to apply; `0` when idle.
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// The event the next [`step`](Self::step) will apply.
    pub fn current_event(&self) -> Option<&CacheEvent> {
        self.pending_trace()?.get(self.cursor)
    }

    /// The most recently finished (or abandoned) trace.
    pub const fn last_trace(&self) -> Option<&EventTrace> {
        self.last.as_ref()
    }

    fn apply(&mut self, event: &CacheEvent) {
        match *event {
            CacheEvent::Start { .. }
            | CacheEvent::Decode { .. }
            | CacheEvent::CheckSet { .. }
            | CacheEvent::CheckHit { .. }
            | CacheEvent::FetchMemory { .. } => {}
            CacheEvent::Hit { .. } => self.stats.hits += 1,
            CacheEvent::Miss { .. } => self.stats.misses += 1,
            CacheEvent::Evict { .. } => self.stats.evictions += 1,
            CacheEvent::WriteBack { address, data }
            | CacheEvent::NoAllocateWrite { address, data } => {
                if !self.memory.write(address, data) {
                    warn!(address, "memory write outside the address space ignored");
                }
            }
            CacheEvent::InstallLine {
                set,
                way,
                tag,
                fill,
                dirty,
            } => {
                let data = match fill {
                    LineFill::Value { data } => data,
                    LineFill::Memory { address } => {
                        self.memory.read(address).unwrap_or_default()
                    }
                };
                if !self.cache.install(set, way, tag, data, dirty) {
                    warn!(set, way, "line install outside the cache geometry ignored");
                }
            }
            CacheEvent::TouchLru { set, way } => {
                if !self.cache.touch(set, way) {
                    warn!(set, way, "LRU touch outside the cache geometry ignored");
                }
            }
        }
    }

    fn finish(&mut self) {
        self.last = Some(std::mem::take(&mut self.pending));
        self.cursor = 0;
        self.state = EngineState::Idle;
    }

    fn clear_session(&mut self) {
        self.stats = CacheStats::default();
        self.pending = EventTrace::default();
        self.last = None;
        self.cursor = 0;
        self.state = EngineState::Idle;
    }
}
