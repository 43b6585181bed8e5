use cachesim_core::{
    AccessKind, AllocationPolicy, CacheConfig, ConfigUpdate, Engine, EventTrace, Word, WritePolicy,
};
use tracing_subscriber::EnvFilter;

/// Installs a test-friendly tracing subscriber once per process.
///
/// Set `RUST_LOG=cachesim_core=trace` to see every applied event.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// The reference geometry used throughout the tests.
///
/// 4 sets, 2 ways, 4-byte blocks, 8-bit addresses, write-back, write-allocate:
///   - offset bits = 2, index bits = 2, tag bits = 4
///   - index = (addr >> 2) & 0b11
///   - tag   = addr >> 4
///
/// Addresses 0x34, 0x74, 0xB4 all map to set 1 with tags 3, 7, 11.
pub fn example_config() -> CacheConfig {
    CacheConfig {
        set_count: 4,
        associativity: 2,
        block_size: 4,
        write_policy: WritePolicy::WriteBack,
        allocation_policy: AllocationPolicy::WriteAllocate,
        address_width: 8,
    }
}

pub struct TestContext {
    pub engine: Engine,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new(example_config())
    }
}

impl TestContext {
    pub fn new(config: CacheConfig) -> Self {
        init_tracing();
        let engine = match Engine::new(config) {
            Ok(engine) => engine,
            Err(e) => panic!("test configuration rejected: {e}"),
        };
        Self { engine }
    }

    /// Builds the reference configuration with the given policies.
    pub fn with_policies(write: WritePolicy, allocation: AllocationPolicy) -> Self {
        let config = ConfigUpdate {
            write_policy: Some(write),
            allocation_policy: Some(allocation),
            ..ConfigUpdate::default()
        }
        .merge_into(&example_config());
        Self::new(config)
    }

    /// Issues a request, steps it to completion, and returns its trace.
    pub fn request(&mut self, kind: AccessKind, address: u64, data: Option<Word>) -> EventTrace {
        if let Err(e) = self.engine.process_request(kind, address, data) {
            panic!("request {kind} {address:#x} rejected: {e}");
        }
        let _ = self.engine.run_to_completion();
        self.engine.last_trace().cloned().unwrap_or_default()
    }

    pub fn read(&mut self, address: u64) -> EventTrace {
        self.request(AccessKind::Read, address, None)
    }

    pub fn write(&mut self, address: u64, data: Word) -> EventTrace {
        self.request(AccessKind::Write, address, Some(data))
    }

    /// Value held in main memory at `address`.
    pub fn mem(&self, address: u64) -> Word {
        self.engine.memory().read(address).unwrap_or_else(|| panic!("no cell {address:#x}"))
    }
}
