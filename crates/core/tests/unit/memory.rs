//! Main Memory Tests.
//!
//! Initial contents, bounds handling, and writes.

use cachesim_core::memory::MainMemory;

#[test]
fn cells_start_at_their_address() {
    let mem = MainMemory::new(256);
    assert_eq!(mem.len(), 256);
    assert!(!mem.is_empty());
    assert_eq!(mem.read(0), Some(0));
    assert_eq!(mem.read(0x34), Some(0x34));
    assert_eq!(mem.read(255), Some(255));
}

#[test]
fn read_out_of_range_is_none() {
    let mem = MainMemory::new(16);
    assert_eq!(mem.read(16), None);
    assert_eq!(mem.read(u64::MAX), None);
}

#[test]
fn write_updates_a_single_cell() {
    let mut mem = MainMemory::new(16);
    assert!(mem.write(4, 99));
    assert_eq!(mem.read(4), Some(99));
    assert_eq!(mem.read(3), Some(3));
    assert_eq!(mem.read(5), Some(5));
}

#[test]
fn write_out_of_range_is_ignored() {
    let mut mem = MainMemory::new(16);
    assert!(!mem.write(16, 1));
    assert_eq!(mem.cells(), MainMemory::new(16).cells());
}

#[test]
fn zero_sized_memory() {
    let mem = MainMemory::new(0);
    assert!(mem.is_empty());
    assert_eq!(mem.read(0), None);
}
