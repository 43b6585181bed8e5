//! Cache Storage Unit Tests.
//!
//! Exercises the set/way grid directly: tagged lookup, invalid-first victim
//! selection, LRU fallback, and the effect of install/touch on stamps and data.

use cachesim_core::cache::CacheStore;
use pretty_assertions::assert_eq;

use crate::common::example_config;

#[test]
fn new_store_is_empty() {
    let store = CacheStore::new(&example_config());
    assert_eq!(store.sets().len(), 4);
    assert_eq!(store.associativity(), 2);
    assert_eq!(store.valid_lines(), 0);
    assert_eq!(store.clock(), 0);
    assert!(store.sets().iter().flat_map(|s| &s.ways).all(|l| !l.valid && !l.dirty));
}

#[test]
fn lookup_misses_on_empty_set() {
    let store = CacheStore::new(&example_config());
    assert_eq!(store.lookup(1, 3), None);
}

#[test]
fn lookup_finds_installed_tag_only_in_its_set() {
    let mut store = CacheStore::new(&example_config());
    assert!(store.install(1, 1, 3, 52, false));

    assert_eq!(store.lookup(1, 3), Some(1));
    assert_eq!(store.lookup(2, 3), None);
    assert_eq!(store.lookup(1, 4), None);
}

#[test]
fn lookup_out_of_range_set_is_a_miss() {
    let store = CacheStore::new(&example_config());
    assert_eq!(store.lookup(99, 0), None);
}

/// A matching tag in an invalid line is not a hit.
#[test]
fn lookup_ignores_invalid_lines() {
    let store = CacheStore::new(&example_config());
    // Every line starts with tag 0 but valid == false.
    assert_eq!(store.lookup(0, 0), None);
}

#[test]
fn victim_prefers_first_invalid_way() {
    let mut store = CacheStore::new(&example_config());
    assert_eq!(store.select_victim(1), Some(0));

    assert!(store.install(1, 0, 3, 0, false));
    assert_eq!(store.select_victim(1), Some(1));
}

#[test]
fn victim_skips_valid_ways_before_an_invalid_one() {
    let mut store = CacheStore::new(&example_config());
    assert!(store.install(2, 1, 9, 0, false));
    assert_eq!(store.select_victim(2), Some(0));
}

#[test]
fn victim_falls_back_to_lru_when_full() {
    let mut store = CacheStore::new(&example_config());
    assert!(store.install(1, 0, 3, 0, false));
    assert!(store.install(1, 1, 7, 0, false));
    assert_eq!(store.select_victim(1), Some(0));

    assert!(store.touch(1, 0));
    assert_eq!(store.select_victim(1), Some(1));
}

#[test]
fn install_sets_every_field() {
    let mut store = CacheStore::new(&example_config());
    assert!(store.install(3, 1, 0xF, 77, true));

    let line = store.line(3, 1).unwrap();
    assert!(line.valid);
    assert!(line.dirty);
    assert_eq!(line.tag, 0xF);
    assert_eq!(line.data, Some(77));
    assert_eq!(line.last_used, 1);
    assert_eq!(store.valid_lines(), 1);
}

#[test]
fn touch_only_refreshes_the_stamp() {
    let mut store = CacheStore::new(&example_config());
    assert!(store.install(0, 0, 2, 8, true));
    let before = store.line(0, 0).cloned().unwrap();

    assert!(store.touch(0, 0));
    let after = store.line(0, 0).cloned().unwrap();

    assert_eq!(after.last_used, before.last_used + 1);
    assert_eq!((after.valid, after.dirty, after.tag, after.data), (true, true, 2, Some(8)));
}

#[test]
fn clock_is_shared_across_sets() {
    let mut store = CacheStore::new(&example_config());
    assert!(store.install(0, 0, 1, 0, false));
    assert!(store.install(3, 0, 1, 0, false));
    assert!(store.touch(0, 0));

    assert_eq!(store.clock(), 3);
    assert_eq!(store.line(3, 0).unwrap().last_used, 2);
    assert_eq!(store.line(0, 0).unwrap().last_used, 3);
}

#[test]
fn line_out_of_range_is_none() {
    let store = CacheStore::new(&example_config());
    assert!(store.line(4, 0).is_none());
    assert!(store.line(0, 2).is_none());
}

#[test]
fn victim_out_of_range_set_is_none() {
    let store = CacheStore::new(&example_config());
    assert_eq!(store.lookup(9, 0), None);
    assert_eq!(store.select_victim(9), None);
}

/// Out-of-range mutations report failure and leave the store, clock included, unchanged.
#[test]
fn mutations_out_of_range_are_rejected() {
    let mut store = CacheStore::new(&example_config());
    assert!(store.install(0, 0, 1, 5, false));
    let before = store.clone();

    assert!(!store.install(9, 0, 3, 0, true));
    assert!(!store.install(0, 2, 3, 0, true));
    assert!(!store.touch(4, 0));
    assert!(!store.touch(0, 7));

    assert_eq!(store, before);
    assert_eq!(store.clock(), 1);
}
