//! Cache Replacement Policy Tests.
//!
//! Verifies the logical-clock LRU policy in isolation: stamping on update and victim
//! selection by smallest stamp, with ties going to the lowest way.

use cachesim_core::cache::CacheLine;
use cachesim_core::cache::policies::{LruPolicy, ReplacementPolicy};

fn lines(n: usize) -> Vec<CacheLine> {
    vec![
        CacheLine {
            valid: true,
            ..CacheLine::default()
        };
        n
    ]
}

/// The clock starts at zero and advances once per update.
#[test]
fn lru_clock_advances_per_update() {
    let mut policy = LruPolicy::new();
    let mut ways = lines(2);
    assert_eq!(policy.now(), 0);

    policy.update(&mut ways[0]);
    policy.update(&mut ways[1]);
    policy.update(&mut ways[0]);

    assert_eq!(policy.now(), 3);
    assert_eq!(ways[0].last_used, 3);
    assert_eq!(ways[1].last_used, 2);
}

/// With untouched lines every stamp is zero, so way 0 wins the tie.
#[test]
fn lru_ties_go_to_lowest_way() {
    let policy = LruPolicy::new();
    assert_eq!(policy.get_victim(&lines(4)), 0);
}

/// Accessing ways in order 0,1,2,3 makes 0 the LRU.
#[test]
fn lru_sequential_access_reorders() {
    let mut policy = LruPolicy::new();
    let mut ways = lines(4);
    for way in ways.iter_mut() {
        policy.update(way);
    }
    assert_eq!(policy.get_victim(&ways), 0);
}

/// Classic LRU scenario: access 0,1,2,3 then re-access 0 → LRU becomes 1.
#[test]
fn lru_evicts_true_lru_after_reaccess() {
    let mut policy = LruPolicy::new();
    let mut ways = lines(4);
    for way in ways.iter_mut() {
        policy.update(way);
    }

    policy.update(&mut ways[0]);
    assert_eq!(policy.get_victim(&ways), 1);

    policy.update(&mut ways[1]);
    assert_eq!(policy.get_victim(&ways), 2);
}

/// Only a strictly smaller stamp displaces the current candidate.
#[test]
fn lru_equal_stamps_keep_earlier_way() {
    let policy = LruPolicy::new();
    let mut ways = lines(3);
    ways[0].last_used = 5;
    ways[1].last_used = 2;
    ways[2].last_used = 2;
    assert_eq!(policy.get_victim(&ways), 1);
}

#[test]
fn lru_single_way_is_always_victim() {
    let mut policy = LruPolicy::new();
    let mut ways = lines(1);
    policy.update(&mut ways[0]);
    assert_eq!(policy.get_victim(&ways), 0);
}
