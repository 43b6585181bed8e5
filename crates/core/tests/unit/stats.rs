//! CacheStats unit tests.
//!
//! Default initialization and derived rates.

use cachesim_core::CacheStats;

#[test]
fn default_stats_all_zero() {
    let stats = CacheStats::default();
    assert_eq!(stats.hits, 0);
    assert_eq!(stats.misses, 0);
    assert_eq!(stats.evictions, 0);
    assert_eq!(stats.accesses(), 0);
}

#[test]
fn rates_are_zero_before_any_access() {
    let stats = CacheStats::default();
    assert!(stats.hit_rate().abs() < f64::EPSILON);
    assert!(stats.miss_rate().abs() < f64::EPSILON);
}

#[test]
fn hit_rate_calculation() {
    let stats = CacheStats {
        hits: 3,
        misses: 1,
        evictions: 0,
    };
    assert_eq!(stats.accesses(), 4);
    assert!((stats.hit_rate() - 0.75).abs() < 1e-12);
    assert!((stats.miss_rate() - 0.25).abs() < 1e-12);
}

#[test]
fn display_lists_every_counter() {
    let stats = CacheStats {
        hits: 1,
        misses: 1,
        evictions: 1,
    };
    let text = stats.to_string();
    assert!(text.contains("cache.hits             1"));
    assert!(text.contains("cache.misses           1"));
    assert!(text.contains("cache.evictions        1"));
    assert!(text.contains("50.00%"));
}
