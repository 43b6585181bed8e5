//! # Error Tests
//!
//! Display text and conversions of the configuration and request errors.

use cachesim_core::{CacheError, ConfigError};

#[test]
fn not_power_of_two_display() {
    let err = ConfigError::NotPowerOfTwo {
        field: "set_count",
        value: 3,
    };
    assert_eq!(
        err.to_string(),
        "set_count must be a positive power of two (got 3)"
    );
}

#[test]
fn address_width_too_small_display() {
    let err = ConfigError::AddressWidthTooSmall {
        required: 6,
        width: 4,
    };
    assert!(err.to_string().contains("need 6 bits"));
    assert!(err.to_string().contains("4 bits wide"));
}

#[test]
fn config_error_converts_into_cache_error() {
    let err: CacheError = ConfigError::AddressWidthTooLarge { width: 40, max: 24 }.into();
    assert!(matches!(err, CacheError::Config(_)));
    assert!(err.to_string().starts_with("invalid configuration"));
}

#[test]
fn address_out_of_range_display_is_hex() {
    let err = CacheError::AddressOutOfRange {
        address: 0x100,
        width: 8,
    };
    assert_eq!(
        err.to_string(),
        "address 0x100 is outside the 8-bit address space"
    );
}

#[test]
fn busy_display_mentions_cursor() {
    let err = CacheError::Busy {
        cursor: 2,
        remaining: 5,
    };
    assert!(err.to_string().contains("5 events remaining at cursor 2"));
}

#[test]
fn errors_are_std_errors() {
    fn assert_error<E: std::error::Error + Send + Sync + 'static>() {}
    assert_error::<ConfigError>();
    assert_error::<CacheError>();
}
