//! Integration tests for shop configuration
//!
//! Tests defaults, builder chaining, and range enforcement.

use std::path::Path;

use shopcore_foundation::config::{
    DEFAULT_DATA_DIR, DEFAULT_LEGAL_ADULT_AGE, DEFAULT_STORE_FEE_PERCENT, validate_legal_adult_age,
};
use shopcore_foundation::{ErrorKind, ShopConfig};

// =============================================================================
// Defaults
// =============================================================================

#[test]
fn default_values() {
    let config = ShopConfig::default();
    assert_eq!(config.legal_adult_age(), DEFAULT_LEGAL_ADULT_AGE);
    assert_eq!(config.store_fee_percent(), DEFAULT_STORE_FEE_PERCENT);
    assert_eq!(config.data_dir(), Path::new(DEFAULT_DATA_DIR));
}

#[test]
fn new_equals_default() {
    assert_eq!(ShopConfig::new(), ShopConfig::default());
}

// =============================================================================
// Builders
// =============================================================================

#[test]
fn builders_chain() {
    let config = ShopConfig::new()
        .with_legal_adult_age(21)
        .unwrap()
        .with_store_fee_percent(0)
        .unwrap()
        .with_data_dir("scratch/extents");

    assert_eq!(config.legal_adult_age(), 21);
    assert_eq!(config.store_fee_percent(), 0);
    assert_eq!(config.data_dir(), Path::new("scratch/extents"));
}

#[test]
fn boundary_values_accepted() {
    assert!(ShopConfig::new().with_legal_adult_age(1).is_ok());
    assert!(ShopConfig::new().with_legal_adult_age(150).is_ok());
    assert!(ShopConfig::new().with_store_fee_percent(100).is_ok());
}

// =============================================================================
// Range Enforcement
// =============================================================================

#[test]
fn adult_age_zero_rejected() {
    let err = ShopConfig::new().with_legal_adult_age(0).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::OutOfRange {
            field: "legal_adult_age",
            ..
        }
    ));
}

#[test]
fn adult_age_above_150_rejected() {
    let err = ShopConfig::new().with_legal_adult_age(151).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::OutOfRange { .. }));
}

#[test]
fn fee_above_100_rejected() {
    let err = ShopConfig::new().with_store_fee_percent(101).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::OutOfRange {
            field: "store_fee_percent",
            ..
        }
    ));
}

#[test]
fn standalone_age_check_matches_builder() {
    assert!(validate_legal_adult_age(18).is_ok());
    assert!(validate_legal_adult_age(0).is_err());
    assert!(validate_legal_adult_age(151).is_err());
}
