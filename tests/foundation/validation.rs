//! Integration tests for field validation helpers
//!
//! Tests the shared validators parameter structs lean on.

use shopcore_foundation::validate::{length_between, min_items, non_blank, phone_number, postal_code};
use shopcore_foundation::ErrorKind;

// =============================================================================
// Text Fields
// =============================================================================

#[test]
fn non_blank_accepts_text() {
    assert!(non_blank("name", "Acme").is_ok());
    assert!(non_blank("name", " padded ").is_ok());
}

#[test]
fn non_blank_rejects_empty_and_whitespace() {
    assert!(non_blank("name", "").is_err());
    assert!(non_blank("name", " \t ").is_err());
}

#[test]
fn length_between_is_inclusive() {
    assert!(length_between("name", "ab", 2, 100).is_ok());
    assert!(length_between("name", &"x".repeat(100), 2, 100).is_ok());
    assert!(length_between("name", "a", 2, 100).is_err());
    assert!(length_between("name", &"x".repeat(101), 2, 100).is_err());
}

#[test]
fn length_counts_characters() {
    // Multibyte characters count once each.
    assert!(length_between("name", "łódź", 4, 4).is_ok());
}

#[test]
fn rejection_names_the_field() {
    let err = length_between("description", "x", 10, 1000).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::OutOfRange {
            field: "description",
            ..
        }
    ));
}

// =============================================================================
// Formatted Fields
// =============================================================================

#[test]
fn phone_number_shapes() {
    assert!(phone_number("phone_number", "+48123456789").is_ok());
    assert!(phone_number("phone_number", "48123456789").is_ok());
    assert!(phone_number("phone_number", "0123456789").is_err());
    assert!(phone_number("phone_number", "+48 123").is_err());
    assert!(phone_number("phone_number", "not-a-phone").is_err());
}

#[test]
fn postal_code_shapes() {
    assert!(postal_code("postal_code", "62701").is_ok());
    assert!(postal_code("postal_code", "00-950").is_ok());
    assert!(postal_code("postal_code", "SW1A 1AA").is_ok());
    assert!(postal_code("postal_code", "sw1a").is_err());
    assert!(postal_code("postal_code", "").is_err());
}

// =============================================================================
// Collections
// =============================================================================

#[test]
fn min_items_floor() {
    let one = ["cotton"];
    let none: [&str; 0] = [];
    assert!(min_items("materials", &one, 1).is_ok());
    assert!(min_items("materials", &none, 1).is_err());
}
