//! Integration tests for the extent file contract
//!
//! Tests file naming, round-tripping, overwrite semantics, and the
//! absent-file no-op.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use shopcore_foundation::ErrorKind;
use shopcore_storage::persist::{extent_exists, extent_path, load_extent, save_extent};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Part {
    name: String,
    origin: Origin,
    count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Origin {
    city: String,
    country: String,
}

fn part(name: &str, count: u32) -> Part {
    Part {
        name: name.to_string(),
        origin: Origin {
            city: "Gdansk".to_string(),
            country: "Poland".to_string(),
        },
        count,
    }
}

fn scratch_dir(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("shopcore-storage-{tag}-{}", std::process::id()))
}

// =============================================================================
// File Contract
// =============================================================================

#[test]
fn extent_file_is_named_after_the_plural() {
    let dir = scratch_dir("naming");
    assert_eq!(extent_path(&dir, "parts"), dir.join("parts.json"));
}

#[test]
fn exists_reports_only_saved_extents() {
    let dir = scratch_dir("exists");
    assert!(!extent_exists(&dir, "parts"));

    save_extent(&dir, "parts", &[part("bolt", 3)]).unwrap();

    assert!(extent_exists(&dir, "parts"));
    assert!(!extent_exists(&dir, "bolts"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn payload_is_self_describing_json() {
    let dir = scratch_dir("payload");
    save_extent(&dir, "parts", &[part("bolt", 3)]).unwrap();

    let text = fs::read_to_string(extent_path(&dir, "parts")).unwrap();
    // Field names and nested value objects appear inline.
    assert!(text.contains("\"name\""));
    assert!(text.contains("\"origin\""));
    assert!(text.contains("\"Gdansk\""));

    let _ = fs::remove_dir_all(&dir);
}

// =============================================================================
// Round Trips
// =============================================================================

#[test]
fn round_trip_preserves_order_and_attributes() {
    let dir = scratch_dir("roundtrip");
    let parts = vec![part("bolt", 3), part("nut", 7), part("washer", 11)];

    save_extent(&dir, "parts", &parts).unwrap();
    let loaded: Vec<Part> = load_extent(&dir, "parts").unwrap();

    assert_eq!(loaded, parts);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn saving_again_replaces_the_snapshot() {
    let dir = scratch_dir("overwrite");

    save_extent(&dir, "parts", &[part("bolt", 3), part("nut", 7)]).unwrap();
    save_extent(&dir, "parts", &[part("washer", 11)]).unwrap();

    let loaded: Vec<Part> = load_extent(&dir, "parts").unwrap();
    assert_eq!(loaded, vec![part("washer", 11)]);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn empty_extent_round_trips() {
    let dir = scratch_dir("empty");

    save_extent::<Part>(&dir, "parts", &[]).unwrap();
    let loaded: Vec<Part> = load_extent(&dir, "parts").unwrap();

    assert!(loaded.is_empty());
    assert!(extent_exists(&dir, "parts"));

    let _ = fs::remove_dir_all(&dir);
}

// =============================================================================
// Failure Modes
// =============================================================================

#[test]
fn loading_an_absent_file_yields_empty() {
    let dir = scratch_dir("absent");
    let loaded: Vec<Part> = load_extent(&dir, "parts").unwrap();
    assert!(loaded.is_empty());
}

#[test]
fn loading_garbage_is_a_codec_error() {
    let dir = scratch_dir("garbage");
    fs::create_dir_all(&dir).unwrap();
    fs::write(extent_path(&dir, "parts"), b"{{{{").unwrap();

    let err = load_extent::<Part>(&dir, "parts").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Codec(_)));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn loading_the_wrong_shape_is_a_codec_error() {
    let dir = scratch_dir("shape");
    fs::create_dir_all(&dir).unwrap();
    // Valid JSON, but an object where an array is required.
    fs::write(extent_path(&dir, "parts"), b"{\"name\": \"bolt\"}").unwrap();

    let err = load_extent::<Part>(&dir, "parts").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Codec(_)));

    let _ = fs::remove_dir_all(&dir);
}
