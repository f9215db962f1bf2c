//! Flat-file persistence for extents.
//!
//! One file per entity type, named after the type's plural extent name,
//! holding a pretty-printed JSON array of full attribute state. An absent
//! file is not an error on load; it decodes to an empty extent.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use shopcore_foundation::{Error, Result};
use tracing::{debug, info};

/// Returns the file path an extent is stored at.
#[must_use]
pub fn extent_path(directory: &Path, name: &str) -> PathBuf {
    directory.join(format!("{name}.json"))
}

/// Saves an extent snapshot, creating the directory when missing.
///
/// # Errors
/// Returns `Io` on filesystem failures and `Codec` when encoding fails.
pub fn save_extent<T: Serialize>(directory: &Path, name: &str, items: &[T]) -> Result<()> {
    fs::create_dir_all(directory)?;
    let path = extent_path(directory, name);
    let payload =
        serde_json::to_vec_pretty(items).map_err(|err| Error::codec(err.to_string()))?;
    fs::write(&path, payload)?;
    info!(extent = name, count = items.len(), path = %path.display(), "extent saved");
    Ok(())
}

/// Loads an extent, decoding the records in file order.
///
/// An absent file yields an empty list.
///
/// # Errors
/// Returns `Io` on filesystem failures and `Codec` when the file does not
/// decode.
pub fn load_extent<T: DeserializeOwned>(directory: &Path, name: &str) -> Result<Vec<T>> {
    let path = extent_path(directory, name);
    if !path.exists() {
        debug!(extent = name, "extent file absent, decoding empty");
        return Ok(Vec::new());
    }
    let payload = fs::read(&path)?;
    let items: Vec<T> =
        serde_json::from_slice(&payload).map_err(|err| Error::codec(err.to_string()))?;
    info!(extent = name, count = items.len(), path = %path.display(), "extent loaded");
    Ok(items)
}

/// Reports whether an extent file exists.
#[must_use]
pub fn extent_exists(directory: &Path, name: &str) -> bool {
    extent_path(directory, name).is_file()
}
