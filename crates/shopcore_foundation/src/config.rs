//! Shop configuration.
//!
//! Everything the original system kept as static mutable fields lives here
//! as an explicit value threaded into the shop at construction.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Default legal adult age in years.
pub const DEFAULT_LEGAL_ADULT_AGE: u8 = 18;

/// Default store fee applied to products, in percent.
pub const DEFAULT_STORE_FEE_PERCENT: u8 = 5;

/// Default directory for persisted extents, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = "Data";

/// Configuration threaded through a shop instance.
///
/// There is no global state; two shops may run different policies side by
/// side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopConfig {
    legal_adult_age: u8,
    store_fee_percent: u8,
    data_dir: PathBuf,
}

impl ShopConfig {
    /// Creates the default configuration (adult age 18, fee 5%, "Data" dir).
    #[must_use]
    pub fn new() -> Self {
        Self {
            legal_adult_age: DEFAULT_LEGAL_ADULT_AGE,
            store_fee_percent: DEFAULT_STORE_FEE_PERCENT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }

    /// Sets the legal adult age used by the age gate.
    ///
    /// # Errors
    /// Returns `OutOfRange` unless `1 ..= 150`.
    pub fn with_legal_adult_age(mut self, years: u8) -> Result<Self> {
        validate_legal_adult_age(years)?;
        self.legal_adult_age = years;
        Ok(self)
    }

    /// Sets the store fee percentage applied to product pricing.
    ///
    /// # Errors
    /// Returns `OutOfRange` above 100.
    pub fn with_store_fee_percent(mut self, percent: u8) -> Result<Self> {
        if percent > 100 {
            return Err(Error::out_of_range(
                "store_fee_percent",
                "must be between 0 and 100",
            ));
        }
        self.store_fee_percent = percent;
        Ok(self)
    }

    /// Sets the directory persisted extents are written to.
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Returns the legal adult age in years.
    #[must_use]
    pub fn legal_adult_age(&self) -> u8 {
        self.legal_adult_age
    }

    /// Returns the store fee percentage.
    #[must_use]
    pub fn store_fee_percent(&self) -> u8 {
        self.store_fee_percent
    }

    /// Returns the directory persisted extents are written to.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Checks a legal adult age value against the permitted `1 ..= 150` range.
///
/// # Errors
/// Returns `OutOfRange` outside the range.
pub fn validate_legal_adult_age(years: u8) -> Result<()> {
    if years == 0 || years > 150 {
        return Err(Error::out_of_range(
            "legal_adult_age",
            "must be between 1 and 150",
        ));
    }
    Ok(())
}
