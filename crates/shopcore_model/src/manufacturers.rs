//! Manufacturers.

use serde::{Deserialize, Serialize};
use shopcore_foundation::{Id, Result, validate};
use shopcore_storage::Entity;

use crate::address::Address;

/// Handle to a live manufacturer.
pub type ManufacturerId = Id<ManufacturerRec>;

/// A manufacturer's attribute state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManufacturerRec {
    pub(crate) name: String,
    pub(crate) address: Address,
}

impl ManufacturerRec {
    /// Returns the manufacturer name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the factory address.
    #[must_use]
    pub fn address(&self) -> &Address {
        &self.address
    }
}

impl Entity for ManufacturerRec {
    const KIND: &'static str = "manufacturer";
    const EXTENT: &'static str = "manufacturers";
}

/// Candidate state for a new manufacturer.
#[derive(Debug, Clone)]
pub struct ManufacturerParams {
    /// Company name, 2 to 100 characters.
    pub name: String,
    /// Factory address.
    pub address: Address,
}

impl ManufacturerParams {
    /// Validates the candidate.
    ///
    /// # Errors
    /// Returns `OutOfRange` when the name length is off.
    pub fn validate(&self) -> Result<()> {
        validate::length_between("name", &self.name, 2, 100)
    }

    pub(crate) fn into_record(self) -> ManufacturerRec {
        ManufacturerRec {
            name: self.name,
            address: self.address,
        }
    }
}
