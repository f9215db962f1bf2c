//! Sellers.

use serde::{Deserialize, Serialize};
use shopcore_foundation::{Id, Result, validate};
use shopcore_storage::Entity;

use crate::address::Address;

/// Handle to a live seller.
pub type SellerId = Id<SellerRec>;

/// A seller's attribute state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerRec {
    pub(crate) name: String,
    pub(crate) address: Address,
}

impl SellerRec {
    /// Returns the seller name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the business address.
    #[must_use]
    pub fn address(&self) -> &Address {
        &self.address
    }
}

impl Entity for SellerRec {
    const KIND: &'static str = "seller";
    const EXTENT: &'static str = "sellers";
}

/// Candidate state for a new seller.
#[derive(Debug, Clone)]
pub struct SellerParams {
    /// Business name, 2 to 100 characters.
    pub name: String,
    /// Business address.
    pub address: Address,
}

impl SellerParams {
    /// Validates the candidate.
    ///
    /// # Errors
    /// Returns `OutOfRange` when the name length is off.
    pub fn validate(&self) -> Result<()> {
        validate::length_between("name", &self.name, 2, 100)
    }

    pub(crate) fn into_record(self) -> SellerRec {
        SellerRec {
            name: self.name,
            address: self.address,
        }
    }
}
