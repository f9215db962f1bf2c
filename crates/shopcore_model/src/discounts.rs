//! Discounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shopcore_foundation::{Error, Id, Result, validate};
use shopcore_storage::Entity;

/// Handle to a live discount.
pub type DiscountId = Id<DiscountRec>;

/// A discount's attribute state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountRec {
    pub(crate) percentage: u8,
    pub(crate) description: String,
    pub(crate) starts_at: DateTime<Utc>,
    pub(crate) ends_at: DateTime<Utc>,
}

impl DiscountRec {
    /// Returns the percentage off, 0 to 100.
    #[must_use]
    pub fn percentage(&self) -> u8 {
        self.percentage
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns when the discount starts.
    #[must_use]
    pub fn starts_at(&self) -> DateTime<Utc> {
        self.starts_at
    }

    /// Returns when the discount ends.
    #[must_use]
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.ends_at
    }

    /// Returns `true` if the discount is running at the given instant.
    #[must_use]
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        self.starts_at <= at && at <= self.ends_at
    }
}

impl Entity for DiscountRec {
    const KIND: &'static str = "discount";
    const EXTENT: &'static str = "discounts";
}

/// Candidate state for a new discount.
#[derive(Debug, Clone)]
pub struct DiscountParams {
    /// Percentage off, 0 to 100.
    pub percentage: u8,
    /// Description, 5 to 500 characters.
    pub description: String,
    /// When the discount starts.
    pub starts_at: DateTime<Utc>,
    /// When the discount ends, no earlier than the start.
    pub ends_at: DateTime<Utc>,
}

impl DiscountParams {
    /// Validates the candidate.
    ///
    /// # Errors
    /// Returns `OutOfRange` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.percentage > 100 {
            return Err(Error::out_of_range("percentage", "must be at most 100"));
        }
        validate::length_between("description", &self.description, 5, 500)?;
        if self.ends_at < self.starts_at {
            return Err(Error::out_of_range("ends_at", "must not precede starts_at"));
        }
        Ok(())
    }

    pub(crate) fn into_record(self) -> DiscountRec {
        DiscountRec {
            percentage: self.percentage,
            description: self.description,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
        }
    }
}
