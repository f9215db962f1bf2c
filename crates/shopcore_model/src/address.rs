//! The address value object.

use serde::{Deserialize, Serialize};
use shopcore_foundation::{Result, validate};

/// A validated postal address.
///
/// Addresses are immutable values with no identity of their own; they are
/// composed into customers, sellers, and manufacturers and inlined by the
/// persistence adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    street: String,
    city: String,
    state: String,
    postal_code: String,
    country: String,
}

impl Address {
    /// Validates the fields and builds the address.
    ///
    /// # Errors
    /// Returns `OutOfRange` naming the first offending field.
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        postal_code: impl Into<String>,
        country: impl Into<String>,
    ) -> Result<Self> {
        let street = street.into();
        let city = city.into();
        let state = state.into();
        let postal_code = postal_code.into();
        let country = country.into();

        validate::length_between("street", &street, 1, 100)?;
        validate::length_between("city", &city, 1, 50)?;
        validate::length_between("state", &state, 1, 50)?;
        validate::postal_code("postal_code", &postal_code)?;
        validate::length_between("country", &country, 1, 50)?;

        Ok(Self {
            street,
            city,
            state,
            postal_code,
            country,
        })
    }

    /// Returns the street line.
    #[must_use]
    pub fn street(&self) -> &str {
        &self.street
    }

    /// Returns the city.
    #[must_use]
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Returns the state or region.
    #[must_use]
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Returns the postal code.
    #[must_use]
    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }

    /// Returns the country.
    #[must_use]
    pub fn country(&self) -> &str {
        &self.country
    }
}
