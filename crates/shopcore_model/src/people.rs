//! Customers and employees.
//!
//! The original model kept an abstract person base; here the shared
//! attributes live in [`PersonCore`] and each concrete kind owns its own
//! extent. There is no combined person registry.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shopcore_foundation::{Error, Id, Result, validate};
use shopcore_storage::Entity;

use crate::address::Address;

/// Handle to a live customer.
pub type CustomerId = Id<CustomerRec>;

/// Handle to a live employee.
pub type EmployeeId = Id<EmployeeRec>;

/// Attributes shared by every person kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonCore {
    /// Given name, 2 to 50 characters.
    pub first_name: String,
    /// Family name, 2 to 50 characters.
    pub last_name: String,
    /// International phone number.
    pub phone_number: String,
}

impl PersonCore {
    /// Validates the shared person fields.
    ///
    /// # Errors
    /// Returns `OutOfRange` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        validate::length_between("first_name", &self.first_name, 2, 50)?;
        validate::length_between("last_name", &self.last_name, 2, 50)?;
        validate::phone_number("phone_number", &self.phone_number)?;
        Ok(())
    }
}

/// Roles an employee can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeRole {
    /// Front desk and checkout.
    Cashier,
    /// Store management.
    Manager,
    /// Stock and fulfilment.
    Warehouse,
    /// Customer support.
    Support,
}

/// A customer's attribute state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRec {
    pub(crate) person: PersonCore,
    pub(crate) date_of_birth: NaiveDate,
    pub(crate) shipping_addresses: Vec<Address>,
}

impl CustomerRec {
    /// Returns the shared person attributes.
    #[must_use]
    pub fn person(&self) -> &PersonCore {
        &self.person
    }

    /// Returns the date of birth.
    #[must_use]
    pub fn date_of_birth(&self) -> NaiveDate {
        self.date_of_birth
    }

    /// Returns the shipping addresses in the order they were added.
    #[must_use]
    pub fn shipping_addresses(&self) -> &[Address] {
        &self.shipping_addresses
    }
}

impl Entity for CustomerRec {
    const KIND: &'static str = "customer";
    const EXTENT: &'static str = "customers";
}

/// An employee's attribute state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRec {
    pub(crate) person: PersonCore,
    pub(crate) role: EmployeeRole,
    pub(crate) salary_cents: u64,
}

impl EmployeeRec {
    /// Returns the shared person attributes.
    #[must_use]
    pub fn person(&self) -> &PersonCore {
        &self.person
    }

    /// Returns the role.
    #[must_use]
    pub fn role(&self) -> EmployeeRole {
        self.role
    }

    /// Returns the salary in cents.
    #[must_use]
    pub fn salary_cents(&self) -> u64 {
        self.salary_cents
    }
}

impl Entity for EmployeeRec {
    const KIND: &'static str = "employee";
    const EXTENT: &'static str = "employees";
}

/// Candidate state for a new customer.
#[derive(Debug, Clone)]
pub struct CustomerParams {
    /// Shared person attributes.
    pub person: PersonCore,
    /// Date of birth; neither in the future nor older than 150 years.
    pub date_of_birth: NaiveDate,
    /// Initial shipping addresses, possibly empty.
    pub shipping_addresses: Vec<Address>,
}

impl CustomerParams {
    /// Validates the candidate.
    ///
    /// # Errors
    /// Returns `OutOfRange` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        self.person.validate()?;
        let today = Utc::now().date_naive();
        match today.years_since(self.date_of_birth) {
            None => Err(Error::out_of_range(
                "date_of_birth",
                "must not be in the future",
            )),
            Some(years) if years > 150 => Err(Error::out_of_range(
                "date_of_birth",
                "must be within the last 150 years",
            )),
            Some(_) => Ok(()),
        }
    }

    pub(crate) fn into_record(self) -> CustomerRec {
        CustomerRec {
            person: self.person,
            date_of_birth: self.date_of_birth,
            shipping_addresses: self.shipping_addresses,
        }
    }
}

/// Candidate state for a new employee.
#[derive(Debug, Clone)]
pub struct EmployeeParams {
    /// Shared person attributes.
    pub person: PersonCore,
    /// The role the employee holds.
    pub role: EmployeeRole,
    /// Salary in cents.
    pub salary_cents: u64,
}

impl EmployeeParams {
    /// Validates the candidate.
    ///
    /// # Errors
    /// Returns `OutOfRange` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        self.person.validate()
    }

    pub(crate) fn into_record(self) -> EmployeeRec {
        EmployeeRec {
            person: self.person,
            role: self.role,
            salary_cents: self.salary_cents,
        }
    }
}

/// Computes a whole-year age at a reference date.
#[must_use]
pub fn age_on(date_of_birth: NaiveDate, on: NaiveDate) -> u32 {
    on.years_since(date_of_birth).unwrap_or(0)
}
