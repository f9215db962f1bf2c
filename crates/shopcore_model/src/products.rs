//! Products and their kind-specific attributes.
//!
//! A product is one record with a [`ProductKind`] tag instead of a class
//! hierarchy. Kind-specific validation lives next to the kind data, so a
//! candidate is checked as a whole before any extent is touched.

use serde::{Deserialize, Serialize};
use shopcore_foundation::{Error, Id, Result, validate};
use shopcore_storage::Entity;

/// Handle to a live product.
pub type ProductId = Id<ProductRec>;

/// Clothing sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ClothingSize {
    /// Extra small.
    Xs,
    /// Small.
    S,
    /// Medium.
    M,
    /// Large.
    L,
    /// Extra large.
    Xl,
    /// Double extra large.
    Xxl,
}

/// Target fit of a clothing item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    /// Cut for men.
    Male,
    /// Cut for women.
    Female,
    /// Single cut for everyone.
    Unisex,
}

/// Wear grade of a second-hand product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCondition {
    /// Barely used.
    LikeNew,
    /// Light wear.
    Good,
    /// Visible wear.
    Fair,
    /// Heavy wear.
    Poor,
}

/// Kind-specific product attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProductKind {
    /// Factory-new stock with a warranty.
    New {
        /// Warranty length in days, at least 1.
        warranty_days: u32,
    },
    /// Second-hand stock.
    Used {
        /// Wear grade.
        condition: ProductCondition,
        /// Description of known defects, 5 to 1000 characters.
        defects_description: String,
    },
    /// Clothing.
    Clothing {
        /// Fabric composition, at least one non-blank entry.
        materials: Vec<String>,
        /// Size label.
        size: ClothingSize,
        /// Target fit.
        gender: Gender,
        /// Care instruction, 5 to 500 characters.
        care_instruction: String,
    },
    /// A phone.
    Phone {
        /// Whether the device is water resistant.
        waterproof: bool,
        /// Storage in gigabytes, at least 1.
        storage_gb: u32,
        /// Battery capacity in milliamp hours, at least 1.
        battery_mah: u32,
        /// CPU model name, 2 to 100 characters.
        cpu_model: String,
    },
    /// A firearm.
    Weapon {
        /// Caliber designation, 1 to 50 characters.
        caliber: String,
        /// Rate of fire, at least 1.
        rounds_per_minute: u32,
        /// Effective range in meters.
        range_meters: u32,
    },
}

impl ProductKind {
    /// Validates the kind-specific fields.
    ///
    /// # Errors
    /// Returns `OutOfRange` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::New { warranty_days } => {
                if *warranty_days == 0 {
                    return Err(Error::out_of_range("warranty_days", "must be at least 1"));
                }
                Ok(())
            }
            Self::Used {
                defects_description,
                ..
            } => validate::length_between("defects_description", defects_description, 5, 1000),
            Self::Clothing {
                materials,
                care_instruction,
                ..
            } => {
                validate::min_items("materials", materials, 1)?;
                for material in materials {
                    validate::non_blank("materials", material)?;
                }
                validate::length_between("care_instruction", care_instruction, 5, 500)
            }
            Self::Phone {
                storage_gb,
                battery_mah,
                cpu_model,
                ..
            } => {
                if *storage_gb == 0 {
                    return Err(Error::out_of_range("storage_gb", "must be at least 1"));
                }
                if *battery_mah == 0 {
                    return Err(Error::out_of_range("battery_mah", "must be at least 1"));
                }
                validate::length_between("cpu_model", cpu_model, 2, 100)
            }
            Self::Weapon {
                caliber,
                rounds_per_minute,
                ..
            } => {
                validate::length_between("caliber", caliber, 1, 50)?;
                if *rounds_per_minute == 0 {
                    return Err(Error::out_of_range(
                        "rounds_per_minute",
                        "must be at least 1",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Returns `true` if this is the clothing kind.
    #[must_use]
    pub fn is_clothing(&self) -> bool {
        matches!(self, Self::Clothing { .. })
    }
}

/// A product's attribute state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRec {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) price_cents: u64,
    pub(crate) adult_only: bool,
    pub(crate) weight_grams: u32,
    pub(crate) stock_quantity: u32,
    pub(crate) kind: ProductKind,
}

impl ProductRec {
    /// Returns the product name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the net price in cents.
    #[must_use]
    pub fn price_cents(&self) -> u64 {
        self.price_cents
    }

    /// Returns `true` if the product is restricted to adult customers.
    #[must_use]
    pub fn adult_only(&self) -> bool {
        self.adult_only
    }

    /// Returns the shipping weight in grams.
    #[must_use]
    pub fn weight_grams(&self) -> u32 {
        self.weight_grams
    }

    /// Returns the units currently in stock.
    #[must_use]
    pub fn stock_quantity(&self) -> u32 {
        self.stock_quantity
    }

    /// Returns the kind-specific attributes.
    #[must_use]
    pub fn kind(&self) -> &ProductKind {
        &self.kind
    }
}

impl Entity for ProductRec {
    const KIND: &'static str = "product";
    const EXTENT: &'static str = "products";
}

/// Candidate state for a new product.
#[derive(Debug, Clone)]
pub struct ProductParams {
    /// Display name, 2 to 100 characters, unique within the shop.
    pub name: String,
    /// Description, 10 to 1000 characters.
    pub description: String,
    /// Net price in cents.
    pub price_cents: u64,
    /// Whether the product is restricted to adult customers.
    pub adult_only: bool,
    /// Shipping weight in grams.
    pub weight_grams: u32,
    /// Units in stock.
    pub stock_quantity: u32,
    /// Kind-specific attributes.
    pub kind: ProductKind,
}

impl ProductParams {
    /// Validates the candidate, uniqueness aside.
    ///
    /// # Errors
    /// Returns `OutOfRange` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        validate::length_between("name", &self.name, 2, 100)?;
        validate::length_between("description", &self.description, 10, 1000)?;
        self.kind.validate()
    }

    pub(crate) fn into_record(self) -> ProductRec {
        ProductRec {
            name: self.name,
            description: self.description,
            price_cents: self.price_cents,
            adult_only: self.adult_only,
            weight_grams: self.weight_grams,
            stock_quantity: self.stock_quantity,
            kind: self.kind,
        }
    }
}
