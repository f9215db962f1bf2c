//! Retail entity records and the shop aggregate for shopcore.
//!
//! This crate provides:
//! - [`Shop`] - The aggregate owning every extent and link index
//! - Entity records (`CustomerRec`, `ProductRec`, `OrderRec`, ...) with
//!   two-phase validated parameter structs
//! - [`Address`] - The value object composed into customers, sellers,
//!   and manufacturers
//! - Graph audit entry points used heavily by property tests

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod address;
pub mod audit;
pub mod discounts;
pub mod manufacturers;
pub mod orders;
pub mod people;
pub mod products;
pub mod reviews;
pub mod sellers;
pub mod shop;

pub use address::Address;
pub use discounts::{DiscountId, DiscountParams, DiscountRec};
pub use manufacturers::{ManufacturerId, ManufacturerParams, ManufacturerRec};
pub use orders::{
    DeliveryType, OrderId, OrderLineId, OrderLineRec, OrderParams, OrderRec, OrderStatus,
};
pub use people::{
    CustomerId, CustomerParams, CustomerRec, EmployeeId, EmployeeParams, EmployeeRec,
    EmployeeRole, PersonCore,
};
pub use products::{
    ClothingSize, Gender, ProductCondition, ProductId, ProductKind, ProductParams, ProductRec,
};
pub use reviews::{ReviewId, ReviewParams, ReviewRating, ReviewRec};
pub use sellers::{SellerId, SellerParams, SellerRec};
pub use shop::Shop;
