//! Orders and order lines.
//!
//! An order record carries only its own attributes. Which customer owns it
//! and which lines it contains are link-index concerns handled by the shop,
//! so a record loaded from disk starts out detached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shopcore_foundation::{Error, Id, Result};
use shopcore_storage::Entity;

/// Handle to a live order.
pub type OrderId = Id<OrderRec>;

/// Handle to a live order line.
pub type OrderLineId = Id<OrderLineRec>;

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed but not yet picked.
    Pending,
    /// Being picked and packed.
    Processing,
    /// Handed to the carrier.
    Shipped,
    /// Received by the customer.
    Delivered,
    /// Cancelled before delivery.
    Cancelled,
}

/// How an order reaches the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryType {
    /// Regular postal delivery.
    Standard,
    /// Expedited delivery.
    Express,
    /// Collected at the store.
    Pickup,
    /// Same-day courier.
    Courier,
}

/// An order's attribute state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRec {
    pub(crate) placed_at: DateTime<Utc>,
    pub(crate) status: OrderStatus,
    pub(crate) delivery: DeliveryType,
    pub(crate) hidden: bool,
}

impl OrderRec {
    /// Returns when the order was placed.
    #[must_use]
    pub fn placed_at(&self) -> DateTime<Utc> {
        self.placed_at
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Returns the delivery method.
    #[must_use]
    pub fn delivery(&self) -> DeliveryType {
        self.delivery
    }

    /// Returns `true` if the order is hidden from customer-facing listings.
    #[must_use]
    pub fn hidden(&self) -> bool {
        self.hidden
    }
}

impl Entity for OrderRec {
    const KIND: &'static str = "order";
    const EXTENT: &'static str = "orders";
}

/// An order line's attribute state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLineRec {
    pub(crate) quantity: u32,
}

impl OrderLineRec {
    /// Returns the ordered quantity.
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

impl Entity for OrderLineRec {
    const KIND: &'static str = "order line";
    const EXTENT: &'static str = "order_lines";
}

/// Candidate state for a new order.
#[derive(Debug, Clone)]
pub struct OrderParams {
    /// When the order was placed.
    pub placed_at: DateTime<Utc>,
    /// Initial lifecycle state.
    pub status: OrderStatus,
    /// Delivery method.
    pub delivery: DeliveryType,
}

impl OrderParams {
    pub(crate) fn into_record(self) -> OrderRec {
        OrderRec {
            placed_at: self.placed_at,
            status: self.status,
            delivery: self.delivery,
            hidden: false,
        }
    }
}

/// Checks an order line quantity.
///
/// # Errors
/// Returns `OutOfRange` when the quantity is zero.
pub fn validate_quantity(quantity: u32) -> Result<()> {
    if quantity == 0 {
        return Err(Error::out_of_range("quantity", "must be at least 1"));
    }
    Ok(())
}
