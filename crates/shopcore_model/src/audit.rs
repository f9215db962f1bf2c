//! Whole-graph consistency audit.
//!
//! [`Shop::check_consistency`] walks every extent and index and verifies the
//! structural rules that hold at all times, including right after a partial
//! load: both sides of every link agree, nothing points at a dead slot, no
//! collection carries duplicates, product names are unique and indexed.
//! [`Shop::check_minimums`] adds the operational floors (an order has a
//! customer and a line, a discount applies to something) that a partial load
//! legitimately suspends until the neighboring extents are reattached.
//!
//! Property tests lean on both after every mutation; a failure message names
//! the broken rule and the handles involved.

use std::collections::HashSet;

use shopcore_foundation::{Error, Result};

use crate::shop::Shop;

fn duplicate_free<T: std::hash::Hash + Eq + Copy>(
    items: impl IntoIterator<Item = T>,
    what: &str,
) -> Result<()> {
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item) {
            return Err(Error::internal(format!("{what} listed twice")));
        }
    }
    Ok(())
}

impl Shop {
    /// Verifies every structural rule of the graph.
    ///
    /// # Errors
    /// Returns `Internal` naming the first rule found broken.
    pub fn check_consistency(&self) -> Result<()> {
        self.check_order_customer_links()?;
        self.check_product_seller_links()?;
        self.check_line_links()?;
        self.check_clothing_links()?;
        self.check_discount_links()?;
        self.check_name_index()?;
        Ok(())
    }

    /// Verifies the operational minimum cardinalities.
    ///
    /// # Errors
    /// Returns `Internal` naming the first floor found broken.
    pub fn check_minimums(&self) -> Result<()> {
        for order in self.orders() {
            if self.order_customer(order)?.is_none() {
                return Err(Error::internal(format!("order {order} has no customer")));
            }
            if self.order_lines_of(order)?.is_empty() {
                return Err(Error::internal(format!("order {order} has no lines")));
            }
        }
        for discount in self.discounts() {
            if self.discount_products(discount)?.is_empty() {
                return Err(Error::internal(format!(
                    "discount {discount} applies to no product"
                )));
            }
        }
        Ok(())
    }

    fn check_order_customer_links(&self) -> Result<()> {
        for order in self.orders() {
            if let Some(customer) = self.order_customer(order)? {
                if !self.customer_orders(customer)?.contains(&order) {
                    return Err(Error::internal(format!(
                        "order {order} points at customer {customer} who does not list it"
                    )));
                }
            }
        }
        for customer in self.customers() {
            let owned = self.customer_orders(customer)?;
            duplicate_free(owned.iter().copied(), "customer order")?;
            for order in owned {
                if self.order_customer(order)? != Some(customer) {
                    return Err(Error::internal(format!(
                        "customer {customer} lists order {order} owned elsewhere"
                    )));
                }
            }
        }
        Ok(())
    }

    fn check_product_seller_links(&self) -> Result<()> {
        for product in self.products() {
            if let Some(seller) = self.product_seller(product)? {
                if !self.seller_products(seller)?.contains(&product) {
                    return Err(Error::internal(format!(
                        "product {product} points at seller {seller} who does not list it"
                    )));
                }
            }
        }
        for seller in self.sellers() {
            let owned = self.seller_products(seller)?;
            duplicate_free(owned.iter().copied(), "seller product")?;
            for product in owned {
                if self.product_seller(product)? != Some(seller) {
                    return Err(Error::internal(format!(
                        "seller {seller} lists product {product} owned elsewhere"
                    )));
                }
            }
        }
        Ok(())
    }

    fn check_line_links(&self) -> Result<()> {
        for line in self.order_lines() {
            if let Some(order) = self.line_order(line)? {
                if !self.order_lines_of(order)?.contains(&line) {
                    return Err(Error::internal(format!(
                        "line {line} points at order {order} which does not list it"
                    )));
                }
            }
            if let Some(product) = self.line_product(line)? {
                if !self.product_lines(product)?.contains(&line) {
                    return Err(Error::internal(format!(
                        "line {line} points at product {product} which does not list it"
                    )));
                }
            }
        }
        for order in self.orders() {
            let lines = self.order_lines_of(order)?;
            duplicate_free(lines.iter().copied(), "order line")?;
            let mut products = HashSet::new();
            for line in lines {
                if self.line_order(line)? != Some(order) {
                    return Err(Error::internal(format!(
                        "order {order} lists line {line} belonging elsewhere"
                    )));
                }
                // The (product, order) pair is unique within an order.
                if let Some(product) = self.line_product(line)? {
                    if !products.insert(product) {
                        return Err(Error::internal(format!(
                            "order {order} holds product {product} on two lines"
                        )));
                    }
                }
            }
        }
        for product in self.products() {
            let lines = self.product_lines(product)?;
            duplicate_free(lines.iter().copied(), "product line")?;
            for line in lines {
                if self.line_product(line)? != Some(product) {
                    return Err(Error::internal(format!(
                        "product {product} lists line {line} referencing elsewhere"
                    )));
                }
            }
        }
        Ok(())
    }

    fn check_clothing_links(&self) -> Result<()> {
        for product in self.products() {
            let neighbors = self.related_clothing(product)?;
            if neighbors.is_empty() {
                continue;
            }
            duplicate_free(neighbors.iter().copied(), "clothing neighbor")?;
            if !self.product(product)?.kind().is_clothing() {
                return Err(Error::internal(format!(
                    "non-clothing product {product} has clothing relations"
                )));
            }
            for neighbor in neighbors {
                if neighbor == product {
                    return Err(Error::internal(format!(
                        "product {product} is related to itself"
                    )));
                }
                if !self.related_clothing(neighbor)?.contains(&product) {
                    return Err(Error::internal(format!(
                        "clothing relation {product} to {neighbor} is one-sided"
                    )));
                }
            }
        }
        Ok(())
    }

    fn check_discount_links(&self) -> Result<()> {
        for discount in self.discounts() {
            let covered = self.discount_products(discount)?;
            duplicate_free(covered.iter().copied(), "discounted product")?;
            for product in covered {
                if !self.product_discounts(product)?.contains(&discount) {
                    return Err(Error::internal(format!(
                        "discount {discount} covers product {product} which does not list it"
                    )));
                }
            }
        }
        for product in self.products() {
            let applied = self.product_discounts(product)?;
            duplicate_free(applied.iter().copied(), "product discount")?;
            for discount in applied {
                if !self.discount_products(discount)?.contains(&product) {
                    return Err(Error::internal(format!(
                        "product {product} lists discount {discount} which does not cover it"
                    )));
                }
            }
        }
        Ok(())
    }

    fn check_name_index(&self) -> Result<()> {
        let index = self.name_index();
        if index.len() != self.products().len() {
            return Err(Error::internal(format!(
                "name index holds {} entries for {} products",
                index.len(),
                self.products().len()
            )));
        }
        for (key, product) in index {
            let record = self.product(*product).map_err(|_| {
                Error::internal(format!("name index entry '{key}' points at a dead product"))
            })?;
            if record.name().to_lowercase() != *key {
                return Err(Error::internal(format!(
                    "name index entry '{key}' does not match product name '{}'",
                    record.name()
                )));
            }
        }
        Ok(())
    }
}
