//! The shop aggregate.
//!
//! `Shop` owns one registry per entity type plus every link index, so each
//! mutation can check its rules against the whole graph before committing.
//! Relationship rules (mandatory customer, pair uniqueness, minimum
//! cardinalities, the adult age gate) live here, next to the wiring they
//! protect; the indices themselves only guarantee that forward and reverse
//! sides agree.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use chrono::Utc;
use im::Vector;
use tracing::debug;

use shopcore_foundation::{Error, Result, ShopConfig, validate};
use shopcore_storage::{Entity, ManyToMany, Registry, Symmetric, ToOne, persist};

use crate::address::Address;
use crate::discounts::{DiscountId, DiscountParams, DiscountRec};
use crate::manufacturers::{ManufacturerId, ManufacturerParams, ManufacturerRec};
use crate::orders::{self, OrderId, OrderLineId, OrderLineRec, OrderParams, OrderRec, OrderStatus};
use crate::people::{
    self, CustomerId, CustomerParams, CustomerRec, EmployeeId, EmployeeParams, EmployeeRec,
};
use crate::products::{ProductId, ProductParams, ProductRec};
use crate::reviews::{ReviewId, ReviewParams, ReviewRec};
use crate::sellers::{SellerId, SellerParams, SellerRec};

fn records<T: Entity + Clone>(registry: &Registry<T>) -> Vec<T> {
    registry.iter().map(|(_, record)| record.clone()).collect()
}

/// The whole retail graph behind one facade.
///
/// Records hold attributes only; every relationship is a pair of entries in
/// one of the link indices below. Deleting an entity cascades through the
/// sub-graph it owns and detaches everything else, so no index ever holds a
/// handle to a dead slot.
#[derive(Debug, Clone)]
pub struct Shop {
    config: ShopConfig,

    customers: Registry<CustomerRec>,
    employees: Registry<EmployeeRec>,
    sellers: Registry<SellerRec>,
    products: Registry<ProductRec>,
    orders: Registry<OrderRec>,
    lines: Registry<OrderLineRec>,
    discounts: Registry<DiscountRec>,
    reviews: Registry<ReviewRec>,
    manufacturers: Registry<ManufacturerRec>,

    order_customer: ToOne<OrderRec, CustomerRec>,
    product_seller: ToOne<ProductRec, SellerRec>,
    line_product: ToOne<OrderLineRec, ProductRec>,
    line_order: ToOne<OrderLineRec, OrderRec>,
    related_clothing: Symmetric<ProductRec>,
    discount_products: ManyToMany<DiscountRec, ProductRec>,

    /// Lowercased product name to live product, for the uniqueness rule and
    /// name lookups.
    product_names: HashMap<String, ProductId>,
}

impl Shop {
    /// Creates an empty shop running the given policies.
    #[must_use]
    pub fn new(config: ShopConfig) -> Self {
        Self {
            config,
            customers: Registry::new(),
            employees: Registry::new(),
            sellers: Registry::new(),
            products: Registry::new(),
            orders: Registry::new(),
            lines: Registry::new(),
            discounts: Registry::new(),
            reviews: Registry::new(),
            manufacturers: Registry::new(),
            order_customer: ToOne::new(),
            product_seller: ToOne::new(),
            line_product: ToOne::new(),
            line_order: ToOne::new(),
            related_clothing: Symmetric::new(),
            discount_products: ManyToMany::new(),
            product_names: HashMap::new(),
        }
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &ShopConfig {
        &self.config
    }

    /// Changes the legal adult age used by the age gate.
    ///
    /// Existing links are not re-checked; the new age applies to later
    /// mutations.
    ///
    /// # Errors
    /// Returns `OutOfRange` unless `1 ..= 150`.
    pub fn set_legal_adult_age(&mut self, years: u8) -> Result<()> {
        self.config = self.config.clone().with_legal_adult_age(years)?;
        Ok(())
    }

    /// Empties every extent and index.
    pub fn clear(&mut self) {
        self.customers.clear();
        self.employees.clear();
        self.sellers.clear();
        self.products.clear();
        self.orders.clear();
        self.lines.clear();
        self.discounts.clear();
        self.reviews.clear();
        self.manufacturers.clear();
        self.order_customer.clear();
        self.product_seller.clear();
        self.line_product.clear();
        self.line_order.clear();
        self.related_clothing.clear();
        self.discount_products.clear();
        self.product_names.clear();
    }

    // =========================================================================
    // Customers
    // =========================================================================

    /// Registers a new customer.
    ///
    /// # Errors
    /// Returns `OutOfRange` when a field fails validation.
    pub fn create_customer(&mut self, params: CustomerParams) -> Result<CustomerId> {
        params.validate()?;
        let id = self.customers.insert(params.into_record());
        debug!(customer = %id, "customer registered");
        Ok(id)
    }

    /// Returns a customer's record.
    ///
    /// # Errors
    /// Returns `EntityNotFound` or `StaleHandle` on a dead handle.
    pub fn customer(&self, customer: CustomerId) -> Result<&CustomerRec> {
        self.customers.get(customer)
    }

    /// Returns an ordered snapshot of every live customer.
    #[must_use]
    pub fn customers(&self) -> Vector<CustomerId> {
        self.customers.ids()
    }

    /// Returns a customer's age in whole years as of today.
    ///
    /// # Errors
    /// Returns `EntityNotFound` or `StaleHandle` on a dead handle.
    pub fn customer_age(&self, customer: CustomerId) -> Result<u32> {
        let record = self.customers.get(customer)?;
        Ok(people::age_on(record.date_of_birth(), Utc::now().date_naive()))
    }

    /// Appends a shipping address to a customer.
    ///
    /// # Errors
    /// Returns `EntityNotFound` or `StaleHandle` on a dead handle.
    pub fn add_shipping_address(&mut self, customer: CustomerId, address: Address) -> Result<()> {
        self.customers.get_mut(customer)?.shipping_addresses.push(address);
        Ok(())
    }

    /// Returns a customer's orders in attachment order.
    ///
    /// # Errors
    /// Returns `EntityNotFound` or `StaleHandle` on a dead handle.
    pub fn customer_orders(&self, customer: CustomerId) -> Result<Vector<OrderId>> {
        self.customers.validate(customer)?;
        Ok(self.order_customer.sources(customer))
    }

    /// Attaches an order to a customer from the customer side.
    ///
    /// An order owned by another customer is moved; the old owner's
    /// collection no longer lists it afterwards.
    ///
    /// # Errors
    /// Returns `Conflict` when the customer already owns the order and
    /// `PolicyViolation` when an adult-only line blocks the move.
    pub fn add_customer_order(&mut self, customer: CustomerId, order: OrderId) -> Result<()> {
        self.customers.validate(customer)?;
        self.orders.validate(order)?;
        if self.order_customer.target(order) == Some(customer) {
            return Err(Error::conflict("order already belongs to this customer"));
        }
        self.change_order_customer(order, customer)
    }

    /// Detaching an order from its customer is never allowed; an order
    /// cannot exist without one. Delete the order instead.
    ///
    /// # Errors
    /// Always returns `InvalidOperation` once both handles check out.
    pub fn remove_customer_order(&mut self, customer: CustomerId, order: OrderId) -> Result<()> {
        self.customers.validate(customer)?;
        self.orders.validate(order)?;
        Err(Error::invalid_operation(
            "orders cannot be detached from their customer; delete the order instead",
        ))
    }

    /// Deletes a customer and every order they own.
    ///
    /// # Errors
    /// Returns `EntityNotFound` or `StaleHandle` on a dead handle.
    pub fn delete_customer(&mut self, customer: CustomerId) -> Result<()> {
        self.customers.validate(customer)?;
        for order in self.order_customer.sources(customer) {
            self.delete_order(order)?;
        }
        self.customers.remove(customer);
        debug!(customer = %customer, "customer deleted");
        Ok(())
    }

    // =========================================================================
    // Employees
    // =========================================================================

    /// Registers a new employee.
    ///
    /// # Errors
    /// Returns `OutOfRange` when a field fails validation.
    pub fn create_employee(&mut self, params: EmployeeParams) -> Result<EmployeeId> {
        params.validate()?;
        Ok(self.employees.insert(params.into_record()))
    }

    /// Returns an employee's record.
    ///
    /// # Errors
    /// Returns `EntityNotFound` or `StaleHandle` on a dead handle.
    pub fn employee(&self, employee: EmployeeId) -> Result<&EmployeeRec> {
        self.employees.get(employee)
    }

    /// Returns an ordered snapshot of every live employee.
    #[must_use]
    pub fn employees(&self) -> Vector<EmployeeId> {
        self.employees.ids()
    }

    /// Deletes an employee.
    ///
    /// # Errors
    /// Returns `EntityNotFound` or `StaleHandle` on a dead handle.
    pub fn delete_employee(&mut self, employee: EmployeeId) -> Result<()> {
        self.employees.validate(employee)?;
        self.employees.remove(employee);
        Ok(())
    }

    // =========================================================================
    // Sellers
    // =========================================================================

    /// Registers a new seller.
    ///
    /// # Errors
    /// Returns `OutOfRange` when a field fails validation.
    pub fn create_seller(&mut self, params: SellerParams) -> Result<SellerId> {
        params.validate()?;
        let id = self.sellers.insert(params.into_record());
        debug!(seller = %id, "seller registered");
        Ok(id)
    }

    /// Returns a seller's record.
    ///
    /// # Errors
    /// Returns `EntityNotFound` or `StaleHandle` on a dead handle.
    pub fn seller(&self, seller: SellerId) -> Result<&SellerRec> {
        self.sellers.get(seller)
    }

    /// Returns an ordered snapshot of every live seller.
    #[must_use]
    pub fn sellers(&self) -> Vector<SellerId> {
        self.sellers.ids()
    }

    /// Returns a seller's products in attachment order.
    ///
    /// # Errors
    /// Returns `EntityNotFound` or `StaleHandle` on a dead handle.
    pub fn seller_products(&self, seller: SellerId) -> Result<Vector<ProductId>> {
        self.sellers.validate(seller)?;
        Ok(self.product_seller.sources(seller))
    }

    /// Looks up a seller's product by name, case-insensitively.
    ///
    /// A product of that name belonging to a different seller yields `None`.
    ///
    /// # Errors
    /// Returns `EntityNotFound` or `StaleHandle` on a dead handle.
    pub fn seller_product_by_name(
        &self,
        seller: SellerId,
        name: &str,
    ) -> Result<Option<ProductId>> {
        self.sellers.validate(seller)?;
        Ok(self
            .product_by_name(name)
            .filter(|product| self.product_seller.target(*product) == Some(seller)))
    }

    /// Deletes a seller and, with it, every product the seller owns.
    ///
    /// # Errors
    /// Returns `EntityNotFound` or `StaleHandle` on a dead handle.
    pub fn delete_seller(&mut self, seller: SellerId) -> Result<()> {
        self.sellers.validate(seller)?;
        for product in self.product_seller.sources(seller) {
            self.delete_product(product)?;
        }
        self.sellers.remove(seller);
        debug!(seller = %seller, "seller deleted");
        Ok(())
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Registers a new product under a seller.
    ///
    /// # Errors
    /// Returns `OutOfRange` when a field fails validation and `Conflict`
    /// when the name is already taken, compared case-insensitively.
    pub fn create_product(&mut self, params: ProductParams, seller: SellerId) -> Result<ProductId> {
        params.validate()?;
        self.sellers.validate(seller)?;
        let key = params.name.to_lowercase();
        if self.product_names.contains_key(&key) {
            return Err(Error::conflict(format!(
                "product name '{}' is already taken",
                params.name
            )));
        }
        let id = self.products.insert(params.into_record());
        self.product_seller.link(id, seller);
        self.product_names.insert(key, id);
        debug!(product = %id, seller = %seller, "product registered");
        Ok(id)
    }

    /// Returns a product's record.
    ///
    /// # Errors
    /// Returns `EntityNotFound` or `StaleHandle` on a dead handle.
    pub fn product(&self, product: ProductId) -> Result<&ProductRec> {
        self.products.get(product)
    }

    /// Returns an ordered snapshot of every live product.
    #[must_use]
    pub fn products(&self) -> Vector<ProductId> {
        self.products.ids()
    }

    /// Looks up a product by name, case-insensitively, across all sellers.
    #[must_use]
    pub fn product_by_name(&self, name: &str) -> Option<ProductId> {
        self.product_names.get(&name.to_lowercase()).copied()
    }

    /// Returns the seller a product belongs to, if attached.
    ///
    /// # Errors
    /// Returns `EntityNotFound` or `StaleHandle` on a dead handle.
    pub fn product_seller(&self, product: ProductId) -> Result<Option<SellerId>> {
        self.products.validate(product)?;
        Ok(self.product_seller.target(product))
    }

    /// Moves a product to another seller. Moving to the current seller is a
    /// no-op.
    ///
    /// # Errors
    /// Returns `EntityNotFound` or `StaleHandle` on a dead handle.
    pub fn change_product_seller(&mut self, product: ProductId, seller: SellerId) -> Result<()> {
        self.products.validate(product)?;
        self.sellers.validate(seller)?;
        if let Some(previous) = self.product_seller.link(product, seller) {
            debug!(product = %product, from = %previous, to = %seller, "product moved");
        }
        Ok(())
    }

    /// Renames a product.
    ///
    /// # Errors
    /// Returns `OutOfRange` on a bad length and `Conflict` when another live
    /// product already carries the name, compared case-insensitively.
    pub fn rename_product(&mut self, product: ProductId, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        self.products.validate(product)?;
        validate::length_between("name", &name, 2, 100)?;
        let key = name.to_lowercase();
        if let Some(existing) = self.product_names.get(&key) {
            if *existing != product {
                return Err(Error::conflict(format!(
                    "product name '{name}' is already taken"
                )));
            }
        }
        let old_key = self.products.get(product)?.name().to_lowercase();
        self.product_names.remove(&old_key);
        self.products.get_mut(product)?.name = name;
        self.product_names.insert(key, product);
        Ok(())
    }

    /// Sets a product's net price in cents.
    ///
    /// # Errors
    /// Returns `EntityNotFound` or `StaleHandle` on a dead handle.
    pub fn set_product_price(&mut self, product: ProductId, price_cents: u64) -> Result<()> {
        self.products.get_mut(product)?.price_cents = price_cents;
        Ok(())
    }

    /// Sets a product's stock quantity.
    ///
    /// # Errors
    /// Returns `EntityNotFound` or `StaleHandle` on a dead handle.
    pub fn set_product_stock(&mut self, product: ProductId, quantity: u32) -> Result<()> {
        self.products.get_mut(product)?.stock_quantity = quantity;
        Ok(())
    }

    /// Returns a product's price with the store fee applied, rounded down to
    /// the cent.
    ///
    /// # Errors
    /// Returns `EntityNotFound` or `StaleHandle` on a dead handle.
    pub fn product_gross_price(&self, product: ProductId) -> Result<u64> {
        let record = self.products.get(product)?;
        let fee = u64::from(self.config.store_fee_percent());
        Ok(record.price_cents() * (100 + fee) / 100)
    }

    /// Returns the order lines referencing a product, in attachment order.
    ///
    /// # Errors
    /// Returns `EntityNotFound` or `StaleHandle` on a dead handle.
    pub fn product_lines(&self, product: ProductId) -> Result<Vector<OrderLineId>> {
        self.products.validate(product)?;
        Ok(self.line_product.sources(product))
    }

    /// Returns the discounts applying to a product, in attachment order.
    ///
    /// # Errors
    /// Returns `EntityNotFound` or `StaleHandle` on a dead handle.
    pub fn product_discounts(&self, product: ProductId) -> Result<Vector<DiscountId>> {
        self.products.validate(product)?;
        Ok(self.discount_products.sources(product))
    }

    /// Deletes a product and everything that cannot outlive it.
    ///
    /// Lines referencing the product are removed; an order emptied by that
    /// is deleted, as is a discount left with nothing to apply to. Clothing
    /// neighbors and the seller are detached.
    ///
    /// # Errors
    /// Returns `EntityNotFound` or `StaleHandle` on a dead handle.
    pub fn delete_product(&mut self, product: ProductId) -> Result<()> {
        self.products.validate(product)?;
        let name_key = self.products.get(product)?.name().to_lowercase();

        for line in self.line_product.sources(product) {
            let order = self.line_order.target(line);
            self.remove_line_internal(line);
            if let Some(order) = order {
                if self.line_order.source_count(order) == 0 {
                    self.delete_order(order)?;
                }
            }
        }

        for discount in self.discount_products.drop_target(product) {
            if self.discount_products.target_count(discount) == 0 {
                self.delete_discount(discount)?;
            }
        }

        self.related_clothing.drop_node(product);
        self.product_seller.unlink(product);
        self.products.remove(product);
        self.product_names.remove(&name_key);
        debug!(product = %product, "product deleted");
        Ok(())
    }

    // =========================================================================
    // Related clothing
    // =========================================================================

    /// Relates two clothing products, in both directions.
    ///
    /// Relating an already-related pair is a no-op.
    ///
    /// # Errors
    /// Returns `InvalidArgument` when either product is not clothing or
    /// both handles name the same product.
    pub fn add_related_clothing(&mut self, a: ProductId, b: ProductId) -> Result<()> {
        self.ensure_clothing(a)?;
        self.ensure_clothing(b)?;
        self.related_clothing.link(a, b)?;
        Ok(())
    }

    /// Unrelates two clothing products, on both sides. Unrelating an
    /// unrelated pair is a no-op.
    ///
    /// # Errors
    /// Returns `EntityNotFound` or `StaleHandle` on a dead handle.
    pub fn remove_related_clothing(&mut self, a: ProductId, b: ProductId) -> Result<()> {
        self.products.validate(a)?;
        self.products.validate(b)?;
        self.related_clothing.unlink(a, b);
        Ok(())
    }

    /// Returns the clothing related to a product, in attachment order.
    ///
    /// # Errors
    /// Returns `EntityNotFound` or `StaleHandle` on a dead handle.
    pub fn related_clothing(&self, product: ProductId) -> Result<Vector<ProductId>> {
        self.products.validate(product)?;
        Ok(self.related_clothing.neighbors(product))
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Places an order for a customer with its first line, so no order ever
    /// exists without one.
    ///
    /// All checks run before anything is registered.
    ///
    /// # Errors
    /// Returns `OutOfRange` on a zero quantity and `PolicyViolation` when
    /// the product is adult-only and the customer is under age.
    pub fn create_order(
        &mut self,
        params: OrderParams,
        customer: CustomerId,
        first_product: ProductId,
        quantity: u32,
    ) -> Result<(OrderId, OrderLineId)> {
        self.customers.validate(customer)?;
        self.products.validate(first_product)?;
        orders::validate_quantity(quantity)?;
        self.ensure_of_age(customer, first_product)?;

        let order = self.orders.insert(params.into_record());
        self.order_customer.link(order, customer);
        let line = self.lines.insert(OrderLineRec { quantity });
        self.line_order.link(line, order);
        self.line_product.link(line, first_product);
        debug!(order = %order, customer = %customer, "order placed");
        Ok((order, line))
    }

    /// Returns an order's record.
    ///
    /// # Errors
    /// Returns `EntityNotFound` or `StaleHandle` on a dead handle.
    pub fn order(&self, order: OrderId) -> Result<&OrderRec> {
        self.orders.get(order)
    }

    /// Returns an ordered snapshot of every live order.
    #[must_use]
    pub fn orders(&self) -> Vector<OrderId> {
        self.orders.ids()
    }

    /// Returns the customer owning an order, if attached.
    ///
    /// `None` only ever shows up for freshly loaded orders; every order in
    /// normal flow has exactly one customer.
    ///
    /// # Errors
    /// Returns `EntityNotFound` or `StaleHandle` on a dead handle.
    pub fn order_customer(&self, order: OrderId) -> Result<Option<CustomerId>> {
        self.orders.validate(order)?;
        Ok(self.order_customer.target(order))
    }

    /// Returns an order's lines in attachment order.
    ///
    /// # Errors
    /// Returns `EntityNotFound` or `StaleHandle` on a dead handle.
    pub fn order_lines_of(&self, order: OrderId) -> Result<Vector<OrderLineId>> {
        self.orders.validate(order)?;
        Ok(self.line_order.sources(order))
    }

    /// Sets an order's lifecycle status.
    ///
    /// # Errors
    /// Returns `EntityNotFound` or `StaleHandle` on a dead handle.
    pub fn set_order_status(&mut self, order: OrderId, status: OrderStatus) -> Result<()> {
        self.orders.get_mut(order)?.status = status;
        Ok(())
    }

    /// Hides or reveals an order in customer-facing listings.
    ///
    /// # Errors
    /// Returns `EntityNotFound` or `StaleHandle` on a dead handle.
    pub fn set_order_hidden(&mut self, order: OrderId, hidden: bool) -> Result<()> {
        self.orders.get_mut(order)?.hidden = hidden;
        Ok(())
    }

    /// Moves an order to another customer. Moving to the current owner is a
    /// no-op.
    ///
    /// The age gate re-runs against the new customer for every line before
    /// the move; the old owner's collection no longer lists the order
    /// afterwards.
    ///
    /// # Errors
    /// Returns `PolicyViolation` when an adult-only line blocks the move.
    pub fn change_order_customer(&mut self, order: OrderId, customer: CustomerId) -> Result<()> {
        self.orders.validate(order)?;
        self.customers.validate(customer)?;
        if self.order_customer.target(order) == Some(customer) {
            return Ok(());
        }
        self.ensure_order_allowed_for(order, customer)?;
        if let Some(previous) = self.order_customer.link(order, customer) {
            debug!(order = %order, from = %previous, to = %customer, "order moved");
        }
        Ok(())
    }

    /// Deletes an order and all of its lines.
    ///
    /// The sole-line rule does not apply here; the order is going away with
    /// its lines.
    ///
    /// # Errors
    /// Returns `EntityNotFound` or `StaleHandle` on a dead handle.
    pub fn delete_order(&mut self, order: OrderId) -> Result<()> {
        self.orders.validate(order)?;
        for line in self.line_order.sources(order) {
            self.remove_line_internal(line);
        }
        self.order_customer.unlink(order);
        self.orders.remove(order);
        debug!(order = %order, "order deleted");
        Ok(())
    }

    // =========================================================================
    // Order lines
    // =========================================================================

    /// Adds a product to an order as a new line.
    ///
    /// # Errors
    /// Returns `Conflict` when the order already contains the product,
    /// `OutOfRange` on a zero quantity, `InvalidOperation` when the order
    /// has no customer, and `PolicyViolation` when the age gate blocks it.
    pub fn add_product_to_order(
        &mut self,
        order: OrderId,
        product: ProductId,
        quantity: u32,
    ) -> Result<OrderLineId> {
        self.orders.validate(order)?;
        self.products.validate(product)?;
        orders::validate_quantity(quantity)?;
        if self.order_contains_product(order, product) {
            return Err(Error::conflict("order already contains this product"));
        }
        let customer = self.attached_customer(order)?;
        self.ensure_of_age(customer, product)?;

        let line = self.lines.insert(OrderLineRec { quantity });
        self.line_order.link(line, order);
        self.line_product.link(line, product);
        Ok(line)
    }

    /// Returns an order line's record.
    ///
    /// # Errors
    /// Returns `EntityNotFound` or `StaleHandle` on a dead handle.
    pub fn order_line(&self, line: OrderLineId) -> Result<&OrderLineRec> {
        self.lines.get(line)
    }

    /// Returns an ordered snapshot of every live order line.
    #[must_use]
    pub fn order_lines(&self) -> Vector<OrderLineId> {
        self.lines.ids()
    }

    /// Returns the product a line refers to, if attached.
    ///
    /// # Errors
    /// Returns `EntityNotFound` or `StaleHandle` on a dead handle.
    pub fn line_product(&self, line: OrderLineId) -> Result<Option<ProductId>> {
        self.lines.validate(line)?;
        Ok(self.line_product.target(line))
    }

    /// Returns the order a line belongs to, if attached.
    ///
    /// # Errors
    /// Returns `EntityNotFound` or `StaleHandle` on a dead handle.
    pub fn line_order(&self, line: OrderLineId) -> Result<Option<OrderId>> {
        self.lines.validate(line)?;
        Ok(self.line_order.target(line))
    }

    /// Changes a line's quantity.
    ///
    /// # Errors
    /// Returns `OutOfRange` on a zero quantity.
    pub fn change_line_quantity(&mut self, line: OrderLineId, quantity: u32) -> Result<()> {
        orders::validate_quantity(quantity)?;
        self.lines.get_mut(line)?.quantity = quantity;
        Ok(())
    }

    /// Points a line at another product. Pointing at the current product is
    /// a no-op.
    ///
    /// # Errors
    /// Returns `Conflict` when the line's order already contains the new
    /// product, `InvalidOperation` on a detached line or order, and
    /// `PolicyViolation` when the age gate blocks it.
    pub fn change_line_product(&mut self, line: OrderLineId, product: ProductId) -> Result<()> {
        self.lines.validate(line)?;
        self.products.validate(product)?;
        if self.line_product.target(line) == Some(product) {
            return Ok(());
        }
        let order = self.attached_order(line)?;
        if self.order_contains_product(order, product) {
            return Err(Error::conflict("order already contains this product"));
        }
        let customer = self.attached_customer(order)?;
        self.ensure_of_age(customer, product)?;
        self.line_product.link(line, product);
        Ok(())
    }

    /// Moves a line to another order. Moving to the current order is a
    /// no-op.
    ///
    /// The old order keeps its minimum of one line; the new order must not
    /// already contain the line's product.
    ///
    /// # Errors
    /// Returns `Conflict` on a duplicate pair, `InvalidOperation` when the
    /// move would empty the old order or the line references no product,
    /// and `PolicyViolation` when the age gate blocks it.
    pub fn change_line_order(&mut self, line: OrderLineId, order: OrderId) -> Result<()> {
        self.lines.validate(line)?;
        self.orders.validate(order)?;
        if self.line_order.target(line) == Some(order) {
            return Ok(());
        }
        let product = self.attached_product(line)?;
        if self.order_contains_product(order, product) {
            return Err(Error::conflict("order already contains this product"));
        }
        if let Some(previous) = self.line_order.target(line) {
            if self.line_order.source_count(previous) == 1 {
                return Err(Error::invalid_operation(
                    "cannot remove the last product from an order",
                ));
            }
        }
        let customer = self.attached_customer(order)?;
        self.ensure_of_age(customer, product)?;
        self.line_order.link(line, order);
        Ok(())
    }

    /// Removes a line from its order.
    ///
    /// # Errors
    /// Returns `InvalidOperation` when it is the order's sole line; deleting
    /// the order is the way to get rid of that one.
    pub fn remove_order_line(&mut self, line: OrderLineId) -> Result<()> {
        self.lines.validate(line)?;
        if let Some(order) = self.line_order.target(line) {
            if self.line_order.source_count(order) == 1 {
                return Err(Error::invalid_operation(
                    "cannot remove the last product from an order",
                ));
            }
        }
        self.remove_line_internal(line);
        Ok(())
    }

    fn remove_line_internal(&mut self, line: OrderLineId) {
        self.line_product.unlink(line);
        self.line_order.unlink(line);
        self.lines.remove(line);
    }

    // =========================================================================
    // Discounts
    // =========================================================================

    /// Creates a discount applying to its first product, so no discount ever
    /// exists without one.
    ///
    /// # Errors
    /// Returns `OutOfRange` when a field fails validation.
    pub fn create_discount(
        &mut self,
        params: DiscountParams,
        first_product: ProductId,
    ) -> Result<DiscountId> {
        params.validate()?;
        self.products.validate(first_product)?;
        let id = self.discounts.insert(params.into_record());
        self.discount_products.link(id, first_product);
        debug!(discount = %id, product = %first_product, "discount created");
        Ok(id)
    }

    /// Returns a discount's record.
    ///
    /// # Errors
    /// Returns `EntityNotFound` or `StaleHandle` on a dead handle.
    pub fn discount(&self, discount: DiscountId) -> Result<&DiscountRec> {
        self.discounts.get(discount)
    }

    /// Returns an ordered snapshot of every live discount.
    #[must_use]
    pub fn discounts(&self) -> Vector<DiscountId> {
        self.discounts.ids()
    }

    /// Returns the products a discount applies to, in attachment order.
    ///
    /// # Errors
    /// Returns `EntityNotFound` or `StaleHandle` on a dead handle.
    pub fn discount_products(&self, discount: DiscountId) -> Result<Vector<ProductId>> {
        self.discounts.validate(discount)?;
        Ok(self.discount_products.targets(discount))
    }

    /// Applies a discount to another product. Re-applying is a no-op.
    ///
    /// # Errors
    /// Returns `EntityNotFound` or `StaleHandle` on a dead handle.
    pub fn add_discount_product(&mut self, discount: DiscountId, product: ProductId) -> Result<()> {
        self.discounts.validate(discount)?;
        self.products.validate(product)?;
        self.discount_products.link(discount, product);
        Ok(())
    }

    /// Stops a discount from applying to a product. Removing an absent pair
    /// is a no-op.
    ///
    /// # Errors
    /// Returns `InvalidOperation` when it is the discount's sole product;
    /// deleting the discount is the way to get rid of that one.
    pub fn remove_discount_product(
        &mut self,
        discount: DiscountId,
        product: ProductId,
    ) -> Result<()> {
        self.discounts.validate(discount)?;
        self.products.validate(product)?;
        if !self.discount_products.contains(discount, product) {
            return Ok(());
        }
        if self.discount_products.target_count(discount) == 1 {
            return Err(Error::invalid_operation(
                "a discount must apply to at least one product",
            ));
        }
        self.discount_products.unlink(discount, product);
        Ok(())
    }

    /// Deletes a discount, detaching it from every product.
    ///
    /// # Errors
    /// Returns `EntityNotFound` or `StaleHandle` on a dead handle.
    pub fn delete_discount(&mut self, discount: DiscountId) -> Result<()> {
        self.discounts.validate(discount)?;
        self.discount_products.drop_source(discount);
        self.discounts.remove(discount);
        debug!(discount = %discount, "discount deleted");
        Ok(())
    }

    // =========================================================================
    // Reviews
    // =========================================================================

    /// Registers a new review.
    ///
    /// # Errors
    /// Returns `OutOfRange` when the comment fails validation.
    pub fn create_review(&mut self, params: ReviewParams) -> Result<ReviewId> {
        params.validate()?;
        Ok(self.reviews.insert(params.into_record()))
    }

    /// Returns a review's record.
    ///
    /// # Errors
    /// Returns `EntityNotFound` or `StaleHandle` on a dead handle.
    pub fn review(&self, review: ReviewId) -> Result<&ReviewRec> {
        self.reviews.get(review)
    }

    /// Returns an ordered snapshot of every live review.
    #[must_use]
    pub fn reviews(&self) -> Vector<ReviewId> {
        self.reviews.ids()
    }

    /// Deletes a review.
    ///
    /// # Errors
    /// Returns `EntityNotFound` or `StaleHandle` on a dead handle.
    pub fn delete_review(&mut self, review: ReviewId) -> Result<()> {
        self.reviews.validate(review)?;
        self.reviews.remove(review);
        Ok(())
    }

    // =========================================================================
    // Manufacturers
    // =========================================================================

    /// Registers a new manufacturer.
    ///
    /// # Errors
    /// Returns `OutOfRange` when a field fails validation.
    pub fn create_manufacturer(&mut self, params: ManufacturerParams) -> Result<ManufacturerId> {
        params.validate()?;
        Ok(self.manufacturers.insert(params.into_record()))
    }

    /// Returns a manufacturer's record.
    ///
    /// # Errors
    /// Returns `EntityNotFound` or `StaleHandle` on a dead handle.
    pub fn manufacturer(&self, manufacturer: ManufacturerId) -> Result<&ManufacturerRec> {
        self.manufacturers.get(manufacturer)
    }

    /// Returns an ordered snapshot of every live manufacturer.
    #[must_use]
    pub fn manufacturers(&self) -> Vector<ManufacturerId> {
        self.manufacturers.ids()
    }

    /// Deletes a manufacturer.
    ///
    /// # Errors
    /// Returns `EntityNotFound` or `StaleHandle` on a dead handle.
    pub fn delete_manufacturer(&mut self, manufacturer: ManufacturerId) -> Result<()> {
        self.manufacturers.validate(manufacturer)?;
        self.manufacturers.remove(manufacturer);
        Ok(())
    }

    // =========================================================================
    // Policy helpers
    // =========================================================================

    fn ensure_of_age(&self, customer: CustomerId, product: ProductId) -> Result<()> {
        let record = self.products.get(product)?;
        if !record.adult_only() {
            return Ok(());
        }
        let buyer = self.customers.get(customer)?;
        let age = people::age_on(buyer.date_of_birth(), Utc::now().date_naive());
        if age < u32::from(self.config.legal_adult_age()) {
            return Err(Error::policy_violation(format!(
                "product '{}' is adult-only and the customer is {age} years old",
                record.name()
            )));
        }
        Ok(())
    }

    fn ensure_order_allowed_for(&self, order: OrderId, customer: CustomerId) -> Result<()> {
        for line in self.line_order.sources(order) {
            if let Some(product) = self.line_product.target(line) {
                self.ensure_of_age(customer, product)?;
            }
        }
        Ok(())
    }

    fn ensure_clothing(&self, product: ProductId) -> Result<()> {
        let record = self.products.get(product)?;
        if !record.kind().is_clothing() {
            return Err(Error::invalid_argument(format!(
                "product '{}' is not clothing",
                record.name()
            )));
        }
        Ok(())
    }

    fn order_contains_product(&self, order: OrderId, product: ProductId) -> bool {
        self.line_order
            .sources(order)
            .iter()
            .any(|line| self.line_product.target(*line) == Some(product))
    }

    fn attached_customer(&self, order: OrderId) -> Result<CustomerId> {
        self.order_customer
            .target(order)
            .ok_or_else(|| Error::invalid_operation("order is not attached to a customer"))
    }

    fn attached_order(&self, line: OrderLineId) -> Result<OrderId> {
        self.line_order
            .target(line)
            .ok_or_else(|| Error::invalid_operation("order line is not attached to an order"))
    }

    fn attached_product(&self, line: OrderLineId) -> Result<ProductId> {
        self.line_product
            .target(line)
            .ok_or_else(|| Error::invalid_operation("order line references no product"))
    }

    pub(crate) fn name_index(&self) -> &HashMap<String, ProductId> {
        &self.product_names
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    fn data_dir<'a>(&'a self, directory: Option<&'a Path>) -> &'a Path {
        directory.unwrap_or_else(|| self.config.data_dir())
    }

    /// Saves the customer extent. `None` means the configured data directory.
    ///
    /// # Errors
    /// Returns `Io` or `Codec` on persistence failures.
    pub fn save_customers(&self, directory: Option<&Path>) -> Result<()> {
        persist::save_extent(
            self.data_dir(directory),
            CustomerRec::EXTENT,
            &records(&self.customers),
        )
    }

    /// Replaces the customer extent from disk; a missing file is a no-op.
    ///
    /// Replacing the extent drops every order-to-customer edge; reloaded
    /// customers come back without orders.
    ///
    /// # Errors
    /// Returns `Io` or `Codec` on persistence failures.
    pub fn load_customers(&mut self, directory: Option<&Path>) -> Result<()> {
        let dir = self.data_dir(directory);
        if !persist::extent_exists(dir, CustomerRec::EXTENT) {
            return Ok(());
        }
        let loaded: Vec<CustomerRec> = persist::load_extent(dir, CustomerRec::EXTENT)?;
        self.order_customer.clear();
        self.customers.clear();
        for record in loaded {
            self.customers.insert(record);
        }
        Ok(())
    }

    /// Saves the employee extent. `None` means the configured data directory.
    ///
    /// # Errors
    /// Returns `Io` or `Codec` on persistence failures.
    pub fn save_employees(&self, directory: Option<&Path>) -> Result<()> {
        persist::save_extent(
            self.data_dir(directory),
            EmployeeRec::EXTENT,
            &records(&self.employees),
        )
    }

    /// Replaces the employee extent from disk; a missing file is a no-op.
    ///
    /// # Errors
    /// Returns `Io` or `Codec` on persistence failures.
    pub fn load_employees(&mut self, directory: Option<&Path>) -> Result<()> {
        let dir = self.data_dir(directory);
        if !persist::extent_exists(dir, EmployeeRec::EXTENT) {
            return Ok(());
        }
        let loaded: Vec<EmployeeRec> = persist::load_extent(dir, EmployeeRec::EXTENT)?;
        self.employees.clear();
        for record in loaded {
            self.employees.insert(record);
        }
        Ok(())
    }

    /// Saves the seller extent. `None` means the configured data directory.
    ///
    /// # Errors
    /// Returns `Io` or `Codec` on persistence failures.
    pub fn save_sellers(&self, directory: Option<&Path>) -> Result<()> {
        persist::save_extent(
            self.data_dir(directory),
            SellerRec::EXTENT,
            &records(&self.sellers),
        )
    }

    /// Replaces the seller extent from disk; a missing file is a no-op.
    ///
    /// Replacing the extent drops every product-to-seller edge; reloaded
    /// sellers come back without products.
    ///
    /// # Errors
    /// Returns `Io` or `Codec` on persistence failures.
    pub fn load_sellers(&mut self, directory: Option<&Path>) -> Result<()> {
        let dir = self.data_dir(directory);
        if !persist::extent_exists(dir, SellerRec::EXTENT) {
            return Ok(());
        }
        let loaded: Vec<SellerRec> = persist::load_extent(dir, SellerRec::EXTENT)?;
        self.product_seller.clear();
        self.sellers.clear();
        for record in loaded {
            self.sellers.insert(record);
        }
        Ok(())
    }

    /// Saves the product extent. `None` means the configured data directory.
    ///
    /// # Errors
    /// Returns `Io` or `Codec` on persistence failures.
    pub fn save_products(&self, directory: Option<&Path>) -> Result<()> {
        persist::save_extent(
            self.data_dir(directory),
            ProductRec::EXTENT,
            &records(&self.products),
        )
    }

    /// Replaces the product extent from disk; a missing file is a no-op.
    ///
    /// Every index touching products is purged first: seller edges, line
    /// references, clothing relations, and discount applications all go.
    /// The name-uniqueness rule is checked before anything is replaced.
    ///
    /// # Errors
    /// Returns `Io` or `Codec` on persistence failures and `Conflict` when
    /// the file carries a duplicate product name.
    pub fn load_products(&mut self, directory: Option<&Path>) -> Result<()> {
        let dir = self.data_dir(directory);
        if !persist::extent_exists(dir, ProductRec::EXTENT) {
            return Ok(());
        }
        let loaded: Vec<ProductRec> = persist::load_extent(dir, ProductRec::EXTENT)?;

        let mut seen = HashSet::with_capacity(loaded.len());
        for record in &loaded {
            if !seen.insert(record.name().to_lowercase()) {
                return Err(Error::conflict(format!(
                    "product name '{}' appears twice in the loaded extent",
                    record.name()
                )));
            }
        }

        self.product_seller.clear();
        self.line_product.clear();
        self.related_clothing.clear();
        self.discount_products.clear();
        self.product_names.clear();
        self.products.clear();
        for record in loaded {
            let key = record.name().to_lowercase();
            let id = self.products.insert(record);
            self.product_names.insert(key, id);
        }
        Ok(())
    }

    /// Saves the order extent. `None` means the configured data directory.
    ///
    /// # Errors
    /// Returns `Io` or `Codec` on persistence failures.
    pub fn save_orders(&self, directory: Option<&Path>) -> Result<()> {
        persist::save_extent(
            self.data_dir(directory),
            OrderRec::EXTENT,
            &records(&self.orders),
        )
    }

    /// Replaces the order extent from disk; a missing file is a no-op.
    ///
    /// Replacing the extent drops customer and line edges; reloaded orders
    /// come back detached until reattached through the public operations.
    ///
    /// # Errors
    /// Returns `Io` or `Codec` on persistence failures.
    pub fn load_orders(&mut self, directory: Option<&Path>) -> Result<()> {
        let dir = self.data_dir(directory);
        if !persist::extent_exists(dir, OrderRec::EXTENT) {
            return Ok(());
        }
        let loaded: Vec<OrderRec> = persist::load_extent(dir, OrderRec::EXTENT)?;
        self.order_customer.clear();
        self.line_order.clear();
        self.orders.clear();
        for record in loaded {
            self.orders.insert(record);
        }
        Ok(())
    }

    /// Saves the order line extent. `None` means the configured data
    /// directory.
    ///
    /// # Errors
    /// Returns `Io` or `Codec` on persistence failures.
    pub fn save_order_lines(&self, directory: Option<&Path>) -> Result<()> {
        persist::save_extent(
            self.data_dir(directory),
            OrderLineRec::EXTENT,
            &records(&self.lines),
        )
    }

    /// Replaces the order line extent from disk; a missing file is a no-op.
    ///
    /// Replacing the extent drops order and product edges; reloaded lines
    /// come back detached.
    ///
    /// # Errors
    /// Returns `Io` or `Codec` on persistence failures.
    pub fn load_order_lines(&mut self, directory: Option<&Path>) -> Result<()> {
        let dir = self.data_dir(directory);
        if !persist::extent_exists(dir, OrderLineRec::EXTENT) {
            return Ok(());
        }
        let loaded: Vec<OrderLineRec> = persist::load_extent(dir, OrderLineRec::EXTENT)?;
        self.line_order.clear();
        self.line_product.clear();
        self.lines.clear();
        for record in loaded {
            self.lines.insert(record);
        }
        Ok(())
    }

    /// Saves the discount extent. `None` means the configured data directory.
    ///
    /// # Errors
    /// Returns `Io` or `Codec` on persistence failures.
    pub fn save_discounts(&self, directory: Option<&Path>) -> Result<()> {
        persist::save_extent(
            self.data_dir(directory),
            DiscountRec::EXTENT,
            &records(&self.discounts),
        )
    }

    /// Replaces the discount extent from disk; a missing file is a no-op.
    ///
    /// Replacing the extent drops product applications; reloaded discounts
    /// come back applying to nothing.
    ///
    /// # Errors
    /// Returns `Io` or `Codec` on persistence failures.
    pub fn load_discounts(&mut self, directory: Option<&Path>) -> Result<()> {
        let dir = self.data_dir(directory);
        if !persist::extent_exists(dir, DiscountRec::EXTENT) {
            return Ok(());
        }
        let loaded: Vec<DiscountRec> = persist::load_extent(dir, DiscountRec::EXTENT)?;
        self.discount_products.clear();
        self.discounts.clear();
        for record in loaded {
            self.discounts.insert(record);
        }
        Ok(())
    }

    /// Saves the review extent. `None` means the configured data directory.
    ///
    /// # Errors
    /// Returns `Io` or `Codec` on persistence failures.
    pub fn save_reviews(&self, directory: Option<&Path>) -> Result<()> {
        persist::save_extent(
            self.data_dir(directory),
            ReviewRec::EXTENT,
            &records(&self.reviews),
        )
    }

    /// Replaces the review extent from disk; a missing file is a no-op.
    ///
    /// # Errors
    /// Returns `Io` or `Codec` on persistence failures.
    pub fn load_reviews(&mut self, directory: Option<&Path>) -> Result<()> {
        let dir = self.data_dir(directory);
        if !persist::extent_exists(dir, ReviewRec::EXTENT) {
            return Ok(());
        }
        let loaded: Vec<ReviewRec> = persist::load_extent(dir, ReviewRec::EXTENT)?;
        self.reviews.clear();
        for record in loaded {
            self.reviews.insert(record);
        }
        Ok(())
    }

    /// Saves the manufacturer extent. `None` means the configured data
    /// directory.
    ///
    /// # Errors
    /// Returns `Io` or `Codec` on persistence failures.
    pub fn save_manufacturers(&self, directory: Option<&Path>) -> Result<()> {
        persist::save_extent(
            self.data_dir(directory),
            ManufacturerRec::EXTENT,
            &records(&self.manufacturers),
        )
    }

    /// Replaces the manufacturer extent from disk; a missing file is a
    /// no-op.
    ///
    /// # Errors
    /// Returns `Io` or `Codec` on persistence failures.
    pub fn load_manufacturers(&mut self, directory: Option<&Path>) -> Result<()> {
        let dir = self.data_dir(directory);
        if !persist::extent_exists(dir, ManufacturerRec::EXTENT) {
            return Ok(());
        }
        let loaded: Vec<ManufacturerRec> = persist::load_extent(dir, ManufacturerRec::EXTENT)?;
        self.manufacturers.clear();
        for record in loaded {
            self.manufacturers.insert(record);
        }
        Ok(())
    }

    /// Saves every extent. `None` means the configured data directory.
    ///
    /// # Errors
    /// Returns `Io` or `Codec` on persistence failures.
    pub fn save_all(&self, directory: Option<&Path>) -> Result<()> {
        self.save_customers(directory)?;
        self.save_employees(directory)?;
        self.save_sellers(directory)?;
        self.save_products(directory)?;
        self.save_orders(directory)?;
        self.save_order_lines(directory)?;
        self.save_discounts(directory)?;
        self.save_reviews(directory)?;
        self.save_manufacturers(directory)?;
        Ok(())
    }

    /// Loads every extent; missing files leave their extents untouched.
    ///
    /// # Errors
    /// Returns `Io`, `Codec`, or `Conflict` as the per-extent loads do.
    pub fn load_all(&mut self, directory: Option<&Path>) -> Result<()> {
        self.load_customers(directory)?;
        self.load_employees(directory)?;
        self.load_sellers(directory)?;
        self.load_products(directory)?;
        self.load_orders(directory)?;
        self.load_order_lines(directory)?;
        self.load_discounts(directory)?;
        self.load_reviews(directory)?;
        self.load_manufacturers(directory)?;
        Ok(())
    }
}

impl Default for Shop {
    fn default() -> Self {
        Self::new(ShopConfig::default())
    }
}
