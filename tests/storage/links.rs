//! Integration tests for link indices
//!
//! Tests that forward and reverse sides stay synchronized through every
//! link, unlink, and bulk-drop mutation.

use shopcore_foundation::{ErrorKind, Id};
use shopcore_storage::{ManyToMany, Symmetric, ToOne};

struct Order;
struct Customer;
struct Discount;
struct Product;

fn id<T>(index: u64) -> Id<T> {
    Id::new(index, 1)
}

// =============================================================================
// ToOne
// =============================================================================

#[test]
fn to_one_link_sets_both_sides() {
    let mut index: ToOne<Order, Customer> = ToOne::new();
    let order = id(0);
    let customer = id(0);

    assert_eq!(index.link(order, customer), None);

    assert_eq!(index.target(order), Some(customer));
    assert_eq!(index.sources(customer), im::vector![order]);
    assert!(index.is_linked(order, customer));
}

#[test]
fn to_one_relink_moves_exclusively() {
    let mut index: ToOne<Order, Customer> = ToOne::new();
    let order = id(0);
    let old = id(0);
    let new = id(1);
    index.link(order, old);

    let displaced = index.link(order, new);

    assert_eq!(displaced, Some(old));
    assert_eq!(index.target(order), Some(new));
    assert!(index.sources(old).is_empty());
    assert_eq!(index.sources(new), im::vector![order]);
}

#[test]
fn to_one_relink_same_target_is_noop() {
    let mut index: ToOne<Order, Customer> = ToOne::new();
    let order = id(0);
    let customer = id(0);
    index.link(order, customer);

    assert_eq!(index.link(order, customer), None);
    // Still exactly one reverse entry.
    assert_eq!(index.source_count(customer), 1);
}

#[test]
fn to_one_reverse_side_keeps_attachment_order() {
    let mut index: ToOne<Order, Customer> = ToOne::new();
    let customer = id(0);
    let first = id(0);
    let second = id(1);
    let third = id(2);
    index.link(first, customer);
    index.link(second, customer);
    index.link(third, customer);

    assert_eq!(index.sources(customer), im::vector![first, second, third]);

    index.unlink(second);
    assert_eq!(index.sources(customer), im::vector![first, third]);
}

#[test]
fn to_one_unlink_clears_both_sides() {
    let mut index: ToOne<Order, Customer> = ToOne::new();
    let order = id(0);
    let customer = id(0);
    index.link(order, customer);

    assert_eq!(index.unlink(order), Some(customer));

    assert_eq!(index.target(order), None);
    assert_eq!(index.source_count(customer), 0);
    assert!(index.is_empty());
}

#[test]
fn to_one_unlink_absent_is_noop() {
    let mut index: ToOne<Order, Customer> = ToOne::new();
    assert_eq!(index.unlink(id(5)), None);
}

#[test]
fn to_one_drop_target_orphans_all_sources() {
    let mut index: ToOne<Order, Customer> = ToOne::new();
    let customer = id(0);
    let a = id(0);
    let b = id(1);
    index.link(a, customer);
    index.link(b, customer);

    let orphans = index.drop_target(customer);

    assert_eq!(orphans, im::vector![a, b]);
    assert_eq!(index.target(a), None);
    assert_eq!(index.target(b), None);
    assert!(index.is_empty());
}

// =============================================================================
// ManyToMany
// =============================================================================

#[test]
fn many_to_many_link_reports_novelty() {
    let mut index: ManyToMany<Discount, Product> = ManyToMany::new();
    let discount = id(0);
    let product = id(0);

    assert!(index.link(discount, product));
    assert!(!index.link(discount, product)); // second call changes nothing

    assert_eq!(index.targets(discount), im::vector![product]);
    assert_eq!(index.sources(product), im::vector![discount]);
}

#[test]
fn many_to_many_counts_both_sides() {
    let mut index: ManyToMany<Discount, Product> = ManyToMany::new();
    let summer = id(0);
    let winter = id(1);
    let socks = id(0);
    let boots = id(1);
    index.link(summer, socks);
    index.link(summer, boots);
    index.link(winter, boots);

    assert_eq!(index.target_count(summer), 2);
    assert_eq!(index.target_count(winter), 1);
    assert_eq!(index.source_count(socks), 1);
    assert_eq!(index.source_count(boots), 2);
}

#[test]
fn many_to_many_unlink_clears_both_sides() {
    let mut index: ManyToMany<Discount, Product> = ManyToMany::new();
    let discount = id(0);
    let product = id(0);
    index.link(discount, product);

    assert!(index.unlink(discount, product));
    assert!(!index.unlink(discount, product));

    assert!(index.targets(discount).is_empty());
    assert!(index.sources(product).is_empty());
}

#[test]
fn many_to_many_drop_source_detaches_every_target() {
    let mut index: ManyToMany<Discount, Product> = ManyToMany::new();
    let discount = id(0);
    let a = id(0);
    let b = id(1);
    index.link(discount, a);
    index.link(discount, b);

    let detached = index.drop_source(discount);

    assert_eq!(detached, im::vector![a, b]);
    assert!(index.sources(a).is_empty());
    assert!(index.sources(b).is_empty());
}

#[test]
fn many_to_many_drop_target_detaches_every_source() {
    let mut index: ManyToMany<Discount, Product> = ManyToMany::new();
    let product = id(0);
    let summer = id(0);
    let winter = id(1);
    index.link(summer, product);
    index.link(winter, product);

    let detached = index.drop_target(product);

    assert_eq!(detached, im::vector![summer, winter]);
    assert!(index.targets(summer).is_empty());
    assert!(index.targets(winter).is_empty());
}

// =============================================================================
// Symmetric
// =============================================================================

#[test]
fn symmetric_link_is_visible_from_both_ends() {
    let mut index: Symmetric<Product> = Symmetric::new();
    let a = id(0);
    let b = id(1);

    assert!(index.link(a, b).unwrap());

    assert!(index.contains(a, b));
    assert!(index.contains(b, a));
    assert_eq!(index.neighbors(a), im::vector![b]);
    assert_eq!(index.neighbors(b), im::vector![a]);
}

#[test]
fn symmetric_link_is_idempotent() {
    let mut index: Symmetric<Product> = Symmetric::new();
    let a = id(0);
    let b = id(1);

    assert!(index.link(a, b).unwrap());
    assert!(!index.link(b, a).unwrap()); // same edge from the other end

    assert_eq!(index.neighbor_count(a), 1);
    assert_eq!(index.neighbor_count(b), 1);
}

#[test]
fn symmetric_self_link_rejected() {
    let mut index: Symmetric<Product> = Symmetric::new();
    let a = id(0);

    let err = index.link(a, a).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidArgument(_)));
    assert_eq!(index.neighbor_count(a), 0);
}

#[test]
fn symmetric_unlink_clears_both_ends() {
    let mut index: Symmetric<Product> = Symmetric::new();
    let a = id(0);
    let b = id(1);
    index.link(a, b).unwrap();

    assert!(index.unlink(b, a));
    assert!(!index.unlink(a, b));

    assert!(!index.contains(a, b));
    assert_eq!(index.neighbor_count(a), 0);
}

#[test]
fn symmetric_drop_node_detaches_all_neighbors() {
    let mut index: Symmetric<Product> = Symmetric::new();
    let hub = id(0);
    let a = id(1);
    let b = id(2);
    index.link(hub, a).unwrap();
    index.link(hub, b).unwrap();
    index.link(a, b).unwrap();

    let detached = index.drop_node(hub);

    assert_eq!(detached, im::vector![a, b]);
    assert!(!index.contains(hub, a));
    assert!(!index.contains(b, hub));
    // Unrelated edge survives.
    assert!(index.contains(a, b));
}
