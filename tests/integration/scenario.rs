//! End-to-end shop walkthroughs
//!
//! Scripted scenarios driving the whole stack: configuration, the entity
//! graph, policy checks, cascades, and flat-file persistence.

use std::fs;
use std::path::PathBuf;

use chrono::{Duration, NaiveDate, Utc};
use shopcore_foundation::{ErrorKind, ShopConfig};
use shopcore_model::{
    Address, ClothingSize, CustomerId, CustomerParams, DeliveryType, DiscountParams, Gender,
    ManufacturerParams, OrderParams, OrderStatus, PersonCore, ProductKind, ProductParams,
    ReviewParams, ReviewRating, SellerId, SellerParams, Shop,
};

fn scratch_dir(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("shopcore-integration-{tag}-{}", std::process::id()))
}

fn dob(years: i64) -> NaiveDate {
    Utc::now().date_naive() - Duration::days(years * 366)
}

fn customer(shop: &mut Shop, first: &str, years: i64) -> CustomerId {
    shop.create_customer(CustomerParams {
        person: PersonCore {
            first_name: first.into(),
            last_name: "Shopper".into(),
            phone_number: "+48123456789".into(),
        },
        date_of_birth: dob(years),
        shipping_addresses: vec![],
    })
    .unwrap()
}

fn seller(shop: &mut Shop, name: &str) -> SellerId {
    shop.create_seller(SellerParams {
        name: name.into(),
        address: Address::new("Market Sq 4", "Krakow", "Malopolskie", "31-001", "Poland").unwrap(),
    })
    .unwrap()
}

fn listing(name: &str, price_cents: u64, adult_only: bool, kind: ProductKind) -> ProductParams {
    ProductParams {
        name: name.into(),
        description: "A reasonably detailed description.".into(),
        price_cents,
        adult_only,
        weight_grams: 400,
        stock_quantity: 10,
        kind,
    }
}

fn order_params() -> OrderParams {
    OrderParams {
        placed_at: Utc::now(),
        status: OrderStatus::Pending,
        delivery: DeliveryType::Standard,
    }
}

// =============================================================================
// Duplicate Listings
// =============================================================================

#[test]
fn a_duplicate_listing_changes_nothing() {
    let mut shop = Shop::default();
    let acme = seller(&mut shop, "Acme");
    let widget = shop
        .create_product(
            listing("Widget", 19_99, false, ProductKind::New { warranty_days: 30 }),
            acme,
        )
        .unwrap();

    let err = shop
        .create_product(
            listing("Widget", 24_99, false, ProductKind::New { warranty_days: 90 }),
            acme,
        )
        .unwrap_err();

    assert!(matches!(err.kind, ErrorKind::Conflict(_)));
    assert_eq!(shop.seller_products(acme).unwrap(), im::vector![widget]);
    assert_eq!(shop.products().len(), 1);
    assert_eq!(shop.product_by_name("widget"), Some(widget));
    shop.check_consistency().unwrap();
}

// =============================================================================
// A Day At The Shop
// =============================================================================

#[test]
fn a_day_at_the_shop() {
    let config = ShopConfig::new().with_store_fee_percent(10).unwrap();
    let mut shop = Shop::new(config);

    let maria = customer(&mut shop, "Maria", 30);
    let tom = customer(&mut shop, "Tom", 16);
    let northwind = seller(&mut shop, "Northwind");

    let board_game = shop
        .create_product(
            listing(
                "Board Game",
                20_00,
                false,
                ProductKind::New { warranty_days: 60 },
            ),
            northwind,
        )
        .unwrap();
    let rifle = shop
        .create_product(
            listing(
                "Hunting Rifle",
                900_00,
                true,
                ProductKind::Weapon {
                    caliber: ".308 Winchester".into(),
                    rounds_per_minute: 20,
                    range_meters: 800,
                },
            ),
            northwind,
        )
        .unwrap();
    let scarf = shop
        .create_product(
            listing(
                "Scarf",
                15_00,
                false,
                ProductKind::Clothing {
                    materials: vec!["wool".into()],
                    size: ClothingSize::M,
                    gender: Gender::Unisex,
                    care_instruction: "Hand wash only.".into(),
                },
            ),
            northwind,
        )
        .unwrap();
    let gloves = shop
        .create_product(
            listing(
                "Gloves",
                12_00,
                false,
                ProductKind::Clothing {
                    materials: vec!["leather".into()],
                    size: ClothingSize::M,
                    gender: Gender::Unisex,
                    care_instruction: "Wipe with a damp cloth.".into(),
                },
            ),
            northwind,
        )
        .unwrap();
    shop.check_consistency().unwrap();

    // The 10% store fee shows up in the gross price.
    assert_eq!(shop.product_gross_price(board_game).unwrap(), 22_00);

    // Maria shops; Tom bounces off the age gate.
    let (morning_order, game_line) = shop
        .create_order(order_params(), maria, board_game, 1)
        .unwrap();
    let err = shop
        .create_order(order_params(), tom, rifle, 1)
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::PolicyViolation(_)));
    assert_eq!(shop.orders().len(), 1);
    assert_eq!(shop.customer_orders(maria).unwrap(), im::vector![morning_order]);

    let rifle_line = shop
        .add_product_to_order(morning_order, rifle, 1)
        .unwrap();
    assert_eq!(shop.order_lines_of(morning_order).unwrap().len(), 2);
    shop.check_consistency().unwrap();
    shop.check_minimums().unwrap();

    // The rifle line keeps the whole order away from a minor.
    let err = shop.change_order_customer(morning_order, tom).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::PolicyViolation(_)));
    assert_eq!(shop.order_customer(morning_order).unwrap(), Some(maria));

    // A second order, and the board game migrates over to it.
    let (evening_order, _) = shop.create_order(order_params(), maria, scarf, 2).unwrap();
    shop.change_line_order(game_line, evening_order).unwrap();
    assert_eq!(shop.order_lines_of(morning_order).unwrap(), im::vector![rifle_line]);
    assert_eq!(shop.order_lines_of(evening_order).unwrap().len(), 2);

    // One line per product within an order.
    let err = shop
        .add_product_to_order(evening_order, scarf, 1)
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Conflict(_)));

    shop.change_line_quantity(game_line, 3).unwrap();
    assert_eq!(shop.order_line(game_line).unwrap().quantity(), 3);
    let err = shop.change_line_quantity(game_line, 0).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::OutOfRange { .. }));

    // Merchandising: related clothing, a discount, a review, a manufacturer.
    shop.add_related_clothing(scarf, gloves).unwrap();
    shop.add_related_clothing(gloves, scarf).unwrap();
    assert_eq!(shop.related_clothing(scarf).unwrap(), im::vector![gloves]);
    let sale = shop
        .create_discount(
            DiscountParams {
                percentage: 20,
                description: "Winter accessories sale.".into(),
                starts_at: Utc::now() - Duration::days(1),
                ends_at: Utc::now() + Duration::days(13),
            },
            scarf,
        )
        .unwrap();
    shop.add_discount_product(sale, gloves).unwrap();
    assert_eq!(shop.discount_products(sale).unwrap(), im::vector![scarf, gloves]);
    shop.create_review(ReviewParams {
        rating: ReviewRating::Four,
        comment: Some("Arrived a day early.".into()),
    })
    .unwrap();
    shop.create_manufacturer(ManufacturerParams {
        name: "Northwind Mills".into(),
        address: Address::new("Mill Rd 9", "Lodz", "Lodzkie", "90-001", "Poland").unwrap(),
    })
    .unwrap();
    shop.check_consistency().unwrap();
    shop.check_minimums().unwrap();

    shop.set_order_status(evening_order, OrderStatus::Shipped)
        .unwrap();
    assert_eq!(shop.order(evening_order).unwrap().status(), OrderStatus::Shipped);

    // Pulling the rifle from the catalog takes the emptied order with it.
    shop.delete_product(rifle).unwrap();
    assert!(shop.order_line(rifle_line).is_err());
    assert_eq!(shop.orders(), im::vector![evening_order]);
    shop.check_consistency().unwrap();
    shop.check_minimums().unwrap();
}

// =============================================================================
// Restart
// =============================================================================

#[test]
fn the_whole_graph_survives_a_restart() {
    let dir = scratch_dir("restart");
    let config = ShopConfig::new().with_data_dir(&dir);

    let mut shop = Shop::new(config.clone());
    let maria = customer(&mut shop, "Maria", 30);
    let northwind = seller(&mut shop, "Northwind");
    let board_game = shop
        .create_product(
            listing(
                "Board Game",
                20_00,
                false,
                ProductKind::New { warranty_days: 60 },
            ),
            northwind,
        )
        .unwrap();
    shop.create_order(order_params(), maria, board_game, 2)
        .unwrap();
    shop.create_discount(
        DiscountParams {
            percentage: 10,
            description: "Grand reopening sale.".into(),
            starts_at: Utc::now() - Duration::days(1),
            ends_at: Utc::now() + Duration::days(6),
        },
        board_game,
    )
    .unwrap();
    shop.save_all(None).unwrap();
    drop(shop);

    let mut reopened = Shop::new(config);
    reopened.load_all(None).unwrap();

    assert_eq!(reopened.customers().len(), 1);
    assert_eq!(reopened.sellers().len(), 1);
    assert_eq!(reopened.products().len(), 1);
    assert_eq!(reopened.orders().len(), 1);
    assert_eq!(reopened.order_lines().len(), 1);
    assert_eq!(reopened.discounts().len(), 1);
    let maria = reopened.customers()[0];
    assert_eq!(reopened.customer(maria).unwrap().person().first_name, "Maria");

    // Attribute state came back; the edges wait to be rebuilt.
    reopened.check_consistency().unwrap();
    assert!(reopened.check_minimums().is_err());

    let order = reopened.orders()[0];
    let board_game = reopened.product_by_name("board game").unwrap();
    let stale_line = reopened.order_lines()[0];
    let sale = reopened.discounts()[0];

    reopened.change_order_customer(order, maria).unwrap();
    reopened.remove_order_line(stale_line).unwrap();
    reopened.add_product_to_order(order, board_game, 2).unwrap();
    reopened.add_discount_product(sale, board_game).unwrap();

    // Fully operational again.
    reopened.check_consistency().unwrap();
    reopened.check_minimums().unwrap();
    assert_eq!(reopened.order_customer(order).unwrap(), Some(maria));
    let _ = fs::remove_dir_all(&dir);
}
