//! Integration tests for Driftwood.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p driftwood-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `shipping_charges` - End-to-end charge calculation across policies
//! - `event_ledger` - Shipping event sequencing, including the
//!   concurrent-append property
//!
//! This crate's library exposes the fixture builders the test files share.

#![cfg_attr(not(test), forbid(unsafe_code))]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use driftwood_core::{
    BatchId, BatchLineId, CurrencyCode, OrderId, PartnerId, ProductId, ShippingEventTypeId,
};
use driftwood_orders::{Batch, BatchLine, ShippingEventType};
use driftwood_shipping::{Basket, Product};

/// A basket of `widget` products, one line per entry of
/// `(quantity, unit_price, weight_kg)`. A weight of `None` leaves the
/// product without a weight attribute.
#[must_use]
pub fn basket(lines: &[(u32, Decimal, Option<&str>)]) -> Basket {
    let mut basket = Basket::new(CurrencyCode::USD);
    for (index, &(quantity, unit_price, weight)) in lines.iter().enumerate() {
        let id = i64::try_from(index).unwrap_or(0) + 1;
        let mut product = Product::new(ProductId::new(id), format!("widget-{id}"));
        if let Some(weight) = weight {
            product = product.with_attribute("weight", weight);
        }
        basket.add_product(product, quantity, unit_price, unit_price);
    }
    basket
}

/// A single-partner batch with one line per quantity given.
#[must_use]
pub fn batch(line_quantities: &[u32]) -> Batch {
    let lines = line_quantities
        .iter()
        .enumerate()
        .map(|(index, &quantity)| {
            let id = i64::try_from(index).unwrap_or(0) + 1;
            BatchLine {
                id: BatchLineId::new(id),
                product_id: ProductId::new(id),
                title: format!("widget-{id}"),
                quantity,
                line_price_excl_tax: dec!(10.00),
                line_price_incl_tax: dec!(12.00),
                partner_reference: None,
                attributes: Vec::new(),
            }
        })
        .collect();
    Batch {
        id: BatchId::new(1),
        order_id: OrderId::new(1),
        partner_id: PartnerId::new(1),
        lines,
    }
}

/// The standard three-stage event sequence used across the tests.
#[must_use]
pub fn dispatch_deliver_types() -> Vec<ShippingEventType> {
    vec![
        ShippingEventType::new(ShippingEventTypeId::new(1), "Order placed", 0),
        ShippingEventType::new(ShippingEventTypeId::new(2), "Dispatched", 1),
        ShippingEventType::new(ShippingEventTypeId::new(3), "Delivered", 2),
    ]
}
