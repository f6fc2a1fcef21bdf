//! Basket, line and product models consumed by the charge calculators.
//!
//! These are plain data carriers: the persistence layer (out of scope here)
//! materializes them, and the calculator reads them. A basket is created
//! empty, has lines added by the caller, and is frozen at checkout by the
//! surrounding flow.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use driftwood_core::{CurrencyCode, ProductId};

/// A purchasable product, as the calculator sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Whether this product needs to be physically shipped.
    ///
    /// Downloads and gift cards set this to `false`; per-item shipping
    /// charges skip such lines.
    #[serde(default = "default_true")]
    pub is_shipping_required: bool,
    /// Free-form attribute map (`"weight"` lives here, as decimal kg).
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

const fn default_true() -> bool {
    true
}

impl Product {
    /// Create a shippable product with no attributes.
    #[must_use]
    pub fn new(id: ProductId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            is_shipping_required: true,
            attributes: BTreeMap::new(),
        }
    }

    /// Set an attribute value, returning the product for chaining.
    #[must_use]
    pub fn with_attribute(mut self, code: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(code.into(), value.into());
        self
    }

    /// Mark this product as not requiring shipping.
    #[must_use]
    pub const fn digital(mut self) -> Self {
        self.is_shipping_required = false;
        self
    }

    /// Look up an attribute value by code.
    #[must_use]
    pub fn attribute(&self, code: &str) -> Option<&str> {
        self.attributes.get(code).map(String::as_str)
    }
}

/// A single basket line: one product at some quantity with resolved prices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    /// The product on this line.
    pub product: Product,
    /// Number of units (positive).
    pub quantity: u32,
    /// Resolved unit price excluding tax.
    pub unit_price_excl_tax: Decimal,
    /// Resolved unit price including tax.
    pub unit_price_incl_tax: Decimal,
}

impl Line {
    /// Total price for this line excluding tax.
    #[must_use]
    pub fn line_price_excl_tax(&self) -> Decimal {
        self.unit_price_excl_tax * Decimal::from(self.quantity)
    }

    /// Total price for this line including tax.
    #[must_use]
    pub fn line_price_incl_tax(&self) -> Decimal {
        self.unit_price_incl_tax * Decimal::from(self.quantity)
    }
}

/// An in-progress collection of purchasable line items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Basket {
    /// Currency every line price is quoted in.
    pub currency: CurrencyCode,
    /// Ordered basket lines.
    #[serde(default)]
    pub lines: Vec<Line>,
}

impl Basket {
    /// Create an empty basket in the given currency.
    #[must_use]
    pub const fn new(currency: CurrencyCode) -> Self {
        Self {
            currency,
            lines: Vec::new(),
        }
    }

    /// Add a product to the basket with an explicit quantity and unit price.
    pub fn add_product(
        &mut self,
        product: Product,
        quantity: u32,
        unit_price_excl_tax: Decimal,
        unit_price_incl_tax: Decimal,
    ) {
        self.lines.push(Line {
            product,
            quantity,
            unit_price_excl_tax,
            unit_price_incl_tax,
        });
    }

    /// Whether the basket has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn num_items(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Basket total excluding tax.
    #[must_use]
    pub fn total_excl_tax(&self) -> Decimal {
        self.lines.iter().map(Line::line_price_excl_tax).sum()
    }

    /// Basket total including tax.
    #[must_use]
    pub fn total_incl_tax(&self) -> Decimal {
        self.lines.iter().map(Line::line_price_incl_tax).sum()
    }
}
