//! Order fulfillment domain models.
//!
//! Quantities on batch lines are fixed at order placement; everything that
//! happens to them afterwards is recorded as shipping events and aggregated
//! on demand.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use driftwood_core::{
    BatchId, BatchLineId, CurrencyCode, OrderId, PartnerId, ProductId, ShippingEventId,
    ShippingEventTypeId,
};

/// A placed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Human-facing order number.
    pub number: String,
    /// Currency all totals are quoted in.
    pub currency: CurrencyCode,
    /// Order total excluding tax, shipping included.
    pub total_excl_tax: Decimal,
    /// Order total including tax, shipping included.
    pub total_incl_tax: Decimal,
    /// Shipping charge excluding tax.
    pub shipping_excl_tax: Decimal,
    /// Shipping charge including tax.
    pub shipping_incl_tax: Decimal,
    /// Code of the shipping method chosen at checkout.
    pub shipping_method: Option<String>,
    /// When the order was placed.
    pub date_placed: DateTime<Utc>,
}

impl Order {
    /// The basket portion of the total including tax (total minus shipping).
    #[must_use]
    pub fn basket_total_incl_tax(&self) -> Decimal {
        self.total_incl_tax - self.shipping_incl_tax
    }

    /// The basket portion of the total excluding tax (total minus shipping).
    #[must_use]
    pub fn basket_total_excl_tax(&self) -> Decimal {
        self.total_excl_tax - self.shipping_excl_tax
    }
}

/// The subset of an order's lines fulfilled by one partner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    /// Unique batch ID.
    pub id: BatchId,
    /// Order this batch belongs to.
    pub order_id: OrderId,
    /// Fulfillment partner responsible for this batch.
    pub partner_id: PartnerId,
    /// Lines in this batch.
    pub lines: Vec<BatchLine>,
}

impl Batch {
    /// Number of lines in this batch.
    #[must_use]
    pub fn num_lines(&self) -> usize {
        self.lines.len()
    }

    /// Look a line up by ID.
    #[must_use]
    pub fn line(&self, line_id: BatchLineId) -> Option<&BatchLine> {
        self.lines.iter().find(|line| line.id == line_id)
    }
}

/// A single product line within a batch, with a fixed total quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchLine {
    /// Unique line ID.
    pub id: BatchLineId,
    /// Product on this line.
    pub product_id: ProductId,
    /// Product title at time of placement.
    pub title: String,
    /// Total units on this line. Immutable after placement.
    pub quantity: u32,
    /// Line price excluding tax.
    pub line_price_excl_tax: Decimal,
    /// Line price including tax.
    pub line_price_incl_tax: Decimal,
    /// Item number the partner uses within their own system.
    #[serde(default)]
    pub partner_reference: Option<String>,
    /// Display attributes chosen at purchase (size, colour, ...).
    #[serde(default)]
    pub attributes: Vec<BatchLineAttribute>,
}

impl BatchLine {
    /// A description of this line including any attributes.
    #[must_use]
    pub fn description(&self) -> String {
        if self.attributes.is_empty() {
            return self.title.clone();
        }
        let attributes = self
            .attributes
            .iter()
            .map(|attribute| format!("{} = '{}'", attribute.attribute_type, attribute.value))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{} ({attributes})", self.title)
    }
}

/// An attribute of a batch line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchLineAttribute {
    /// Attribute name.
    pub attribute_type: String,
    /// Attribute value.
    pub value: String,
}

/// A named, sequenced milestone a shipment passes through.
///
/// Event types used by one order form a total order on `sequence_number`
/// ("Dispatched" before "Delivered").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingEventType {
    /// Unique event type ID.
    pub id: ShippingEventTypeId,
    /// Stable slug, used in forms and ledger calls.
    pub code: String,
    /// Friendly description of the event.
    pub name: String,
    /// Whether this event must be passed before later events can take place.
    pub is_required: bool,
    /// The normal order in which shipping events take place.
    pub sequence_number: u32,
}

impl ShippingEventType {
    /// Create a required event type, deriving the code from the name.
    #[must_use]
    pub fn new(id: ShippingEventTypeId, name: impl Into<String>, sequence_number: u32) -> Self {
        let name = name.into();
        Self {
            id,
            code: slugify(&name),
            name,
            is_required: true,
            sequence_number,
        }
    }

    /// Mark this event type as optional.
    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.is_required = false;
        self
    }
}

/// Derive a slug from a display name: lowercase alphanumerics joined by
/// hyphens.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_hyphen = true;
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Something that happened to a group of lines, e.g. 2 units dispatched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingEvent {
    /// Unique event ID.
    pub id: ShippingEventId,
    /// Order the event belongs to.
    pub order_id: OrderId,
    /// Batch the event belongs to.
    pub batch_id: BatchId,
    /// What kind of event this is.
    pub event_type_id: ShippingEventTypeId,
    /// Dispatch reference, tracking number or similar.
    #[serde(default)]
    pub notes: Option<String>,
    /// When the event occurred.
    pub date: DateTime<Utc>,
    /// Per-line quantities covered by this event.
    pub quantities: Vec<ShippingEventQuantity>,
}

impl ShippingEvent {
    /// Number of lines this event covers.
    #[must_use]
    pub fn num_affected_lines(&self) -> usize {
        self.quantities.len()
    }
}

/// How many units of one line a shipping event covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingEventQuantity {
    /// The affected line.
    pub line_id: BatchLineId,
    /// Units covered (always positive).
    pub quantity: u32,
}
