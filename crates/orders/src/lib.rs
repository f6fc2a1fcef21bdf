//! Driftwood Orders - fulfillment models and the shipping event ledger.
//!
//! An order groups batches (one per fulfillment partner); a batch groups
//! lines with quantities fixed at order placement. As a shipment moves
//! through its milestones ("Dispatched", "Delivered", ...) the
//! [`ShippingEventLedger`](ledger::ShippingEventLedger) records how many
//! units of each line have passed each stage. History is append-only:
//! status is never stored, only reconstructed from running totals.
//!
//! # Modules
//!
//! - [`models`] - Order, batch, line and event type models
//! - [`ledger`] - The append-only shipping event ledger
//! - [`error`] - Ledger validation failures

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod error;
pub mod ledger;
pub mod models;

pub use error::LedgerError;
pub use ledger::ShippingEventLedger;
pub use models::{
    Batch, BatchLine, BatchLineAttribute, Order, ShippingEvent, ShippingEventQuantity,
    ShippingEventType,
};
