//! Driftwood Core - Shared types library.
//!
//! This crate provides common types used across all Driftwood components:
//! - `shipping` - Basket weighing and shipping charge calculation
//! - `orders` - Order fulfillment and shipping event tracking
//! - `cli` - Command-line tools for quoting and fixture inspection
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no
//! clocks. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices and weights

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
