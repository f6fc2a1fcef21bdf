//! Core types for Driftwood.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod weight;

pub use id::*;
pub use price::{CurrencyCode, Price};
pub use weight::Weight;
