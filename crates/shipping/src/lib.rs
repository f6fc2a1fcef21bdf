//! Driftwood Shipping - basket weighing and shipping charge calculation.
//!
//! This crate owns the "how much does shipping cost?" question. A caller
//! builds a [`Basket`](basket::Basket) (or receives one from the checkout
//! layer), picks a configured [`ShippingMethod`](methods::ShippingMethod),
//! and asks it to [`calculate`](methods::ShippingMethod::calculate) a
//! [`Price`](driftwood_core::Price). Calculation is a pure function of the
//! basket and the method configuration - no I/O, no ambient state.
//!
//! # Modules
//!
//! - [`basket`] - Basket, line and product models the calculator consumes
//! - [`scale`] - Weight resolution from product attributes
//! - [`methods`] - The four charge policies and their calculator
//! - [`settings`] - Environment-driven defaults (currency, weight attribute)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod basket;
pub mod error;
pub mod methods;
pub mod scale;
pub mod settings;

pub use basket::{Basket, Line, Product};
pub use error::ShippingError;
pub use methods::{ChargePolicy, ShippingMethod, WeightBand, WeightBased};
pub use scale::Scale;
pub use settings::{ConfigError, ShippingSettings};
