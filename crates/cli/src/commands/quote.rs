//! Shipping quote command.
//!
//! # Usage
//!
//! ```bash
//! dw-cli quote -b basket.json -m method.json
//! ```
//!
//! The basket file is a serialized [`Basket`]; the method file is a
//! serialized [`ShippingMethod`] with its tagged charge policy.

use driftwood_shipping::{Basket, ShippingMethod};

use super::{CliError, load_json};

/// Calculate and report the shipping charge for a basket.
pub fn run(basket_path: &str, method_path: &str) -> Result<(), CliError> {
    let basket: Basket = load_json(basket_path)?;
    let method: ShippingMethod = load_json(method_path)?;

    tracing::info!(
        "Quoting '{}' for a basket of {} item(s) totalling {}{}",
        method.name,
        basket.num_items(),
        basket.currency.symbol(),
        basket.total_incl_tax()
    );

    let price = method.calculate(&basket)?;

    tracing::info!("Shipping charge: {price}");
    Ok(())
}
