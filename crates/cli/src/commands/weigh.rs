//! Basket weighing command.
//!
//! # Usage
//!
//! ```bash
//! dw-cli weigh -b basket.json
//! ```
//!
//! # Environment Variables
//!
//! - `DRIFTWOOD_WEIGHT_ATTRIBUTE` - product attribute holding weights
//! - `DRIFTWOOD_DEFAULT_WEIGHT_KG` - fallback weight for products without one

use driftwood_shipping::{Basket, ShippingSettings};

use super::{CliError, load_json};

/// Weigh a basket with the scale configured from the environment.
pub fn run(basket_path: &str) -> Result<(), CliError> {
    let settings = ShippingSettings::from_env()?;
    let basket: Basket = load_json(basket_path)?;

    let weight = settings.scale().weigh_basket(&basket)?;

    tracing::info!(
        "Basket of {} item(s) weighs {weight} (attribute '{}')",
        basket.num_items(),
        settings.weight_attribute
    );
    Ok(())
}
