//! Error types for shipping charge calculation.

use driftwood_core::ProductId;
use thiserror::Error;

/// Errors that can occur while weighing a basket or calculating a charge.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShippingError {
    /// A product has no weight attribute and the scale has no default weight.
    ///
    /// Not recovered locally: the checkout flow owns the decision to fall
    /// back or abort.
    #[error(
        "product {product_id} has no '{attribute_code}' attribute and no default weight is configured"
    )]
    MissingWeightAttribute {
        /// The product that could not be weighed.
        product_id: ProductId,
        /// The attribute code the scale looked up.
        attribute_code: String,
    },

    /// A product's weight attribute exists but does not parse as a decimal.
    #[error("product {product_id} has a non-numeric '{attribute_code}' attribute: '{value}'")]
    MalformedWeightAttribute {
        /// The product that could not be weighed.
        product_id: ProductId,
        /// The attribute code the scale looked up.
        attribute_code: String,
        /// The raw attribute value.
        value: String,
    },
}
