//! Weight resolution for products and baskets.
//!
//! The scale looks a named attribute up on each product and falls back to a
//! configured default when the attribute is absent. A product with neither
//! is an error the caller must handle - silently treating it as weightless
//! would underquote shipping.

use driftwood_core::Weight;

use crate::basket::{Basket, Product};
use crate::error::ShippingError;

/// Weighs products and baskets via a product attribute.
#[derive(Debug, Clone)]
pub struct Scale {
    attribute_code: String,
    default_weight: Option<Weight>,
}

impl Scale {
    /// Create a scale that reads the given attribute code, with an optional
    /// fallback weight for products that lack the attribute.
    #[must_use]
    pub fn new(attribute_code: impl Into<String>, default_weight: Option<Weight>) -> Self {
        Self {
            attribute_code: attribute_code.into(),
            default_weight,
        }
    }

    /// The attribute code this scale reads.
    #[must_use]
    pub fn attribute_code(&self) -> &str {
        &self.attribute_code
    }

    /// Weigh a single unit of a product.
    ///
    /// # Errors
    ///
    /// Returns [`ShippingError::MissingWeightAttribute`] when the product has
    /// no weight attribute and no default weight is configured, and
    /// [`ShippingError::MalformedWeightAttribute`] when the attribute value
    /// is not a decimal.
    pub fn weigh_product(&self, product: &Product) -> Result<Weight, ShippingError> {
        match product.attribute(&self.attribute_code) {
            Some(value) => {
                value
                    .parse::<Weight>()
                    .map_err(|_| ShippingError::MalformedWeightAttribute {
                        product_id: product.id,
                        attribute_code: self.attribute_code.clone(),
                        value: value.to_string(),
                    })
            }
            None => self
                .default_weight
                .ok_or_else(|| ShippingError::MissingWeightAttribute {
                    product_id: product.id,
                    attribute_code: self.attribute_code.clone(),
                }),
        }
    }

    /// Weigh a whole basket: sum of unit weight times quantity per line.
    ///
    /// An empty basket weighs zero. Whether a product requires shipping is
    /// not consulted here - if something has a weight, it gets weighed.
    ///
    /// # Errors
    ///
    /// Propagates the first per-product weighing failure.
    pub fn weigh_basket(&self, basket: &Basket) -> Result<Weight, ShippingError> {
        let mut total = Weight::ZERO;
        for line in &basket.lines {
            total += self.weigh_product(&line.product)? * line.quantity;
        }
        Ok(total)
    }
}
