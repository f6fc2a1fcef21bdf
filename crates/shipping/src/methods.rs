//! Shipping methods and their charge policies.
//!
//! A [`ShippingMethod`] is display metadata plus a [`ChargePolicy`]. The
//! policy is a closed sum type dispatched with a `match`, so a misconfigured
//! method is a deserialization error rather than a runtime "missing method"
//! failure.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use driftwood_core::{Price, Weight};

use crate::basket::Basket;
use crate::error::ShippingError;
use crate::scale::Scale;

/// The attribute code used to look up product weights unless overridden.
pub const DEFAULT_WEIGHT_ATTRIBUTE: &str = "weight";

/// A configured shipping method offered at checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingMethod {
    /// Stable slug identifying the method (used in forms and APIs).
    pub code: String,
    /// Customer-facing name.
    pub name: String,
    /// Customer-facing description.
    #[serde(default)]
    pub description: String,
    /// How the charge is computed.
    pub policy: ChargePolicy,
}

impl ShippingMethod {
    /// Create a method from a code, name and policy.
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>, policy: ChargePolicy) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            description: String::new(),
            policy,
        }
    }

    /// Calculate the shipping charge for a basket.
    ///
    /// Pure function of the basket and this method's configuration.
    ///
    /// # Errors
    ///
    /// Propagates weighing failures from weight-based policies; all other
    /// policies are infallible.
    pub fn calculate(&self, basket: &Basket) -> Result<Price, ShippingError> {
        self.policy.calculate(basket)
    }
}

/// How a shipping method charges for a basket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChargePolicy {
    /// Shipping is always free.
    Free,
    /// A constant charge regardless of basket contents.
    FixedPrice {
        /// Charge excluding tax.
        charge_excl_tax: Decimal,
        /// Charge including tax; defaults to `charge_excl_tax` when absent
        /// (zero-tax assumption).
        #[serde(default)]
        charge_incl_tax: Option<Decimal>,
    },
    /// A charge per order plus a charge per shippable item.
    OrderAndItemCharges {
        /// Flat component applied once per order.
        price_per_order: Decimal,
        /// Component applied per unit on lines whose product requires
        /// shipping.
        price_per_item: Decimal,
        /// Basket totals at or above this (tax inclusive) ship free.
        #[serde(default)]
        free_shipping_threshold: Option<Decimal>,
    },
    /// A charge looked up from weight bands over the basket weight.
    WeightBased(WeightBased),
}

impl ChargePolicy {
    /// Calculate the charge for a basket under this policy.
    ///
    /// Tax on the shipping charge itself is assumed zero for the order/item
    /// and weight-based policies; the caller's tax pipeline applies any real
    /// tax downstream.
    ///
    /// # Errors
    ///
    /// Propagates weighing failures from [`ChargePolicy::WeightBased`].
    pub fn calculate(&self, basket: &Basket) -> Result<Price, ShippingError> {
        let currency = basket.currency;
        match self {
            Self::Free => Ok(Price::free(currency)),
            Self::FixedPrice {
                charge_excl_tax,
                charge_incl_tax,
            } => Ok(Price::new(
                currency,
                *charge_excl_tax,
                charge_incl_tax.unwrap_or(*charge_excl_tax),
            )),
            Self::OrderAndItemCharges {
                price_per_order,
                price_per_item,
                free_shipping_threshold,
            } => {
                if let Some(threshold) = free_shipping_threshold
                    && basket.total_incl_tax() >= *threshold
                {
                    return Ok(Price::free(currency));
                }
                let mut charge = *price_per_order;
                for line in &basket.lines {
                    if line.product.is_shipping_required {
                        charge += *price_per_item * Decimal::from(line.quantity);
                    }
                }
                Ok(Price::zero_tax(currency, charge))
            }
            Self::WeightBased(method) => {
                let weight = method.scale().weigh_basket(basket)?;
                Ok(Price::zero_tax(currency, method.charge_for_weight(weight)))
            }
        }
    }
}

/// Weight-based charging configuration: a set of bands plus fallbacks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightBased {
    /// Bands mapping an upper weight limit to a charge.
    #[serde(default)]
    pub bands: Vec<WeightBand>,
    /// Charge applied when the basket weighs more than every band allows.
    #[serde(default)]
    pub upper_charge: Option<Decimal>,
    /// Product attribute code holding the weight.
    #[serde(default = "default_weight_attribute")]
    pub weight_attribute: String,
    /// Weight assumed for products without the attribute.
    #[serde(default)]
    pub default_weight: Option<Weight>,
}

fn default_weight_attribute() -> String {
    DEFAULT_WEIGHT_ATTRIBUTE.to_string()
}

impl Default for WeightBased {
    fn default() -> Self {
        Self {
            bands: Vec::new(),
            upper_charge: None,
            weight_attribute: default_weight_attribute(),
            default_weight: None,
        }
    }
}

impl WeightBased {
    /// Add a band, returning the configuration for chaining.
    #[must_use]
    pub fn with_band(mut self, upper_limit: Weight, charge: Decimal) -> Self {
        self.bands.push(WeightBand {
            upper_limit,
            charge,
        });
        self
    }

    /// The scale this method weighs baskets with.
    #[must_use]
    pub fn scale(&self) -> Scale {
        Scale::new(self.weight_attribute.clone(), self.default_weight)
    }

    /// The band covering a given weight: the one with the smallest
    /// `upper_limit >= weight`. A weight exactly on a band's upper limit
    /// belongs to that band.
    #[must_use]
    pub fn band_for_weight(&self, weight: Weight) -> Option<&WeightBand> {
        self.bands
            .iter()
            .filter(|band| band.upper_limit >= weight)
            .min_by_key(|band| band.upper_limit)
    }

    /// The lower bound of a band: the next-lower band's upper limit within
    /// this method, or zero when there is none.
    ///
    /// Only this method's own bands are consulted; bands configured on other
    /// methods never shift a band's range.
    #[must_use]
    pub fn weight_from(&self, band: &WeightBand) -> Weight {
        self.bands
            .iter()
            .filter(|other| other.upper_limit < band.upper_limit)
            .map(|other| other.upper_limit)
            .max()
            .unwrap_or(Weight::ZERO)
    }

    /// The charge for a basket of the given weight.
    #[must_use]
    pub fn charge_for_weight(&self, weight: Weight) -> Decimal {
        if let Some(band) = self.band_for_weight(weight) {
            return band.charge;
        }
        if !self.bands.is_empty()
            && let Some(upper_charge) = self.upper_charge
        {
            return upper_charge;
        }
        if !self.bands.is_empty() {
            // Bands exist but none covers this weight and there is no upper
            // charge. Falling back to zero mirrors the historical behavior;
            // it is almost always a configuration gap.
            warn!(weight = %weight, "no weight band covers basket weight and no upper charge is set; charging zero");
        }
        Decimal::ZERO
    }
}

/// A single weight band: weights up to `upper_limit` cost `charge`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightBand {
    /// Inclusive upper weight limit of this band, in kg.
    pub upper_limit: Weight,
    /// Shipping charge for baskets in this band.
    pub charge: Decimal,
}

impl WeightBand {
    /// The inclusive upper bound of this band.
    #[must_use]
    pub const fn weight_to(&self) -> Weight {
        self.upper_limit
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::basket::Product;
    use driftwood_core::{CurrencyCode, ProductId};
    use rust_decimal_macros::dec;

    fn empty_basket() -> Basket {
        Basket::new(CurrencyCode::USD)
    }

    fn basket_with_items(quantities: &[u32]) -> Basket {
        let mut basket = empty_basket();
        for (index, &quantity) in quantities.iter().enumerate() {
            let id = i64::try_from(index).unwrap() + 1;
            basket.add_product(
                Product::new(ProductId::new(id), "widget"),
                quantity,
                dec!(10.00),
                dec!(10.00),
            );
        }
        basket
    }

    fn banded_method() -> WeightBased {
        WeightBased::default()
            .with_band(Weight::from_kg(dec!(1)), dec!(4.00))
            .with_band(Weight::from_kg(dec!(2)), dec!(8.00))
            .with_band(Weight::from_kg(dec!(3)), dec!(12.00))
    }

    // =========================================================================
    // Free
    // =========================================================================

    #[test]
    fn test_free_shipping_is_free_for_empty_basket() {
        let price = ChargePolicy::Free.calculate(&empty_basket()).unwrap();
        assert!(price.is_free());
    }

    #[test]
    fn test_free_shipping_is_free_regardless_of_contents() {
        let basket = basket_with_items(&[3, 7]);
        let price = ChargePolicy::Free.calculate(&basket).unwrap();
        assert!(price.is_free());
        assert_eq!(price.currency, CurrencyCode::USD);
    }

    // =========================================================================
    // FixedPrice
    // =========================================================================

    #[test]
    fn test_fixed_price_charges_for_empty_basket() {
        let policy = ChargePolicy::FixedPrice {
            charge_excl_tax: dec!(10.00),
            charge_incl_tax: Some(dec!(10.00)),
        };
        let price = policy.calculate(&empty_basket()).unwrap();
        assert_eq!(price.excl_tax, dec!(10.00));
        assert_eq!(price.incl_tax, dec!(10.00));
    }

    #[test]
    fn test_fixed_price_assumes_no_tax_when_incl_unset() {
        let policy = ChargePolicy::FixedPrice {
            charge_excl_tax: dec!(10.00),
            charge_incl_tax: None,
        };
        let price = policy.calculate(&basket_with_items(&[2])).unwrap();
        assert_eq!(price.excl_tax, dec!(10.00));
        assert_eq!(price.incl_tax, dec!(10.00));
    }

    // =========================================================================
    // OrderAndItemCharges
    // =========================================================================

    #[test]
    fn test_order_level_charge_for_empty_basket() {
        let policy = ChargePolicy::OrderAndItemCharges {
            price_per_order: dec!(5.00),
            price_per_item: dec!(1.00),
            free_shipping_threshold: None,
        };
        let price = policy.calculate(&empty_basket()).unwrap();
        assert_eq!(price.incl_tax, dec!(5.00));
    }

    #[test]
    fn test_order_and_item_charges_sum_quantities() {
        let policy = ChargePolicy::OrderAndItemCharges {
            price_per_order: dec!(5.00),
            price_per_item: dec!(1.00),
            free_shipping_threshold: None,
        };
        // 5.00 + 1.00 * (3 + 4)
        let price = policy.calculate(&basket_with_items(&[3, 4])).unwrap();
        assert_eq!(price.excl_tax, dec!(12.00));
        assert_eq!(price.incl_tax, dec!(12.00));
    }

    #[test]
    fn test_order_and_item_charges_skip_non_shippable_lines() {
        let policy = ChargePolicy::OrderAndItemCharges {
            price_per_order: dec!(5.00),
            price_per_item: dec!(1.00),
            free_shipping_threshold: None,
        };
        let mut basket = basket_with_items(&[2]);
        basket.add_product(
            Product::new(ProductId::new(99), "ebook").digital(),
            10,
            dec!(3.00),
            dec!(3.00),
        );
        let price = policy.calculate(&basket).unwrap();
        assert_eq!(price.excl_tax, dec!(7.00));
    }

    #[test]
    fn test_free_shipping_threshold() {
        let policy = ChargePolicy::OrderAndItemCharges {
            price_per_order: dec!(5.00),
            price_per_item: dec!(1.00),
            free_shipping_threshold: Some(dec!(20.00)),
        };
        // 1 item at 10.00 incl: below threshold
        let below = policy.calculate(&basket_with_items(&[1])).unwrap();
        assert_eq!(below.incl_tax, dec!(6.00));
        // 2 items at 10.00 incl: exactly at threshold ships free
        let at = policy.calculate(&basket_with_items(&[2])).unwrap();
        assert!(at.is_free());
        let above = policy.calculate(&basket_with_items(&[3])).unwrap();
        assert!(above.is_free());
    }

    // =========================================================================
    // WeightBased
    // =========================================================================

    #[test]
    fn test_band_lookup_is_monotonic_with_inclusive_bounds() {
        let method = banded_method();
        let cases = [
            (dec!(0.5), dec!(4.00)),
            (dec!(1), dec!(4.00)), // boundary is inclusive
            (dec!(1.5), dec!(8.00)),
            (dec!(2.5), dec!(12.00)),
        ];
        for (weight, expected) in cases {
            assert_eq!(
                method.charge_for_weight(Weight::from_kg(weight)),
                expected,
                "weight {weight}"
            );
        }
    }

    #[test]
    fn test_weight_above_all_bands_uses_upper_charge() {
        let mut method = banded_method();
        method.upper_charge = Some(dec!(20.00));
        assert_eq!(
            method.charge_for_weight(Weight::from_kg(dec!(3.5))),
            dec!(20.00)
        );
    }

    #[test]
    fn test_weight_above_all_bands_without_upper_charge_is_zero() {
        let method = banded_method();
        assert_eq!(
            method.charge_for_weight(Weight::from_kg(dec!(3.5))),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_no_bands_means_zero_charge_even_with_upper_charge() {
        let method = WeightBased {
            upper_charge: Some(dec!(20.00)),
            ..WeightBased::default()
        };
        assert_eq!(
            method.charge_for_weight(Weight::from_kg(dec!(5))),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_weight_from_uses_next_lower_band() {
        let method = banded_method();
        let band = method.band_for_weight(Weight::from_kg(dec!(1.5))).unwrap();
        assert_eq!(method.weight_from(band), Weight::from_kg(dec!(1)));
        let lowest = method.band_for_weight(Weight::from_kg(dec!(0.1))).unwrap();
        assert_eq!(method.weight_from(lowest), Weight::ZERO);
    }

    #[test]
    fn test_weight_from_never_leaks_across_methods() {
        // Two methods with interleaved bands; each must compute weight_from
        // against its own bands only.
        let coarse = WeightBased::default()
            .with_band(Weight::from_kg(dec!(2)), dec!(8.00))
            .with_band(Weight::from_kg(dec!(4)), dec!(16.00));
        let fine = WeightBased::default()
            .with_band(Weight::from_kg(dec!(1)), dec!(4.00))
            .with_band(Weight::from_kg(dec!(3)), dec!(12.00));

        let coarse_upper = coarse.band_for_weight(Weight::from_kg(dec!(3.5))).unwrap();
        // fine's 3kg band must not become the lower bound
        assert_eq!(coarse.weight_from(coarse_upper), Weight::from_kg(dec!(2)));
        let fine_upper = fine.band_for_weight(Weight::from_kg(dec!(2.5))).unwrap();
        assert_eq!(fine.weight_from(fine_upper), Weight::from_kg(dec!(1)));
    }

    #[test]
    fn test_weight_based_calculation_weighs_basket() {
        let method = ShippingMethod::new(
            "weight-based",
            "Weight-based delivery",
            ChargePolicy::WeightBased(banded_method()),
        );
        let mut basket = empty_basket();
        basket.add_product(
            Product::new(ProductId::new(1), "anchor").with_attribute("weight", "0.75"),
            2,
            dec!(30.00),
            dec!(30.00),
        );
        // 1.5kg -> second band
        let price = method.calculate(&basket).unwrap();
        assert_eq!(price.excl_tax, dec!(8.00));
        assert_eq!(price.incl_tax, dec!(8.00));
    }

    #[test]
    fn test_weight_based_propagates_missing_attribute() {
        let method = ChargePolicy::WeightBased(banded_method());
        let mut basket = empty_basket();
        basket.add_product(
            Product::new(ProductId::new(1), "mystery"),
            1,
            dec!(1.00),
            dec!(1.00),
        );
        assert!(matches!(
            method.calculate(&basket),
            Err(ShippingError::MissingWeightAttribute { .. })
        ));
    }

    #[test]
    fn test_weight_based_uses_default_weight() {
        let method = ChargePolicy::WeightBased(WeightBased {
            default_weight: Some(Weight::from_kg(dec!(0.5))),
            ..banded_method()
        });
        let mut basket = empty_basket();
        basket.add_product(
            Product::new(ProductId::new(1), "mystery"),
            2,
            dec!(1.00),
            dec!(1.00),
        );
        // 1.0kg -> first band
        let price = method.calculate(&basket).unwrap();
        assert_eq!(price.excl_tax, dec!(4.00));
    }

    // =========================================================================
    // Serde
    // =========================================================================

    #[test]
    fn test_policy_deserializes_from_tagged_json() {
        let json = r#"{
            "code": "standard",
            "name": "Standard delivery",
            "policy": {
                "type": "order_and_item_charges",
                "price_per_order": "2.50",
                "price_per_item": "0.50",
                "free_shipping_threshold": "50.00"
            }
        }"#;
        let method: ShippingMethod = serde_json::from_str(json).unwrap();
        assert_eq!(method.code, "standard");
        assert!(matches!(
            method.policy,
            ChargePolicy::OrderAndItemCharges { .. }
        ));
    }

    #[test]
    fn test_weight_based_deserializes_with_defaults() {
        let json = r#"{
            "code": "weighed",
            "name": "Weighed delivery",
            "policy": {
                "type": "weight_based",
                "bands": [
                    {"upper_limit": "1.000", "charge": "4.00"},
                    {"upper_limit": "2.000", "charge": "8.00"}
                ]
            }
        }"#;
        let method: ShippingMethod = serde_json::from_str(json).unwrap();
        let ChargePolicy::WeightBased(weight_based) = &method.policy else {
            panic!("expected weight-based policy");
        };
        assert_eq!(weight_based.weight_attribute, DEFAULT_WEIGHT_ATTRIBUTE);
        assert_eq!(weight_based.bands.len(), 2);
        assert!(weight_based.upper_charge.is_none());
    }
}
