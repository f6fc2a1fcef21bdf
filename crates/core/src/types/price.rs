//! Type-safe price representation using decimal arithmetic.
//!
//! Shipping charges are always quoted as a tax-exclusive/tax-inclusive pair
//! in a single currency. Keeping both amounts on one value avoids the
//! "which total was that?" class of bug when charges flow into order totals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
///
/// Invariant: `incl_tax >= excl_tax >= 0` for every price produced by the
/// charge calculators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// ISO 4217 currency code.
    pub currency: CurrencyCode,
    /// Amount excluding tax, in the currency's standard unit.
    pub excl_tax: Decimal,
    /// Amount including tax, in the currency's standard unit.
    pub incl_tax: Decimal,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(currency: CurrencyCode, excl_tax: Decimal, incl_tax: Decimal) -> Self {
        Self {
            currency,
            excl_tax,
            incl_tax,
        }
    }

    /// A price where no tax applies, so both amounts are equal.
    #[must_use]
    pub const fn zero_tax(currency: CurrencyCode, charge: Decimal) -> Self {
        Self {
            currency,
            excl_tax: charge,
            incl_tax: charge,
        }
    }

    /// A zero price (free of charge).
    #[must_use]
    pub const fn free(currency: CurrencyCode) -> Self {
        Self::zero_tax(currency, Decimal::ZERO)
    }

    /// The tax portion of this price.
    #[must_use]
    pub fn tax(&self) -> Decimal {
        self.incl_tax - self.excl_tax
    }

    /// Whether this price is zero in both amounts.
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.excl_tax.is_zero() && self.incl_tax.is_zero()
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{:.2} ({}{:.2} incl. tax)",
            self.currency.symbol(),
            self.excl_tax,
            self.currency.symbol(),
            self.incl_tax
        )
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// The display symbol for this currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "\u{20ac}",
            Self::GBP => "\u{a3}",
        }
    }

    /// The ISO 4217 code as a string.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "CAD" => Ok(Self::CAD),
            "AUD" => Ok(Self::AUD),
            _ => Err(format!("unsupported currency code: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_free_price_is_zero() {
        let price = Price::free(CurrencyCode::GBP);
        assert!(price.is_free());
        assert_eq!(price.tax(), Decimal::ZERO);
    }

    #[test]
    fn test_zero_tax_price_has_equal_amounts() {
        let price = Price::zero_tax(CurrencyCode::USD, dec!(9.99));
        assert_eq!(price.excl_tax, price.incl_tax);
        assert!(!price.is_free());
    }

    #[test]
    fn test_tax_portion() {
        let price = Price::new(CurrencyCode::EUR, dec!(10.00), dec!(12.00));
        assert_eq!(price.tax(), dec!(2.00));
    }

    #[test]
    fn test_currency_round_trip() {
        for code in ["USD", "EUR", "GBP", "CAD", "AUD"] {
            let currency: CurrencyCode = code.parse().unwrap();
            assert_eq!(currency.code(), code);
        }
        assert!("XTS".parse::<CurrencyCode>().is_err());
    }

    #[test]
    fn test_display() {
        let price = Price::new(CurrencyCode::USD, dec!(4.00), dec!(4.50));
        assert_eq!(price.to_string(), "$4.00 ($4.50 incl. tax)");
    }
}
