//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of decimal places shown for currency amounts.
pub const CURRENCY_SCALE: u32 = 2;

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a USD price.
    #[must_use]
    pub const fn usd(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::USD)
    }

    /// Amount rounded to two places, midpoint away from zero.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        round_currency(self.amount)
    }

    /// Price of `quantity` units.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self::new(self.amount * Decimal::from(quantity), self.currency_code)
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency_code.symbol(), self.rounded())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Round an amount the way currency is displayed.
#[must_use]
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero)
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
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// The three-letter ISO code.
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_to_two_places() {
        assert_eq!(Price::usd(Decimal::new(20, 0)).display(), "$20.00");
        assert_eq!(Price::usd(Decimal::new(1095, 2)).display(), "$10.95");
        assert_eq!(Price::usd(Decimal::ZERO).display(), "$0.00");
    }

    #[test]
    fn test_display_rounds_midpoint_away_from_zero() {
        assert_eq!(Price::usd(Decimal::new(10_005, 3)).display(), "$10.01");
        assert_eq!(Price::usd(Decimal::new(10_004, 3)).display(), "$10.00");
    }

    #[test]
    fn test_times() {
        let unit = Price::usd(Decimal::new(2299, 2));
        assert_eq!(unit.times(3).amount, Decimal::new(6897, 2));
        assert_eq!(unit.times(0).amount, Decimal::ZERO);
    }

    #[test]
    fn test_currency_symbols() {
        assert_eq!(Price::new(Decimal::ONE, CurrencyCode::EUR).display(), "€1.00");
        assert_eq!(Price::new(Decimal::ONE, CurrencyCode::GBP).display(), "£1.00");
        assert_eq!(CurrencyCode::CAD.code(), "CAD");
    }
}
