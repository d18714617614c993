//! # Money Types
//!
//! Currency and price display for the checkout. Prices are stored in the
//! smallest currency unit; installment amounts arrive as `f64` and are only
//! rounded when formatted.

use crate::error::CheckoutError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Supported currencies (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    BRL,
    USD,
    EUR,
}

impl Currency {
    /// Returns the ISO 4217 currency code
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::BRL => "brl",
            Currency::USD => "usd",
            Currency::EUR => "eur",
        }
    }

    /// Returns the number of decimal places for this currency
    pub fn decimal_places(&self) -> u8 {
        2
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::BRL => "R$ ",
            Currency::USD => "$",
            Currency::EUR => "€",
        }
    }

    /// Thousands and decimal separators used for display
    fn separators(&self) -> (char, char) {
        match self {
            Currency::USD => (',', '.'),
            Currency::BRL | Currency::EUR => ('.', ','),
        }
    }

    /// Convert a decimal amount to the smallest currency unit (cents, etc.)
    pub fn to_smallest_unit(&self, amount: f64) -> i64 {
        let multiplier = 10_f64.powi(self.decimal_places() as i32);
        (amount * multiplier).round() as i64
    }

    /// Convert from smallest unit back to decimal
    pub fn from_smallest_unit(&self, amount: i64) -> f64 {
        let divisor = 10_f64.powi(self.decimal_places() as i32);
        amount as f64 / divisor
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::BRL
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

impl FromStr for Currency {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "brl" => Ok(Currency::BRL),
            "usd" => Ok(Currency::USD),
            "eur" => Ok(Currency::EUR),
            other => Err(CheckoutError::Configuration(format!(
                "unsupported currency: {}",
                other
            ))),
        }
    }
}

/// Price with amount in smallest currency unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in smallest currency unit (centavos for BRL)
    pub amount: i64,
    pub currency: Currency,
}

impl Price {
    /// Create a new price from decimal amount
    pub fn new(amount: f64, currency: Currency) -> Self {
        Self {
            amount: currency.to_smallest_unit(amount),
            currency,
        }
    }

    /// Create a price from smallest unit (cents)
    pub fn from_cents(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Get the decimal amount
    pub fn as_decimal(&self) -> f64 {
        self.currency.from_smallest_unit(self.amount)
    }

    /// Format for display (e.g., "R$ 1.234,56")
    pub fn display(&self) -> String {
        let (thousands, decimal) = self.currency.separators();
        let sign = if self.amount < 0 { "-" } else { "" };
        let abs = self.amount.unsigned_abs();
        let units = (abs / 100).to_string();
        let cents = abs % 100;

        let mut grouped = String::with_capacity(units.len() + units.len() / 3);
        for (i, c) in units.chars().enumerate() {
            if i > 0 && (units.len() - i) % 3 == 0 {
                grouped.push(thousands);
            }
            grouped.push(c);
        }

        format!(
            "{}{}{}{}{:02}",
            sign,
            self.currency.symbol(),
            grouped,
            decimal,
            cents
        )
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Round an amount to the currency's minor unit and format it.
///
/// ## Example
/// ```rust
/// use checkout_core::money::{format_amount, Currency};
///
/// assert_eq!(format_amount(1234.5, Currency::BRL), "R$ 1.234,50");
/// ```
pub fn format_amount(amount: f64, currency: Currency) -> String {
    Price::new(amount, currency).display()
}
