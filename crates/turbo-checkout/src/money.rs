//! Money type for representing monetary values.
//!
//! Amounts are integers in the smallest unit of the currency. Storefront
//! prices, voucher amounts and courier costs all arrive as whole numbers, so
//! every operation here stays in integer space except the percentage path.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CheckoutError;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    IDR,
    USD,
    SGD,
    MYR,
}

impl Currency {
    /// Get the currency code (e.g., "IDR").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::IDR => "IDR",
            Currency::USD => "USD",
            Currency::SGD => "SGD",
            Currency::MYR => "MYR",
        }
    }

    /// Get the currency symbol (e.g., "Rp").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::IDR => "Rp",
            Currency::USD => "$",
            Currency::SGD => "S$",
            Currency::MYR => "RM",
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::IDR => 0,
            _ => 2,
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "IDR" => Some(Currency::IDR),
            "USD" => Some(Currency::USD),
            "SGD" => Some(Currency::SGD),
            "MYR" => Some(Currency::MYR),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in the smallest currency unit.
    pub amount: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from minor units.
    pub fn new(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.amount < 0
    }

    /// Add another Money value. `None` on currency mismatch or overflow.
    pub fn checked_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.amount
            .checked_add(other.amount)
            .map(|amount| Money::new(amount, self.currency))
    }

    /// Subtract another Money value. `None` on currency mismatch or overflow.
    pub fn checked_sub(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.amount
            .checked_sub(other.amount)
            .map(|amount| Money::new(amount, self.currency))
    }

    /// Add, telling a currency mismatch apart from overflow.
    pub fn try_add(&self, other: &Money) -> Result<Money, CheckoutError> {
        self.ensure_same_currency(other)?;
        self.checked_add(other).ok_or(CheckoutError::Overflow)
    }

    /// Subtract, telling a currency mismatch apart from overflow.
    pub fn try_sub(&self, other: &Money) -> Result<Money, CheckoutError> {
        self.ensure_same_currency(other)?;
        self.checked_sub(other).ok_or(CheckoutError::Overflow)
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<(), CheckoutError> {
        if self.currency != other.currency {
            return Err(CheckoutError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: other.currency.code().to_string(),
            });
        }
        Ok(())
    }

    /// Multiply by a scalar.
    pub fn checked_mul(&self, factor: i64) -> Option<Money> {
        self.amount
            .checked_mul(factor)
            .map(|amount| Money::new(amount, self.currency))
    }

    /// Calculate a percentage of this amount, rounded half away from zero.
    pub fn percentage(&self, percent: f64) -> Option<Money> {
        let value = (self.amount as f64 * percent / 100.0).round();
        if !value.is_finite() || value > i64::MAX as f64 || value < i64::MIN as f64 {
            return None;
        }
        Some(Money::new(value as i64, self.currency))
    }

    /// Clamp the amount into `[low, high]` (same currency assumed).
    pub fn clamp_amount(&self, low: i64, high: i64) -> Money {
        Money::new(self.amount.max(low).min(high), self.currency)
    }

    /// Convert to a decimal value.
    pub fn to_decimal(&self) -> f64 {
        let divisor = 10_i64.pow(self.currency.decimal_places());
        self.amount as f64 / divisor as f64
    }

    /// Format as a display string (e.g., "Rp85000", "$49.99").
    pub fn display(&self) -> String {
        let places = self.currency.decimal_places() as usize;
        let sign = if self.amount < 0 { "-" } else { "" };
        format!(
            "{}{}{:.places$}",
            sign,
            self.currency.symbol(),
            self.abs_decimal()
        )
    }

    fn abs_decimal(&self) -> f64 {
        self.to_decimal().abs()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}
