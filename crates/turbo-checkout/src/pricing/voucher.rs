//! Voucher types.

use crate::ids::VoucherId;
use serde::{Deserialize, Serialize};

/// Kind of voucher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoucherKind {
    /// Fixed currency amount off.
    Fixed,
    /// Percentage of subtotal off.
    Percentage,
}

/// A discount instrument chosen from the external voucher catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Voucher {
    pub id: VoucherId,
    pub code: String,
    pub kind: VoucherKind,
    /// Amount off in minor units, for `Fixed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_amount: Option<i64>,
    /// Percent off, for `Percentage`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage_amount: Option<f64>,
}

impl Voucher {
    /// Create a fixed amount voucher.
    pub fn fixed(id: impl Into<VoucherId>, code: impl Into<String>, amount: i64) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            kind: VoucherKind::Fixed,
            fixed_amount: Some(amount),
            percentage_amount: None,
        }
    }

    /// Create a percentage voucher.
    pub fn percentage(id: impl Into<VoucherId>, code: impl Into<String>, percent: f64) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            kind: VoucherKind::Percentage,
            fixed_amount: None,
            percentage_amount: Some(percent),
        }
    }
}

/// How the percentage discount is bounded.
///
/// Fixed discounts are always kept within `[0, subtotal]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DiscountPolicy {
    /// Percentage discounts are clamped to `[0, subtotal]` as well.
    #[default]
    Clamped,
    /// Percentage discounts above 100% may exceed the subtotal.
    Legacy,
}
