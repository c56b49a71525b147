//! Checkout pricing calculations.

use serde::Serialize;
use tracing::warn;

use crate::cart::CartLine;
use crate::error::CheckoutError;
use crate::money::{Currency, Money};
use crate::pricing::{DiscountPolicy, Voucher, VoucherKind};
use crate::shipping::ShippingQuoteOption;

/// An input the engine had to adjust.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingFlag {
    /// Voucher amount was negative and treated as zero.
    NegativeVoucherAmount,
    /// Percentage voucher above 100%.
    PercentageAboveHundred,
    /// Discount was cut down to the subtotal.
    DiscountClamped,
}

/// Complete pricing breakdown.
///
/// `grand_total = subtotal - discount + shipping_cost` for every snapshot.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PricingSnapshot {
    /// Σ unit price × quantity over all lines, in stock or not.
    pub subtotal: Money,
    pub discount: Money,
    pub shipping_cost: Money,
    pub grand_total: Money,
    /// Inputs that were adjusted while pricing.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<PricingFlag>,
}

impl PricingSnapshot {
    pub fn has_discount(&self) -> bool {
        self.discount.amount > 0
    }
}

/// Pure recomputation of the checkout totals.
#[derive(Debug, Clone, Copy, Default)]
pub struct PricingEngine {
    currency: Currency,
    policy: DiscountPolicy,
}

impl PricingEngine {
    pub fn new(currency: Currency, policy: DiscountPolicy) -> Self {
        Self { currency, policy }
    }

    /// Price the current state.
    pub fn price(
        &self,
        lines: &[CartLine],
        voucher: Option<&Voucher>,
        shipping: Option<&ShippingQuoteOption>,
    ) -> Result<PricingSnapshot, CheckoutError> {
        let subtotal = self.subtotal(lines)?;
        let mut flags = Vec::new();
        let discount = match voucher {
            Some(voucher) => self.discount(voucher, subtotal, &mut flags)?,
            None => Money::zero(self.currency),
        };
        let shipping_cost = shipping
            .map(|option| option.cost_money(self.currency))
            .unwrap_or_else(|| Money::zero(self.currency));

        let grand_total = subtotal.try_sub(&discount)?.try_add(&shipping_cost)?;

        if !flags.is_empty() {
            warn!(flags = ?flags, voucher = ?voucher.map(|v| &v.code), "voucher input adjusted");
        }
        if grand_total.is_negative() {
            warn!(grand_total = grand_total.amount, "grand total below zero");
        }

        Ok(PricingSnapshot {
            subtotal,
            discount,
            shipping_cost,
            grand_total,
            flags,
        })
    }

    /// Σ(unit price × quantity).
    pub fn subtotal(&self, lines: &[CartLine]) -> Result<Money, CheckoutError> {
        lines.iter().try_fold(Money::zero(self.currency), |acc, line| {
            acc.try_add(&line.line_total(self.currency)?)
        })
    }

    fn discount(
        &self,
        voucher: &Voucher,
        subtotal: Money,
        flags: &mut Vec<PricingFlag>,
    ) -> Result<Money, CheckoutError> {
        let ceiling = subtotal.amount.max(0);

        match voucher.kind {
            VoucherKind::Fixed => {
                let mut amount = voucher.fixed_amount.unwrap_or(0);
                if amount < 0 {
                    flags.push(PricingFlag::NegativeVoucherAmount);
                    amount = 0;
                }
                if amount > ceiling {
                    flags.push(PricingFlag::DiscountClamped);
                }
                Ok(Money::new(amount, self.currency).clamp_amount(0, ceiling))
            }
            VoucherKind::Percentage => {
                let mut percent = voucher.percentage_amount.unwrap_or(0.0);
                if percent.is_nan() || percent < 0.0 {
                    flags.push(PricingFlag::NegativeVoucherAmount);
                    percent = 0.0;
                }
                if percent > 100.0 {
                    flags.push(PricingFlag::PercentageAboveHundred);
                }

                match self.policy {
                    DiscountPolicy::Legacy => {
                        subtotal.percentage(percent).ok_or(CheckoutError::Overflow)
                    }
                    DiscountPolicy::Clamped => {
                        // At or above 100% the discount is the whole subtotal,
                        // however large the percentage.
                        if percent >= 100.0 {
                            if percent > 100.0 && ceiling > 0 {
                                flags.push(PricingFlag::DiscountClamped);
                            }
                            return Ok(Money::new(ceiling, self.currency));
                        }
                        let amount = subtotal.percentage(percent).ok_or(CheckoutError::Overflow)?;
                        if amount.amount > ceiling {
                            flags.push(PricingFlag::DiscountClamped);
                        }
                        Ok(amount.clamp_amount(0, ceiling))
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> PricingEngine {
        PricingEngine::new(Currency::IDR, DiscountPolicy::Clamped)
    }

    fn shipping(cost: i64) -> ShippingQuoteOption {
        ShippingQuoteOption {
            name: "JNE".to_string(),
            code: "jne".to_string(),
            service_name: "REG".to_string(),
            description: String::new(),
            cost,
            estimated_duration: "2-3".to_string(),
        }
    }

    fn line(price: i64, qty: u32) -> CartLine {
        CartLine::new(format!("p{}", price), "shop-1", "Item", price, qty)
    }

    fn assert_identity(s: &PricingSnapshot) {
        assert_eq!(
            s.grand_total.amount,
            s.subtotal.amount - s.discount.amount + s.shipping_cost.amount
        );
    }

    #[test]
    fn test_fixed_voucher_example() {
        let snapshot = engine()
            .price(
                &[line(50000, 2)],
                Some(&Voucher::fixed("v1", "POTONG30", 30000)),
                Some(&shipping(15000)),
            )
            .unwrap();
        assert_eq!(snapshot.subtotal.amount, 100000);
        assert_eq!(snapshot.discount.amount, 30000);
        assert_eq!(snapshot.shipping_cost.amount, 15000);
        assert_eq!(snapshot.grand_total.amount, 85000);
        assert!(snapshot.flags.is_empty());
    }

    #[test]
    fn test_percentage_voucher_example() {
        let snapshot = engine()
            .price(
                &[line(100000, 1)],
                Some(&Voucher::percentage("v2", "HEMAT20", 20.0)),
                None,
            )
            .unwrap();
        assert_eq!(snapshot.discount.amount, 20000);
        assert_eq!(snapshot.grand_total.amount, 80000);
    }

    #[test]
    fn test_subtotal_independent_of_order() {
        let lines = vec![line(50000, 2), line(12345, 3), line(999, 7)];
        let mut reversed = lines.clone();
        reversed.reverse();
        let a = engine().subtotal(&lines).unwrap();
        let b = engine().subtotal(&reversed).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.amount, 100000 + 37035 + 6993);
    }

    #[test]
    fn test_out_of_stock_lines_still_count() {
        let lines = vec![line(1000, 1), line(2000, 1).with_stock(false)];
        assert_eq!(engine().subtotal(&lines).unwrap().amount, 3000);
    }

    #[test]
    fn test_fixed_discount_bounds() {
        for amount in [-50000, 0, 1, 99999, 100000, 100001, i64::MAX] {
            let s = engine()
                .price(&[line(50000, 2)], Some(&Voucher::fixed("v", "X", amount)), None)
                .unwrap();
            assert!(s.discount.amount >= 0, "amount {}", amount);
            assert!(s.discount.amount <= s.subtotal.amount, "amount {}", amount);
            assert_identity(&s);
        }
    }

    #[test]
    fn test_negative_fixed_flagged() {
        let s = engine()
            .price(&[line(1000, 1)], Some(&Voucher::fixed("v", "X", -5)), None)
            .unwrap();
        assert_eq!(s.discount.amount, 0);
        assert_eq!(s.flags, vec![PricingFlag::NegativeVoucherAmount]);
    }

    #[test]
    fn test_oversized_fixed_flagged() {
        let s = engine()
            .price(&[line(1000, 1)], Some(&Voucher::fixed("v", "X", 5000)), None)
            .unwrap();
        assert_eq!(s.discount.amount, 1000);
        assert_eq!(s.flags, vec![PricingFlag::DiscountClamped]);
    }

    #[test]
    fn test_percentage_within_range_rounds() {
        for percent in [0.0, 1.0, 12.5, 33.0, 50.0, 99.9, 100.0] {
            let s = engine()
                .price(&[line(33333, 1)], Some(&Voucher::percentage("v", "X", percent)), None)
                .unwrap();
            assert_eq!(s.discount.amount, (33333.0 * percent / 100.0_f64).round() as i64);
            assert_identity(&s);
        }
    }

    #[test]
    fn test_percentage_above_hundred_clamped() {
        let s = engine()
            .price(
                &[line(10000, 1)],
                Some(&Voucher::percentage("v", "X", 150.0)),
                Some(&shipping(2000)),
            )
            .unwrap();
        assert_eq!(s.discount.amount, 10000);
        assert_eq!(s.grand_total.amount, 2000);
        assert!(s.flags.contains(&PricingFlag::PercentageAboveHundred));
        assert!(s.flags.contains(&PricingFlag::DiscountClamped));
    }

    #[test]
    fn test_huge_percentage_takes_whole_subtotal() {
        for percent in [1e18, f64::MAX, f64::INFINITY] {
            let s = engine()
                .price(
                    &[line(100000, 1)],
                    Some(&Voucher::percentage("v", "X", percent)),
                    Some(&shipping(5000)),
                )
                .unwrap();
            assert_eq!(s.discount.amount, 100000, "percent {}", percent);
            assert_eq!(s.grand_total.amount, 5000, "percent {}", percent);
            assert_identity(&s);
            assert_eq!(
                s.flags,
                vec![PricingFlag::PercentageAboveHundred, PricingFlag::DiscountClamped]
            );
        }
    }

    #[test]
    fn test_huge_percentage_legacy_overflows() {
        let engine = PricingEngine::new(Currency::IDR, DiscountPolicy::Legacy);
        let result = engine.price(
            &[line(100000, 1)],
            Some(&Voucher::percentage("v", "X", f64::INFINITY)),
            None,
        );
        assert_eq!(result, Err(CheckoutError::Overflow));
    }

    #[test]
    fn test_percentage_above_hundred_legacy_unclamped() {
        let engine = PricingEngine::new(Currency::IDR, DiscountPolicy::Legacy);
        let s = engine
            .price(
                &[line(10000, 1)],
                Some(&Voucher::percentage("v", "X", 150.0)),
                Some(&shipping(2000)),
            )
            .unwrap();
        assert_eq!(s.discount.amount, 15000);
        assert_eq!(s.grand_total.amount, -3000);
        assert_identity(&s);
        assert_eq!(s.flags, vec![PricingFlag::PercentageAboveHundred]);
    }

    #[test]
    fn test_negative_percentage_is_zero() {
        let s = engine()
            .price(&[line(10000, 1)], Some(&Voucher::percentage("v", "X", -10.0)), None)
            .unwrap();
        assert_eq!(s.discount.amount, 0);
    }

    #[test]
    fn test_missing_amount_is_zero_discount() {
        let mut voucher = Voucher::fixed("v", "X", 0);
        voucher.fixed_amount = None;
        let s = engine().price(&[line(10000, 1)], Some(&voucher), None).unwrap();
        assert_eq!(s.discount.amount, 0);
        assert!(!s.has_discount());
    }

    #[test]
    fn test_no_shipping_costs_zero() {
        let s = engine().price(&[line(10000, 1)], None, None).unwrap();
        assert!(s.shipping_cost.is_zero());
        assert_eq!(s.grand_total.amount, 10000);
    }

    #[test]
    fn test_overflow_reported() {
        let lines = vec![line(i64::MAX, 1), line(i64::MAX - 1, 1)];
        assert_eq!(engine().subtotal(&lines), Err(CheckoutError::Overflow));
    }
}
