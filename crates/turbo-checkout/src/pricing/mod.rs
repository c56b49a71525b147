//! Pricing module.
//!
//! Contains voucher types and the engine that turns cart lines, a voucher
//! and a shipping option into a priced snapshot.

mod engine;
mod voucher;

pub use engine::{PricingEngine, PricingFlag, PricingSnapshot};
pub use voucher::{DiscountPolicy, Voucher, VoucherKind};
