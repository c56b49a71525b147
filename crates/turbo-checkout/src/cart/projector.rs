//! Cart view projection.

use crate::cart::{CartLine, CartLineKey};
use crate::error::CheckoutError;
use crate::ids::ShopId;
use crate::money::{Currency, Money};
use serde::Serialize;

/// Display-ready cart line.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CartLineView {
    pub key: CartLineKey,
    pub shop_id: ShopId,
    pub name: String,
    pub category_label: String,
    pub image: String,
    pub unit_price: Money,
    pub quantity: u32,
    /// `unit_price × quantity`.
    pub line_total: Money,
    pub in_stock: bool,
}

impl CartLineView {
    pub fn has_variant(&self) -> bool {
        self.key.variant_id.is_some()
    }
}

/// Projected cart.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    /// Any line out of stock. Blocks submission.
    pub has_out_of_stock_items: bool,
}

impl CartView {
    /// Project raw cart lines. Fails on a line below quantity 1 or an
    /// overflowing line total.
    pub fn project(
        lines: &[CartLine],
        currency: Currency,
        placeholder_image: &str,
    ) -> Result<Self, CheckoutError> {
        let views = lines
            .iter()
            .map(|line| {
                Ok(CartLineView {
                    key: line.key(),
                    shop_id: line.shop_id.clone(),
                    name: line.name.clone(),
                    category_label: line.category_label.clone(),
                    image: line.resolve_image(placeholder_image).to_string(),
                    unit_price: line.unit_money(currency),
                    quantity: line.quantity,
                    line_total: line.line_total(currency)?,
                    in_stock: line.in_stock,
                })
            })
            .collect::<Result<Vec<_>, CheckoutError>>()?;

        Ok(Self {
            has_out_of_stock_items: views.iter().any(|l| !l.in_stock),
            lines: views,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of quantities.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }
}

/// Lines sharing one shop, in first-seen shop order.
#[derive(Debug, Clone, PartialEq)]
pub struct ShopGroup<'a> {
    pub shop_id: &'a ShopId,
    pub lines: Vec<&'a CartLine>,
}

impl<'a> ShopGroup<'a> {
    /// Group lines by shop, preserving the order shops first appear in.
    pub fn group(lines: &'a [CartLine]) -> Vec<ShopGroup<'a>> {
        let mut groups: Vec<ShopGroup<'a>> = Vec::new();
        for line in lines {
            match groups.iter_mut().find(|g| g.shop_id == &line.shop_id) {
                Some(group) => group.lines.push(line),
                None => groups.push(ShopGroup {
                    shop_id: &line.shop_id,
                    lines: vec![line],
                }),
            }
        }
        groups
    }
}
