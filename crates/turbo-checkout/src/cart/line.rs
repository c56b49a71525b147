//! Cart line types.

use crate::error::CheckoutError;
use crate::ids::{ProductId, ShopId, VariantId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// A product (and optional variant) with a quantity in the order draft.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    /// Product ID.
    pub product_id: ProductId,
    /// Variant ID, if the product has variants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<VariantId>,
    /// Shop the line ships from.
    pub shop_id: ShopId,
    /// Product name (denormalized for display).
    pub name: String,
    /// Unit price in minor units.
    pub unit_price: i64,
    /// Quantity, at least 1.
    pub quantity: u32,
    /// Category label shown under the name.
    #[serde(default)]
    pub category_label: String,
    /// Whether the product is currently in stock.
    pub in_stock: bool,
    /// Direct image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Product media, first entry doubles as a fallback image.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<MediaAsset>,
}

impl CartLine {
    /// Create an in-stock line without images.
    pub fn new(
        product_id: impl Into<ProductId>,
        shop_id: impl Into<ShopId>,
        name: impl Into<String>,
        unit_price: i64,
        quantity: u32,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            variant_id: None,
            shop_id: shop_id.into(),
            name: name.into(),
            unit_price,
            quantity,
            category_label: String::new(),
            in_stock: true,
            image: None,
            media: Vec::new(),
        }
    }

    /// Set the variant.
    pub fn with_variant(mut self, variant_id: impl Into<VariantId>) -> Self {
        self.variant_id = Some(variant_id.into());
        self
    }

    /// Set stock presence.
    pub fn with_stock(mut self, in_stock: bool) -> Self {
        self.in_stock = in_stock;
        self
    }

    /// Set the category label.
    pub fn with_category(mut self, label: impl Into<String>) -> Self {
        self.category_label = label.into();
        self
    }

    /// Key identifying this line in the cart store.
    pub fn key(&self) -> CartLineKey {
        CartLineKey {
            product_id: self.product_id.clone(),
            variant_id: self.variant_id.clone(),
        }
    }

    /// Unit price as money.
    pub fn unit_money(&self, currency: Currency) -> Money {
        Money::new(self.unit_price, currency)
    }

    /// `unit_price × quantity`. A line below quantity 1 is rejected.
    pub fn line_total(&self, currency: Currency) -> Result<Money, CheckoutError> {
        if self.quantity == 0 {
            return Err(CheckoutError::InvalidQuantity(0));
        }
        self.unit_money(currency)
            .checked_mul(i64::from(self.quantity))
            .ok_or(CheckoutError::Overflow)
    }

    /// Image to display: direct image, then first media asset, then the placeholder.
    pub fn resolve_image<'a>(&'a self, placeholder: &'a str) -> &'a str {
        self.image
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.media.first().map(|m| m.url.as_str()))
            .unwrap_or(placeholder)
    }
}

/// Product (plus optional variant) key of a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CartLineKey {
    pub product_id: ProductId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<VariantId>,
}

impl CartLineKey {
    pub fn new(product_id: impl Into<ProductId>, variant_id: Option<VariantId>) -> Self {
        Self {
            product_id: product_id.into(),
            variant_id,
        }
    }
}

/// A product media asset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MediaAsset {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

impl MediaAsset {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            alt: None,
        }
    }
}
