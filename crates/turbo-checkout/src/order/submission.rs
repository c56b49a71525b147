//! Outbound order payload.

use serde::{Deserialize, Serialize};

use crate::address::GuestContact;
use crate::cart::{CartLine, ShopGroup};
use crate::error::CheckoutError;
use crate::ids::{CourierCode, ProductId, RegionId, ShopId, VariantId, VoucherId};
use crate::pricing::Voucher;
use crate::shipping::{Dimensions, QuoteRequest, ShippingQuoteOption};

/// How the shopper pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    /// Bank transfer with uploaded proof of payment.
    #[default]
    ManualTransfer,
    /// Hosted payment gateway.
    Gateway,
    CashOnDelivery,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::ManualTransfer => "manual_transfer",
            PaymentType::Gateway => "gateway",
            PaymentType::CashOnDelivery => "cash_on_delivery",
        }
    }
}

/// Guest contact as sent to the backend.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GuestDetails {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address_line1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub postal_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province_id: Option<RegionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city_id: Option<RegionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district_id: Option<RegionId>,
}

impl From<&GuestContact> for GuestDetails {
    fn from(contact: &GuestContact) -> Self {
        Self {
            full_name: contact.full_name.trim().to_string(),
            email: contact.email.trim().to_string(),
            phone: contact.phone.trim().to_string(),
            address_line1: contact.address_line1.trim().to_string(),
            address_line2: contact
                .address_line2
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            postal_code: contact.postal_code.trim().to_string(),
            province_id: contact.region.province_id().cloned(),
            city_id: contact.region.city_id().cloned(),
            district_id: contact.region.district_id().cloned(),
        }
    }
}

/// One ordered product.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<VariantId>,
    pub quantity: u32,
}

/// Items shipped from one shop.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentGroup {
    pub shop_id: ShopId,
    pub items: Vec<OrderItem>,
}

/// Where and how the order ships.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentDescriptor {
    pub destination_key: String,
    pub weight: u32,
    pub dimensions: Dimensions,
    pub courier_code: CourierCode,
    /// JSON text of the quote request the chosen option came from.
    pub quote_request: String,
    /// JSON text of the chosen option.
    pub quote: String,
    pub cost: i64,
}

/// The order as submitted. Built once and never changed.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderSubmission {
    guest: GuestDetails,
    payment_type: PaymentType,
    shipments: Vec<ShipmentGroup>,
    shipment: ShipmentDescriptor,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    voucher_ids: Vec<VoucherId>,
}

impl OrderSubmission {
    /// Assemble the payload. The quote request and chosen option are
    /// serialized here, once.
    pub fn build(
        contact: &GuestContact,
        payment_type: PaymentType,
        lines: &[CartLine],
        request: &QuoteRequest,
        option: &ShippingQuoteOption,
        voucher: Option<&Voucher>,
    ) -> Result<Self, CheckoutError> {
        let shipments = ShopGroup::group(lines)
            .into_iter()
            .map(|group| ShipmentGroup {
                shop_id: group.shop_id.clone(),
                items: group
                    .lines
                    .iter()
                    .map(|line| OrderItem {
                        product_id: line.product_id.clone(),
                        variant_id: line.variant_id.clone(),
                        quantity: line.quantity,
                    })
                    .collect(),
            })
            .collect();

        let shipment = ShipmentDescriptor {
            destination_key: request.destination_key.clone(),
            weight: request.weight,
            dimensions: request.dimensions,
            courier_code: request.courier_code.clone(),
            quote_request: serde_json::to_string(request)?,
            quote: serde_json::to_string(option)?,
            cost: option.cost,
        };

        Ok(Self {
            guest: GuestDetails::from(contact),
            payment_type,
            shipments,
            shipment,
            voucher_ids: voucher.map(|v| vec![v.id.clone()]).unwrap_or_default(),
        })
    }

    pub fn guest(&self) -> &GuestDetails {
        &self.guest
    }

    pub fn payment_type(&self) -> PaymentType {
        self.payment_type
    }

    pub fn shipments(&self) -> &[ShipmentGroup] {
        &self.shipments
    }

    pub fn shipment(&self) -> &ShipmentDescriptor {
        &self.shipment
    }

    pub fn voucher_ids(&self) -> &[VoucherId] {
        &self.voucher_ids
    }

    /// JSON body for the order endpoint.
    pub fn to_json(&self) -> Result<String, CheckoutError> {
        Ok(serde_json::to_string(self)?)
    }
}
