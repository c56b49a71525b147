//! Shipping quote types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::ParcelDefaults;
use crate::error::ServiceError;
use crate::ids::{CourierCode, ShopId};
use crate::money::{Currency, Money};

/// A priced, timed delivery option for one origin/destination/courier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShippingQuoteOption {
    /// Courier display name.
    pub name: String,
    /// Courier code.
    pub code: String,
    /// Service level, e.g. "REG".
    pub service_name: String,
    #[serde(default)]
    pub description: String,
    /// Cost in minor units, never negative.
    pub cost: i64,
    /// Delivery estimate as given by the courier, e.g. "2-3".
    #[serde(default)]
    pub estimated_duration: String,
}

impl ShippingQuoteOption {
    /// Cost as money.
    pub fn cost_money(&self, currency: Currency) -> Money {
        Money::new(self.cost, currency)
    }

    /// Whether this option matches a `(code, service)` pair.
    pub fn matches(&self, code: &str, service_name: &str) -> bool {
        self.code.eq_ignore_ascii_case(code) && self.service_name == service_name
    }

    /// Display label, e.g. "JNE REG (2-3 days)".
    pub fn label(&self) -> String {
        let base = format!("{} {}", self.code.to_uppercase(), self.service_name);
        let estimate = self.estimated_duration.trim();
        if estimate.is_empty() {
            base
        } else if estimate.to_lowercase().contains("day") || estimate.contains("hari") {
            format!("{} ({})", base, estimate)
        } else {
            format!("{} ({} days)", base, estimate)
        }
    }
}

/// Parcel size.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dimensions {
    pub length: u32,
    pub width: u32,
    pub height: u32,
}

/// Parameters of one quote request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub origin_shop_id: ShopId,
    pub destination_key: String,
    /// Weight in grams.
    pub weight: u32,
    pub dimensions: Dimensions,
    pub courier_code: CourierCode,
}

impl QuoteRequest {
    pub fn new(
        origin_shop_id: ShopId,
        destination_key: impl Into<String>,
        parcel: &ParcelDefaults,
        courier_code: CourierCode,
    ) -> Self {
        Self {
            origin_shop_id,
            destination_key: destination_key.into(),
            weight: parcel.weight_grams,
            dimensions: Dimensions {
                length: parcel.length_cm,
                width: parcel.width_cm,
                height: parcel.height_cm,
            },
            courier_code,
        }
    }
}

/// Remote courier quote service.
#[async_trait]
pub trait ShippingQuoteService: Send + Sync {
    async fn quote(&self, request: &QuoteRequest) -> Result<Vec<ShippingQuoteOption>, ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(duration: &str) -> ShippingQuoteOption {
        ShippingQuoteOption {
            name: "Jalur Nugraha Ekakurir".to_string(),
            code: "jne".to_string(),
            service_name: "REG".to_string(),
            description: "Layanan Reguler".to_string(),
            cost: 15000,
            estimated_duration: duration.to_string(),
        }
    }

    #[test]
    fn test_label() {
        assert_eq!(option("2-3").label(), "JNE REG (2-3 days)");
        assert_eq!(option("1 day").label(), "JNE REG (1 day)");
        assert_eq!(option("").label(), "JNE REG");
    }

    #[test]
    fn test_matches_is_case_insensitive_on_code() {
        assert!(option("2-3").matches("JNE", "REG"));
        assert!(!option("2-3").matches("jne", "YES"));
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let json = serde_json::to_value(option("2-3")).unwrap();
        assert_eq!(json["serviceName"], "REG");
        assert_eq!(json["estimatedDuration"], "2-3");
    }

    #[test]
    fn test_request_uses_parcel_defaults() {
        let request = QuoteRequest::new(
            ShopId::new("shop-1"),
            "d1",
            &ParcelDefaults::default(),
            CourierCode::new("jne"),
        );
        assert_eq!(request.weight, 1000);
        assert_eq!(request.dimensions.height, 10);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["originShopId"], "shop-1");
        assert_eq!(json["courierCode"], "jne");
    }
}
