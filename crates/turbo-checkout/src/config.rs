//! Checkout configuration.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::ids::{CourierCode, ShopId};
use crate::money::Currency;
use crate::order::PaymentType;
use crate::pricing::DiscountPolicy;

/// Image shown when a cart line has neither an image nor media.
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "/images/placeholder.png";

/// Checkout configuration file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckoutConfig {
    /// Currency all prices are quoted in.
    #[serde(default)]
    pub currency: Currency,

    /// Quote origin override. Without it the first cart line's shop is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_shop_id: Option<ShopId>,

    /// Parcel defaults for quote requests and shipment descriptors.
    #[serde(default)]
    pub parcel: ParcelDefaults,

    /// How voucher discounts are bounded.
    #[serde(default)]
    pub discount_policy: DiscountPolicy,

    /// Image used when a line has no image of its own.
    #[serde(default = "default_placeholder_image")]
    pub placeholder_image: String,

    /// Couriers the shopper may choose from.
    #[serde(default = "default_couriers")]
    pub couriers: Vec<CourierConfig>,

    /// Payment type preselected for a new session.
    #[serde(default)]
    pub default_payment_type: PaymentType,
}

fn default_placeholder_image() -> String {
    DEFAULT_PLACEHOLDER_IMAGE.to_string()
}

fn default_couriers() -> Vec<CourierConfig> {
    vec![
        CourierConfig::new("jne", "JNE"),
        CourierConfig::new("pos", "POS Indonesia"),
        CourierConfig::new("tiki", "TIKI"),
    ]
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            currency: Currency::default(),
            origin_shop_id: None,
            parcel: ParcelDefaults::default(),
            discount_policy: DiscountPolicy::default(),
            placeholder_image: default_placeholder_image(),
            couriers: default_couriers(),
            default_payment_type: PaymentType::default(),
        }
    }
}

impl CheckoutConfig {
    /// Load config from a file. `.json` files are parsed as JSON, anything else as TOML.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;

        let config = if path.ends_with(".json") {
            Self::from_json(&content)?
        } else {
            Self::from_toml(&content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Parse from a JSON string.
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Reject configs the checkout cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.parcel.weight_grams == 0 {
            return Err(ConfigError::Invalid("parcel weight must be positive".into()));
        }
        if self.parcel.length_cm == 0 || self.parcel.width_cm == 0 || self.parcel.height_cm == 0 {
            return Err(ConfigError::Invalid(
                "parcel dimensions must be positive".into(),
            ));
        }
        if self.couriers.is_empty() {
            return Err(ConfigError::Invalid("at least one courier is required".into()));
        }

        let mut seen = HashSet::new();
        for courier in &self.couriers {
            if courier.code.is_blank() {
                return Err(ConfigError::Invalid("courier code must not be blank".into()));
            }
            if !seen.insert(courier.code.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate courier code: {}",
                    courier.code
                )));
            }
        }
        Ok(())
    }

    /// Look up a courier in the catalog.
    pub fn courier(&self, code: &CourierCode) -> Option<&CourierConfig> {
        self.couriers.iter().find(|c| &c.code == code)
    }
}

/// Default parcel weight and size.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParcelDefaults {
    #[serde(default = "default_weight")]
    pub weight_grams: u32,
    #[serde(default = "default_side")]
    pub length_cm: u32,
    #[serde(default = "default_side")]
    pub width_cm: u32,
    #[serde(default = "default_side")]
    pub height_cm: u32,
}

fn default_weight() -> u32 {
    1000
}

fn default_side() -> u32 {
    10
}

impl Default for ParcelDefaults {
    fn default() -> Self {
        Self {
            weight_grams: default_weight(),
            length_cm: default_side(),
            width_cm: default_side(),
            height_cm: default_side(),
        }
    }
}

/// A selectable courier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CourierConfig {
    pub code: CourierCode,
    pub name: String,
}

impl CourierConfig {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: CourierCode::new(code),
            name: name.into(),
        }
    }
}
